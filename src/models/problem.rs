//! 题目数据模型
//!
//! 后端以 `id -> 题目` 的 JSON 对象返回全部题目，对象中键的顺序就是浏览顺序。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 标注状态
///
/// 只用于界面区分，不参与流程判断：`unannotated` 之外的任何值都视为"已处理"。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationStatus {
    #[default]
    Unannotated,
    /// 后端给出的其他状态值，原样保留
    Other(String),
}

impl AnnotationStatus {
    pub fn is_annotated(&self) -> bool {
        !matches!(self, AnnotationStatus::Unannotated)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnnotationStatus::Unannotated => "unannotated",
            AnnotationStatus::Other(value) => value,
        }
    }
}

impl From<String> for AnnotationStatus {
    fn from(value: String) -> Self {
        if value == "unannotated" {
            AnnotationStatus::Unannotated
        } else {
            AnnotationStatus::Other(value)
        }
    }
}

impl From<AnnotationStatus> for String {
    fn from(status: AnnotationStatus) -> Self {
        match status {
            AnnotationStatus::Unannotated => "unannotated".to_string(),
            AnnotationStatus::Other(value) => value,
        }
    }
}

impl fmt::Display for AnnotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一道待标注的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// 由集合的键回填，后端记录体里可以没有
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub original_problem: String,
    pub editable_problem: String,
    #[serde(default)]
    pub annotation_status: AnnotationStatus,
}

impl ProblemRecord {
    pub fn new(
        id: impl Into<String>,
        original_problem: impl Into<String>,
        editable_problem: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original_problem: original_problem.into(),
            editable_problem: editable_problem.into(),
            annotation_status: AnnotationStatus::Unannotated,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.annotation_status = AnnotationStatus::from(status.into());
        self
    }
}

/// 有序的题目集合
///
/// 每次获取都整体替换，不做增量合并。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, ProblemRecord>",
    into = "IndexMap<String, ProblemRecord>"
)]
pub struct ProblemCollection {
    records: IndexMap<String, ProblemRecord>,
}

impl ProblemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ProblemRecord> {
        self.records.get(id)
    }

    /// 按浏览顺序遍历题目 ID
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// 按浏览顺序遍历题目
    pub fn iter(&self) -> impl Iterator<Item = &ProblemRecord> {
        self.records.values()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.records.keys().next().map(String::as_str)
    }

    /// 题目在浏览顺序中的位置
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.get_index_of(id)
    }

    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.records.get_index(index).map(|(id, _)| id.as_str())
    }

    pub fn annotated_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.annotation_status.is_annotated())
            .count()
    }

    /// 插入或替换题目，新 ID 追加在末尾
    pub fn insert(&mut self, record: ProblemRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ProblemRecord> {
        self.records.get_mut(id)
    }
}

impl From<IndexMap<String, ProblemRecord>> for ProblemCollection {
    fn from(mut records: IndexMap<String, ProblemRecord>) -> Self {
        for (id, record) in records.iter_mut() {
            record.id = id.clone();
        }
        Self { records }
    }
}

impl From<ProblemCollection> for IndexMap<String, ProblemRecord> {
    fn from(collection: ProblemCollection) -> Self {
        collection.records
    }
}

impl FromIterator<ProblemRecord> for ProblemCollection {
    fn from_iter<T: IntoIterator<Item = ProblemRecord>>(iter: T) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}
