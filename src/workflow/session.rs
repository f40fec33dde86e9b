//! 会话状态
//!
//! 持有题目集合、当前题目 ID 和编辑缓冲区。当前 ID 只是集合里的一个键，
//! 每次替换集合后都要重新校验；任何改变当前题目或刷新集合的操作都会
//! 用记录里的 `editable_problem` 覆盖缓冲区，未保存的修改随之丢弃。

use crate::models::{ProblemCollection, ProblemRecord};
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// 浏览方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prev" | "previous" | "p" => Ok(Direction::Previous),
            "next" | "n" => Ok(Direction::Next),
            other => Err(format!("未知方向: {}", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Previous => f.write_str("previous"),
            Direction::Next => f.write_str("next"),
        }
    }
}

/// 标注会话状态
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    collection: ProblemCollection,
    current_id: Option<String>,
    edit_buffer: String,
    last_refreshed: Option<DateTime<Local>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &ProblemCollection {
        &self.collection
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    /// 是否已加载过集合
    pub fn is_loaded(&self) -> bool {
        self.last_refreshed.is_some()
    }

    /// 当前题目
    pub fn current(&self) -> Option<&ProblemRecord> {
        self.current_id
            .as_deref()
            .and_then(|id| self.collection.get(id))
    }

    /// 缓冲区是否有未保存的修改
    pub fn is_dirty(&self) -> bool {
        self.current()
            .map(|record| record.editable_problem != self.edit_buffer)
            .unwrap_or(false)
    }

    /// 整体替换题目集合
    ///
    /// 当前 ID 不在新集合中时回退到第一道题；集合为空则清空选择。
    pub fn replace_collection(&mut self, collection: ProblemCollection) {
        // 刚保存过的内容会出现在新集合里，不算丢弃
        let discarded = self.is_dirty()
            && self
                .current_id
                .as_deref()
                .and_then(|id| collection.get(id))
                .map_or(true, |record| record.editable_problem != self.edit_buffer);
        if discarded {
            self.warn_if_dirty("刷新");
        }

        self.collection = collection;

        let still_valid = self
            .current_id
            .as_deref()
            .is_some_and(|id| self.collection.contains(id));
        if !still_valid {
            let fallback = self.collection.first_id().map(str::to_owned);
            if let Some(previous) = self.current_id.as_deref() {
                debug!("题目 {} 已不在列表中，回退到 {:?}", previous, fallback);
            }
            self.current_id = fallback;
        }

        self.resync_buffer();
        self.last_refreshed = Some(Local::now());
    }

    /// 选中题目，ID 不存在时什么都不做
    ///
    /// # 返回
    /// 返回是否选中成功
    pub fn select(&mut self, id: &str) -> bool {
        if !self.collection.contains(id) {
            debug!("忽略不存在的题目: {}", id);
            return false;
        }

        if self.current_id.as_deref() != Some(id) {
            self.warn_if_dirty("切换题目");
        }

        self.current_id = Some(id.to_string());
        self.resync_buffer();
        true
    }

    /// 覆盖编辑缓冲区，不影响集合
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        self.edit_buffer = text.into();
    }

    /// 计算指定方向上的相邻题目，不会循环
    ///
    /// 没有有效选择时，`Next` 指向第一道题，`Previous` 没有目标。
    pub fn neighbor(&self, direction: Direction) -> Option<&str> {
        let index = self
            .current_id
            .as_deref()
            .and_then(|id| self.collection.position(id));

        match (direction, index) {
            (Direction::Next, Some(i)) => self.collection.id_at(i + 1),
            (Direction::Next, None) => self.collection.first_id(),
            (Direction::Previous, Some(i)) if i > 0 => self.collection.id_at(i - 1),
            (Direction::Previous, _) => None,
        }
    }

    fn resync_buffer(&mut self) {
        self.edit_buffer = self
            .current()
            .map(|record| record.editable_problem.clone())
            .unwrap_or_default();
    }

    fn warn_if_dirty(&self, action: &str) {
        if self.is_dirty() {
            warn!(
                "⚠️ {}前题目 {} 有未保存的修改，已丢弃",
                action,
                self.current_id.as_deref().unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(ids: &[&str]) -> ProblemCollection {
        ids.iter()
            .map(|id| ProblemRecord::new(*id, format!("orig {}", id), format!("edit {}", id)))
            .collect()
    }

    fn loaded(ids: &[&str]) -> SessionState {
        let mut state = SessionState::new();
        state.replace_collection(collection(ids));
        state
    }

    #[test]
    fn test_empty_session() {
        let state = SessionState::new();
        assert!(!state.is_loaded());
        assert_eq!(state.current_id(), None);
        assert_eq!(state.edit_buffer(), "");
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_first_load_selects_first_key() {
        let state = loaded(&["b", "a", "c"]);
        assert!(state.is_loaded());
        assert_eq!(state.current_id(), Some("b"));
        assert_eq!(state.edit_buffer(), "edit b");
    }

    #[test]
    fn test_empty_collection_leaves_selection_unset() {
        let state = loaded(&[]);
        assert!(state.is_loaded());
        assert_eq!(state.current_id(), None);
        assert_eq!(state.edit_buffer(), "");
    }

    #[test]
    fn test_refresh_keeps_valid_selection_and_overwrites_buffer() {
        let mut state = loaded(&["a", "b"]);
        state.select("b");
        state.set_edit_buffer("unsaved");

        let mut refreshed = collection(&["a", "b"]);
        refreshed.insert(ProblemRecord::new("b", "orig b", "server b"));
        state.replace_collection(refreshed);

        assert_eq!(state.current_id(), Some("b"));
        assert_eq!(state.edit_buffer(), "server b");
    }

    #[test]
    fn test_refresh_falls_back_when_current_disappears() {
        let mut state = loaded(&["a", "b"]);
        state.select("b");

        state.replace_collection(collection(&["c", "a"]));

        assert_eq!(state.current_id(), Some("c"));
        assert_eq!(state.edit_buffer(), "edit c");
    }

    #[test]
    fn test_refresh_to_empty_clears_selection() {
        let mut state = loaded(&["a"]);
        state.replace_collection(ProblemCollection::new());
        assert_eq!(state.current_id(), None);
        assert_eq!(state.edit_buffer(), "");
    }

    #[test]
    fn test_select_resyncs_buffer_every_time() {
        let mut state = loaded(&["a", "b", "c"]);

        for id in ["c", "a", "b", "b", "a"] {
            state.set_edit_buffer("scratch");
            assert!(state.select(id));
            assert_eq!(state.current_id(), Some(id));
            assert_eq!(
                state.edit_buffer(),
                state.collection().get(id).unwrap().editable_problem
            );
        }
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let mut state = loaded(&["a", "b"]);
        state.set_edit_buffer("keep me");

        assert!(!state.select("zz"));

        assert_eq!(state.current_id(), Some("a"));
        assert_eq!(state.edit_buffer(), "keep me");
    }

    #[test]
    fn test_set_edit_buffer_marks_dirty() {
        let mut state = loaded(&["a"]);
        assert!(!state.is_dirty());
        state.set_edit_buffer("changed");
        assert!(state.is_dirty());
        assert_eq!(state.collection().get("a").unwrap().editable_problem, "edit a");
    }

    #[test]
    fn test_neighbor_boundaries() {
        let mut state = loaded(&["a", "b", "c"]);

        assert_eq!(state.neighbor(Direction::Previous), None);
        assert_eq!(state.neighbor(Direction::Next), Some("b"));

        state.select("c");
        assert_eq!(state.neighbor(Direction::Next), None);
        assert_eq!(state.neighbor(Direction::Previous), Some("b"));
    }

    #[test]
    fn test_neighbor_without_selection() {
        let state = SessionState::new();
        assert_eq!(state.neighbor(Direction::Next), None);
        assert_eq!(state.neighbor(Direction::Previous), None);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("prev".parse::<Direction>(), Ok(Direction::Previous));
        assert_eq!("Next".parse::<Direction>(), Ok(Direction::Next));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
