//! 测试用内存后端

use crate::clients::backend::{ProblemBackend, UploadFile};
use crate::error::{AppError, AppResult};
use crate::models::{ProblemCollection, ProblemRecord};
use async_trait::async_trait;
use std::sync::Mutex;

/// 记录下来的后端调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Fetch,
    Upload(String),
    Save { id: String, editable_problem: String },
}

#[derive(Default)]
struct Inner {
    problems: ProblemCollection,
    calls: Vec<Call>,
    fail_fetch: bool,
    fail_upload: bool,
    fail_save: bool,
}

/// 内存后端：保存时把记录标为 annotated，上传时把文件当作 JSON 题目集合导入
#[derive(Default)]
pub(crate) struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    pub(crate) fn with_problems(records: Vec<ProblemRecord>) -> Self {
        let backend = Self::default();
        backend.inner.lock().unwrap().problems = records.into_iter().collect();
        backend
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub(crate) fn set_fail_fetch(&self, fail: bool) {
        self.inner.lock().unwrap().fail_fetch = fail;
    }

    pub(crate) fn set_fail_upload(&self, fail: bool) {
        self.inner.lock().unwrap().fail_upload = fail;
    }

    pub(crate) fn set_fail_save(&self, fail: bool) {
        self.inner.lock().unwrap().fail_save = fail;
    }

    /// 模拟服务端直接修改数据
    pub(crate) fn replace_problems(&self, records: Vec<ProblemRecord>) {
        self.inner.lock().unwrap().problems = records.into_iter().collect();
    }
}

#[async_trait]
impl ProblemBackend for FakeBackend {
    async fn fetch_problems(&self) -> AppResult<ProblemCollection> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Fetch);
        if inner.fail_fetch {
            return Err(AppError::bad_status("GET /problems", 503, "unavailable"));
        }
        Ok(inner.problems.clone())
    }

    async fn upload_file(&self, upload: UploadFile) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Upload(upload.file_name.clone()));
        if inner.fail_upload {
            return Err(AppError::bad_status("POST /upload", 400, "bad file"));
        }
        let imported: ProblemCollection = serde_json::from_slice(&upload.bytes)
            .map_err(|e| AppError::decode_failed("POST /upload", e))?;
        inner.problems = imported;
        Ok(())
    }

    async fn save_problem(&self, id: &str, editable_problem: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Save {
            id: id.to_string(),
            editable_problem: editable_problem.to_string(),
        });
        if inner.fail_save {
            return Err(AppError::bad_status(format!("PUT /problems/{}", id), 500, "boom"));
        }
        let record = inner
            .problems
            .get_mut(id)
            .ok_or_else(|| AppError::bad_status(format!("PUT /problems/{}", id), 404, "missing"))?;
        record.editable_problem = editable_problem.to_string();
        record.annotation_status = "annotated".to_string().into();
        Ok(())
    }
}
