//! 后端协作方抽象
//!
//! 会话控制器只依赖这个 trait，真实实现走 HTTP，测试里换成内存实现。

use crate::error::AppResult;
use crate::models::ProblemCollection;
use async_trait::async_trait;

/// 待上传的数据文件
///
/// 内容格式只有后端的导入流程认识，这里不做解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// 题目后端
#[async_trait]
pub trait ProblemBackend: Send + Sync {
    /// 获取全部题目
    async fn fetch_problems(&self) -> AppResult<ProblemCollection>;

    /// 上传数据文件，由后端导入为题目
    async fn upload_file(&self, upload: UploadFile) -> AppResult<()>;

    /// 保存题目的可编辑文本
    async fn save_problem(&self, id: &str, editable_problem: &str) -> AppResult<()>;
}
