/// 题目后端 HTTP 客户端
///
/// 封装 `/problems`、`/problems/{id}`、`/upload` 三个接口
use crate::clients::backend::{ProblemBackend, UploadFile};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::ProblemCollection;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use tracing::debug;

/// 题目后端客户端
///
/// 不设置超时、不重试：请求挂起时由调用方一直等待。
#[derive(Clone)]
pub struct ProblemClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct SaveProblemRequest<'a> {
    editable_problem: &'a str,
}

impl ProblemClient {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(&config.api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| AppError::invalid_url(base_url, e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::invalid_url(base_url.as_str(), "不能作为基础地址"));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 在基础地址后追加路径段，ID 会被转义
    fn endpoint_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::invalid_url(self.base_url.as_str(), "不能作为基础地址"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 非 2xx 状态码转为错误
    async fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::bad_status(endpoint, status.as_u16(), body))
    }
}

#[async_trait]
impl ProblemBackend for ProblemClient {
    async fn fetch_problems(&self) -> AppResult<ProblemCollection> {
        let endpoint = "GET /problems";
        let url = self.endpoint_url(&["problems"])?;

        debug!("请求题目列表: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;
        let response = Self::check_status(endpoint, response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;
        let collection: ProblemCollection =
            serde_json::from_slice(&bytes).map_err(|e| AppError::decode_failed(endpoint, e))?;

        debug!("题目列表返回 {} 条", collection.len());

        Ok(collection)
    }

    async fn upload_file(&self, upload: UploadFile) -> AppResult<()> {
        let endpoint = "POST /upload";
        let url = self.endpoint_url(&["upload"])?;

        debug!(
            "上传文件: {} ({} 字节)",
            upload.file_name,
            upload.bytes.len()
        );

        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;
        Self::check_status(endpoint, response).await?;

        Ok(())
    }

    async fn save_problem(&self, id: &str, editable_problem: &str) -> AppResult<()> {
        let endpoint = format!("PUT /problems/{}", id);
        let url = self.endpoint_url(&["problems", id])?;

        debug!("保存题目 {}，文本长度: {} 字符", id, editable_problem.chars().count());

        let response = self
            .client
            .put(url)
            .json(&SaveProblemRequest { editable_problem })
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint.as_str(), e))?;
        Self::check_status(&endpoint, response).await?;

        Ok(())
    }
}
