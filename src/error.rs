//! 错误类型
//!
//! 按来源分类：网络（后端请求）、渲染（公式）、文件（本地读写）。
//! 所有错误都可恢复，调用方记录日志后继续会话。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 后端请求错误
    #[error("网络错误: {0}")]
    Network(#[from] NetworkError),
    /// 公式渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 本地文件错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 后端请求错误
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 基础地址无效
    #[error("无效的后端地址 {url}: {message}")]
    InvalidUrl { url: String, message: String },
    /// 请求未能完成
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 后端返回错误状态码
    #[error("后端返回错误状态 ({endpoint}): {status} {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 公式渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("无法渲染公式: {message}")]
    Failed { message: String },
    #[error("渲染器内部崩溃")]
    Panicked,
}

/// 本地文件错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Network(NetworkError::InvalidUrl {
            url: url.into(),
            message: message.into(),
        })
    }

    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Network(NetworkError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建错误状态码错误
    pub fn bad_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        AppError::Network(NetworkError::BadStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        })
    }

    pub fn decode_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Network(NetworkError::Decode {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为网络类错误
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_message_names_endpoint() {
        let err = AppError::bad_status("PUT /problems/p1", 500, "boom");
        assert!(err.is_network());
        let text = err.to_string();
        assert!(text.contains("PUT /problems/p1"));
        assert!(text.contains("500"));
    }

    #[test]
    fn test_file_error_is_not_network() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::file_read_failed("data.json", io);
        assert!(!err.is_network());
        assert!(err.to_string().contains("data.json"));
    }
}
