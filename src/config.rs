/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端服务基础地址
    pub api_base_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 默认的 HTML 预览文件
    pub preview_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            verbose_logging: false,
            preview_file: "preview.html".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default.api_base_url),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
            preview_file: std::env::var("PREVIEW_FILE").unwrap_or(default.preview_file),
        }
    }
}
