/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use tracing::{debug, info};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 LaTeX 标注工具启动");
    info!("🌐 后端地址: {}", config.api_base_url);
    debug!("📄 预览文件: {}", config.preview_file);
    info!("{}", "=".repeat(60));
}

/// 记录题目列表加载信息
///
/// # 参数
/// - `total`: 题目总数
/// - `annotated`: 已标注数量
pub fn log_collection_loaded(total: usize, annotated: usize) {
    if total == 0 {
        info!("📭 后端暂无题目，可先上传数据文件");
    } else {
        info!("✓ 已加载 {} 道题目 (已标注 {}/{})", total, annotated, total);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
