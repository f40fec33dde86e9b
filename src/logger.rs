//! 日志初始化
//!
//! 诊断信息统一走 tracing，输出到 stderr，不与标准输出上的界面混在一起。

use tracing_subscriber::EnvFilter;

/// 使用默认级别（info）初始化日志
pub fn init() {
    init_with(false);
}

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时 `verbose` 决定 debug / info。重复调用是安全的。
pub fn init_with(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
