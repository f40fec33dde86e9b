//! # LaTeX Annotator
//!
//! 一个用于逐题校对 LaTeX 题目文本的标注工具
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `ProblemRecord` / `ProblemCollection`，集合按后端返回顺序浏览
//!
//! ### ② 后端层（Clients）
//! - `clients/` - `ProblemBackend` 抽象与基于 HTTP 的 `ProblemClient`
//!
//! ### ③ 能力层（Services）
//! - `NotationRenderer` - LaTeX → MathML，失败时退化为原始文本
//! - `PreviewWriter` - 写出 HTML 预览
//!
//! ### ④ 流程层（Workflow）
//! - `SessionState` - 集合、当前题目、编辑缓冲区
//! - `AnnotationController` - 刷新 / 选择 / 编辑 / 保存 / 浏览 / 上传
//!
//! ### ⑤ 界面层
//! - `view` - 文本界面
//! - `app` - 控制台命令循环
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod view;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ProblemBackend, ProblemClient, UploadFile};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnnotationStatus, ProblemCollection, ProblemRecord};
pub use services::NotationRenderer;
pub use workflow::{AnnotationController, Direction, SaveOutcome, SessionState};
