//! 标注会话控制器 - 流程层
//!
//! 编排"刷新 → 选择 → 编辑 → 保存 → 前进"的完整流程。
//!
//! 所有修改状态的方法都接收 `&mut self`，同一会话上的操作因此天然串行，
//! 不会在等待网络时被另一个操作打断。后端失败时状态保持不变，错误写入日志并返回。

use crate::clients::{ProblemBackend, UploadFile};
use crate::error::{AppError, AppResult};
use crate::services::{NotationRenderer, PreviewWriter};
use crate::utils::logging::log_collection_loaded;
use crate::utils::truncate_text;
use crate::workflow::session::{Direction, SessionState};
use std::path::Path;
use tracing::{error, info, warn};

/// 保存结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 已保存并刷新
    Saved,
    /// 没有选中题目，未发送请求
    Skipped,
}

/// 标注会话控制器
pub struct AnnotationController<B> {
    backend: B,
    state: SessionState,
    renderer: NotationRenderer,
}

impl<B: ProblemBackend> AnnotationController<B> {
    /// 创建新的控制器，集合为空
    pub fn new(backend: B) -> Self {
        Self::with_renderer(backend, NotationRenderer::new())
    }

    pub fn with_renderer(backend: B, renderer: NotationRenderer) -> Self {
        Self {
            backend,
            state: SessionState::new(),
            renderer,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn renderer(&self) -> &NotationRenderer {
        &self.renderer
    }

    /// 重新获取全部题目
    ///
    /// # 返回
    /// 返回新集合中的题目数量；失败时集合和选择都不变
    pub async fn refresh(&mut self) -> AppResult<usize> {
        let collection = match self.backend.fetch_problems().await {
            Ok(collection) => collection,
            Err(e) => {
                error!("❌ 获取题目列表失败: {}", e);
                return Err(e);
            }
        };

        let total = collection.len();
        log_collection_loaded(total, collection.annotated_count());

        self.state.replace_collection(collection);
        Ok(total)
    }

    /// 选中题目并用其可编辑文本覆盖缓冲区
    pub fn select_problem(&mut self, id: &str) -> bool {
        let selected = self.state.select(id);
        if !selected {
            warn!("⚠️ 题目 {} 不存在，忽略选择", id);
        }
        selected
    }

    /// 覆盖编辑缓冲区
    pub fn edit_buffer(&mut self, text: impl Into<String>) {
        self.state.set_edit_buffer(text);
    }

    /// 保存当前题目
    ///
    /// # 参数
    /// - `advance`: 保存并刷新后是否前进到下一题
    ///
    /// # 返回
    /// 没有选中题目时返回 `Skipped`；保存被拒绝时缓冲区保持不变，也不刷新
    pub async fn save(&mut self, advance: bool) -> AppResult<SaveOutcome> {
        let Some(id) = self.state.current_id().map(str::to_owned) else {
            warn!("⚠️ 没有选中的题目，跳过保存");
            return Ok(SaveOutcome::Skipped);
        };

        if let Err(e) = self
            .backend
            .save_problem(&id, self.state.edit_buffer())
            .await
        {
            error!("❌ 保存题目 {} 失败: {}", id, e);
            return Err(e);
        }

        info!(
            "✓ 题目 {} 保存成功: {}",
            id,
            truncate_text(self.state.edit_buffer(), 40)
        );

        self.refresh().await?;

        if advance {
            self.navigate(Direction::Next);
        }

        Ok(SaveOutcome::Saved)
    }

    /// 前后浏览，到达两端时不动
    ///
    /// # 返回
    /// 返回是否切换了题目
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let Some(target) = self.state.neighbor(direction).map(str::to_owned) else {
            info!("已到达列表{}，无法继续", match direction {
                Direction::Previous => "开头",
                Direction::Next => "末尾",
            });
            return false;
        };

        self.state.select(&target)
    }

    /// 上传数据文件并刷新
    ///
    /// # 返回
    /// 返回刷新后的题目数量
    pub async fn ingest(&mut self, upload: UploadFile) -> AppResult<usize> {
        let file_name = upload.file_name.clone();
        info!("📤 上传文件: {} ({} 字节)", file_name, upload.bytes.len());

        if let Err(e) = self.backend.upload_file(upload).await {
            error!("❌ 上传文件 {} 失败: {}", file_name, e);
            return Err(e);
        }

        info!("✓ 文件 {} 上传成功", file_name);
        self.refresh().await
    }

    /// 读取本地文件后上传
    pub async fn ingest_file(&mut self, path: &Path) -> AppResult<usize> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = AppError::file_read_failed(path.display().to_string(), e);
                error!("❌ {}", err);
                return Err(err);
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.json".to_string());

        self.ingest(UploadFile::new(file_name, bytes)).await
    }

    /// 渲染公式，失败时退化为原始文本
    pub fn render_notation(&self, text: &str) -> String {
        self.renderer.render(text)
    }

    /// 把当前题目写成 HTML 预览
    ///
    /// # 返回
    /// 没有选中题目时返回 `false`
    pub async fn write_preview(&self, path: &Path) -> AppResult<bool> {
        let Some(record) = self.state.current() else {
            warn!("⚠️ 没有选中的题目，跳过预览");
            return Ok(false);
        };

        PreviewWriter::new(self.renderer)
            .write(path, record, self.state.edit_buffer())
            .await?;
        Ok(true)
    }
}
