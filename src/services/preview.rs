//! HTML 预览
//!
//! 把当前题目的原始文本和编辑文本渲染成一个独立的 HTML 文件，
//! 浏览器原生支持 MathML，打开即可查看公式效果。

use crate::error::{AppError, AppResult};
use crate::models::ProblemRecord;
use crate::services::notation::{escape_html, NotationRenderer};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// 预览文件写入服务
pub struct PreviewWriter {
    renderer: NotationRenderer,
}

impl PreviewWriter {
    pub fn new(renderer: NotationRenderer) -> Self {
        Self { renderer }
    }

    /// 生成预览页面
    ///
    /// # 参数
    /// - `record`: 当前题目
    /// - `edited`: 编辑缓冲区中的文本（可能尚未保存）
    pub fn build_html(&self, record: &ProblemRecord, edited: &str) -> String {
        let original_markup = self.renderer.render_html(&record.original_problem);
        let edited_markup = self.renderer.render_html(edited);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{id}</title>
</head>
<body>
<h1>{id} <small>({status})</small></h1>
<section>
<h2>Original Problem</h2>
<pre>{original_text}</pre>
<div>{original_markup}</div>
</section>
<section>
<h2>Editable Problem</h2>
<pre>{edited_text}</pre>
<div>{edited_markup}</div>
</section>
</body>
</html>
"#,
            id = escape_html(&record.id),
            status = escape_html(record.annotation_status.as_str()),
            original_text = escape_html(&record.original_problem),
            original_markup = original_markup,
            edited_text = escape_html(edited),
            edited_markup = edited_markup,
        )
    }

    /// 写入预览文件
    pub async fn write(&self, path: &Path, record: &ProblemRecord, edited: &str) -> AppResult<()> {
        let html = self.build_html(record, edited);
        fs::write(path, html)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("📄 预览已写入: {}", path.display());
        Ok(())
    }
}
