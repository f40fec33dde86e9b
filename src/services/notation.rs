//! 公式渲染服务
//!
//! 把 LaTeX 文本渲染为 MathML。渲染失败不会中断界面：退化为原样输出原始文本，
//! 并在日志中记录。

use crate::error::RenderError;
use crate::utils::truncate_text;
use latex2mathml::{latex_to_mathml, DisplayStyle};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// latex2mathml 把部分解析错误写进输出的 `<mtext>` 里，而不是返回 `Err`
const PARSE_ERROR_MARKER: &str = "[PARSE ERROR";

/// 公式排版方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Inline,
    Block,
}

impl From<DisplayMode> for DisplayStyle {
    fn from(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Inline => DisplayStyle::Inline,
            DisplayMode::Block => DisplayStyle::Block,
        }
    }
}

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// 渲染成功的 MathML
    Markup(String),
    /// 渲染失败，原样保留的输入文本
    Fallback(String),
}

impl Rendered {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Rendered::Fallback(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rendered::Markup(text) | Rendered::Fallback(text) => text,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Rendered::Markup(text) | Rendered::Fallback(text) => text,
        }
    }

    /// 可以直接嵌入 HTML 的片段，退化文本会被转义
    pub fn to_html(&self) -> String {
        match self {
            Rendered::Markup(markup) => markup.clone(),
            Rendered::Fallback(text) => escape_html(text),
        }
    }
}

/// 公式渲染器
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationRenderer {
    display: DisplayMode,
}

impl NotationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(display: DisplayMode) -> Self {
        Self { display }
    }

    pub fn display(&self) -> DisplayMode {
        self.display
    }

    /// 渲染公式，失败时返回错误
    ///
    /// 成功时返回的 MathML 中，元素文本里的 `<`、`>`、`&` 已转义。
    ///
    /// 渲染器内部 panic 会被捕获为 `RenderError::Panicked`，但进程的 panic hook
    /// 仍会照常执行，stderr 上会多出一段 panic 信息。
    pub fn try_render(&self, text: &str) -> Result<String, RenderError> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            latex_to_mathml(text, self.display.into())
        }));

        match result {
            Ok(Ok(markup)) if markup.contains(PARSE_ERROR_MARKER) => Err(RenderError::Failed {
                message: extract_parse_error(&markup),
            }),
            Ok(Ok(markup)) => Ok(escape_markup_text(&markup)),
            Ok(Err(e)) => Err(RenderError::Failed {
                message: e.to_string(),
            }),
            Err(_) => Err(RenderError::Panicked),
        }
    }

    /// 渲染公式，并标明是否退化为原始文本
    pub fn render_output(&self, text: &str) -> Rendered {
        match self.try_render(text) {
            Ok(markup) => {
                debug!("公式渲染成功: {}", truncate_text(text, 40));
                Rendered::Markup(markup)
            }
            Err(e) => {
                warn!("⚠️ {}，改为显示原始文本: {}", e, truncate_text(text, 40));
                Rendered::Fallback(text.to_string())
            }
        }
    }

    /// 渲染公式，失败时退化为原始文本
    ///
    /// 这个方法永远不会失败，适合直接用于终端展示。嵌入 HTML 时用
    /// [`render_html`](Self::render_html)。
    pub fn render(&self, text: &str) -> String {
        self.render_output(text).into_string()
    }

    /// 渲染为可直接嵌入 HTML 的片段
    pub fn render_html(&self, text: &str) -> String {
        self.render_output(text).to_html()
    }
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn extract_parse_error(markup: &str) -> String {
    markup
        .find(PARSE_ERROR_MARKER)
        .and_then(|start| {
            let rest = &markup[start + 1..];
            rest.find(']').map(|end| rest[..end].to_string())
        })
        .unwrap_or_else(|| "PARSE ERROR".to_string())
}

/// 转义 MathML 元素文本中的 `<`、`>`、`&`
///
/// latex2mathml 会原样输出 `<mo><</mo>`。`<` 后面紧跟
/// `/?名字` 且名字以 `>`、空白或 `/` 结束时才视为标签，其余都是文本。
fn escape_markup_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match tag_len(rest) {
                Some(len) => {
                    out.push_str(&rest[..len]);
                    rest = &rest[len..];
                    continue;
                }
                None => out.push_str("&lt;"),
            },
            '>' => out.push_str("&gt;"),
            '&' if !starts_with_entity(rest) => out.push_str("&amp;"),
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// 以 `<` 开头的标签长度（含 `>`），不是标签时返回 `None`
fn tag_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }

    let name_start = i;
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric()) {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }

    match bytes.get(i) {
        Some(b'>') | Some(b'/') => {}
        Some(b) if b.is_ascii_whitespace() => {}
        _ => return None,
    }

    let end = text[i..].find('>')?;
    if text[i..i + end].contains('<') {
        return None;
    }
    Some(i + end + 1)
}

/// `&name;`、`&#123;`、`&#x1F;` 形式的实体
fn starts_with_entity(text: &str) -> bool {
    let Some(end) = text.find(';') else {
        return false;
    };
    let body = &text[1..end];
    if let Some(numeric) = body.strip_prefix('#') {
        let digits = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        return match digits {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()),
        };
    }
    !body.is_empty() && body.chars().all(|c| c.is_ascii_alphanumeric())
}
