//! 文本界面
//!
//! 把会话状态画成终端上的标注界面：左侧题目列表、原始题目、可编辑题目和操作栏。

use crate::services::NotationRenderer;
use crate::utils::truncate_text;
use crate::workflow::SessionState;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// 题目列表
///
/// 已标注的题目用实心标记，未标注的用空心标记，当前题目前加 `>`。
pub fn render_problem_list(state: &SessionState) -> String {
    let collection = state.collection();
    if collection.is_empty() {
        return "（暂无题目，使用 upload <文件> 导入）\n".to_string();
    }

    let mut out = String::new();
    for record in collection.iter() {
        let cursor = if state.current_id() == Some(record.id.as_str()) {
            ">"
        } else {
            " "
        };
        let marker = if record.annotation_status.is_annotated() {
            "●"
        } else {
            "○"
        };
        let _ = writeln!(
            out,
            "{} {} {}  {}",
            cursor,
            marker,
            record.id,
            truncate_text(&record.original_problem, 30)
        );
    }
    let _ = writeln!(
        out,
        "共 {} 题，已标注 {}",
        collection.len(),
        collection.annotated_count()
    );
    out
}

/// 当前题目的两个面板
pub fn render_current(state: &SessionState, renderer: &NotationRenderer) -> String {
    let Some(record) = state.current() else {
        return "（未选中题目）\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "题目 {} [{}]", record.id, record.annotation_status);

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Original Problem");
    let _ = writeln!(out, "{}", record.original_problem);
    let _ = writeln!(out, "{}", renderer.render(&record.original_problem));

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));
    let dirty = if state.is_dirty() { " *未保存*" } else { "" };
    let _ = writeln!(out, "Editable Problem{}", dirty);
    let _ = writeln!(out, "{}", state.edit_buffer());
    let _ = writeln!(out, "{}", renderer.render(state.edit_buffer()));
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}

/// 操作栏
pub fn render_action_bar() -> String {
    "[prev] Previous | [save] Save | [save-next] Save and Next | [next] Next\n".to_string()
}

/// 完整界面
pub fn render_screen(state: &SessionState, renderer: &NotationRenderer) -> String {
    let mut out = String::new();
    out.push_str("LaTeX Annotation Interface\n");
    if let Some(at) = state.last_refreshed() {
        let _ = writeln!(out, "最近刷新: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    out.push('\n');
    out.push_str(&render_problem_list(state));
    out.push('\n');
    out.push_str(&render_current(state, renderer));
    out.push_str(&render_action_bar());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProblemCollection, ProblemRecord};

    fn state() -> SessionState {
        let collection: ProblemCollection = vec![
            ProblemRecord::new("p1", "x^2", "x^2"),
            ProblemRecord::new("p2", "y^2", "y^{2}").with_status("annotated"),
        ]
        .into_iter()
        .collect();
        let mut state = SessionState::new();
        state.replace_collection(collection);
        state
    }

    #[test]
    fn test_problem_list_marks_status_and_cursor() {
        let list = render_problem_list(&state());
        let lines: Vec<&str> = list.lines().collect();

        assert!(lines[0].starts_with("> ○ p1"));
        assert!(lines[1].starts_with("  ● p2"));
        assert!(lines[2].contains("已标注 1"));
    }

    #[test]
    fn test_empty_list_hint() {
        let list = render_problem_list(&SessionState::new());
        assert!(list.contains("upload"));
    }

    #[test]
    fn test_current_shows_dirty_marker() {
        let mut state = state();
        let renderer = NotationRenderer::new();
        assert!(!render_current(&state, &renderer).contains("未保存"));

        state.set_edit_buffer("x^3");
        let panes = render_current(&state, &renderer);
        assert!(panes.contains("*未保存*"));
        assert!(panes.contains("x^3"));
        assert!(panes.contains("Original Problem"));
    }

    #[test]
    fn test_screen_without_selection() {
        let screen = render_screen(&SessionState::new(), &NotationRenderer::new());
        assert!(screen.contains("未选中题目"));
        assert!(screen.contains("Save and Next"));
    }
}
