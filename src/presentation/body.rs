use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::render::{NodeId, RenderTree};

use super::elements::markup_lines;

/// Draws every attached element in tree order, scrolled so the focused element stays visible.
pub fn render_body(frame: &mut Frame<'_>, area: Rect, tree: &RenderTree, title: &str) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    let mut focus_span = None;
    collect_lines(tree, tree.root(), width, &mut lines, &mut focus_span);

    let window = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(focus_span, window);
    let body = Paragraph::new(lines)
        .scroll((offset as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(body, area);
}

fn collect_lines(
    tree: &RenderTree,
    id: NodeId,
    width: usize,
    lines: &mut Vec<Line<'static>>,
    focus_span: &mut Option<(usize, usize)>,
) {
    if id != tree.root()
        && let Some(markup) = tree.markup(id)
        && !markup.elements.is_empty()
    {
        let node_focus = tree.focused_control(id);
        let start = lines.len();
        lines.extend(markup_lines(markup, node_focus, width));
        if node_focus.is_some() {
            *focus_span = Some((start, lines.len()));
        }
        lines.push(Line::default());
    }
    for child in tree.children(id) {
        collect_lines(tree, *child, width, lines, focus_span);
    }
}

/// Smallest offset showing the whole focused span, or its top when it is taller than the window.
fn scroll_offset(focus_span: Option<(usize, usize)>, window: usize) -> usize {
    let Some((start, end)) = focus_span else {
        return 0;
    };
    if window == 0 || end - start >= window {
        return start;
    }
    end.saturating_sub(window)
}
