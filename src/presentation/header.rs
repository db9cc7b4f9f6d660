use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::view::UiContext;

pub fn render_header(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let mode = if ctx.editing {
        Span::styled("editing", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("browsing", Style::default().fg(Color::Green))
    };
    let mut spans = vec![Span::styled(
        ctx.title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    match ctx.summary {
        Some(summary) => {
            if !summary.route.is_empty() {
                spans.push(Span::raw(format!("  {}", summary.route)));
            }
            spans.push(Span::styled(
                format!("  {}", summary.dates),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::raw(format!("  •  € {}", summary.total)));
        }
        None => spans.push(Span::raw("  •  no points yet")),
    }
    spans.push(Span::raw(format!(
        "  •  {} point(s)  •  sorted by {}  •  ",
        ctx.points,
        ctx.sort.label()
    )));
    spans.push(mode);
    let line = Line::from(spans);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}
