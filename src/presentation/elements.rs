use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::render::{Control, Element, Markup};

const GUTTER: &str = "│ ";

/// Lines for one element of the tree. `node_focus` is the focused control when the focus is on
/// this element.
pub fn markup_lines(markup: &Markup, node_focus: Option<Control>, width: usize) -> Vec<Line<'static>> {
    let gutter_style = if node_focus.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text_width = width.saturating_sub(GUTTER.width()).max(8);
    let mut lines = Vec::new();
    for element in &markup.elements {
        let focused = element.control().is_some() && element.control() == node_focus;
        for spans in element_spans(element, focused, text_width) {
            let mut row = vec![Span::styled(GUTTER, gutter_style)];
            row.extend(spans);
            lines.push(Line::from(row));
        }
    }
    lines
}

fn element_spans(element: &Element, focused: bool, width: usize) -> Vec<Vec<Span<'static>>> {
    let control_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    match element {
        Element::Heading(text) => vec![vec![Span::styled(
            text.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]],
        Element::Text(text) => wrapped(text, width, Style::default()),
        Element::Muted(text) => wrapped(
            text,
            width,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ),
        Element::Input { label, value, .. } => {
            let shown = if focused {
                format!(" {value}▏")
            } else {
                format!(" {value} ")
            };
            let pad = " ".repeat(field_width(width, label).saturating_sub(shown.width()));
            vec![vec![
                label_span(label),
                Span::styled(format!("{shown}{pad}"), control_style.add_modifier(Modifier::UNDERLINED)),
            ]]
        }
        Element::Choice {
            label,
            options,
            selected,
            ..
        } => {
            let current = options.get(*selected).cloned().unwrap_or_default();
            vec![vec![
                label_span(label),
                Span::styled(format!("◂ {current} ▸"), control_style),
                Span::styled(
                    format!("  {}/{}", selected + 1, options.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]]
        }
        Element::Checkbox { label, checked, .. } => {
            let mark = if *checked { "x" } else { " " };
            vec![vec![Span::styled(format!("[{mark}] {label}"), control_style)]]
        }
        Element::Button { label, .. } => {
            vec![vec![Span::styled(format!("[ {label} ]"), control_style)]]
        }
        Element::Picture { src, description } => wrapped(
            &format!("▣ {description} ({src})"),
            width,
            Style::default().fg(Color::Magenta),
        ),
    }
}

fn label_span(label: &str) -> Span<'static> {
    Span::styled(
        format!("{label}: "),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Inputs stretch to a third of the row so short values still read as fields.
fn field_width(width: usize, label: &str) -> usize {
    (width / 3).min(width.saturating_sub(label.width() + 2))
}

fn wrapped(text: &str, width: usize, style: Style) -> Vec<Vec<Span<'static>>> {
    let segments = wrap(text, width);
    if segments.is_empty() {
        return vec![Vec::new()];
    }
    segments
        .into_iter()
        .map(|segment| vec![Span::styled(segment.into_owned(), style)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn long_text_wraps_under_the_gutter() {
        let markup = Markup::new("card").with(Element::Text(
            "Chamonix, a resort at the foot of Mont Blanc".to_string(),
        ));
        let lines = markup_lines(&markup, None, 24);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| plain(line).starts_with(GUTTER)));
    }

    #[test]
    fn checkbox_shows_its_state() {
        let markup = Markup::new("card").with(Element::Checkbox {
            control: Control::Save,
            label: "Order meal".to_string(),
            checked: true,
        });
        let lines = markup_lines(&markup, Some(Control::Save), 40);
        assert_eq!(plain(&lines[0]), "│ [x] Order meal");
    }
}
