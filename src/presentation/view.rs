use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    app::StatusLine,
    domain::{SortKind, TripSummary},
    render::RenderTree,
};

use super::{body::render_body, footer::render_footer, header::render_header};

/// Everything one frame needs. The painter only reads.
pub struct UiContext<'a> {
    pub title: &'a str,
    pub tree: &'a RenderTree,
    pub sort: SortKind,
    pub points: usize,
    pub summary: Option<&'a TripSummary>,
    pub editing: bool,
    pub status: &'a StatusLine,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(7),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &ctx);
    render_body(frame, chunks[1], ctx.tree, "Itinerary");
    render_footer(frame, chunks[2], &ctx);
}
