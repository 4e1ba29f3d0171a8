use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};

use crate::ui::{layout, theme::Theme, widgets};

use super::Action;

/// Shown instead of the form when the dataset cannot be loaded or fit.
pub struct LoadFailedState {
    pub source: String,
    pub error: String,
}

impl LoadFailedState {
    pub fn new(source: String, error: String) -> Self {
        Self { source, error }
    }
}

pub fn handle_key(_state: &mut LoadFailedState, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &LoadFailedState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let (header_area, body_area, hints_area) = layout::vertical(area);
    f.render_widget(widgets::header(), header_area);

    let outer = layout::centered_rect(80, 60, body_area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(outer);

    f.render_widget(widgets::load_failure(&state.error), chunks[0]);
    f.render_widget(
        widgets::hints(&[("source", state.source.as_str())]),
        chunks[1],
    );
    f.render_widget(widgets::hints(&[("q / esc", "quit")]), hints_area);
}
