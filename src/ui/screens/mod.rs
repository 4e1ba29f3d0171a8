pub mod load_failed;
pub mod predict;

use crossterm::event::KeyCode;
use ratatui::Frame;

pub enum Action {
    None,
    Quit,
}

pub enum Screen {
    Predict(predict::PredictState),
    LoadFailed(load_failed::LoadFailedState),
}

impl Screen {
    pub fn draw(&self, f: &mut Frame) {
        match self {
            Screen::Predict(s) => predict::draw(f, s),
            Screen::LoadFailed(s) => load_failed::draw(f, s),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match self {
            Screen::Predict(s) => predict::handle_key(s, key),
            Screen::LoadFailed(s) => load_failed::handle_key(s, key),
        }
    }
}

/// Renders `screen` on an in-memory terminal and returns its text, one line per row.
#[cfg(test)]
pub(crate) fn render_to_string(screen: &Screen, width: u16, height: u16) -> String {
    use ratatui::{backend::TestBackend, Terminal};

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| screen.draw(f)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
