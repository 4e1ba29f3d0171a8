use ratatui::style::{Color, Modifier, Style};

use crate::state::model::ConfidenceLevel;

/// Botanical dark theme.
///
/// Base aesthetic:
/// - soft white foreground
/// - near-black background
/// - green / orange / red reserved for confidence
pub struct Theme;

impl Theme {
    // Core palette
    pub const BG: Color = Color::Rgb(10, 12, 10);
    pub const FG: Color = Color::Rgb(225, 230, 225);
    pub const FG_DIM: Color = Color::Rgb(150, 160, 150);
    pub const FG_MUTED: Color = Color::Rgb(85, 95, 85);

    pub const ACCENT: Color = Color::Rgb(140, 120, 255);
    pub const GREEN: Color = Color::Rgb(57, 220, 20);
    pub const ORANGE: Color = Color::Rgb(255, 165, 0);
    pub const RED: Color = Color::Rgb(255, 70, 70);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Border of the focused panel.
    pub fn border_focus() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Selected row or option.
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ORANGE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).add_modifier(Modifier::BOLD)
    }

    /// Colour cue of a confidence value.
    pub fn confidence(level: ConfidenceLevel) -> Style {
        let fg = match level {
            ConfidenceLevel::High => Self::GREEN,
            ConfidenceLevel::Medium => Self::ORANGE,
            ConfidenceLevel::Low => Self::RED,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}
