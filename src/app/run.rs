use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::AppConfig;
use crate::ui::screens::Action;

use super::bootstrap;

/// How long to wait for a key before redrawing.
const TICK: Duration = Duration::from_millis(120);

/// Terminal in raw mode on the alternate screen; restored when dropped.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn enter() -> Result<Self> {
        let mut tui = Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
        };
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        tui.terminal.clear()?;
        Ok(tui)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Shows the splash, fits the models, then drives the form until the user quits.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub fn run(config: &AppConfig) -> Result<()> {
    let mut tui = Tui::enter()?;

    let source = config.source();
    tui.terminal.draw(|f| bootstrap::splash(f, &source))?;
    let mut screen = bootstrap::start(config);

    loop {
        tui.terminal.draw(|f| screen.draw(f))?;

        let Some(key) = next_key()? else {
            continue;
        };
        if is_interrupt(&key) {
            log::info!("interrupted");
            break;
        }
        if let Action::Quit = screen.handle_key(key.code) {
            break;
        }
    }

    log::info!("session closed");
    Ok(())
}

/// Next key press within one tick, ignoring repeats and releases.
fn next_key() -> Result<Option<KeyEvent>> {
    if !event::poll(TICK)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Raw mode swallows the terminal's SIGINT, so Ctrl-C is handled as a key.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_interrupts() {
        assert!(is_interrupt(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(is_interrupt(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
    }

    #[test]
    fn plain_keys_do_not_interrupt() {
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }
}
