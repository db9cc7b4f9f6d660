//! The editor screen: raw mode, alternate screen and a hidden cursor while the UI runs.

use std::{
    io::{self, Stdout},
    sync::{
        Once,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::debug;

type Backend = CrosstermBackend<Stdout>;

/// Set while the terminal is in editor mode; whoever clears it restores the terminal.
static SCREEN_OPEN: AtomicBool = AtomicBool::new(false);
static RESTORE_ON_PANIC: Once = Once::new();

/// Owns the terminal for one editing session. Dropping it hands the terminal back.
pub(crate) struct Screen {
    terminal: Terminal<Backend>,
}

impl Screen {
    /// Switches the terminal into editor mode. A failure part way leaves it as it was found.
    pub(crate) fn open() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        SCREEN_OPEN.store(true, Ordering::SeqCst);
        let terminal = match editor_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                close_screen();
                return Err(err);
            }
        };
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                close_screen();
                previous(info);
            }));
        });
        debug!(size = ?terminal.size().ok(), "editor screen opened");
        Ok(Self { terminal })
    }

    pub(crate) fn paint(&mut self, paint: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(paint)
            .context("failed to paint the itinerary")?;
        Ok(())
    }

    pub(crate) fn fit(&mut self, width: u16, height: u16) -> Result<()> {
        self.terminal
            .resize(Rect::new(0, 0, width, height))
            .context("failed to resize the editor screen")
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        close_screen();
        debug!("editor screen closed");
    }
}

fn editor_terminal() -> Result<Terminal<Backend>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to initialize terminal")
}

/// Runs at most once per opened screen, from drop or from the panic hook.
fn close_screen() {
    if !SCREEN_OPEN.swap(false, Ordering::SeqCst) {
        return;
    }
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_an_unopened_screen_touches_nothing() {
        SCREEN_OPEN.store(false, Ordering::SeqCst);
        close_screen();
        assert!(!SCREEN_OPEN.load(Ordering::SeqCst));
    }
}
