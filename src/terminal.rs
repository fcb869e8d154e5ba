use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;

type Backend = CrosstermBackend<Stdout>;

/// Raw-mode alternate screen that is restored when dropped, on error paths too.
pub struct MenuTerminal {
    inner: ratatui::Terminal<Backend>,
}

impl MenuTerminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        let terminal = match ratatui::Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(t) => t,
            Err(e) => {
                let _ = restore();
                return Err(e).context("Failed to create terminal");
            }
        };
        Ok(Self { inner: terminal })
    }
}

fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

impl Deref for MenuTerminal {
    type Target = ratatui::Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for MenuTerminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for MenuTerminal {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            tracing::error!("Failed to restore terminal: {}", e);
        }
        let _ = self.inner.show_cursor();
    }
}
