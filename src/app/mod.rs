pub mod keymap;
mod state;
mod types;

pub use types::{Action, App, Outcome};

use crate::ui::{self, Palette};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};

/// Runs the read-process-render loop until a host is chosen or the menu is cancelled.
///
/// The palette is built by the caller before the terminal switches to the
/// alternate screen, so color warnings stay visible.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: App,
    palette: &Palette,
) -> Result<Outcome> {
    run_with_events(terminal, app, palette, event::read)
}

/// Same loop as [`run`], reading events from `next_event` instead of the terminal.
pub fn run_with_events<B, F>(
    terminal: &mut Terminal<B>,
    mut app: App,
    palette: &Palette,
    mut next_event: F,
) -> Result<Outcome>
where
    B: Backend,
    F: FnMut() -> std::io::Result<Event>,
{
    let size = terminal.size()?;
    app.handle(Action::Resize(size.width, size.height));

    while !app.should_quit() {
        terminal.draw(|f| ui::draw::<B>(f, &mut app, palette))?;

        let event = next_event()?;
        if let Some(action) = keymap::action_for(&event) {
            app.handle(action);
        }
    }

    Ok(app.into_outcome())
}
