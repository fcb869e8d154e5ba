pub mod header;
pub mod hosts_list;

use std::str::FromStr;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::config::ColorConfig;

/// Parsed colors handed to every draw function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub selected: Color,
    pub accent: Color,
    pub dimmed: Color,
}

impl Palette {
    pub fn from_config(colors: &ColorConfig) -> Self {
        let defaults = ColorConfig::default();
        Self {
            background: parse_color(&colors.background, &defaults.background),
            foreground: parse_color(&colors.foreground, &defaults.foreground),
            border: parse_color(&colors.border, &defaults.border),
            selected: parse_color(&colors.selected, &defaults.selected),
            accent: parse_color(&colors.accent, &defaults.accent),
            dimmed: parse_color(&colors.dimmed, &defaults.dimmed),
        }
    }
}

fn parse_color(value: &str, fallback: &str) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        tracing::warn!("Unrecognised color '{}', using {}", value, fallback);
        Color::from_str(fallback).unwrap_or(Color::Reset)
    })
}

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.background).fg(palette.foreground));
    let inner = block.inner(f.size());
    f.render_widget(block, f.size());

    let filter_height = if app.filter_text.is_empty() { 0 } else { 2 };
    let selector_height = if app.groups.is_empty() { 0 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),               // Title and help
                Constraint::Length(selector_height), // View selector
                Constraint::Length(1),               // Spacer
                Constraint::Length(filter_height),   // Filter indicator
                Constraint::Min(1),                  // Host list
            ]
            .as_ref(),
        )
        .split(inner);

    header::draw_title::<B>(f, app, palette, chunks[0]);
    if selector_height > 0 {
        header::draw_view_selector::<B>(f, app, palette, chunks[1]);
    }
    if filter_height > 0 {
        header::draw_filter::<B>(f, app, palette, chunks[3]);
    }
    hosts_list::draw::<B>(f, app, palette, chunks[4]);
}
