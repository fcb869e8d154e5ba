use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Palette;
use crate::app::App;

const TITLE: &str = "SSH Menu";
const HELP_TEXT: &str = "↑/↓ Navigate • ←/→ Switch View • Type to Filter • Enter Select • Esc Quit";
const MAX_GROUP_LABEL: usize = 12;

pub fn draw_title<B: Backend>(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let title_width = TITLE.chars().count();
    let help_width = HELP_TEXT.chars().count();
    let available = match app.terminal_size.0 {
        0 => usize::from(area.width),
        w => usize::from(area.width.min(w)),
    };

    let mut spans = vec![Span::styled(
        TITLE,
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];

    // Help only fits on the title line when the terminal is wide enough
    if available > title_width + help_width + 2 {
        spans.push(Span::raw(" ".repeat(available - title_width - help_width)));
        spans.push(Span::styled(HELP_TEXT, Style::default().fg(palette.dimmed)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn view_label(name: &str) -> String {
    if name.chars().count() > MAX_GROUP_LABEL {
        let short: String = name.chars().take(MAX_GROUP_LABEL).collect();
        format!("{short}…")
    } else {
        name.to_string()
    }
}

pub fn draw_view_selector<B: Backend>(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let selected_style = Style::default()
        .fg(palette.background)
        .bg(palette.selected)
        .add_modifier(Modifier::BOLD);
    let unselected_style = Style::default().fg(palette.foreground);
    let separator_style = Style::default().fg(palette.dimmed);

    let labels = std::iter::once("All".to_string()).chain(app.groups.iter().map(|g| view_label(g)));

    let mut spans = Vec::new();
    for (i, label) in labels.enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", separator_style));
        }
        let style = if i == app.view_index {
            selected_style
        } else {
            unselected_style
        };
        spans.push(Span::styled(format!(" {label} "), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn draw_filter<B: Backend>(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let filter = Paragraph::new(format!("Filter: {}", app.filter_text)).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(filter, area);
}
