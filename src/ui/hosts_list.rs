use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::Palette;
use crate::app::App;
use crate::models::HostEntry;

/// One list row: cursor marker, menu number, alias and connection target.
pub fn host_line(host: &HostEntry, is_selected: bool, detailed: bool, with_groups: bool) -> String {
    let cursor = if is_selected { "▸" } else { " " };
    let mut line = format!(
        "{} {:2}) {:<20} {}",
        cursor,
        host.menu_number,
        host.short_name,
        host.connection_label()
    );
    if detailed {
        line.push_str(&format!(" - {}", host.summary(with_groups)));
    }
    line
}

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    if app.filtered_hosts.is_empty() {
        let empty = Paragraph::new("No hosts match your filter")
            .style(Style::default().fg(palette.dimmed));
        f.render_widget(empty, area);
        return;
    }

    // Groups are redundant inside a group view
    let with_groups = app.view_index == 0;

    let items: Vec<ListItem> = app
        .visible_hosts()
        .enumerate()
        .map(|(i, host)| {
            let is_selected = i == app.cursor;
            let style = if is_selected {
                Style::default()
                    .fg(palette.selected)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.foreground)
            };
            let text = host_line(host, is_selected, app.detailed, with_groups);
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    f.render_stateful_widget(List::new(items), area, &mut app.host_list_state);
}
