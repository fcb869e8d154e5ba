use crate::app::types::{Action, App, Outcome};
use crate::hosts;
use crate::models::HostEntry;
use ratatui::widgets::ListState;

impl App {
    pub fn new(hosts: Vec<HostEntry>, detailed: bool) -> Self {
        let groups = hosts::all_groups(&hosts);
        let mut index = hosts::group_hosts(&hosts);
        let group_members = groups
            .iter()
            .map(|g| index.remove(g).unwrap_or_default())
            .collect();

        let mut app = Self {
            hosts,
            detailed,
            groups,
            group_members,
            view_index: 0,
            filter_text: String::new(),
            filtered_hosts: Vec::new(),
            cursor: 0,
            outcome: None,
            terminal_size: (0, 0),
            host_list_state: ListState::default(),
        };
        app.update_filtered_hosts();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.outcome.is_some()
    }

    /// Applies one input. Does nothing once an outcome has been reached.
    pub fn handle(&mut self, action: Action) {
        if self.should_quit() {
            return;
        }
        tracing::debug!("Selector action: {:?}", action);

        match action {
            Action::Resize(width, height) => self.terminal_size = (width, height),
            Action::Cancel => self.outcome = Some(Outcome::Cancelled),
            Action::Confirm => self.confirm(),
            Action::Up => self.move_cursor(-1),
            Action::Down => self.move_cursor(1),
            Action::PrevView => self.navigate_view(-1),
            Action::NextView => self.navigate_view(1),
            Action::Input(c) => {
                self.filter_text.push(c);
                self.update_filtered_hosts();
                self.set_cursor(0);
            }
            Action::Backspace => {
                if self.filter_text.pop().is_some() {
                    self.update_filtered_hosts();
                    self.set_cursor(0);
                }
            }
        }
    }

    fn confirm(&mut self) {
        let chosen = if self.filtered_hosts.len() == 1 {
            self.filtered_hosts.first()
        } else {
            self.filtered_hosts.get(self.cursor)
        };

        if let Some(host) = chosen.and_then(|&idx| self.hosts.get(idx)) {
            tracing::info!("Selected host: {}", host.short_name);
            self.outcome = Some(Outcome::Selected(host.clone()));
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.filtered_hosts.len().saturating_sub(1);
        let next = self.cursor.saturating_add_signed(delta).min(last);
        self.set_cursor(next);
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        if self.filtered_hosts.is_empty() {
            self.host_list_state.select(None);
        } else {
            self.host_list_state.select(Some(cursor));
        }
    }

    pub fn view_count(&self) -> usize {
        1 + self.groups.len()
    }

    fn navigate_view(&mut self, delta: isize) {
        let total = self.view_count() as isize;
        self.view_index = (self.view_index as isize + delta).rem_euclid(total) as usize;

        self.filter_text.clear();
        self.update_filtered_hosts();
        self.set_cursor(0);
        tracing::debug!("Switched to view {:?}", self.current_group());
    }

    /// The group shown by the current view, `None` for the all-hosts view.
    pub fn current_group(&self) -> Option<&str> {
        self.view_index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .map(|s| s.as_str())
    }

    fn view_hosts(&self) -> Vec<usize> {
        match self.view_index.checked_sub(1) {
            None => (0..self.hosts.len()).collect(),
            Some(i) => self.group_members.get(i).cloned().unwrap_or_default(),
        }
    }

    pub fn update_filtered_hosts(&mut self) {
        let view = self.view_hosts();
        self.filtered_hosts = if self.filter_text.is_empty() {
            view
        } else {
            view.into_iter()
                .filter(|&idx| self.hosts[idx].matches_prefix(&self.filter_text))
                .collect()
        };

        if self.filtered_hosts.is_empty() {
            self.host_list_state.select(None);
        } else {
            self.host_list_state.select(Some(self.cursor.min(self.filtered_hosts.len() - 1)));
        }
    }

    pub fn visible_hosts(&self) -> impl Iterator<Item = &HostEntry> {
        self.filtered_hosts.iter().filter_map(|&idx| self.hosts.get(idx))
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome.unwrap_or(Outcome::Cancelled)
    }
}
