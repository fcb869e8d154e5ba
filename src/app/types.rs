use crate::models::HostEntry;
use ratatui::widgets::ListState;

/// One input, already decoupled from the terminal key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resize(u16, u16),
    Cancel,
    Confirm,
    Up,
    Down,
    PrevView,
    NextView,
    Input(char),
    Backspace,
}

/// How the selector finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(HostEntry),
    Cancelled,
}

#[derive(Debug)]
pub struct App {
    pub hosts: Vec<HostEntry>,
    pub detailed: bool,

    // Views: 0 is every host, 1..=groups.len() is one group each
    pub groups: Vec<String>,
    pub group_members: Vec<Vec<usize>>,
    pub view_index: usize,

    // Filter
    pub filter_text: String,
    pub filtered_hosts: Vec<usize>, // Indices into `hosts`
    pub cursor: usize,

    pub outcome: Option<Outcome>,
    pub terminal_size: (u16, u16),

    pub host_list_state: ListState,
}
