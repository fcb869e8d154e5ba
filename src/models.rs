/// One menu entry, built from a `Host` block and its `# Menu` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub short_name: String,
    pub long_name: String,
    pub user: String,
    pub port: String,
    pub identity_file: String,
    pub ip: String,
    pub description: String,
    /// 0 means unassigned until `hosts::assign_menu_numbers` runs.
    pub menu_number: u32,
    pub groups: Vec<String>,
    pub connect_timeout: u32,
    pub server_alive_interval: u32,
    pub server_alive_count_max: u32,
}

impl Default for HostEntry {
    fn default() -> Self {
        Self {
            short_name: String::new(),
            long_name: String::new(),
            user: "root".to_string(),
            port: "22".to_string(),
            identity_file: String::new(),
            ip: String::new(),
            description: String::new(),
            menu_number: 0,
            groups: Vec::new(),
            connect_timeout: 0,
            server_alive_interval: 0,
            server_alive_count_max: 0,
        }
    }
}

impl HostEntry {
    pub fn new(short_name: impl Into<String>) -> Self {
        let short_name = short_name.into();
        Self {
            long_name: short_name.clone(),
            short_name,
            ..Self::default()
        }
    }

    /// Entries without both an alias and a menu description never reach the menu.
    pub fn is_menu_candidate(&self) -> bool {
        !self.short_name.is_empty() && !self.description.is_empty()
    }

    pub fn add_group(&mut self, group: &str) {
        let group = group.trim();
        if !self.groups.iter().any(|g| g == group) {
            self.groups.push(group.to_string());
        }
    }

    pub fn is_ungrouped(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub fn connection_label(&self) -> String {
        format!("{}@{}:{}", self.user, self.long_name, self.port)
    }

    /// Description with the IP annotation and, optionally, the group list.
    pub fn summary(&self, with_groups: bool) -> String {
        let mut desc = self.description.clone();
        if !self.ip.is_empty() {
            desc.push_str(&format!(" ({})", self.ip));
        }
        if with_groups && !self.groups.is_empty() {
            desc.push_str(&format!(" [{}]", self.groups.join(", ")));
        }
        desc
    }

    /// Prefix match on the menu number, or case-insensitively on either name.
    pub fn matches_prefix(&self, filter: &str) -> bool {
        if self.menu_number.to_string().starts_with(filter) {
            return true;
        }
        let filter = filter.to_lowercase();
        self.short_name.to_lowercase().starts_with(&filter)
            || self.long_name.to_lowercase().starts_with(&filter)
    }
}
