use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{MenuError, Result};
use crate::models::HostEntry;

pub const UNGROUPED: &str = "Ungrouped";

/// Validates explicit menu numbers and fills in the gaps.
///
/// Explicit numbers must be unique. Hosts without one get the lowest free
/// positive number, in list order. The result is sorted by menu number.
pub fn assign_menu_numbers(mut hosts: Vec<HostEntry>) -> Result<Vec<HostEntry>> {
    let mut used: HashMap<u32, usize> = HashMap::new();
    for (i, host) in hosts.iter().enumerate() {
        if host.menu_number == 0 {
            continue;
        }
        if let Some(&first) = used.get(&host.menu_number) {
            return Err(MenuError::DuplicateMenuNumber {
                number: host.menu_number,
                first: hosts[first].short_name.clone(),
                second: host.short_name.clone(),
            });
        }
        used.insert(host.menu_number, i);
    }

    let mut taken: HashSet<u32> = used.into_keys().collect();
    let mut next = 1;
    for host in hosts.iter_mut().filter(|h| h.menu_number == 0) {
        while taken.contains(&next) {
            next += 1;
        }
        host.menu_number = next;
        taken.insert(next);
        tracing::debug!("Assigned menu number {} to {}", next, host.short_name);
    }

    hosts.sort_by_key(|h| h.menu_number);
    Ok(hosts)
}

/// Maps each group name to the positions of its hosts in `hosts`.
pub fn group_hosts(hosts: &[HostEntry]) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, host) in hosts.iter().enumerate() {
        if host.is_ungrouped() {
            groups.entry(UNGROUPED.to_string()).or_default().push(i);
            continue;
        }
        for group in &host.groups {
            groups.entry(group.clone()).or_default().push(i);
        }
    }
    groups
}

/// Sorted group names, with `Ungrouped` always last.
pub fn all_groups(hosts: &[HostEntry]) -> Vec<String> {
    let mut groups: Vec<String> = hosts
        .iter()
        .flat_map(|h| h.groups.iter().cloned())
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|g| g != UNGROUPED)
        .collect();
    groups.sort();

    if hosts.iter().any(|h| h.is_ungrouped()) || hosts.iter().any(|h| h.in_group(UNGROUPED)) {
        groups.push(UNGROUPED.to_string());
    }
    groups
}

pub fn is_member(host: &HostEntry, group: &str) -> bool {
    if group == UNGROUPED {
        host.is_ungrouped() || host.in_group(UNGROUPED)
    } else {
        host.in_group(group)
    }
}

pub fn filter_by_group(hosts: Vec<HostEntry>, group: &str) -> Vec<HostEntry> {
    hosts.into_iter().filter(|h| is_member(h, group)).collect()
}

/// `(group, host count)` pairs in `all_groups` order.
pub fn group_counts(hosts: &[HostEntry]) -> Vec<(String, usize)> {
    all_groups(hosts)
        .into_iter()
        .map(|g| {
            let count = hosts.iter().filter(|h| is_member(h, &g)).count();
            (g, count)
        })
        .collect()
}

/// Resolves a command-line host argument without going through the menu.
///
/// Numeric input selects by menu number, anything else must equal a short
/// name, long name or IP annotation exactly.
pub fn find_direct<'a>(hosts: &'a [HostEntry], input: &str) -> Result<&'a HostEntry> {
    if let Ok(number) = input.parse::<u32>() {
        return hosts
            .iter()
            .find(|h| h.menu_number == number)
            .ok_or(MenuError::InvalidSelection(number));
    }

    hosts
        .iter()
        .find(|h| h.short_name == input || h.long_name == input || h.ip == input)
        .ok_or_else(|| MenuError::HostNotFound(input.to_string()))
}

/// What the command line resolved to once the host list is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A host named on the command line; the menu is skipped.
    Direct(HostEntry),
    /// Hosts to offer in the interactive menu.
    Menu(Vec<HostEntry>),
}

/// Numbers the parsed hosts, failing when the config has none to offer.
pub fn menu_hosts(hosts: Vec<HostEntry>) -> Result<Vec<HostEntry>> {
    if hosts.is_empty() {
        return Err(MenuError::NoHosts);
    }
    assign_menu_numbers(hosts)
}

/// Applies the optional group filter, then the optional direct selection.
///
/// The group filter runs first, so a direct argument can only name a host
/// inside that group.
pub fn resolve_target(
    hosts: Vec<HostEntry>,
    group: Option<&str>,
    direct: Option<&str>,
) -> Result<Target> {
    let hosts = match group {
        Some(group) => {
            let filtered = filter_by_group(hosts, group);
            if filtered.is_empty() {
                return Err(MenuError::EmptyGroup(group.to_string()));
            }
            filtered
        }
        None => hosts,
    };

    match direct {
        Some(input) => Ok(Target::Direct(find_direct(&hosts, input)?.clone())),
        None => Ok(Target::Menu(hosts)),
    }
}

/// Text printed by `-l`.
pub fn format_group_list(hosts: &[HostEntry]) -> String {
    let counts = group_counts(hosts);
    if counts.is_empty() {
        return "No groups found in SSH config.\n".to_string();
    }

    let mut out = String::from("Available groups:\n");
    for (group, count) in counts {
        out.push_str(&format!("  {} ({} hosts)\n", group, count));
    }
    out
}
