//! Line-oriented reader for SSH client configuration files.
//!
//! Only the handful of keywords the menu cares about are recognised, along with
//! the `# Menu`, `# IP` and `# Group` annotations. Everything else is left to
//! the real `ssh` binary.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{MenuError, Result};
use crate::models::HostEntry;

pub const CONFIG_DIR_NAME: &str = "config.d";

static PATTERNS: LazyLock<LinePatterns> = LazyLock::new(LinePatterns::new);

struct LinePatterns {
    host: Regex,
    hostname: Regex,
    user: Regex,
    port: Regex,
    identity_file: Regex,
    menu: Regex,
    ip: Regex,
    group: Regex,
    connect_timeout: Regex,
    server_alive_interval: Regex,
    server_alive_count_max: Regex,
}

impl LinePatterns {
    fn new() -> Self {
        Self {
            host: Regex::new(r"^Host\s+(.+)$").expect("static regex must compile"),
            hostname: Regex::new(r"^Host[Nn]ame\s+(.+)$").expect("static regex must compile"),
            user: Regex::new(r"^User\s+(.+)$").expect("static regex must compile"),
            port: Regex::new(r"^Port\s+(\d+)$").expect("static regex must compile"),
            identity_file: Regex::new(r"^IdentityFile\s+(.+)$")
                .expect("static regex must compile"),
            menu: Regex::new(r"^#\s*Menu(?:\s+([^\s:]+))?\s*:\s*(.+)$")
                .expect("static regex must compile"),
            ip: Regex::new(r"^#\s*IP:\s*(.+)$").expect("static regex must compile"),
            group: Regex::new(r"^#\s*Group:\s*(.+)$").expect("static regex must compile"),
            connect_timeout: Regex::new(r"^ConnectTimeout\s+(\d+)$")
                .expect("static regex must compile"),
            server_alive_interval: Regex::new(r"^ServerAliveInterval\s+(\d+)$")
                .expect("static regex must compile"),
            server_alive_count_max: Regex::new(r"^ServerAliveCountMax\s+(\d+)$")
                .expect("static regex must compile"),
        }
    }
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Accumulates host entries while walking the lines of one file.
struct ConfigParser<'a> {
    path: &'a Path,
    current: HostEntry,
    hosts: Vec<HostEntry>,
}

impl<'a> ConfigParser<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            current: HostEntry::default(),
            hosts: Vec::new(),
        }
    }

    fn finish_current(&mut self) {
        let done = std::mem::take(&mut self.current);
        if done.is_menu_candidate() {
            self.hosts.push(done);
        } else if !done.short_name.is_empty() {
            tracing::debug!("Skipping host '{}' without a menu comment", done.short_name);
        }
    }

    /// `Host` is matched first so a new block always closes the previous one.
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let p = &*PATTERNS;

        if let Some(name) = capture(&p.host, line) {
            self.finish_current();
            self.current = HostEntry::new(name);
        } else if let Some(v) = capture(&p.hostname, line) {
            self.current.long_name = v.to_string();
        } else if let Some(v) = capture(&p.user, line) {
            self.current.user = v.to_string();
        } else if let Some(v) = capture(&p.port, line) {
            self.current.port = v.to_string();
        } else if let Some(v) = capture(&p.identity_file, line) {
            self.current.identity_file = v.to_string();
        } else if let Some(caps) = p.menu.captures(line) {
            self.current.menu_number = match caps.get(1) {
                Some(num) => num.as_str().parse::<u32>().map_err(|_| {
                    MenuError::InvalidMenuNumber {
                        path: self.path.to_path_buf(),
                        line: line_no,
                        value: num.as_str().to_string(),
                    }
                })?,
                None => 0,
            };
            self.current.description = caps[2].to_string();
        } else if let Some(v) = capture(&p.ip, line) {
            self.current.ip = v.to_string();
        } else if let Some(v) = capture(&p.group, line) {
            self.current.add_group(v);
        } else if let Some(v) = capture(&p.connect_timeout, line) {
            if let Ok(n) = v.parse() {
                self.current.connect_timeout = n;
            }
        } else if let Some(v) = capture(&p.server_alive_interval, line) {
            if let Ok(n) = v.parse() {
                self.current.server_alive_interval = n;
            }
        } else if let Some(v) = capture(&p.server_alive_count_max, line) {
            if let Ok(n) = v.parse() {
                self.current.server_alive_count_max = n;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<HostEntry> {
        self.finish_current();
        self.hosts
    }
}

/// Parses config text. `path` is only used for error messages.
pub fn parse_str(content: &str, path: &Path) -> Result<Vec<HostEntry>> {
    let mut parser = ConfigParser::new(path);
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        parser.parse_line(line, idx + 1)?;
    }
    Ok(parser.finish())
}

pub fn read_config_file(path: &Path) -> Result<Vec<HostEntry>> {
    let content = fs::read_to_string(path).map_err(|source| MenuError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content, path)
}

/// Reads the primary config plus every visible file in the sibling `config.d`.
///
/// Files in `config.d` that fail to read or parse are logged and skipped.
pub fn read_config_files(config_path: &Path) -> Result<Vec<HostEntry>> {
    let mut hosts = read_config_file(config_path)?;
    tracing::info!("Loaded {} menu hosts from {:?}", hosts.len(), config_path);

    let dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_DIR_NAME);
    if !dir.is_dir() {
        return Ok(hosts);
    }

    for file in list_config_dir(&dir)? {
        match read_config_file(&file) {
            Ok(extra) => {
                tracing::info!("Loaded {} menu hosts from {:?}", extra.len(), file);
                hosts.extend(extra);
            }
            Err(e) => {
                tracing::warn!(
                    "Error reading config file {}: {:#}",
                    file.display(),
                    anyhow::Error::from(e)
                );
            }
        }
    }

    Ok(hosts)
}

fn list_config_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_err = |source| MenuError::ReadConfigDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Vec<HostEntry>> {
        parse_str(content, Path::new("config"))
    }

    #[test]
    fn test_parse_annotated_hosts_in_file_order() {
        let content = r#"
Host web1
    # Menu: Primary web
    Hostname web1.example.com
    User deploy
    Port 2222
    IdentityFile ~/.ssh/id_web
    # IP: 10.0.0.5
    # Group: Prod

Host db
    # Menu 7: Database
    # Group: Prod
    # Group: Storage
"#;
        let hosts = parse(content).unwrap();
        assert_eq!(hosts.len(), 2);

        let web = &hosts[0];
        assert_eq!(web.short_name, "web1");
        assert_eq!(web.long_name, "web1.example.com");
        assert_eq!(web.user, "deploy");
        assert_eq!(web.port, "2222");
        assert_eq!(web.identity_file, "~/.ssh/id_web");
        assert_eq!(web.ip, "10.0.0.5");
        assert_eq!(web.description, "Primary web");
        assert_eq!(web.menu_number, 0);
        assert_eq!(web.groups, vec!["Prod"]);

        let db = &hosts[1];
        assert_eq!(db.long_name, "db");
        assert_eq!(db.user, "root");
        assert_eq!(db.port, "22");
        assert_eq!(db.menu_number, 7);
        assert_eq!(db.groups, vec!["Prod", "Storage"]);
    }

    #[test]
    fn test_hosts_without_menu_comment_are_dropped() {
        let content = r#"
Host *
    User admin
    ServerAliveInterval 30

Host bastion
    Hostname bastion.example.com

Host app
    # Menu: App server
"#;
        let hosts = parse(content).unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].short_name, "app");
        // template settings are never inherited
        assert_eq!(hosts[0].user, "root");
    }

    #[test]
    fn test_camel_case_hostname_is_accepted() {
        let hosts = parse("Host a\n# Menu: A\nHostName a.example.com\n").unwrap();
        assert_eq!(hosts[0].long_name, "a.example.com");
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let hosts = parse("Host a\n# Menu: A\nuser alice\nport 2200\n").unwrap();
        assert_eq!(hosts[0].user, "root");
        assert_eq!(hosts[0].port, "22");
    }

    #[test]
    fn test_menu_comment_without_number_resets_explicit_number() {
        let hosts = parse("Host a\n# Menu 4: First\n# Menu: Second\n").unwrap();
        assert_eq!(hosts[0].menu_number, 0);
        assert_eq!(hosts[0].description, "Second");
    }

    #[test]
    fn test_menu_comment_spacing_variants() {
        let hosts = parse("Host a\n#Menu 3:   Spaced\nHost b\n#   Menu:x\n").unwrap();
        assert_eq!(hosts[0].menu_number, 3);
        assert_eq!(hosts[0].description, "Spaced");
        assert_eq!(hosts[1].description, "x");
    }

    #[test]
    fn test_invalid_menu_number_is_fatal() {
        let err = parse("Host a\n# Menu abc: Broken\n").unwrap_err();
        match err {
            MenuError::InvalidMenuNumber { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse("Host a\n# Menu 99999999999: Huge\n").is_err());
    }

    #[test]
    fn test_malformed_tuning_values_are_ignored() {
        let content = r#"
Host a
    # Menu: A
    ConnectTimeout 10
    ServerAliveInterval 60
    ServerAliveCountMax 3
    ConnectTimeout 99999999999
    ServerAliveInterval soon
"#;
        let hosts = parse(content).unwrap();
        assert_eq!(hosts[0].connect_timeout, 10);
        assert_eq!(hosts[0].server_alive_interval, 60);
        assert_eq!(hosts[0].server_alive_count_max, 3);
    }

    #[test]
    fn test_lines_before_first_host_are_not_retained() {
        let hosts = parse("# Menu: Orphan\nUser nobody\nHost a\n# Menu: A\n").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].short_name, "a");
        assert_eq!(hosts[0].user, "root");
    }

    #[test]
    fn test_crlf_line_endings() {
        let hosts = parse("Host a\r\n# Menu: A\r\nPort 2022\r\n").unwrap();
        assert_eq!(hosts[0].description, "A");
        assert_eq!(hosts[0].port, "2022");
    }

    #[test]
    fn test_missing_primary_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = read_config_files(&dir.path().join("config")).unwrap_err();
        assert!(matches!(err, MenuError::ReadConfig { .. }));
    }

    #[test]
    fn test_config_dir_files_are_appended_in_name_order() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config");
        fs::write(&config, "Host main\n# Menu: Main\n").unwrap();

        let extra = dir.path().join(CONFIG_DIR_NAME);
        fs::create_dir(&extra).unwrap();
        fs::write(extra.join("20-b"), "Host b\n# Menu: B\n").unwrap();
        fs::write(extra.join("10-a"), "Host a\n# Menu: A\n").unwrap();
        fs::write(extra.join(".hidden"), "Host hidden\n# Menu: Hidden\n").unwrap();
        fs::create_dir(extra.join("nested")).unwrap();

        let hosts = read_config_files(&config).unwrap();
        let names: Vec<_> = hosts.iter().map(|h| h.short_name.as_str()).collect();
        assert_eq!(names, vec!["main", "a", "b"]);
    }

    #[test]
    fn test_broken_config_dir_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config");
        fs::write(&config, "Host main\n# Menu: Main\n").unwrap();

        let extra = dir.path().join(CONFIG_DIR_NAME);
        fs::create_dir(&extra).unwrap();
        fs::write(extra.join("bad"), "Host bad\n# Menu x: Bad\n").unwrap();
        // invalid UTF-8 cannot be read as text
        fs::write(extra.join("binary"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(extra.join("good"), "Host good\n# Menu: Good\n").unwrap();

        let (hosts, logs) = crate::log_capture::capture_logs(|| read_config_files(&config));
        let hosts = hosts.unwrap();
        let names: Vec<_> = hosts.iter().map(|h| h.short_name.as_str()).collect();
        assert_eq!(names, vec!["main", "good"]);

        let warnings: Vec<_> = logs
            .lines()
            .filter(|l| l.trim_start().starts_with("WARN"))
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Error reading config file"));
        assert!(warnings[0].contains("invalid menu number 'x'"));
        assert!(warnings[0].contains("at line 2"));
        assert!(warnings[1].contains("binary"));
    }

    #[test]
    fn test_config_dir_that_is_a_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config");
        fs::write(&config, "Host main\n# Menu: Main\n").unwrap();
        fs::write(dir.path().join(CONFIG_DIR_NAME), "Host x\n# Menu: X\n").unwrap();

        let hosts = read_config_files(&config).unwrap();
        assert_eq!(hosts.len(), 1);
    }
}
