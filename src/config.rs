use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::MenuError;

pub const APP_NAME: &str = "ssh-menu";

pub const ENV_COLOR_BACKGROUND: &str = "SSH_MENU_COLOR_BACKGROUND";
pub const ENV_COLOR_FOREGROUND: &str = "SSH_MENU_COLOR_FOREGROUND";
pub const ENV_COLOR_BORDER: &str = "SSH_MENU_COLOR_BORDER";
pub const ENV_COLOR_SELECTED: &str = "SSH_MENU_COLOR_SELECTED";
pub const ENV_COLOR_ACCENT: &str = "SSH_MENU_COLOR_ACCENT";
pub const ENV_COLOR_DIMMED: &str = "SSH_MENU_COLOR_DIMMED";

/// The six color slots used by the menu, as color strings (`#rrggbb` or names).
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ColorConfig {
    pub background: String,
    pub foreground: String,
    pub border: String,
    pub selected: String,
    pub accent: String,
    pub dimmed: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(),
            foreground: "#cdd6f4".to_string(),
            border: "#9399b2".to_string(),
            selected: "#a6e3a1".to_string(),
            accent: "#89dceb".to_string(),
            dimmed: "#585b70".to_string(),
        }
    }
}

/// A partial color set; unset slots fall through to the next layer.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ColorOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub border: Option<String>,
    pub selected: Option<String>,
    pub accent: Option<String>,
    pub dimmed: Option<String>,
}

impl ColorOverrides {
    fn slots_mut(&mut self) -> [(&'static str, &mut Option<String>); 6] {
        [
            (ENV_COLOR_BACKGROUND, &mut self.background),
            (ENV_COLOR_FOREGROUND, &mut self.foreground),
            (ENV_COLOR_BORDER, &mut self.border),
            (ENV_COLOR_SELECTED, &mut self.selected),
            (ENV_COLOR_ACCENT, &mut self.accent),
            (ENV_COLOR_DIMMED, &mut self.dimmed),
        ]
    }

    /// Reads the `SSH_MENU_COLOR_*` variables through `lookup`. Empty values are ignored.
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::default();
        for (var, slot) in overrides.slots_mut() {
            *slot = lookup(var).filter(|v| !v.is_empty());
        }
        overrides
    }
}

static COLOR_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*Color(Background|Foreground|Border|Selected|Accent|Dimmed):\s*(.+)$")
        .expect("static regex must compile")
});

/// Collects `# Color<Slot>: value` comments; the last one for a slot wins.
pub fn parse_color_comments(content: &str) -> ColorOverrides {
    let mut overrides = ColorOverrides::default();
    for line in content.lines() {
        let Some(caps) = COLOR_COMMENT.captures(line.trim()) else {
            continue;
        };
        let value = Some(caps[2].trim().to_string());
        match &caps[1] {
            "Background" => overrides.background = value,
            "Foreground" => overrides.foreground = value,
            "Border" => overrides.border = value,
            "Selected" => overrides.selected = value,
            "Accent" => overrides.accent = value,
            "Dimmed" => overrides.dimmed = value,
            _ => {}
        }
    }
    overrides
}

/// Color comments from the primary SSH config. An unreadable file has none.
pub fn read_color_overrides(config_path: &Path) -> ColorOverrides {
    match fs::read_to_string(config_path) {
        Ok(content) => parse_color_comments(&content),
        Err(e) => {
            tracing::debug!("No color comments read from {:?}: {}", config_path, e);
            ColorOverrides::default()
        }
    }
}

/// Resolves each slot as env > config comment > settings file > built-in default.
pub fn resolve_colors(layers: &[&ColorOverrides]) -> ColorConfig {
    let defaults = ColorConfig::default();
    ColorConfig {
        background: pick(layers, |c| c.background.as_ref(), defaults.background),
        foreground: pick(layers, |c| c.foreground.as_ref(), defaults.foreground),
        border: pick(layers, |c| c.border.as_ref(), defaults.border),
        selected: pick(layers, |c| c.selected.as_ref(), defaults.selected),
        accent: pick(layers, |c| c.accent.as_ref(), defaults.accent),
        dimmed: pick(layers, |c| c.dimmed.as_ref(), defaults.dimmed),
    }
}

fn pick<F>(layers: &[&ColorOverrides], get: F, fallback: String) -> String
where
    F: Fn(&ColorOverrides) -> Option<&String>,
{
    layers
        .iter()
        .find_map(|layer| get(*layer).cloned())
        .unwrap_or(fallback)
}

/// Optional user settings stored in `ssh-menu.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub ssh_config: Option<PathBuf>,
    pub detailed: bool,
    pub ssh_opts: Option<String>,
    pub colors: ColorOverrides,
}

#[derive(Debug)]
pub struct ConfigManager {
    settings_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_NAME);
        Ok(Self::with_file(config_dir.join(format!("{APP_NAME}.toml"))))
    }

    pub fn with_file(settings_file: PathBuf) -> Self {
        Self { settings_file }
    }

    /// Loads the settings file, or defaults when it does not exist.
    pub fn load_settings(&self) -> Result<Settings> {
        if !self.settings_file.exists() {
            tracing::debug!("No settings file at {:?}", self.settings_file);
            return Ok(Settings::default());
        }

        let content =
            fs::read_to_string(&self.settings_file).context("Failed to read settings file")?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", self.settings_file))?;

        tracing::info!("Loaded settings from {:?}", self.settings_file);
        Ok(settings)
    }
}

/// `<home>/.ssh/config`, with home taken from `HOME`, then `USERPROFILE`.
pub fn default_ssh_config_path<F>(lookup: F) -> std::result::Result<PathBuf, MenuError>
where
    F: Fn(&str) -> Option<String>,
{
    let home = ["HOME", "USERPROFILE"]
        .iter()
        .find_map(|var| lookup(*var).filter(|v| !v.is_empty()))
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or(MenuError::NoHomeDir)?;
    Ok(home.join(".ssh").join("config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let colors = resolve_colors(&[&ColorOverrides::default()]);
        assert_eq!(colors, ColorConfig::default());
    }

    #[test]
    fn test_color_comments_are_parsed() {
        let content = r#"
# ColorAccent: #ff0000
#ColorDimmed:   gray
Host a
    # ColorAccent: #00ff00
"#;
        let overrides = parse_color_comments(content);
        assert_eq!(overrides.accent.as_deref(), Some("#00ff00"));
        assert_eq!(overrides.dimmed.as_deref(), Some("gray"));
        assert_eq!(overrides.background, None);
    }

    #[test]
    fn test_env_beats_comment_beats_settings() {
        let env = ColorOverrides::from_env(env(&[
            (ENV_COLOR_ACCENT, "#111111"),
            (ENV_COLOR_BORDER, ""),
        ]));
        let comments = parse_color_comments("# ColorAccent: #222222\n# ColorBorder: #333333\n");
        let settings = ColorOverrides {
            border: Some("#444444".to_string()),
            selected: Some("#555555".to_string()),
            ..ColorOverrides::default()
        };

        let colors = resolve_colors(&[&env, &comments, &settings]);
        assert_eq!(colors.accent, "#111111");
        assert_eq!(colors.border, "#333333");
        assert_eq!(colors.selected, "#555555");
        assert_eq!(colors.background, ColorConfig::default().background);
    }

    #[test]
    fn test_unreadable_config_has_no_color_overrides() {
        let dir = TempDir::new().unwrap();
        let overrides = read_color_overrides(&dir.path().join("missing"));
        assert_eq!(overrides, ColorOverrides::default());
    }

    #[test]
    fn test_missing_settings_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_file(dir.path().join("ssh-menu.toml"));
        assert_eq!(manager.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ssh-menu.toml");
        fs::write(
            &path,
            r##"
ssh_config = "/etc/ssh/menu_config"
detailed = true
ssh_opts = "-A"

[colors]
accent = "#ff8800"
"##,
        )
        .unwrap();

        let settings = ConfigManager::with_file(path).load_settings().unwrap();
        assert_eq!(settings.ssh_config, Some(PathBuf::from("/etc/ssh/menu_config")));
        assert!(settings.detailed);
        assert_eq!(settings.ssh_opts.as_deref(), Some("-A"));
        assert_eq!(settings.colors.accent.as_deref(), Some("#ff8800"));
        assert_eq!(settings.colors.dimmed, None);
    }

    #[test]
    fn test_broken_settings_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ssh-menu.toml");
        fs::write(&path, "detailed = [").unwrap();
        assert!(ConfigManager::with_file(path).load_settings().is_err());
    }

    #[test]
    fn test_home_lookup_order() {
        let path = default_ssh_config_path(env(&[("HOME", "/home/u"), ("USERPROFILE", "C:/u")]))
            .unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.ssh/config"));

        let path = default_ssh_config_path(env(&[("HOME", ""), ("USERPROFILE", "/profile")]))
            .unwrap();
        assert_eq!(path, PathBuf::from("/profile/.ssh/config"));
    }
}
