use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the menu before or instead of the interactive UI.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read SSH config {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list config directory {}", path.display())]
    ReadConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid menu number '{value}' in {} at line {line}", path.display())]
    InvalidMenuNumber {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("duplicate menu number {number} found for hosts '{first}' and '{second}'")]
    DuplicateMenuNumber {
        number: u32,
        first: String,
        second: String,
    },

    #[error("no menu hosts found in SSH config. Ensure hosts have a '# Menu ...' comment")]
    NoHosts,

    #[error("no hosts found in group '{0}'")]
    EmptyGroup(String),

    #[error("invalid selection: no host with menu number {0}")]
    InvalidSelection(u32),

    #[error("host not found: {0}")]
    HostNotFound(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, MenuError>;
