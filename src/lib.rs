pub mod app;
pub mod config;
pub mod error;
pub mod hosts;
#[cfg(test)]
mod log_capture;
pub mod models;
pub mod ssh_config;
pub mod ssh_service;
pub mod terminal;
pub mod ui;

pub use app::{App, Outcome};
pub use error::MenuError;
pub use models::HostEntry;
