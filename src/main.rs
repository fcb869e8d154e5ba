use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use ssh_menu::config::{self, ColorOverrides, ConfigManager, Settings, APP_NAME};
use ssh_menu::hosts::{self, Target};
use ssh_menu::terminal::MenuTerminal;
use ssh_menu::ui::Palette;
use ssh_menu::{app, ssh_config, ssh_service, App, HostEntry, Outcome};

const LOG_ENV: &str = "SSH_MENU_LOG";

/// Pick a host from your SSH config and connect to it.
#[derive(Debug, Parser)]
#[command(name = APP_NAME)]
struct Cli {
    /// Show detailed connection information in the list
    #[arg(short = 'd')]
    detailed: bool,

    /// Enable SSH verbose mode (passes -v to ssh)
    #[arg(short = 'V')]
    verbose: bool,

    /// Additional SSH options to pass through (e.g. -s '-A -J jumphost')
    #[arg(short = 's', value_name = "OPTS", allow_hyphen_values = true)]
    ssh_opts: Option<String>,

    /// Only show hosts in this group
    #[arg(short = 'g', value_name = "GROUP")]
    group: Option<String>,

    /// List all available groups and exit
    #[arg(short = 'l')]
    list_groups: bool,

    /// SSH config file to read instead of ~/.ssh/config
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a debug log to the cache directory
    #[arg(long)]
    debug: bool,

    /// Menu number, alias, hostname or IP to connect to without the menu
    host: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let settings = load_settings()?;
    let config_path = match cli.config.clone().or_else(|| settings.ssh_config.clone()) {
        Some(path) => path,
        None => config::default_ssh_config_path(|var| std::env::var(var).ok())?,
    };
    debug!("SSH config path: {:?}", config_path);

    let env_colors = ColorOverrides::from_env(|var| std::env::var(var).ok());
    let comment_colors = config::read_color_overrides(&config_path);
    let colors = config::resolve_colors(&[&env_colors, &comment_colors, &settings.colors]);

    let hosts = ssh_config::read_config_files(&config_path).context("Error reading SSH config")?;
    let hosts = hosts::menu_hosts(hosts)?;

    if cli.list_groups {
        print!("{}", hosts::format_group_list(&hosts));
        return Ok(());
    }

    let detailed = cli.detailed || settings.detailed;
    let ssh_opts = cli.ssh_opts.or(settings.ssh_opts).unwrap_or_default();

    let selected: HostEntry =
        match hosts::resolve_target(hosts, cli.group.as_deref(), cli.host.as_deref())? {
            Target::Direct(host) => host,
            Target::Menu(hosts) => {
                // Parsed before the alternate screen so bad colors are reported on the normal screen
                let palette = Palette::from_config(&colors);
                // The terminal is restored when it goes out of scope, before ssh starts
                let outcome = {
                    let mut terminal = MenuTerminal::new()?;
                    app::run(&mut *terminal, App::new(hosts, detailed), &palette)?
                };
                match outcome {
                    Outcome::Selected(host) => host,
                    Outcome::Cancelled => {
                        debug!("Menu cancelled");
                        return Ok(());
                    }
                }
            }
        };

    ssh_service::connect_to_host(&selected, cli.verbose, &ssh_opts)
        .context("Error executing ssh")?;
    Ok(())
}

fn init_logging(debug: bool) -> Result<()> {
    if debug {
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
            .join("logs");
        std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

        let log_file = log_dir.join(format!(
            "{}_{}.log",
            APP_NAME,
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let file = File::create(&log_file).context("Failed to create log file")?;

        let filter = EnvFilter::from_env(LOG_ENV).add_directive("ssh_menu=debug".parse()?);
        fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
        debug!("Logging to {:?}", log_file);
    } else {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_settings() -> Result<Settings> {
    match ConfigManager::new() {
        Ok(manager) => manager.load_settings(),
        Err(e) => {
            tracing::warn!("Skipping settings file: {}", e);
            Ok(Settings::default())
        }
    }
}
