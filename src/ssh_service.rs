use crate::models::HostEntry;
use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

pub const SSH_BINARY: &str = "ssh";

/// Arguments for `ssh`: `[-v] [extra options...] <alias>`.
///
/// Only the alias is passed so that ssh resolves the rest of the host's
/// settings from the full config, including blocks the menu does not show.
pub fn build_ssh_args(host: &HostEntry, verbose: bool, ssh_opts: &str) -> Vec<String> {
    let mut args = Vec::new();
    if verbose {
        args.push("-v".to_string());
    }
    args.extend(ssh_opts.split_whitespace().map(str::to_string));
    args.push(host.short_name.clone());
    args
}

/// Runs ssh in the foreground with the inherited terminal and waits for it.
pub fn connect_to_host(host: &HostEntry, verbose: bool, ssh_opts: &str) -> Result<()> {
    let args = build_ssh_args(host, verbose, ssh_opts);
    tracing::info!("Attempting to connect: {} {}", SSH_BINARY, args.join(" "));

    let status = Command::new(SSH_BINARY)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute SSH command for {}", host.short_name))?;

    if !status.success() {
        tracing::error!("SSH command finished with a non-zero status: {}", status);
        bail!("SSH command for {} failed with status: {}", host.short_name, status);
    }

    tracing::info!("SSH session for {} ended.", host.short_name);
    Ok(())
}
