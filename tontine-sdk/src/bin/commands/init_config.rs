// Config file generation command

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tontine_sdk::ClientConfig;

use super::utils::success;

#[derive(Args)]
pub struct InitConfigCmd {
    /// Where to write the config file
    #[arg(default_value = "tontine.toml")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn execute(cmd: &InitConfigCmd) -> Result<()> {
    if cmd.path.exists() && !cmd.force {
        anyhow::bail!("{} already exists, pass --force to overwrite", cmd.path.display());
    }

    ClientConfig::default()
        .save(&cmd.path)
        .with_context(|| format!("Failed to write {}", cmd.path.display()))?;

    success(&format!("Wrote default config to {}", cmd.path.display()));
    Ok(())
}
