// Entry function payload command

use anyhow::{Context, Result};
use clap::Args;
use tontine_core::Action;
use tontine_sdk::{ClientConfig, SdkError};
use tontine_types::apt_to_octa;

use super::utils::{client, parse_address, warn};

#[derive(Args)]
pub struct PayloadCmd {
    /// contribute, withdraw, leave, lock, check-in, claim or execute-fallback
    action: Action,

    /// Tontine object address
    tontine: String,

    /// Account that will sign the transaction
    #[arg(long)]
    user: String,

    /// Amount in APT, for contribute and withdraw
    #[arg(long)]
    amount: Option<String>,
}

pub async fn execute(cmd: PayloadCmd, config: &ClientConfig) -> Result<()> {
    let client = client(config)?;
    let tontine = parse_address(&cmd.tontine)?;
    let user = parse_address(&cmd.user)?;
    let amount_octa = cmd
        .amount
        .as_deref()
        .map(apt_to_octa)
        .transpose()
        .context("Invalid amount")?;

    match client.prepare(cmd.action, &tontine, &user, amount_octa).await {
        Ok(payload) => {
            println!("{}", payload.to_json_pretty()?);
            Ok(())
        }
        Err(SdkError::ActionDisabled { action, reason }) => {
            warn(&format!("{} is not available: {}", action, reason));
            anyhow::bail!("{} refused", action)
        }
        Err(e) => Err(e).context("Failed to prepare payload"),
    }
}
