// Membership list command

use anyhow::{Context, Result};
use clap::Args;
use tontine_sdk::ClientConfig;

use super::utils::{client, info, parse_address};

#[derive(Args)]
pub struct ListCmd {
    /// Account whose tontines to list
    user: String,
}

pub async fn execute(cmd: ListCmd, config: &ClientConfig) -> Result<()> {
    let client = client(config)?;
    let user = parse_address(&cmd.user)?;

    let buckets = client
        .buckets(&user)
        .await
        .with_context(|| format!("Failed to fetch memberships of {}", user))?;

    if buckets.is_empty() {
        info(&format!("{} has no tontines", user));
        return Ok(());
    }

    for lifecycle in buckets.non_empty_lifecycles() {
        println!("{} ({})", lifecycle, buckets.lifecycle_len(lifecycle));
        for bucket in buckets.non_empty().filter(|b| b.lifecycle == lifecycle) {
            println!("  {}", bucket.heading());
            for record in bucket.records {
                println!("    {}", record.tontine_address);
            }
        }
    }
    Ok(())
}
