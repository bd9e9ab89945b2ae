// Polling refresh command

use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tontine_sdk::ClientConfig;
use tracing::{info, warn};

use super::{
    show::print_view,
    utils::{client, parse_address},
};

#[derive(Args)]
pub struct WatchCmd {
    /// Tontine object address
    tontine: String,

    /// Account to evaluate actions for
    #[arg(long)]
    user: Option<String>,

    /// Stop after this many refreshes
    #[arg(long)]
    iterations: Option<u64>,
}

pub async fn execute(cmd: WatchCmd, config: &ClientConfig) -> Result<()> {
    let client = client(config)?;
    let tontine = parse_address(&cmd.tontine)?;
    let user = cmd.user.as_deref().map(parse_address).transpose()?;

    let period = Duration::from_secs(client.refresh().poll_interval_secs);
    let mut ticker = tokio::time::interval(period);
    let mut refreshes = 0u64;

    info!(tontine = %tontine, period_secs = period.as_secs(), "watching tontine");
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(());
            }
        }

        // Each refresh replaces the previous view outright.
        match client.load_view(&tontine, user.as_ref()).await {
            Ok(view) => {
                let names = client.display_names(&view.snapshot.members).await;
                println!("--- {} ---", chrono::Utc::now().format("%H:%M:%S"));
                print_view(&view, &names);
                println!();
            }
            Err(e) => warn!(tontine = %tontine, error = %e, "refresh failed"),
        }

        refreshes += 1;
        if cmd.iterations.is_some_and(|limit| refreshes >= limit) {
            return Ok(());
        }
    }
}
