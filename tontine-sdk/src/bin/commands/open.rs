// Deep link resolution command

use anyhow::{Context, Result};
use clap::Args;
use tontine_core::{SelectionSynchronizer, UrlQueryParam};
use tontine_sdk::ClientConfig;
use url::Url;

use super::utils::{client, error, parse_address, success};

#[derive(Args)]
pub struct OpenCmd {
    /// Connected account
    user: String,

    /// Page URL, possibly carrying a `tontine` query parameter
    #[arg(long, default_value = "http://localhost:3000/")]
    url: String,

    /// Tontine to select after the first load (use "none" to clear)
    #[arg(long)]
    select: Option<String>,
}

pub async fn execute(cmd: OpenCmd, config: &ClientConfig) -> Result<()> {
    let client = client(config)?;
    let user = parse_address(&cmd.user)?;
    let url = Url::parse(&cmd.url).with_context(|| format!("Invalid URL '{}'", cmd.url))?;

    let mut selection = SelectionSynchronizer::new(UrlQueryParam::new(url));
    let notice = client
        .sync_selection(&user, &mut selection)
        .await
        .with_context(|| format!("Failed to fetch memberships of {}", user))?;

    if let Some(notice) = notice {
        error(&notice.to_string());
    }

    if let Some(select) = cmd.select.as_deref() {
        let address = match select {
            "none" => None,
            other => Some(parse_address(other)?),
        };
        selection.select(address);
    }

    match selection.active() {
        Some(active) => success(&format!("Active tontine: {}", active)),
        None => success("No tontine selected"),
    }
    println!("{}", selection.param().url());
    Ok(())
}
