// Tontine detail command

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use tontine_core::{
    Availability, DeadlineCell, EligibilityCell, MemberProgress, MemberRow, ReadinessCell,
};
use tontine_sdk::{ClientConfig, TontineView};
use tontine_types::{Address, Loadable};

use super::utils::{apt, client, display_name, duration, parse_address, timestamp};

#[derive(Args)]
pub struct ShowCmd {
    /// Tontine object address
    tontine: String,

    /// Account to evaluate actions for
    #[arg(long)]
    user: Option<String>,
}

pub async fn execute(cmd: ShowCmd, config: &ClientConfig) -> Result<()> {
    let client = client(config)?;
    let tontine = parse_address(&cmd.tontine)?;
    let user = cmd.user.as_deref().map(parse_address).transpose()?;

    let view = client
        .load_view(&tontine, user.as_ref())
        .await
        .with_context(|| format!("Failed to load tontine {}", tontine))?;
    let names = client.display_names(&view.snapshot.members).await;

    print_view(&view, &names);
    Ok(())
}

pub fn print_view(view: &TontineView, names: &BTreeMap<Address, String>) {
    let snapshot = &view.snapshot;

    println!("Tontine {}", snapshot.address);
    println!("  Description:        {}", snapshot.description);
    println!("  Creator:            {}", display_name(&snapshot.creator_address, names));
    println!("  Status:             {}", loadable_label(view.overall.as_ref()));
    println!("  Per-member amount:  {}", apt(snapshot.per_member_amount));
    println!("  Total contributed:  {}", apt(snapshot.total_contributed()));
    println!("  Check-in frequency: {}", duration(snapshot.check_in_frequency_secs));
    println!("  Claim window:       {}", duration(snapshot.claim_window_secs));
    println!("  Fallback policy:    {}", snapshot.fallback_policy);
    println!("  Created:            {}", timestamp(snapshot.creation_time_secs));
    if snapshot.is_locked() {
        println!("  Locked:             {}", timestamp(snapshot.locked_time_secs));
    }
    if snapshot.funds_claimed_time_secs > 0 {
        println!("  Funds claimed:      {}", timestamp(snapshot.funds_claimed_time_secs));
    }

    println!();
    println!("Members");
    for row in &view.rows {
        println!("  {}", member_line(row, names));
    }

    if let Some(decisions) = &view.decisions {
        println!();
        println!("Actions");
        for decision in decisions.iter() {
            let state = if decision.is_enabled() { "enabled " } else { "disabled" };
            match decision.tooltip() {
                Some(text) => println!("  {:<17} {}  {}", decision.action.to_string(), state, text),
                None => println!("  {:<17} {}", decision.action.to_string(), state),
            }
        }
    }
}

fn loadable_label<T: std::fmt::Display>(value: Loadable<T>) -> String {
    match value {
        Loadable::Loading => "Loading…".to_string(),
        Loadable::Ready(value) => value.to_string(),
    }
}

fn member_line(row: &MemberRow, names: &BTreeMap<Address, String>) -> String {
    let mut tags = Vec::new();
    if row.is_creator {
        tags.push("creator");
    }
    if row.is_user {
        tags.push("you");
    }
    let who = if tags.is_empty() {
        display_name(&row.address, names)
    } else {
        format!("{} ({})", display_name(&row.address, names), tags.join(", "))
    };

    let progress = match &row.progress {
        MemberProgress::Staging { reconfirmation_required, ready } => {
            let ready = match ready {
                ReadinessCell::Loading => "Loading…",
                ReadinessCell::Yes => "Yes",
                ReadinessCell::No => "No",
            };
            let reconfirm = if *reconfirmation_required { "  must reconfirm" } else { "" };
            format!("ready: {}{}", ready, reconfirm)
        }
        MemberProgress::Locked { last_check_in, next_check_in, eligibility } => {
            let last = last_check_in.map_or_else(|| "Never".to_string(), timestamp);
            let next = match next_check_in {
                DeadlineCell::NotApplicable => "N/A".to_string(),
                DeadlineCell::By(secs) => timestamp(*secs),
            };
            let eligible = match eligibility {
                EligibilityCell::Loading => "Loading…",
                EligibilityCell::Yes => "Yes",
                EligibilityCell::No => "No",
                EligibilityCell::CanClaim => "Can claim",
                EligibilityCell::FundsClaimed => "Funds claimed",
                EligibilityCell::FailedToClaim => "Failed to claim",
            };
            format!("last check-in: {}  next: {}  eligible: {}", last, next, eligible)
        }
    };

    let remove = match row.remove {
        Some(Availability::Enabled { .. }) => "  [removable]",
        _ => "",
    };

    format!("{:<32} {:>16}  {}{}", who, apt(row.contribution), progress, remove)
}
