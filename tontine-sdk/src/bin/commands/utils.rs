// Utility functions for CLI commands

use anyhow::{Context, Result};
use chrono::DateTime;
use std::collections::BTreeMap;
use tontine_sdk::{ClientConfig, TontineClient};
use tontine_types::{octa_to_apt_string, Address};

/// Parse an account address from string
pub fn parse_address(s: &str) -> Result<Address> {
    Address::parse(s).with_context(|| format!("Invalid address '{}'", s))
}

pub fn client(config: &ClientConfig) -> Result<TontineClient> {
    TontineClient::from_config(config).context("Failed to create tontine client")
}

/// Name service label when known, short address otherwise
pub fn display_name(address: &Address, names: &BTreeMap<Address, String>) -> String {
    match names.get(address) {
        Some(name) => format!("{}.apt", name),
        None => address.short(),
    }
}

pub fn apt(octa: u64) -> String {
    format!("{} APT", octa_to_apt_string(octa))
}

/// Unix seconds as a UTC timestamp
pub fn timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Seconds as a compact duration, e.g. "1d 2h"
pub fn duration(secs: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    if secs == 0 {
        return "0s".to_string();
    }
    let mut remaining = secs;
    let parts: Vec<String> = UNITS
        .iter()
        .filter_map(|&(unit, label)| {
            let count = remaining / unit;
            remaining %= unit;
            (count > 0).then(|| format!("{}{}", count, label))
        })
        .collect();
    parts.join(" ")
}

/// Print success message with checkmark
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("[ERROR] {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(duration(0), "0s");
        assert_eq!(duration(59), "59s");
        assert_eq!(duration(93_600), "1d 2h");
        assert_eq!(duration(3_661), "1h 1m 1s");
    }

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(timestamp(u64::MAX), u64::MAX.to_string());
    }
}
