/// Conversions between octa (on-chain unit) and APT (display unit)

use crate::{constants::*, errors::TontineError};

/// Render an octa amount as a decimal APT string without trailing zeros
pub fn octa_to_apt_string(octa: u64) -> String {
    let whole = octa / OCTA_PER_APT;
    let fraction = octa % OCTA_PER_APT;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0width$}", fraction, width = APT_DECIMALS);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Parse a decimal APT string into octa
pub fn apt_to_octa(apt: &str) -> Result<u64, TontineError> {
    let invalid = || TontineError::InvalidAmount(apt.to_string());
    let trimmed = apt.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > APT_DECIMALS
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = APT_DECIMALS)
            .parse()
            .map_err(|_| invalid())?
    };

    whole
        .checked_mul(OCTA_PER_APT)
        .and_then(|octa| octa.checked_add(fraction))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octa_rendering() {
        assert_eq!(octa_to_apt_string(0), "0");
        assert_eq!(octa_to_apt_string(100_000_000), "1");
        assert_eq!(octa_to_apt_string(150_000_000), "1.5");
        assert_eq!(octa_to_apt_string(1), "0.00000001");
    }

    #[test]
    fn test_apt_parsing() {
        assert_eq!(apt_to_octa("10").unwrap(), 1_000_000_000);
        assert_eq!(apt_to_octa("0.5").unwrap(), 50_000_000);
        assert_eq!(apt_to_octa(".25").unwrap(), 25_000_000);
        assert_eq!(apt_to_octa("1.00000001").unwrap(), 100_000_001);
    }

    #[test]
    fn test_apt_parsing_rejects_garbage() {
        assert!(apt_to_octa("").is_err());
        assert!(apt_to_octa(".").is_err());
        assert!(apt_to_octa("1.000000001").is_err());
        assert!(apt_to_octa("-1").is_err());
        assert!(apt_to_octa("1e5").is_err());
        assert!(apt_to_octa("184467440738").is_err());
    }
}
