//! Bitcoin display units and amount conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Unit an amount is entered and displayed in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinUnit {
    /// Satoshis.
    #[default]
    Sat,
    /// Bits (100 satoshis).
    Bit,
    /// Whole bitcoin.
    Btc,
}

impl BitcoinUnit {
    /// Get all available units.
    pub const fn all() -> &'static [Self] {
        &[Self::Sat, Self::Bit, Self::Btc]
    }

    /// Number of satoshis in one unit.
    pub const fn denominator(self) -> u64 {
        match self {
            Self::Sat => 1,
            Self::Bit => 100,
            Self::Btc => 100_000_000,
        }
    }

    /// Number of decimal places a whole unit can be split into.
    const fn decimals(self) -> usize {
        match self {
            Self::Sat => 0,
            Self::Bit => 2,
            Self::Btc => 8,
        }
    }

    /// Short name used in settings.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Sat => "sat",
            Self::Bit => "bit",
            Self::Btc => "btc",
        }
    }
}

impl fmt::Display for BitcoinUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for BitcoinUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|unit| unit.short_name() == s)
            .ok_or_else(|| Error::InvalidUnit(s.to_string()))
    }
}

/// User settings that affect channel workflows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Unit amounts are entered in.
    pub unit: BitcoinUnit,
}

/// Convert a human-entered amount in `unit` to satoshis.
///
/// Digits beyond satoshi precision are rounded half-up.
pub fn to_satoshis(amount: &str, unit: BitcoinUnit) -> Result<u64> {
    let invalid = || Error::InvalidAmount(amount.to_string());
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let decimals = unit.decimals();
    let (kept, rest) = fraction.split_at(fraction.len().min(decimals));
    let mut frac_sats: u64 = if kept.is_empty() {
        0
    } else {
        kept.parse::<u64>().map_err(|_| invalid())? * 10u64.pow((decimals - kept.len()) as u32)
    };
    if rest.as_bytes().first().is_some_and(|&b| b >= b'5') {
        frac_sats += 1;
    }

    whole
        .checked_mul(unit.denominator())
        .and_then(|sats| sats.checked_add(frac_sats))
        .ok_or_else(invalid)
}
