//! Channel point parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Funding output of a channel, written as `funding_txid:output_index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelPoint {
    /// Funding transaction id, as displayed (big-endian hex).
    pub funding_txid: String,
    /// Output index of the funding output.
    pub output_index: u32,
}

impl FromStr for ChannelPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidChannelPoint(s.to_string());

        let mut parts = s.split(':');
        let txid = parts.next().filter(|txid| !txid.is_empty()).ok_or_else(invalid)?;
        let index = parts.next().ok_or_else(invalid)?;
        let output_index = index.trim().parse::<u32>().map_err(|_| invalid())?;

        Ok(Self {
            funding_txid: txid.to_string(),
            output_index,
        })
    }
}

impl fmt::Display for ChannelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.funding_txid, self.output_index)
    }
}
