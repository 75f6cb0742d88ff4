//! Channel types.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a channel as displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelStatus {
    /// Channel is open and usable.
    Open,
    /// Funding transaction awaits confirmation.
    PendingOpen,
    /// Cooperative close awaits confirmation.
    PendingClosing,
    /// Unilateral close awaits maturity.
    PendingForceClosing,
    /// Closing transaction not yet broadcast or confirmed.
    WaitingClose,
}

impl ChannelStatus {
    /// Whether the channel is open or opening. Closing a channel in any
    /// other status has to force it.
    pub const fn is_open_phase(self) -> bool {
        matches!(self, Self::Open | Self::PendingOpen)
    }

    /// Status name as rendered to the user.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PendingOpen => "pending-open",
            Self::PendingClosing => "pending-closing",
            Self::PendingForceClosing => "pending-force-closing",
            Self::WaitingClose => "waiting-close",
        }
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An open channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Public key of the remote node.
    pub remote_pubkey: String,
    /// Short channel id.
    pub id: String,
    /// Capacity (satoshis).
    pub capacity: i64,
    /// Local balance (satoshis).
    pub local_balance: i64,
    /// Remote balance (satoshis).
    pub remote_balance: i64,
    /// Funding output, `txid:index`.
    pub channel_point: String,
    /// Whether the peer is online and the channel usable.
    pub active: bool,
}

impl Channel {
    /// Status of an open channel.
    pub const fn status(&self) -> ChannelStatus {
        ChannelStatus::Open
    }
}

/// A channel that is opening or closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChannel {
    /// Public key of the remote node.
    pub remote_pubkey: String,
    /// Capacity (satoshis).
    pub capacity: i64,
    /// Local balance (satoshis).
    pub local_balance: i64,
    /// Remote balance (satoshis).
    pub remote_balance: i64,
    /// Funding output, `txid:index`.
    pub channel_point: String,
    /// Phase specific data.
    pub phase: PendingPhase,
}

impl PendingChannel {
    /// Status derived from the pending phase.
    pub const fn status(&self) -> ChannelStatus {
        self.phase.status()
    }
}

/// Phase of a pending channel and the fields only that phase carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PendingPhase {
    /// Funding transaction broadcast, waiting for confirmations.
    PendingOpen {
        /// Height the funding transaction confirmed at.
        confirmation_height: u32,
        /// Blocks left until the channel is usable.
        blocks_till_open: i32,
        /// Fee of the commitment transaction (satoshis).
        commit_fee: i64,
        /// Weight of the commitment transaction.
        commit_weight: i64,
        /// Fee rate of the commitment transaction.
        fee_per_kw: i64,
    },
    /// Cooperative close broadcast.
    PendingClosing {
        /// Closing transaction id.
        closing_txid: String,
    },
    /// Unilateral close broadcast.
    PendingForceClosing {
        /// Closing transaction id.
        closing_txid: String,
        /// Funds locked until maturity (satoshis).
        limbo_balance: i64,
        /// Height funds become spendable at.
        maturity_height: u32,
        /// Blocks left until maturity.
        blocks_til_maturity: i32,
    },
    /// Waiting for the closing transaction.
    WaitingClose {
        /// Funds locked until the close confirms (satoshis).
        limbo_balance: i64,
    },
}

impl PendingPhase {
    /// Status rendered for this phase.
    pub const fn status(&self) -> ChannelStatus {
        match self {
            Self::PendingOpen { .. } => ChannelStatus::PendingOpen,
            Self::PendingClosing { .. } => ChannelStatus::PendingClosing,
            Self::PendingForceClosing { .. } => ChannelStatus::PendingForceClosing,
            Self::WaitingClose { .. } => ChannelStatus::WaitingClose,
        }
    }
}

/// A channel selected in the list, open or pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelItem {
    /// An open channel.
    Open(Channel),
    /// A pending channel.
    Pending(PendingChannel),
}

impl ChannelItem {
    /// Funding output of the channel.
    pub fn channel_point(&self) -> &str {
        match self {
            Self::Open(channel) => &channel.channel_point,
            Self::Pending(channel) => &channel.channel_point,
        }
    }

    /// Displayed status.
    pub const fn status(&self) -> ChannelStatus {
        match self {
            Self::Open(channel) => channel.status(),
            Self::Pending(channel) => channel.status(),
        }
    }
}

/// A connected peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Public key of the peer.
    pub pub_key: String,
    /// Peer id assigned by the node.
    pub peer_id: u64,
    /// Network address, `host:port`.
    pub address: String,
    /// Bytes sent to the peer.
    pub bytes_sent: u64,
    /// Bytes received from the peer.
    pub bytes_recv: u64,
    /// Satoshis sent to the peer.
    pub sat_sent: i64,
    /// Satoshis received from the peer.
    pub sat_recv: i64,
    /// Whether the peer initiated the connection.
    pub inbound: bool,
    /// Round-trip ping time (microseconds).
    pub ping_time: i64,
}
