//! Wire schemas for each node RPC command.
//!
//! Identity fields (public keys, channel ids, channel points and the
//! `channel` wrapper of pending entries) are required: a response that lacks
//! one fails to decode with [`Error::Decode`]. Numeric and boolean fields
//! follow protobuf default semantics, so an absent field reads as zero or
//! `false`. 64-bit integers are accepted both as JSON numbers and as decimal
//! strings, since the REST gateway encodes them as strings.

use lnapp_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Command;

/// Decode a raw response body for `command`.
pub fn decode<T: DeserializeOwned>(command: Command, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::Decode {
        command: command.name(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// listChannels
// ---------------------------------------------------------------------------

/// Response of `listChannels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChannelsResponse {
    /// Open channels.
    #[serde(default)]
    pub channels: Vec<WireChannel>,
}

/// An open channel as reported by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireChannel {
    /// Public key of the remote node.
    pub remote_pubkey: String,
    /// Short channel id.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub chan_id: String,
    /// Capacity (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub capacity: i64,
    /// Local balance (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub local_balance: i64,
    /// Remote balance (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub remote_balance: i64,
    /// Funding output, `txid:index`.
    pub channel_point: String,
    /// Whether the channel is usable.
    #[serde(default)]
    pub active: bool,
}

// ---------------------------------------------------------------------------
// listPeers
// ---------------------------------------------------------------------------

/// Response of `listPeers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPeersResponse {
    /// Connected peers.
    #[serde(default)]
    pub peers: Vec<WirePeer>,
}

/// A connected peer as reported by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePeer {
    /// Public key of the peer.
    pub pub_key: String,
    /// Peer id.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub peer_id: u64,
    /// Network address.
    #[serde(default)]
    pub address: String,
    /// Bytes sent.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub bytes_sent: u64,
    /// Bytes received.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub bytes_recv: u64,
    /// Satoshis sent.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub sat_sent: i64,
    /// Satoshis received.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub sat_recv: i64,
    /// Inbound connection.
    #[serde(default)]
    pub inbound: bool,
    /// Ping time (microseconds).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub ping_time: i64,
}

// ---------------------------------------------------------------------------
// pendingChannels
// ---------------------------------------------------------------------------

/// Response of `pendingChannels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChannelsResponse {
    /// Channels waiting for funding confirmations.
    #[serde(default)]
    pub pending_open_channels: Vec<WirePendingOpenChannel>,
    /// Channels being closed cooperatively.
    #[serde(default)]
    pub pending_closing_channels: Vec<WireClosedChannel>,
    /// Channels being force closed.
    #[serde(default)]
    pub pending_force_closing_channels: Vec<WireForceClosedChannel>,
    /// Channels waiting for the closing transaction to confirm.
    #[serde(default)]
    pub waiting_close_channels: Vec<WireWaitingCloseChannel>,
}

/// Fields shared by every pending channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePendingChannel {
    /// Public key of the remote node.
    pub remote_node_pub: String,
    /// Funding output, `txid:index`.
    pub channel_point: String,
    /// Capacity (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub capacity: i64,
    /// Local balance (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub local_balance: i64,
    /// Remote balance (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub remote_balance: i64,
}

/// A channel waiting for funding confirmations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePendingOpenChannel {
    /// Shared fields.
    pub channel: WirePendingChannel,
    /// Confirmation height.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub confirmation_height: u32,
    /// Blocks until the channel is open.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub blocks_till_open: i32,
    /// Commitment fee (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub commit_fee: i64,
    /// Commitment weight.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub commit_weight: i64,
    /// Fee per kiloweight.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub fee_per_kw: i64,
}

/// A channel being closed cooperatively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireClosedChannel {
    /// Shared fields.
    pub channel: WirePendingChannel,
    /// Closing transaction id.
    #[serde(default)]
    pub closing_txid: String,
}

/// A channel being force closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireForceClosedChannel {
    /// Shared fields.
    pub channel: WirePendingChannel,
    /// Closing transaction id.
    #[serde(default)]
    pub closing_txid: String,
    /// Funds in limbo (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub limbo_balance: i64,
    /// Maturity height.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub maturity_height: u32,
    /// Blocks until maturity.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub blocks_til_maturity: i32,
}

/// A channel waiting for its closing transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireWaitingCloseChannel {
    /// Shared fields.
    pub channel: WirePendingChannel,
    /// Funds in limbo (satoshis).
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub limbo_balance: i64,
}

// ---------------------------------------------------------------------------
// connectPeer
// ---------------------------------------------------------------------------

/// Request of `connectPeer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectPeerRequest {
    /// Address of the peer.
    pub addr: LightningAddress,
}

/// A node identity and its network location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightningAddress {
    /// Public key of the node (hex).
    pub pubkey: String,
    /// `host` or `host:port`.
    pub host: String,
}

// ---------------------------------------------------------------------------
// openChannel
// ---------------------------------------------------------------------------

/// Request of `openChannel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenChannelRequest {
    /// Raw public key of the remote node.
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub node_pubkey: Vec<u8>,
    /// Funding amount (satoshis).
    #[serde(serialize_with = "as_string::serialize")]
    pub local_funding_amount: u64,
}

/// Progress event of `openChannel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStatusUpdate {
    /// Funding transaction broadcast.
    #[serde(default)]
    pub chan_pending: Option<PendingUpdate>,
    /// Channel confirmed and open.
    #[serde(default)]
    pub chan_open: Option<ChannelOpenUpdate>,
    /// Temporary id of the pending channel.
    #[serde(default)]
    pub pending_chan_id: Option<String>,
}

/// A transaction was broadcast and awaits confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUpdate {
    /// Transaction id (encoded as sent by the node).
    #[serde(default)]
    pub txid: String,
    /// Output index.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub output_index: u32,
}

/// The channel is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOpenUpdate {
    /// Funding output of the new channel.
    #[serde(default)]
    pub channel_point: Option<WireChannelPoint>,
}

// ---------------------------------------------------------------------------
// closeChannel
// ---------------------------------------------------------------------------

/// Request of `closeChannel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseChannelRequest {
    /// Funding output of the channel to close.
    pub channel_point: WireChannelPoint,
    /// Close unilaterally.
    pub force: bool,
}

/// Funding output as sent to the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireChannelPoint {
    /// Funding transaction id (display hex).
    #[serde(default)]
    pub funding_txid_str: String,
    /// Output index.
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub output_index: u32,
}

impl From<lnapp_core::ChannelPoint> for WireChannelPoint {
    fn from(point: lnapp_core::ChannelPoint) -> Self {
        Self {
            funding_txid_str: point.funding_txid,
            output_index: point.output_index,
        }
    }
}

/// Progress event of `closeChannel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseStatusUpdate {
    /// Closing transaction broadcast.
    #[serde(default)]
    pub close_pending: Option<PendingUpdate>,
    /// Closing transaction confirmed.
    #[serde(default)]
    pub chan_close: Option<ChannelCloseUpdate>,
}

/// The channel is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCloseUpdate {
    /// Closing transaction id.
    #[serde(default)]
    pub closing_txid: String,
    /// Whether the close succeeded.
    #[serde(default)]
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Field codecs
// ---------------------------------------------------------------------------

/// Integers sent either as JSON numbers or as decimal strings.
mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: Display,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOr<T> {
            Text(String),
            Value(T),
        }

        match StringOr::<T>::deserialize(deserializer)? {
            StringOr::Text(text) => text.parse().map_err(de::Error::custom),
            StringOr::Value(value) => Ok(value),
        }
    }
}

/// Ids the node may send as numbers, kept as strings.
mod id_string {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Id {
            Text(String),
            Number(u64),
        }

        Ok(match Id::deserialize(deserializer)? {
            Id::Text(text) => text,
            Id::Number(number) => number.to_string(),
        })
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::Serializer;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }
}

mod as_string {
    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}
