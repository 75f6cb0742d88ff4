//! Error types for lnapp.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lnapp.
#[derive(Debug, Error)]
pub enum Error {
    /// Amount input could not be converted to satoshis.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Channel point is not of the form `txid:index`.
    #[error("invalid channel point: {0}")]
    InvalidChannelPoint(String),

    /// Unknown bitcoin unit.
    #[error("invalid bitcoin unit: {0}")]
    InvalidUnit(String),

    /// Public key is not valid hex.
    #[error("invalid pubkey: {0}")]
    InvalidPubkey(String),

    /// A close was requested with no channel selected.
    #[error("no channel selected")]
    NoChannelSelected,

    /// The node rejected a call or could not be reached.
    #[error("{command} failed: {message}")]
    Rpc {
        /// RPC command name.
        command: &'static str,
        /// Failure description.
        message: String,
    },

    /// A response did not match the command's schema.
    #[error("could not decode {command} response: {message}")]
    Decode {
        /// RPC command name.
        command: &'static str,
        /// Decoder failure description.
        message: String,
    },

    /// A streaming call emitted an error event.
    #[error("{command} stream error: {message}")]
    Stream {
        /// RPC command name.
        command: &'static str,
        /// Error reported by the stream.
        message: String,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
