//! Core types and configuration for lnapp.
//!
//! This crate provides the channel and peer model, bitcoin unit handling,
//! configuration management, and the error type used across the lnapp
//! workspace.

mod channel;
mod channel_point;
mod config;
mod error;
mod unit;

pub use channel::{Channel, ChannelItem, ChannelStatus, PendingChannel, PendingPhase, Peer};
pub use channel_point::ChannelPoint;
pub use config::{Config, DEFAULT_REST_URL};
pub use error::{Error, Result};
pub use unit::{BitcoinUnit, Settings, to_satoshis};
