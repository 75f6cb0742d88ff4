//! Channel management for lnapp.
//!
//! [`ChannelRepository`] mirrors the node's peers, open channels and pending
//! channels into a [`Store`]; [`ChannelOrchestrator`] runs the create and
//! close channel workflows on top of it.

mod notify;
mod orchestrator;
mod repository;
mod store;

pub use notify::{Navigator, Notification, Notifier};
pub use orchestrator::ChannelOrchestrator;
pub use repository::{ChannelRepository, map_pending_channels};
pub use store::{ChannelDraft, Store, WalletState};
