//! Wallet state container.

use std::sync::Arc;

use lnapp_core::{Channel, ChannelItem, PendingChannel, Peer, Settings};
use tokio::sync::watch;

/// User input of the create channel form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDraft {
    /// Remote node as `pubkey@host`.
    pub pubkey_at_host: String,
    /// Funding amount in the unit from [`Settings`].
    pub amount: String,
}

/// Everything the views render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    /// Connected peers.
    pub peers: Vec<Peer>,
    /// Open channels.
    pub channels: Vec<Channel>,
    /// Channels that are opening or closing.
    pub pending_channels: Vec<PendingChannel>,
    /// Channel shown in the detail view.
    pub selected_channel: Option<ChannelItem>,
    /// Create channel form.
    pub channel_draft: ChannelDraft,
    /// User settings.
    pub settings: Settings,
}

/// Shared handle to the wallet state.
///
/// Every mutation is applied in one step and published to all subscribers
/// before [`Store::update`] returns.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<WalletState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(WalletState::default())
    }
}

impl Store {
    /// Create a store holding `state`.
    pub fn new(state: WalletState) -> Self {
        let (tx, _) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    /// Create an empty store with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self::new(WalletState {
            settings,
            ..WalletState::default()
        })
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.tx.subscribe()
    }

    /// Read from the current state.
    pub fn read<R>(&self, f: impl FnOnce(&WalletState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> WalletState {
        self.tx.borrow().clone()
    }

    /// Mutate the state and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut WalletState)) {
        self.tx.send_modify(f);
    }

    /// Mutate the state and notify subscribers only if `f` returns `true`.
    ///
    /// Returns what `f` returned.
    pub fn update_if(&self, f: impl FnOnce(&mut WalletState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}
