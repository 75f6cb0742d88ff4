//! Terminal implementations of the wallet collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};

use lnapp_core::{ChannelStatus, PendingPhase};
use lnapp_wallet::{Navigator, Notification, Notifier, WalletState};

/// Navigation has no screens on the terminal; route changes are logged.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go_channels(&self) {
        tracing::debug!("Navigating to channels");
    }

    fn go_channel_create(&self) {
        tracing::debug!("Navigating to channel create");
    }

    fn go_channel_detail(&self) {
        tracing::debug!("Navigating to channel detail");
    }
}

/// Prints notifications to stderr and counts them.
#[derive(Default)]
pub struct ConsoleNotifier {
    displayed: AtomicUsize,
}

impl ConsoleNotifier {
    /// Number of notifications shown so far.
    pub fn displayed(&self) -> usize {
        self.displayed.load(Ordering::SeqCst)
    }
}

impl Notifier for ConsoleNotifier {
    fn display(&self, notification: Notification) {
        self.displayed.fetch_add(1, Ordering::SeqCst);
        eprintln!("{notification}");
    }
}

/// Print open and pending channels.
pub fn print_channels(state: &WalletState) {
    if state.channels.is_empty() && state.pending_channels.is_empty() {
        println!("No channels. Use 'lnapp open <pubkey@host> <amount>' to open one.");
        return;
    }

    for channel in &state.channels {
        println!(
            "{:<22} {:<66} {:>12} local {:>12} remote {:>12} {}",
            ChannelStatus::Open,
            channel.channel_point,
            channel.capacity,
            channel.local_balance,
            channel.remote_balance,
            if channel.active { "active" } else { "inactive" },
        );
    }

    for channel in &state.pending_channels {
        let detail = match &channel.phase {
            PendingPhase::PendingOpen {
                blocks_till_open, ..
            } => format!("{blocks_till_open} blocks till open"),
            PendingPhase::PendingClosing { closing_txid } => format!("closing tx {closing_txid}"),
            PendingPhase::PendingForceClosing {
                limbo_balance,
                blocks_til_maturity,
                ..
            } => format!("{limbo_balance} in limbo, {blocks_til_maturity} blocks til maturity"),
            PendingPhase::WaitingClose { limbo_balance } => format!("{limbo_balance} in limbo"),
        };
        println!(
            "{:<22} {:<66} {:>12} local {:>12} remote {:>12} {}",
            channel.status(),
            channel.channel_point,
            channel.capacity,
            channel.local_balance,
            channel.remote_balance,
            detail,
        );
    }
}

/// Print connected peers.
pub fn print_peers(state: &WalletState) {
    if state.peers.is_empty() {
        println!("No peers connected.");
        return;
    }

    for peer in &state.peers {
        println!(
            "{:<66} {:<24} {} sent {:>10} recv {:>10} ping {}us",
            peer.pub_key,
            peer.address,
            if peer.inbound { "in " } else { "out" },
            peer.sat_sent,
            peer.sat_recv,
            peer.ping_time,
        );
    }
}
