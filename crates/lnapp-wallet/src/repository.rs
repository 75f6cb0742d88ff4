//! Peers, open channels and pending channels as reported by the node.

use std::sync::Arc;

use lnapp_core::{Channel, PendingChannel, PendingPhase, Peer, Result};
use lnapp_rpc::NodeClient;
use lnapp_rpc::schema::{PendingChannelsResponse, WireChannel, WirePeer, WirePendingChannel};

use crate::Store;

/// Keeps the three channel collections of the [`Store`] in sync with the node.
///
/// The repository is the only writer of `peers`, `channels` and
/// `pending_channels`. Each refresh replaces its collection in a single store
/// update. A failed refresh is logged and leaves the previous value in place.
#[derive(Clone)]
pub struct ChannelRepository {
    client: Arc<dyn NodeClient>,
    store: Store,
}

impl ChannelRepository {
    /// Create a repository writing into `store`.
    pub fn new(client: Arc<dyn NodeClient>, store: Store) -> Self {
        Self { client, store }
    }

    /// The store this repository writes into.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Refresh peers, open channels and pending channels concurrently.
    ///
    /// Returns once all three calls have settled. A failing call never
    /// affects the other two.
    pub async fn refresh_all(&self) {
        let _ = tokio::join!(
            self.refresh_peers(),
            self.refresh_open_channels(),
            self.refresh_pending_channels(),
        );
    }

    /// Replace the peer list.
    pub async fn refresh_peers(&self) -> Result<()> {
        let response = self
            .client
            .list_peers()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Listing peers failed"))?;

        let peers: Vec<Peer> = response.peers.into_iter().map(map_peer).collect();
        tracing::debug!(count = peers.len(), "Peers refreshed");
        self.store.update(|state| state.peers = peers);
        Ok(())
    }

    /// Replace the open channel list.
    pub async fn refresh_open_channels(&self) -> Result<()> {
        let response = self
            .client
            .list_channels()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Listing channels failed"))?;

        let channels: Vec<Channel> = response.channels.into_iter().map(map_channel).collect();
        tracing::debug!(count = channels.len(), "Channels refreshed");
        self.store.update(|state| state.channels = channels);
        Ok(())
    }

    /// Replace the pending channel list.
    pub async fn refresh_pending_channels(&self) -> Result<()> {
        let response = self
            .client
            .pending_channels()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Listing pending channels failed"))?;

        let pending = map_pending_channels(response);
        tracing::debug!(count = pending.len(), "Pending channels refreshed");
        self.store.update(|state| state.pending_channels = pending);
        Ok(())
    }

    /// Remove the first pending channel with the given channel point.
    ///
    /// Returns whether an entry was removed. Subscribers are only notified
    /// when one was.
    pub fn remove_pending_by_channel_point(&self, channel_point: &str) -> bool {
        let removed = self.store.update_if(|state| {
            let Some(index) = state
                .pending_channels
                .iter()
                .position(|channel| channel.channel_point == channel_point)
            else {
                return false;
            };
            state.pending_channels.remove(index);
            true
        });
        if removed {
            tracing::info!(channel_point, "Removed closed channel");
        }
        removed
    }
}

fn map_peer(peer: WirePeer) -> Peer {
    Peer {
        pub_key: peer.pub_key,
        peer_id: peer.peer_id,
        address: peer.address,
        bytes_sent: peer.bytes_sent,
        bytes_recv: peer.bytes_recv,
        sat_sent: peer.sat_sent,
        sat_recv: peer.sat_recv,
        inbound: peer.inbound,
        ping_time: peer.ping_time,
    }
}

fn map_channel(channel: WireChannel) -> Channel {
    Channel {
        remote_pubkey: channel.remote_pubkey,
        id: channel.chan_id,
        capacity: channel.capacity,
        local_balance: channel.local_balance,
        remote_balance: channel.remote_balance,
        channel_point: channel.channel_point,
        active: channel.active,
    }
}

fn map_pending(channel: WirePendingChannel, phase: PendingPhase) -> PendingChannel {
    PendingChannel {
        remote_pubkey: channel.remote_node_pub,
        capacity: channel.capacity,
        local_balance: channel.local_balance,
        remote_balance: channel.remote_balance,
        channel_point: channel.channel_point,
        phase,
    }
}

/// Flatten the four pending lists into one, ordered open, closing,
/// force closing, waiting close.
pub fn map_pending_channels(response: PendingChannelsResponse) -> Vec<PendingChannel> {
    let opening = response.pending_open_channels.into_iter().map(|poc| {
        map_pending(
            poc.channel,
            PendingPhase::PendingOpen {
                confirmation_height: poc.confirmation_height,
                blocks_till_open: poc.blocks_till_open,
                commit_fee: poc.commit_fee,
                commit_weight: poc.commit_weight,
                fee_per_kw: poc.fee_per_kw,
            },
        )
    });

    let closing = response.pending_closing_channels.into_iter().map(|pcc| {
        map_pending(
            pcc.channel,
            PendingPhase::PendingClosing {
                closing_txid: pcc.closing_txid,
            },
        )
    });

    let force_closing = response
        .pending_force_closing_channels
        .into_iter()
        .map(|pfcc| {
            map_pending(
                pfcc.channel,
                PendingPhase::PendingForceClosing {
                    closing_txid: pfcc.closing_txid,
                    limbo_balance: pfcc.limbo_balance,
                    maturity_height: pfcc.maturity_height,
                    blocks_til_maturity: pfcc.blocks_til_maturity,
                },
            )
        });

    let waiting = response.waiting_close_channels.into_iter().map(|wcc| {
        map_pending(
            wcc.channel,
            PendingPhase::WaitingClose {
                limbo_balance: wcc.limbo_balance,
            },
        )
    });

    opening
        .chain(closing)
        .chain(force_closing)
        .chain(waiting)
        .collect()
}
