//! Channel lifecycle workflows.
//!
//! Opening a channel connects to the peer and then follows the node's
//! `openChannel` stream; closing follows the `closeChannel` stream. Neither
//! workflow tracks channel state itself: every progress event triggers a
//! refresh of the repository (or, once a close is final, removal of the
//! pending entry), so what the user sees is always what the node reported.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use lnapp_core::{ChannelItem, ChannelPoint, Error, Result, to_satoshis};
use lnapp_rpc::schema::{
    CloseChannelRequest, ConnectPeerRequest, LightningAddress, OpenChannelRequest,
};
use lnapp_rpc::{NodeClient, StreamEvent};

use crate::{ChannelDraft, ChannelRepository, Navigator, Notification, Notifier, Store};

/// Drives the create and close channel workflows.
pub struct ChannelOrchestrator {
    client: Arc<dyn NodeClient>,
    repository: ChannelRepository,
    store: Store,
    nav: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    /// Targets of workflows currently running.
    in_flight: Mutex<HashSet<String>>,
}

/// Marks a workflow target as running until dropped.
struct InFlight<'a> {
    targets: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

impl ChannelOrchestrator {
    /// Create an orchestrator over `repository`.
    pub fn new(
        client: Arc<dyn NodeClient>,
        repository: ChannelRepository,
        nav: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = repository.store().clone();
        Self {
            client,
            repository,
            store,
            nav,
            notifier,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The repository refreshed by the workflows.
    pub const fn repository(&self) -> &ChannelRepository {
        &self.repository
    }

    /// Claim `key`, or `None` if a workflow for it is already running.
    fn begin(&self, key: String) -> Option<InFlight<'_>> {
        let mut targets = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !targets.insert(key.clone()) {
            tracing::warn!(target_key = %key, "Workflow already in progress");
            return None;
        }
        Some(InFlight {
            targets: &self.in_flight,
            key,
        })
    }

    //
    // Create channel actions
    //

    /// Reset the create form and show it.
    pub fn init_create(&self) {
        self.store.update(|state| state.channel_draft = ChannelDraft::default());
        self.nav.go_channel_create();
    }

    /// Set the amount of the create form.
    pub fn set_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        self.store.update(|state| state.channel_draft.amount = amount);
    }

    /// Set the `pubkey@host` field of the create form.
    pub fn set_pubkey_at_host(&self, pubkey_at_host: impl Into<String>) {
        let pubkey_at_host = pubkey_at_host.into();
        self.store.update(|state| state.channel_draft.pubkey_at_host = pubkey_at_host);
    }

    //
    // Channel list actions
    //

    /// Show the channel list and refresh it.
    pub async fn init(&self) {
        self.nav.go_channels();
        self.repository.refresh_all().await;
    }

    /// Show `item` in the detail view and refresh.
    pub async fn select(&self, item: ChannelItem) {
        self.store.update(|state| state.selected_channel = Some(item));
        self.nav.go_channel_detail();
        self.repository.refresh_all().await;
    }

    //
    // Workflows
    //

    /// Connect to the peer of the create form and open a channel to it.
    ///
    /// Failures are reported through the notifier.
    pub async fn connect_and_open(&self) {
        let (draft, unit) = self
            .store
            .read(|state| (state.channel_draft.clone(), state.settings.unit));

        let amount = match to_satoshis(&draft.amount, unit) {
            Ok(amount) => amount,
            Err(e) => return self.creating_failed(e),
        };
        let mut address = draft.pubkey_at_host.split('@');
        let (Some(pubkey), Some(host)) = (address.next(), address.next()) else {
            self.notifier.display(Notification::new("Please enter pubkey@host"));
            return;
        };
        let Some(_guard) = self.begin(format!("open:{pubkey}")) else {
            return;
        };

        self.nav.go_channels();
        self.connect_to_peer(host, pubkey).await;
        if let Err(e) = self.open_channel(pubkey, amount).await {
            self.creating_failed(e);
        }
    }

    fn creating_failed(&self, error: Error) {
        tracing::error!(error = %error, "Creating channel failed");
        self.nav.go_channel_create();
        self.notifier.display(Notification::with_error("Creating channel failed!", error));
    }

    /// Connect to a peer. Failure is expected when the peer is already
    /// connected and is only logged.
    pub async fn connect_to_peer(&self, host: &str, pubkey: &str) {
        let request = ConnectPeerRequest {
            addr: LightningAddress {
                pubkey: pubkey.to_string(),
                host: host.to_string(),
            },
        };
        if let Err(e) = self.client.connect_peer(request).await {
            tracing::info!(error = %e, "Connecting to peer failed");
        }
    }

    /// Open a channel and follow it until the node ends the stream.
    ///
    /// Every progress event refreshes the repository.
    pub async fn open_channel(&self, pubkey: &str, amount: u64) -> Result<()> {
        let node_pubkey =
            hex::decode(pubkey).map_err(|e| Error::InvalidPubkey(format!("{pubkey}: {e}")))?;

        let mut events = self.client.open_channel(OpenChannelRequest {
            node_pubkey,
            local_funding_amount: amount,
        });

        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Data(update) => {
                    tracing::debug!(?update, "Open channel update");
                    self.repository.refresh_all().await;
                }
                StreamEvent::Status(status) => tracing::info!("Opening channel: {status}"),
                StreamEvent::End => break,
                StreamEvent::Error(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Close the selected channel. Channels that are already closing are
    /// force closed.
    ///
    /// Failures are reported through the notifier.
    pub async fn close_selected_channel(&self) {
        let selected = self.store.read(|state| state.selected_channel.clone());
        self.nav.go_channels();

        let result = match selected {
            Some(item) => {
                let force = !item.status().is_open_phase();
                self.close_channel(item.channel_point(), force).await
            }
            None => Err(Error::NoChannelSelected),
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Closing channel failed");
            self.notifier.display(Notification::with_error("Closing channel failed!", e));
        }
    }

    /// Close a channel and follow it until the node ends the stream.
    ///
    /// `close_pending` refreshes the repository; `chan_close` removes the
    /// pending entry right away.
    pub async fn close_channel(&self, channel_point: &str, force: bool) -> Result<()> {
        let point: ChannelPoint = channel_point.parse()?;
        let Some(_guard) = self.begin(format!("close:{channel_point}")) else {
            return Ok(());
        };

        tracing::info!(channel_point, force, "Closing channel");
        let mut events = self.client.close_channel(CloseChannelRequest {
            channel_point: point.into(),
            force,
        });

        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Data(update) => {
                    if update.close_pending.is_some() {
                        self.repository.refresh_all().await;
                    }
                    if update.chan_close.is_some() {
                        self.repository.remove_pending_by_channel_point(channel_point);
                    }
                }
                StreamEvent::Status(status) => tracing::info!("Closing channel: {status}"),
                StreamEvent::End => break,
                StreamEvent::Error(e) => return Err(e),
            }
        }
        Ok(())
    }
}
