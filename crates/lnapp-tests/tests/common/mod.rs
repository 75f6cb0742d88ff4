//! Scripted node and recording collaborators shared by the tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use lnapp_core::{Error, Result, Settings};
use lnapp_rpc::schema::{
    ChannelCloseUpdate, CloseChannelRequest, CloseStatusUpdate, ConnectPeerRequest,
    ListChannelsResponse, ListPeersResponse, OpenChannelRequest, OpenStatusUpdate,
    PendingChannelsResponse, PendingUpdate, WireChannel, WireClosedChannel,
    WireForceClosedChannel, WirePeer, WirePendingChannel, WirePendingOpenChannel,
    WireWaitingCloseChannel,
};
use lnapp_rpc::{Command, EventStream, NodeClient, StreamEvent};
use lnapp_wallet::{
    ChannelOrchestrator, ChannelRepository, Navigator, Notification, Notifier, Store,
};
use tokio::sync::oneshot;

pub const PUBKEY: &str = "021111111111111111111111111111111111111111111111111111111111111111";

/// A call received by [`FakeNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListChannels,
    ListPeers,
    PendingChannels,
    ConnectPeer(ConnectPeerRequest),
    OpenChannel(OpenChannelRequest),
    CloseChannel(CloseChannelRequest),
}

impl Call {
    pub const fn command(&self) -> Command {
        match self {
            Self::ListChannels => Command::ListChannels,
            Self::ListPeers => Command::ListPeers,
            Self::PendingChannels => Command::PendingChannels,
            Self::ConnectPeer(_) => Command::ConnectPeer,
            Self::OpenChannel(_) => Command::OpenChannel,
            Self::CloseChannel(_) => Command::CloseChannel,
        }
    }
}

/// One scripted event of a streaming call.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Data(T),
    Status(&'static str),
    End,
    Error(&'static str),
}

fn into_event<T>(command: Command, scripted: Scripted<T>) -> StreamEvent<T> {
    match scripted {
        Scripted::Data(data) => StreamEvent::Data(data),
        Scripted::Status(status) => StreamEvent::Status(status.to_string()),
        Scripted::End => StreamEvent::End,
        Scripted::Error(message) => StreamEvent::Error(Error::Stream {
            command: command.name(),
            message: message.to_string(),
        }),
    }
}

/// In-memory node answering with canned responses.
#[derive(Default)]
pub struct FakeNode {
    pub channels: Mutex<ListChannelsResponse>,
    pub peers: Mutex<ListPeersResponse>,
    pub pending: Mutex<PendingChannelsResponse>,
    pub open_script: Mutex<Vec<Scripted<OpenStatusUpdate>>>,
    pub close_script: Mutex<Vec<Scripted<CloseStatusUpdate>>>,
    /// Holds back the next open stream until the sender fires.
    pub open_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Holds back the next close stream until the sender fires.
    pub close_gate: Mutex<Option<oneshot::Receiver<()>>>,
    failing: Mutex<HashSet<Command>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeNode {
    /// Make every call of `command` fail.
    pub fn fail(&self, command: Command) {
        self.failing.lock().unwrap().insert(command);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, command: Command) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.command() == command)
            .count()
    }

    pub fn close_requests(&self) -> Vec<CloseChannelRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CloseChannel(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let command = call.command();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&command) {
            return Err(Error::Rpc {
                command: command.name(),
                message: "node unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NodeClient for FakeNode {
    async fn list_channels(&self) -> Result<ListChannelsResponse> {
        self.record(Call::ListChannels)?;
        Ok(self.channels.lock().unwrap().clone())
    }

    async fn list_peers(&self) -> Result<ListPeersResponse> {
        self.record(Call::ListPeers)?;
        Ok(self.peers.lock().unwrap().clone())
    }

    async fn pending_channels(&self) -> Result<PendingChannelsResponse> {
        self.record(Call::PendingChannels)?;
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn connect_peer(&self, request: ConnectPeerRequest) -> Result<()> {
        self.record(Call::ConnectPeer(request))
    }

    fn open_channel(&self, request: OpenChannelRequest) -> EventStream<OpenStatusUpdate> {
        if let Err(e) = self.record(Call::OpenChannel(request)) {
            return stream::iter([StreamEvent::Error(e)]).boxed();
        }
        let events: Vec<_> = self
            .open_script
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|scripted| into_event(Command::OpenChannel, scripted))
            .collect();
        let gate = self.open_gate.lock().unwrap().take();
        gated(gate, events)
    }

    fn close_channel(&self, request: CloseChannelRequest) -> EventStream<CloseStatusUpdate> {
        if let Err(e) = self.record(Call::CloseChannel(request)) {
            return stream::iter([StreamEvent::Error(e)]).boxed();
        }
        let events: Vec<_> = self
            .close_script
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|scripted| into_event(Command::CloseChannel, scripted))
            .collect();
        let gate = self.close_gate.lock().unwrap().take();
        gated(gate, events)
    }
}

/// Yield `events` once `gate` fires, or right away without a gate.
fn gated<T: Send + 'static>(
    gate: Option<oneshot::Receiver<()>>,
    events: Vec<StreamEvent<T>>,
) -> EventStream<T> {
    stream::once(async move {
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    })
    .filter_map(|()| async { None })
    .chain(stream::iter(events))
    .boxed()
}

/// Records route changes.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<&'static str>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<&'static str> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<&'static str> {
        self.routes.lock().unwrap().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn go_channels(&self) {
        self.routes.lock().unwrap().push("channels");
    }

    fn go_channel_create(&self) {
        self.routes.lock().unwrap().push("channel-create");
    }

    fn go_channel_detail(&self) {
        self.routes.lock().unwrap().push("channel-detail");
    }
}

/// Records notifications.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    /// Error text of every notification, `None` for plain messages.
    pub fn errors(&self) -> Vec<Option<String>> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.error.as_ref().map(ToString::to_string))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn display(&self, notification: Notification) {
        self.shown.lock().unwrap().push(notification);
    }
}

/// Wallet wired to a fake node.
pub struct Harness {
    pub node: Arc<FakeNode>,
    pub store: Store,
    pub nav: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub orchestrator: ChannelOrchestrator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let node = Arc::new(FakeNode::default());
        let store = Store::with_settings(settings);
        let nav = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let repository = ChannelRepository::new(node.clone(), store.clone());
        let orchestrator =
            ChannelOrchestrator::new(node.clone(), repository, nav.clone(), notifier.clone());

        Self {
            node,
            store,
            nav,
            notifier,
            orchestrator,
        }
    }

    pub const fn repository(&self) -> &ChannelRepository {
        self.orchestrator.repository()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn wire_channel(remote_pubkey: &str, channel_point: &str) -> WireChannel {
    WireChannel {
        remote_pubkey: remote_pubkey.to_string(),
        chan_id: "1337".to_string(),
        capacity: 1_000_000,
        local_balance: 600_000,
        remote_balance: 390_000,
        channel_point: channel_point.to_string(),
        active: true,
    }
}

pub fn wire_peer(pub_key: &str) -> WirePeer {
    WirePeer {
        pub_key: pub_key.to_string(),
        peer_id: 1,
        address: "10.0.0.2:9735".to_string(),
        bytes_sent: 1024,
        bytes_recv: 2048,
        sat_sent: 10,
        sat_recv: 20,
        inbound: false,
        ping_time: 350,
    }
}

pub fn wire_pending(channel_point: &str) -> WirePendingChannel {
    WirePendingChannel {
        remote_node_pub: PUBKEY.to_string(),
        channel_point: channel_point.to_string(),
        capacity: 500_000,
        local_balance: 490_000,
        remote_balance: 0,
    }
}

pub fn pending_open(channel_point: &str) -> WirePendingOpenChannel {
    WirePendingOpenChannel {
        channel: wire_pending(channel_point),
        confirmation_height: 0,
        blocks_till_open: 3,
        commit_fee: 9050,
        commit_weight: 600,
        fee_per_kw: 12500,
    }
}

pub fn pending_closing(channel_point: &str) -> WireClosedChannel {
    WireClosedChannel {
        channel: wire_pending(channel_point),
        closing_txid: "c105e".to_string(),
    }
}

pub fn pending_force_closing(channel_point: &str) -> WireForceClosedChannel {
    WireForceClosedChannel {
        channel: wire_pending(channel_point),
        closing_txid: "f0rce".to_string(),
        limbo_balance: 490_000,
        maturity_height: 850,
        blocks_til_maturity: 144,
    }
}

pub fn waiting_close(channel_point: &str) -> WireWaitingCloseChannel {
    WireWaitingCloseChannel {
        channel: wire_pending(channel_point),
        limbo_balance: 490_000,
    }
}

pub fn chan_pending() -> OpenStatusUpdate {
    OpenStatusUpdate {
        chan_pending: Some(PendingUpdate {
            txid: "fund".to_string(),
            output_index: 0,
        }),
        ..OpenStatusUpdate::default()
    }
}

pub fn close_pending() -> CloseStatusUpdate {
    CloseStatusUpdate {
        close_pending: Some(PendingUpdate {
            txid: "close".to_string(),
            output_index: 0,
        }),
        chan_close: None,
    }
}

pub fn chan_close() -> CloseStatusUpdate {
    CloseStatusUpdate {
        close_pending: None,
        chan_close: Some(ChannelCloseUpdate {
            closing_txid: "close".to_string(),
            success: true,
        }),
    }
}
