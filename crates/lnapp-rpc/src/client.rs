//! The node RPC seam.

use async_trait::async_trait;
use lnapp_core::Result;

use crate::schema::{
    CloseChannelRequest, CloseStatusUpdate, ConnectPeerRequest, ListChannelsResponse,
    ListPeersResponse, OpenChannelRequest, OpenStatusUpdate, PendingChannelsResponse,
};
use crate::stream::EventStream;

/// Client for a Lightning node's RPC interface.
///
/// Unary calls resolve to a decoded response. Streaming calls return
/// immediately; the request is only sent once the returned stream is polled.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// `listChannels`.
    async fn list_channels(&self) -> Result<ListChannelsResponse>;

    /// `listPeers`.
    async fn list_peers(&self) -> Result<ListPeersResponse>;

    /// `pendingChannels`.
    async fn pending_channels(&self) -> Result<PendingChannelsResponse>;

    /// `connectPeer`.
    async fn connect_peer(&self, request: ConnectPeerRequest) -> Result<()>;

    /// `openChannel`.
    fn open_channel(&self, request: OpenChannelRequest) -> EventStream<OpenStatusUpdate>;

    /// `closeChannel`.
    fn close_channel(&self, request: CloseChannelRequest) -> EventStream<CloseStatusUpdate>;
}
