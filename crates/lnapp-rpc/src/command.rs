//! RPC command names.

/// Node RPC commands used by the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// List open channels.
    ListChannels,
    /// List connected peers.
    ListPeers,
    /// List channels that are opening or closing.
    PendingChannels,
    /// Connect to a peer.
    ConnectPeer,
    /// Open a channel (server streaming).
    OpenChannel,
    /// Close a channel (server streaming).
    CloseChannel,
}

impl Command {
    /// Command name as known by the node.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListChannels => "listChannels",
            Self::ListPeers => "listPeers",
            Self::PendingChannels => "pendingChannels",
            Self::ConnectPeer => "connectPeer",
            Self::OpenChannel => "openChannel",
            Self::CloseChannel => "closeChannel",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
