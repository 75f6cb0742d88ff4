//! Server-streaming call events.

use futures::stream::BoxStream;
use lnapp_core::Error;

/// One event of a server-streaming call.
///
/// A well-behaved stream yields any number of `Data` and `Status` events
/// followed by exactly one terminal event, `End` or `Error`. Consumers treat
/// a stream that finishes without a terminal event as `End`.
#[derive(Debug)]
pub enum StreamEvent<T> {
    /// A progress message from the node.
    Data(T),
    /// Transport status information.
    Status(String),
    /// The call completed.
    End,
    /// The call failed.
    Error(Error),
}

impl<T> StreamEvent<T> {
    /// Whether no further events follow this one.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::End | Self::Error(_))
    }
}

/// Ordered, finite sequence of events of one streaming call.
pub type EventStream<T> = BoxStream<'static, StreamEvent<T>>;
