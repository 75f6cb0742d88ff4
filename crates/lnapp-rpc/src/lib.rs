//! Lightning node RPC for lnapp.
//!
//! This crate defines the [`NodeClient`] seam the wallet talks to, the wire
//! schema of every command it uses, the tagged event sequence streaming
//! calls produce, and a transport for LND's REST gateway.

mod client;
mod command;
pub mod rest;
pub mod schema;
mod stream;

pub use client::NodeClient;
pub use command::Command;
pub use rest::LndRestClient;
pub use stream::{EventStream, StreamEvent};
