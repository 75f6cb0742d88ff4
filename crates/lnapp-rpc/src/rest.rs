//! LND REST transport.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use lnapp_core::{Config, Error, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::schema::{
    self, CloseChannelRequest, CloseStatusUpdate, ConnectPeerRequest, ListChannelsResponse,
    ListPeersResponse, OpenChannelRequest, OpenStatusUpdate, PendingChannelsResponse,
};
use crate::{Command, EventStream, NodeClient, StreamEvent};

/// Header carrying the hex encoded macaroon.
pub const MACAROON_HEADER: &str = "Grpc-Metadata-macaroon";

/// Client for LND's REST gateway.
#[derive(Debug, Clone)]
pub struct LndRestClient {
    http: reqwest::Client,
    base_url: String,
    macaroon: Option<String>,
}

impl LndRestClient {
    /// Connect timeout for new connections.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - REST endpoint, e.g. `https://localhost:8080`
    /// * `macaroon_hex` - Hex encoded macaroon sent with every call
    /// * `tls_cert_pem` - Node certificate to trust (PEM)
    pub fn new(
        base_url: impl Into<String>,
        macaroon_hex: Option<String>,
        tls_cert_pem: Option<&[u8]>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(Self::CONNECT_TIMEOUT);

        if let Some(pem) = tls_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| Error::Config(format!("invalid tls certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("could not build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            macaroon: macaroon_hex,
        })
    }

    /// Create a client from the configured endpoint, macaroon and certificate.
    pub fn from_config(config: &Config) -> Result<Self> {
        let macaroon = config
            .macaroon_path
            .as_ref()
            .map(std::fs::read)
            .transpose()?
            .map(hex::encode);

        let cert = config
            .tls_cert_path
            .as_ref()
            .map(std::fs::read)
            .transpose()?;

        Self::new(config.rest_url.clone(), macaroon, cert.as_deref())
    }

    /// Build a request against the gateway.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.macaroon {
            Some(macaroon) => request.header(MACAROON_HEADER, macaroon),
            None => request,
        }
    }

    /// Build the gateway request of `call`.
    fn call_request(&self, call: &Call<'_>) -> RequestBuilder {
        match call {
            Call::ListChannels => self.request(Method::GET, "/v1/channels"),
            Call::ListPeers => self.request(Method::GET, "/v1/peers"),
            Call::PendingChannels => self.request(Method::GET, "/v1/channels/pending"),
            Call::ConnectPeer(request) => self.request(Method::POST, "/v1/peers").json(request),
            Call::OpenChannel(request) => self
                .request(Method::POST, "/v1/channels/stream")
                .json(request),
            Call::CloseChannel(request) => {
                let point = &request.channel_point;
                let path = format!(
                    "/v1/channels/{}/{}",
                    point.funding_txid_str, point.output_index
                );
                self.request(Method::DELETE, &path)
                    .query(&[("force", request.force)])
            }
        }
    }

    /// Issue a unary call and decode its response.
    async fn unary<T: DeserializeOwned>(&self, call: Call<'_>) -> Result<T> {
        let command = call.command();
        tracing::debug!("Sending {command}");
        let response = send(command, self.call_request(&call)).await?;
        let body = response.bytes().await.map_err(|e| rpc_error(command, e))?;
        schema::decode(command, &body)
    }

    /// Issue a streaming call. Nothing is sent until the stream is polled.
    fn streaming<T>(&self, call: Call<'_>) -> EventStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let command = call.command();
        let request = self.call_request(&call);
        stream::once(async move {
            tracing::debug!("Opening {command} stream");
            send(command, request).await
        })
        .flat_map(move |result| match result {
            Ok(response) => ndjson_events(
                command,
                response.bytes_stream().map(|chunk| chunk.map(|bytes| bytes.to_vec())),
            ),
            Err(e) => stream::iter([StreamEvent::Error(e)]).boxed(),
        })
        .boxed()
    }
}

/// A gateway call with its request body.
enum Call<'a> {
    ListChannels,
    ListPeers,
    PendingChannels,
    ConnectPeer(&'a ConnectPeerRequest),
    OpenChannel(&'a OpenChannelRequest),
    CloseChannel(&'a CloseChannelRequest),
}

impl Call<'_> {
    const fn command(&self) -> Command {
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

#[async_trait]
impl NodeClient for LndRestClient {
    async fn list_channels(&self) -> Result<ListChannelsResponse> {
        self.unary(Call::ListChannels).await
    }

    async fn list_peers(&self) -> Result<ListPeersResponse> {
        self.unary(Call::ListPeers).await
    }

    async fn pending_channels(&self) -> Result<PendingChannelsResponse> {
        self.unary(Call::PendingChannels).await
    }

    async fn connect_peer(&self, request: ConnectPeerRequest) -> Result<()> {
        let _: serde_json::Value = self.unary(Call::ConnectPeer(&request)).await?;
        Ok(())
    }

    fn open_channel(&self, request: OpenChannelRequest) -> EventStream<OpenStatusUpdate> {
        self.streaming(Call::OpenChannel(&request))
    }

    fn close_channel(&self, request: CloseChannelRequest) -> EventStream<CloseStatusUpdate> {
        self.streaming(Call::CloseChannel(&request))
    }
}

/// Error body of the gateway, both for failed calls and stream events.
#[derive(Debug, Default, Deserialize)]
struct GatewayError {
    #[serde(default)]
    message: String,
}

/// One line of a streaming response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<GatewayError>,
}

fn rpc_error(command: Command, error: impl Display) -> Error {
    Error::Rpc {
        command: command.name(),
        message: error.to_string(),
    }
}

/// Send a request and turn non-success statuses into [`Error::Rpc`].
async fn send(command: Command, request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(|e| rpc_error(command, e))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(rpc_error(command, failure_message(status, &body)))
}

/// Message of a failed call: the gateway's `message` if the body carries
/// one, else the status and raw body.
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<GatewayError>(body)
        .ok()
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("{status}: {body}"))
}

struct NdjsonState<E> {
    body: futures::stream::BoxStream<'static, std::result::Result<Vec<u8>, E>>,
    buf: Vec<u8>,
    eof: bool,
    done: bool,
}

/// Split a newline-delimited JSON body into stream events.
///
/// The body ending is reported as [`StreamEvent::End`]; an error line or a
/// transport failure ends the stream with [`StreamEvent::Error`].
pub fn ndjson_events<T, S, E>(command: Command, body: S) -> EventStream<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = std::result::Result<Vec<u8>, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = NdjsonState {
        body: body.boxed(),
        buf: Vec::new(),
        eof: false,
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            if let Some(pos) = state.buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = state.buf.drain(..=pos).collect();
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                let event = parse_line(command, &line);
                state.done = event.is_terminal();
                return Some((event, state));
            }

            if state.eof {
                state.done = true;
                return Some((StreamEvent::End, state));
            }

            match state.body.next().await {
                Some(Ok(chunk)) => state.buf.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    state.done = true;
                    return Some((StreamEvent::Error(rpc_error(command, e)), state));
                }
                None => {
                    state.eof = true;
                    if !state.buf.is_empty() {
                        state.buf.push(b'\n');
                    }
                }
            }
        }
    })
    .boxed()
}

fn parse_line<T: DeserializeOwned>(command: Command, line: &[u8]) -> StreamEvent<T> {
    match schema::decode::<Envelope<T>>(command, line) {
        Ok(Envelope {
            error: Some(error), ..
        }) => StreamEvent::Error(Error::Stream {
            command: command.name(),
            message: error.message,
        }),
        Ok(Envelope {
            result: Some(result),
            ..
        }) => StreamEvent::Data(result),
        Ok(_) => StreamEvent::Error(Error::Decode {
            command: command.name(),
            message: "event carries neither result nor error".to_string(),
        }),
        Err(e) => StreamEvent::Error(e),
    }
}
