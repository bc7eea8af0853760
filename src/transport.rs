//! §4.1 Transport — a bidirectional framed message channel to the
//! browser, split into independent read/write halves so the Dispatcher's
//! reader task and commands worker can each own one side concurrently
//! (§5 "Shared resources": the inbound read side belongs to the reader
//! task, the outbound write side to the commands worker, and no other
//! task may touch either half directly).

use async_tungstenite::tokio::ConnectStream;
use async_tungstenite::tungstenite::Message as WsMessage;
use async_tungstenite::WebSocketStream;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::error::{CdpError, Result};

#[async_trait::async_trait]
pub trait TransportReader: Send {
    /// Blocks until a complete frame arrives or the connection closes.
    async fn read(&mut self) -> Result<Vec<u8>>;
}

#[async_trait::async_trait]
pub trait TransportWriter: Send {
    async fn write(&mut self, bytes: Vec<u8>) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// A bidirectional framed byte-message channel to the browser. One frame
/// == one JSON object (§4.1).
pub trait Transport: Send {
    type Reader: TransportReader + 'static;
    type Writer: TransportWriter + 'static;

    fn split(self) -> (Self::Reader, Self::Writer);
}

/// WebSocket-backed transport to a live browser instance.
pub struct WsTransport {
    ws: WebSocketStream<ConnectStream>,
}

impl WsTransport {
    pub async fn connect(debug_ws_url: impl AsRef<str>) -> Result<Self> {
        let (ws, _resp) = async_tungstenite::tokio::connect_async(debug_ws_url.as_ref())
            .await
            .map_err(CdpError::Ws)?;
        Ok(Self { ws })
    }
}

impl Transport for WsTransport {
    type Reader = WsReader;
    type Writer = WsWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        let (sink, stream) = self.ws.split();
        (WsReader { stream }, WsWriter { sink })
    }
}

pub struct WsReader {
    stream: SplitStream<WebSocketStream<ConnectStream>>,
}

#[async_trait::async_trait]
impl TransportReader for WsReader {
    async fn read(&mut self) -> Result<Vec<u8>> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(s))) => return Ok(s.into_bytes()),
                Some(Ok(WsMessage::Binary(b))) => return Ok(b),
                Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => continue,
                Some(Ok(WsMessage::Close(_))) | None => return Err(CdpError::TransportClosed),
                Some(Ok(WsMessage::Frame(_))) => continue,
                Some(Err(err)) => return Err(CdpError::Ws(err)),
            }
        }
    }
}

pub struct WsWriter {
    sink: SplitSink<WebSocketStream<ConnectStream>, WsMessage>,
}

#[async_trait::async_trait]
impl TransportWriter for WsWriter {
    async fn write(&mut self, bytes: Vec<u8>) -> Result<()> {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.sink.send(WsMessage::Text(text)).await.map_err(CdpError::Ws)
    }

    async fn close(&mut self) -> Result<()> {
        self.sink.close().await.map_err(CdpError::Ws)
    }
}

/// An in-memory transport for tests: frames written by the driver go out
/// on `to_peer`, frames meant to arrive from the "browser" are pushed in
/// on `from_peer`. Dropping the `from_peer` sender unblocks `read` with
/// `TransportClosed`, mirroring a real socket EOF.
pub struct MockTransport {
    reader: MockReader,
    writer: MockWriter,
}

pub struct MockReader {
    from_peer: mpsc::UnboundedReceiver<Vec<u8>>,
}

pub struct MockWriter {
    to_peer: mpsc::UnboundedSender<Vec<u8>>,
}

impl MockTransport {
    /// Returns the driver-facing transport plus the test harness's other
    /// end: a sender to push inbound frames and a receiver to observe
    /// outbound frames.
    pub fn pair() -> (Self, mpsc::UnboundedSender<Vec<u8>>, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Self {
                reader: MockReader { from_peer: in_rx },
                writer: MockWriter { to_peer: out_tx },
            },
            in_tx,
            out_rx,
        )
    }
}

impl Transport for MockTransport {
    type Reader = MockReader;
    type Writer = MockWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        (self.reader, self.writer)
    }
}

#[async_trait::async_trait]
impl TransportReader for MockReader {
    async fn read(&mut self) -> Result<Vec<u8>> {
        self.from_peer.recv().await.ok_or(CdpError::TransportClosed)
    }
}

#[async_trait::async_trait]
impl TransportWriter for MockWriter {
    async fn write(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.to_peer.send(bytes).map_err(|_| CdpError::TransportClosed)
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
