use std::io;

use async_tungstenite::tungstenite;
use thiserror::Error;

use crate::codec::ProtocolError;

pub type Result<T, E = CdpError> = std::result::Result<T, E>;

/// Error taxonomy for the driver, §7 of the design.
#[derive(Debug, Error)]
pub enum CdpError {
    /// The Dispatcher's channel into the browser is gone; every in-flight
    /// `Execute` fails with this and the `Target` becomes unusable.
    #[error("transport closed")]
    TransportClosed,
    /// The envelope's `error` field was non-null.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
    /// The caller's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,
    /// `Execute` was called without a valid `Target` handle.
    #[error("invalid target")]
    InvalidTarget,
    /// A readiness predicate classified its state as terminal.
    #[error("{0}")]
    Selector(#[from] SelectorError),
    #[error("{0}")]
    Ws(#[from] tungstenite::Error),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("received no response from the chromium instance")]
    NoResponse,
    #[error("a background task hung up")]
    ChannelClosed,
    #[error("deadline exceeded waiting for {0} after {1:?}")]
    Timeout(&'static str, std::time::Duration),
    #[error("unsupported protocol version: {0}")]
    UnsupportedProtocolVersion(String),
    /// `Runtime.evaluate`/`Runtime.callFunctionOn` returned
    /// `exceptionDetails` — the expression ran but threw.
    #[error("javascript evaluation failed: {0}")]
    EvaluationFailed(String),
    /// Endpoint-url parsing or browser-executable discovery failed.
    #[error("{0}")]
    Launch(String),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for CdpError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        CdpError::ChannelClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for CdpError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        CdpError::ChannelClosed
    }
}

/// A readiness predicate's own terminal error (never retried).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("node is not visible")]
    NotVisible,
    #[error("node is still visible")]
    StillVisible,
    #[error("node is disabled")]
    Disabled,
    #[error("node is not selected")]
    NotSelected,
    #[error("expected no results but the resolver returned some")]
    HasResults,
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}
