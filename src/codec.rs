//! The wire envelope and the traits generated CDP command/event types
//! implement against it. See §3 (Message envelope) and §4.2 (Codec).

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identifier for an in-flight request. Unique per `Dispatcher`, monotonic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub(crate) u64);

impl CallId {
    pub fn new(id: u64) -> Self {
        CallId(id)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}

/// A type that can be serialized and uniquely identified by a dotted
/// `Domain.operation` method name.
pub trait Method {
    fn identifier(&self) -> Cow<'static, str>;
}

/// A CDP command: carries its own method name and declares the type its
/// result deserializes into.
pub trait Command: Serialize + Method {
    type Response: DeserializeOwned + fmt::Debug;
}

/// A CDP event payload, keyed by method name.
pub trait Event: Method + DeserializeOwned {}

/// The outgoing wire message: `{ id, sessionId?, method, params }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MethodCall {
    pub id: CallId,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub method: Cow<'static, str>,
    pub params: serde_json::Value,
}

/// `{code, message}` as carried by a response's `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("protocol error {code}: {message}")]
pub struct ProtocolError {
    pub code: i64,
    pub message: String,
}

/// A response to a `MethodCall`, correlated by `id`.
///
/// Invariant: exactly one of `result`/`error` is populated once the
/// envelope decodes successfully (enforced by the untagged `Message`
/// decode below, which requires `id` and excludes `method`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Response {
    pub id: CallId,
    pub result: Option<serde_json::Value>,
    pub error: Option<ProtocolError>,
}

/// An inbound event envelope: `{ method, params, sessionId? }`, no `id`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventMessage {
    pub method: Cow<'static, str>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub params: serde_json::Value,
}

impl Method for EventMessage {
    fn identifier(&self) -> Cow<'static, str> {
        self.method.clone()
    }
}

/// Top-level decode target for any inbound frame. The envelope's own
/// `id`/`method` exclusivity classifies it as a response or an event
/// (§4.3: "classifies each as response ... or event").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Response(Response),
    Event(EventMessage),
}

impl Message {
    /// Decode is strict on envelope shape, lenient on unknown fields
    /// within `params`/`result` (those are demand-decoded later by
    /// whoever owns the expected type).
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Deserializes a `Response` into a concrete `CommandResponse`, surfacing
/// protocol errors as `ProtocolError`.
pub fn decode_response<T: Command>(
    resp: Response,
) -> Result<CommandResponse<T::Response>, crate::error::CdpError> {
    if let Some(result) = resp.result {
        let result = serde_json::from_value(result)?;
        Ok(CommandResponse { id: resp.id, result })
    } else if let Some(err) = resp.error {
        Err(err.into())
    } else {
        Err(crate::error::CdpError::NoResponse)
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse<T> {
    pub id: CallId,
    pub result: T,
}

impl<T> std::ops::Deref for CommandResponse<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_response_without_method() {
        let raw = br#"{"id":1,"result":{}}"#;
        match Message::decode(raw).unwrap() {
            Message::Response(r) => {
                assert_eq!(r.id, CallId::new(1));
                assert!(r.error.is_none());
            }
            Message::Event(_) => panic!("expected response"),
        }
    }

    #[test]
    fn decodes_event_without_id() {
        let raw = br#"{"method":"Page.loadEventFired","params":{"timestamp":1.0}}"#;
        match Message::decode(raw).unwrap() {
            Message::Event(e) => assert_eq!(e.method, "Page.loadEventFired"),
            Message::Response(_) => panic!("expected event"),
        }
    }

    #[test]
    fn decodes_error_response() {
        let raw = br#"{"id":7,"error":{"code":-32000,"message":"boom"}}"#;
        match Message::decode(raw).unwrap() {
            Message::Response(r) => {
                assert_eq!(r.error.unwrap().message, "boom");
            }
            Message::Event(_) => panic!("expected response"),
        }
    }
}
