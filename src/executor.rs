//! §4.5 Executor — the public `Execute`/`Listen`/`Release` surface every
//! action in the engine is built on, wrapping a `Dispatcher` handle with
//! per-call cancellation.

use tokio_util::sync::CancellationToken;

use crate::codec::Command;
use crate::dispatcher::{Dispatcher, Subscription};
use crate::error::{CdpError, Result};
use crate::ids::SessionId;

/// Thin handle over a `Dispatcher`, carrying the session a command should
/// be scoped to (the flattened per-target CDP session, once attached).
#[derive(Clone)]
pub struct Executor {
    dispatcher: Dispatcher,
    session_id: Option<SessionId>,
}

impl Executor {
    pub fn new(dispatcher: Dispatcher, session_id: Option<SessionId>) -> Self {
        Self { dispatcher, session_id }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// §4.5 `Execute`: nil params serialize as `{}`, never `null` (serde
    /// already does this for unit-like param structs); a response with
    /// `error` surfaces as `CdpError::Protocol`; cancellation discards the
    /// pending slot without blocking the responses worker.
    pub async fn execute<C: Command>(&self, ctx: &CancellationToken, cmd: C) -> Result<C::Response> {
        let method = cmd.identifier();
        let params = serde_json::to_value(&cmd)?;
        let (id, rx) = self
            .dispatcher
            .submit(method, self.session_id.clone(), params)
            .await?;

        tokio::select! {
            _ = ctx.cancelled() => {
                self.dispatcher.discard(id).await;
                Err(CdpError::Cancelled)
            }
            resp = rx => {
                let resp = resp??;
                let decoded = crate::codec::decode_response::<C>(resp)?;
                Ok(decoded.result)
            }
        }
    }

    /// §4.5 `Listen`: a bounded FIFO of events whose method matches one of
    /// `methods`.
    pub async fn listen(&self, methods: Vec<String>) -> Subscription {
        self.dispatcher.listen(methods).await
    }

    /// §4.5 `Release`: closes the stream and unsubscribes idempotently.
    pub async fn release(&self, subscription: Subscription) {
        subscription.release().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdp::dom;
    use crate::config::DriverConfig;
    use crate::state::Target;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn execute_round_trips_empty_result() {
        let (transport, inbound_tx, mut outbound_rx) = MockTransport::pair();
        let target = std::sync::Arc::new(Target::new(crate::ids::TargetId("t1".into())));
        let dispatcher = Dispatcher::spawn(transport, DriverConfig::default(), target);
        let executor = Executor::new(dispatcher, None);

        let responder = tokio::spawn(async move {
            let bytes = outbound_rx.recv().await.unwrap();
            let sent: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            let id = sent["id"].clone();
            let reply = serde_json::json!({ "id": id, "result": {} }).to_string();
            inbound_tx.send(reply.into_bytes()).unwrap();
        });

        let ctx = CancellationToken::new();
        let result = executor.execute(&ctx, dom::EnableParams {}).await;
        assert!(result.is_ok());
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn execute_returns_cancelled_before_response() {
        let (transport, _to_peer, _from_peer) = MockTransport::pair();
        let target = std::sync::Arc::new(Target::new(crate::ids::TargetId("t1".into())));
        let dispatcher = Dispatcher::spawn(transport, DriverConfig::default(), target);
        let executor = Executor::new(dispatcher, None);

        let ctx = CancellationToken::new();
        ctx.cancel();
        let result = executor.execute(&ctx, dom::EnableParams {}).await;
        assert!(matches!(result, Err(CdpError::Cancelled)));
    }
}
