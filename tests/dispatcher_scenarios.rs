//! End-to-end scenarios against a `Dispatcher` driven by `MockTransport`,
//! covering the cancellation and subscriber-backpressure behaviors named
//! alongside the selector engine's worked examples.

use std::sync::Arc;
use std::time::Duration;

use helmsman::action::Query;
use helmsman::config::DriverConfig;
use helmsman::dispatcher::Dispatcher;
use helmsman::executor::Executor;
use helmsman::ids::TargetId;
use helmsman::state::Target;
use helmsman::transport::MockTransport;

use serde_json::json;
use tokio_util::sync::CancellationToken;

fn spawn() -> (Dispatcher, tokio::sync::mpsc::UnboundedSender<Vec<u8>>, tokio::sync::mpsc::UnboundedReceiver<Vec<u8>>) {
    let (transport, inbound_tx, outbound_rx) = MockTransport::pair();
    let target = Arc::new(Target::new(TargetId("t".to_string())));
    let dispatcher = Dispatcher::spawn(transport, DriverConfig::default(), target);
    (dispatcher, inbound_tx, outbound_rx)
}

/// §4.5 step 5 / §5 Cancellation: a command whose response never arrives
/// is unblocked by the caller's context, not left to hang forever.
#[tokio::test]
async fn execute_returns_cancelled_before_response_arrives() {
    let (dispatcher, _inbound_tx, mut outbound_rx) = spawn();
    let executor = Executor::new(dispatcher, None);
    let ctx = CancellationToken::new();

    let cancel_ctx = ctx.clone();
    let call = tokio::spawn(async move {
        executor.execute(&cancel_ctx, helmsman::cdp::page::EnableParams {}).await
    });

    // The command did go out; nothing ever answers it.
    let _sent = outbound_rx.recv().await.expect("command serialized to transport");
    ctx.cancel();

    let result = call.await.unwrap();
    assert!(matches!(result, Err(helmsman::CdpError::Cancelled)));
}

/// §4.5 Listen: a subscriber's buffer is bounded at `listen_capacity`
/// (default 16); events beyond that are dropped for that subscriber only,
/// without affecting delivery to other subscribers or the Replica.
#[tokio::test]
async fn subscriber_capacity_drops_overflow_events_only_for_that_subscriber() {
    let (dispatcher, inbound_tx, _outbound_rx) = spawn();
    assert_eq!(dispatcher.config.listen_capacity, 16);

    let mut subscription = dispatcher.listen(vec!["Network.requestWillBeSent".to_string()]).await;

    // Push 20 matching events before the subscriber ever reads one, so
    // the channel fills and the events worker must drop the rest rather
    // than block (a blocking send here would deadlock the single reader
    // task against a subscriber that never catches up).
    for i in 0..20 {
        let frame = json!({
            "method": "Network.requestWillBeSent",
            "params": {"requestId": i},
        });
        inbound_tx.send(serde_json::to_vec(&frame).unwrap()).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut received = 0;
    while let Ok(Some(_event)) = tokio::time::timeout(Duration::from_millis(50), subscription.recv()).await {
        received += 1;
    }
    assert!(received <= 16, "subscriber received {received} events, expected at most capacity (16)");
}

/// §4.6 step 1-2: a `Query` against a target with no top frame yet simply
/// retries at the poll quantum until the context is cancelled, rather
/// than erroring immediately.
#[tokio::test]
async fn query_retries_when_no_top_frame_then_honors_cancellation() {
    let (dispatcher, _inbound_tx, _outbound_rx) = spawn();
    let executor = Executor::new(dispatcher, None);
    let ctx = CancellationToken::new();

    let query = Query::new(helmsman::action::Selector::Id("missing".to_string()));
    let run_ctx = ctx.clone();
    let handle = tokio::spawn(async move { query.run(&executor, &run_ctx).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished(), "query should still be retrying with no frame present");

    ctx.cancel();
    let result = handle.await.unwrap();
    assert!(matches!(result, Err(helmsman::CdpError::Cancelled)));
}
