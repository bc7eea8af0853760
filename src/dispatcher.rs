//! §4.3 Dispatcher — reads frames off the Transport, classifies each as
//! response or event, and routes them to in-flight request slots or to
//! event subscribers. Serializes all writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fnv::FnvHashMap;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::codec::{CallId, Command, EventMessage, Message, MethodCall, Response};
use crate::config::DriverConfig;
use crate::error::{CdpError, Result};
use crate::ids::SessionId;
use crate::state::Target;
use crate::transport::{Transport, TransportReader, TransportWriter};

/// CDP event name used as the "target detached" shutdown trigger (§4.3:
/// Dispatcher stops "on receiving a special 'target detached' event").
const DETACHED_EVENT: &str = "Inspector.detached";

type PendingMap = Arc<Mutex<FnvHashMap<CallId, oneshot::Sender<Result<Response>>>>>;

struct Subscriber {
    methods: Vec<String>,
    tx: mpsc::Sender<EventMessage>,
}

type SubscriberMap = Arc<Mutex<HashMap<u64, Subscriber>>>;

/// Handle shared by everything that needs to submit commands or
/// subscribe to events. Cloning is cheap; all state behind it is `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    commands_tx: mpsc::Sender<OutgoingCommand>,
    pending: PendingMap,
    subscribers: SubscriberMap,
    next_call_id: Arc<AtomicU64>,
    next_sub_id: Arc<AtomicU64>,
    pub target: Arc<Target>,
    pub config: Arc<DriverConfig>,
    pub shutdown: CancellationToken,
}

struct OutgoingCommand {
    call: MethodCall,
}

impl Dispatcher {
    /// Spawns the reader task plus the events/responses/commands worker
    /// tasks (§4.3) and returns a handle. The initial domain-enabling
    /// and frame-tree seeding happen separately in `browser::attach`
    /// once the dispatcher is live.
    pub fn spawn<T: Transport>(transport: T, config: DriverConfig, target: Arc<Target>) -> Self {
        let (reader, writer) = transport.split();
        let config = Arc::new(config);

        let (events_tx, events_rx) = mpsc::channel::<EventMessage>(config.events_queue_capacity);
        let (responses_tx, responses_rx) = mpsc::channel::<Response>(config.responses_queue_capacity);
        let (commands_tx, commands_rx) =
            mpsc::channel::<OutgoingCommand>(config.commands_queue_capacity);

        let pending: PendingMap = Arc::new(Mutex::new(FnvHashMap::default()));
        let subscribers: SubscriberMap = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = CancellationToken::new();

        // Built before any task is spawned so `events_worker` can hold a
        // full handle (it needs `execute` to re-fetch the document on
        // `documentUpdated`), not just the bare channel ends.
        let handle = Self {
            commands_tx,
            pending: Arc::clone(&pending),
            subscribers: Arc::clone(&subscribers),
            next_call_id: Arc::new(AtomicU64::new(0)),
            next_sub_id: Arc::new(AtomicU64::new(0)),
            target,
            config,
            shutdown: shutdown.clone(),
        };

        tokio::spawn(reader_task(reader, events_tx, responses_tx, shutdown.clone()));
        tokio::spawn(commands_worker(writer, commands_rx, shutdown.clone()));
        tokio::spawn(responses_worker(responses_rx, pending));
        tokio::spawn(events_worker(events_rx, subscribers, handle.clone(), shutdown));

        handle
    }

    fn next_call_id(&self) -> CallId {
        CallId::new(self.next_call_id.fetch_add(1, Ordering::Relaxed))
    }

    /// §4.5 Execute step 1-3: reserves an id, inserts the pending slot
    /// *before* the command is queued, then enqueues it.
    pub async fn submit(
        &self,
        method: std::borrow::Cow<'static, str>,
        session_id: Option<SessionId>,
        params: serde_json::Value,
    ) -> Result<(CallId, oneshot::Receiver<Result<Response>>)> {
        let id = self.next_call_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let call = MethodCall {
            id,
            session_id: session_id.map(|s| s.0),
            method,
            params,
        };
        if self.commands_tx.send(OutgoingCommand { call }).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(CdpError::TransportClosed);
        }
        Ok((id, rx))
    }

    /// Submits `cmd`, awaits its response, and decodes it into
    /// `C::Response`. Used both by the public Executor (§4.5) and by the
    /// State Replica's internal re-fetches (e.g. `DOM.getDocument` after
    /// `documentUpdated`), which issue commands without a caller-supplied
    /// cancellation context.
    pub async fn execute<C: Command>(
        &self,
        session_id: Option<SessionId>,
        cmd: C,
    ) -> Result<C::Response> {
        let method = cmd.identifier();
        let params = serde_json::to_value(&cmd)?;
        let (_, rx) = self.submit(method, session_id, params).await?;
        let resp = rx.await??;
        let decoded = crate::codec::decode_response::<C>(resp)?;
        Ok(decoded.result)
    }

    /// Removes a pending slot without waiting on it; used when the
    /// caller's cancellation fires first (§4.5 step 5, §5 Cancellation).
    pub async fn discard(&self, id: CallId) {
        self.pending.lock().await.remove(&id);
    }

    /// §4.5 Listen: returns a bounded FIFO of events matching `methods`.
    pub async fn listen(&self, methods: Vec<String>) -> Subscription {
        let id = self.next_sub_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.config.listen_capacity);
        self.subscribers.lock().await.insert(id, Subscriber { methods, tx });
        Subscription {
            id,
            rx,
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

/// A live event subscription. Dropping it (or calling `release`)
/// unsubscribes idempotently (§4.5 `Release`).
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<EventMessage>,
    subscribers: SubscriberMap,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<EventMessage> {
        self.rx.recv().await
    }

    pub async fn release(mut self) {
        self.subscribers.lock().await.remove(&self.id);
        self.rx.close();
    }
}

async fn reader_task<R: TransportReader>(
    mut reader: R,
    events_tx: mpsc::Sender<EventMessage>,
    responses_tx: mpsc::Sender<Response>,
    shutdown: CancellationToken,
) {
    loop {
        let bytes = match reader.read().await {
            Ok(b) => b,
            Err(err) => {
                debug!(%err, "transport closed, stopping reader");
                shutdown.cancel();
                return;
            }
        };
        match Message::decode(&bytes) {
            Ok(Message::Response(resp)) => {
                if responses_tx.send(resp).await.is_err() {
                    return;
                }
            }
            Ok(Message::Event(event)) => {
                if event.method == DETACHED_EVENT {
                    debug!("target detached event observed, stopping dispatcher");
                    shutdown.cancel();
                    return;
                }
                // §4.3: a full events queue is a fatal invariant
                // violation. A blocking send here could deadlock the
                // single reader against event handlers awaiting
                // responses, so this must be non-blocking.
                if let Err(err) = events_tx.try_send(event) {
                    error!(%err, "events queue full, aborting dispatcher");
                    shutdown.cancel();
                    return;
                }
            }
            Err(err) => {
                // Unknown/malformed envelope: logged at debug, ignored
                // (§7 Unknown-event / unknown-field).
                trace!(%err, "failed to decode frame, ignoring");
            }
        }
    }
}

async fn commands_worker<W: TransportWriter>(
    mut writer: W,
    mut commands_rx: mpsc::Receiver<OutgoingCommand>,
    shutdown: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = shutdown.cancelled() => break,
            cmd = commands_rx.recv() => cmd,
        };
        let OutgoingCommand { call } = match cmd {
            Some(c) => c,
            None => break,
        };
        let bytes = match serde_json::to_vec(&call) {
            Ok(b) => b,
            Err(err) => {
                warn!(%err, "failed to serialize outgoing command");
                continue;
            }
        };
        if let Err(err) = writer.write(bytes).await {
            debug!(%err, "transport write failed, stopping commands worker");
            break;
        }
    }
    let _ = writer.close().await;
}

async fn responses_worker(mut responses_rx: mpsc::Receiver<Response>, pending: PendingMap) {
    while let Some(resp) = responses_rx.recv().await {
        let slot = pending.lock().await.remove(&resp.id);
        if let Some(tx) = slot {
            let _ = tx.send(Ok(resp));
        }
    }
}

async fn events_worker(
    mut events_rx: mpsc::Receiver<EventMessage>,
    subscribers: SubscriberMap,
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => None,
            event = events_rx.recv() => event,
        };
        let event = match event {
            Some(e) => e,
            None => break,
        };

        {
            let subs = subscribers.lock().await;
            for sub in subs.values() {
                if sub.methods.iter().any(|m| m == event.method.as_ref()) {
                    if sub.tx.try_send(event.clone()).is_err() {
                        trace!(method = %event.method, "subscriber buffer full, dropping event");
                    }
                }
            }
        }

        if let Err(err) = crate::replica::apply_event(&dispatcher, &event).await {
            debug!(method = %event.method, %err, "failed to apply event to state replica");
        }
    }

    // Dispatcher shutdown: fail every pending slot. Subscriber streams
    // are closed by dropping the subscriber map's senders here, not by
    // individual `Execute` cancellation (§5 Cancellation).
    dispatcher.target.close().await;
    subscribers.lock().await.clear();
    let mut pending = dispatcher.pending.lock().await;
    for (_, tx) in pending.drain() {
        let _ = tx.send(Err(CdpError::TransportClosed));
    }
}
