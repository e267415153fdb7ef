//! # Subscription Bridge
//!
//! Turns a server-push stream into a cancellable publish/subscribe handle
//! with typed domain payloads.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──open()──► Open ◄──► Delivering
//!   │                │
//!   └────────────────┴──► Closed(Cancelled | RemoteClosed |
//!                                StreamFailed | ConnectionClosed)
//! ```
//!
//! `Closed` is terminal. A closed subscription never reopens and never
//! invokes a consumer again.
//!
//! ## Delivery
//!
//! One task per subscription reads the push stream. Each push is mapped and
//! handed to every consumer, in registration order, before the next push is
//! read. Pushes that do not map are logged and skipped.

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch, Notify};
use tokio_stream::Stream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bchd_telemetry::{
    SUBSCRIPTIONS_ACTIVE, SUBSCRIPTION_CLOSURES, SUBSCRIPTION_EVENTS, SUBSCRIPTION_SKIPPED,
};

use super::connection::Connection;
use super::requests;
use crate::domain::{BlockEvent, ClientError, TransactionEvent};
use crate::ports::PushStream;
use crate::wire;

/// Why a subscription ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseReason {
    /// The caller cancelled or dropped the handle.
    Cancelled,
    /// The node ended the stream.
    RemoteClosed,
    /// The stream failed to open or broke with a transport error.
    StreamFailed(ClientError),
    /// The connection was closed.
    ConnectionClosed,
}

impl CloseReason {
    fn label(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::RemoteClosed => "remote_closed",
            Self::StreamFailed(_) => "stream_failed",
            Self::ConnectionClosed => "connection_closed",
        }
    }
}

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionState {
    /// Created, stream not requested yet.
    Idle,
    /// Stream open, waiting for the next push.
    Open,
    /// Handing a push to consumers.
    Delivering,
    /// Terminal.
    Closed(CloseReason),
}

impl SubscriptionState {
    /// Whether the state is terminal.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

/// A push payload the bridge knows how to request and map.
#[async_trait]
pub trait PushEvent: Clone + Send + Sync + Sized + 'static {
    /// Metric and log label of the subscription kind.
    const KIND: &'static str;

    /// Wire message pushed by the node.
    type Wire: Send + 'static;

    /// Request the push stream over `connection`.
    async fn open_stream(connection: &Connection) -> Result<PushStream<Self::Wire>, ClientError>;

    /// Map one push into the domain payload.
    fn map(message: Self::Wire) -> Result<Self, ClientError>;
}

#[async_trait]
impl PushEvent for BlockEvent {
    const KIND: &'static str = "blocks";
    type Wire = wire::BlockNotification;

    async fn open_stream(connection: &Connection) -> Result<PushStream<Self::Wire>, ClientError> {
        connection
            .call("SubscribeBlocks", |t| t.subscribe_blocks(requests::subscribe_blocks()))
            .await
    }

    fn map(message: Self::Wire) -> Result<Self, ClientError> {
        BlockEvent::try_from(message)
    }
}

#[async_trait]
impl PushEvent for TransactionEvent {
    const KIND: &'static str = "transactions";
    type Wire = wire::TransactionNotification;

    async fn open_stream(connection: &Connection) -> Result<PushStream<Self::Wire>, ClientError> {
        connection
            .call("SubscribeTransactions", |t| {
                t.subscribe_transactions(requests::subscribe_transactions())
            })
            .await
    }

    fn map(message: Self::Wire) -> Result<Self, ClientError> {
        TransactionEvent::try_from(message)
    }
}

/// Identifies a registered consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerId(u64);

enum Consumer<E> {
    Callback(Arc<dyn Fn(&E) + Send + Sync>),
    Channel(mpsc::UnboundedSender<E>),
}

impl<E> Consumer<E> {
    /// False once the receiving [`EventStream`] has been dropped.
    fn is_live(&self) -> bool {
        match self {
            Self::Callback(_) => true,
            Self::Channel(tx) => !tx.is_closed(),
        }
    }
}

impl<E> Clone for Consumer<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
            Self::Channel(tx) => Self::Channel(tx.clone()),
        }
    }
}

struct Shared<E> {
    id: Uuid,
    state: watch::Sender<SubscriptionState>,
    consumers: Mutex<Vec<(ConsumerId, Consumer<E>)>>,
    next_consumer: AtomicU64,
    cancel: Notify,
}

impl<E: PushEvent> Shared<E> {
    fn is_closed(&self) -> bool {
        self.state.borrow().is_closed()
    }

    fn register(&self, consumer: Consumer<E>) -> ConsumerId {
        let id = ConsumerId(self.next_consumer.fetch_add(1, Ordering::Relaxed));
        let mut consumers = self.consumers.lock();
        // Checked under the lock: close clears the registry after flipping state.
        if !self.is_closed() {
            consumers.retain(|(_, existing)| existing.is_live());
            consumers.push((id, consumer));
        }
        id
    }

    /// Move to `Closed(reason)` unless already closed.
    ///
    /// Returns true for the call that performed the transition.
    fn close(&self, reason: CloseReason) -> bool {
        let label = reason.label();
        let mut was_open = false;
        let closed = self.state.send_if_modified(|state| {
            if state.is_closed() {
                return false;
            }
            was_open = !matches!(state, SubscriptionState::Idle);
            *state = SubscriptionState::Closed(reason);
            true
        });

        if closed {
            self.consumers.lock().clear();
            if was_open {
                SUBSCRIPTIONS_ACTIVE.with_label_values(&[E::KIND]).dec();
            }
            SUBSCRIPTION_CLOSURES
                .with_label_values(&[E::KIND, label])
                .inc();
            info!(subscription = %self.id, kind = E::KIND, reason = label, "Subscription closed");
        }
        closed
    }

    fn deliver(&self, event: &E) {
        let started = self.state.send_if_modified(|state| {
            if *state == SubscriptionState::Open {
                *state = SubscriptionState::Delivering;
                true
            } else {
                false
            }
        });
        if !started {
            return;
        }

        let consumers: Vec<Consumer<E>> = self
            .consumers
            .lock()
            .iter()
            .map(|(_, consumer)| consumer.clone())
            .collect();

        let mut dropped = false;
        for consumer in consumers {
            // Re-checked per consumer so a callback that cancels stops the rest.
            if self.is_closed() {
                break;
            }
            match consumer {
                Consumer::Callback(f) => f(event),
                Consumer::Channel(tx) => dropped |= tx.send(event.clone()).is_err(),
            }
        }
        if dropped {
            self.consumers.lock().retain(|(_, consumer)| consumer.is_live());
        }

        SUBSCRIPTION_EVENTS.with_label_values(&[E::KIND]).inc();
        self.state.send_if_modified(|state| {
            if *state == SubscriptionState::Delivering {
                *state = SubscriptionState::Open;
                true
            } else {
                false
            }
        });
    }
}

async fn run<E: PushEvent>(
    shared: Arc<Shared<E>>,
    connection: Connection,
    mut stream: PushStream<E::Wire>,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shared.cancel.notified() => break,
            _ = connection.closed() => {
                shared.close(CloseReason::ConnectionClosed);
                break;
            }
            next = stream.next() => next,
        };

        match next {
            Some(Ok(message)) => match E::map(message) {
                Ok(event) => shared.deliver(&event),
                Err(e) => {
                    SUBSCRIPTION_SKIPPED.with_label_values(&[E::KIND]).inc();
                    warn!(subscription = %shared.id, kind = E::KIND, error = %e, "Skipping unmappable push");
                }
            },
            Some(Err(e)) => {
                warn!(subscription = %shared.id, kind = E::KIND, error = %e, "Push stream failed");
                shared.close(CloseReason::StreamFailed(e));
                break;
            }
            None => {
                shared.close(CloseReason::RemoteClosed);
                break;
            }
        }

        if shared.is_closed() {
            break;
        }
    }

    // Dropping the stream cancels the server-side call.
    drop(stream);
    debug!(subscription = %shared.id, kind = E::KIND, "Delivery task finished");
}

/// Handle to one push subscription.
///
/// Dropping the handle cancels the subscription.
pub struct Subscription<E: PushEvent> {
    connection: Connection,
    shared: Arc<Shared<E>>,
    opened: AtomicBool,
}

impl<E: PushEvent> Subscription<E> {
    /// Create an idle subscription on `connection`.
    pub fn new(connection: Connection) -> Self {
        let (state, _) = watch::channel(SubscriptionState::Idle);
        Self {
            connection,
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                state,
                consumers: Mutex::new(Vec::new()),
                next_consumer: AtomicU64::new(0),
                cancel: Notify::new(),
            }),
            opened: AtomicBool::new(false),
        }
    }

    /// Subscription identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Current state.
    pub fn state(&self) -> SubscriptionState {
        self.shared.state.borrow().clone()
    }

    /// Register a callback invoked with every event.
    ///
    /// Callbacks run on the delivery task and should not block.
    pub fn on_event<F>(&self, consumer: F) -> ConsumerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.shared.register(Consumer::Callback(Arc::new(consumer)))
    }

    /// Register a pull consumer. The stream ends when the subscription closes.
    pub fn events(&self) -> EventStream<E> {
        let (tx, receiver) = mpsc::unbounded_channel();
        self.shared.register(Consumer::Channel(tx));
        EventStream { receiver }
    }

    /// Remove a consumer. Returns false if it was not registered.
    pub fn remove_consumer(&self, id: ConsumerId) -> bool {
        let mut consumers = self.shared.consumers.lock();
        let before = consumers.len();
        consumers.retain(|(consumer_id, _)| *consumer_id != id);
        consumers.len() != before
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.shared.consumers.lock().len()
    }

    /// Request the push stream and start delivering.
    ///
    /// Returns once the request is issued, without waiting for the node's
    /// first push. Fails with [`ClientError::SubscriptionState`] unless idle.
    /// If the transport refuses the request the error is returned and the
    /// subscription closes with [`CloseReason::StreamFailed`]; a rejection the
    /// node sends later closes it the same way.
    pub async fn open(&self) -> Result<(), ClientError> {
        if self.opened.swap(true, Ordering::SeqCst) || self.shared.is_closed() {
            return Err(ClientError::SubscriptionState(format!(
                "cannot open a subscription in state {:?}",
                self.state()
            )));
        }

        let stream = match E::open_stream(&self.connection).await {
            Ok(stream) => stream,
            Err(e) => {
                let reason = match e {
                    ClientError::ConnectionClosed => CloseReason::ConnectionClosed,
                    _ => CloseReason::StreamFailed(e.clone()),
                };
                self.shared.close(reason);
                return Err(e);
            }
        };

        let opened = self.shared.state.send_if_modified(|state| {
            if *state == SubscriptionState::Idle {
                *state = SubscriptionState::Open;
                true
            } else {
                false
            }
        });
        if !opened {
            // Cancelled while the request was in flight.
            return Ok(());
        }

        SUBSCRIPTIONS_ACTIVE.with_label_values(&[E::KIND]).inc();
        info!(
            subscription = %self.shared.id,
            kind = E::KIND,
            endpoint = self.connection.endpoint(),
            "Subscription open"
        );

        let task = tokio::spawn(run(
            Arc::clone(&self.shared),
            self.connection.clone(),
            stream,
        ));
        self.connection.track(task);
        Ok(())
    }

    /// Stop delivery and release the stream.
    ///
    /// Idempotent; returns true only for the call that closed the
    /// subscription.
    ///
    /// No push read after this returns is delivered. A push the delivery
    /// task is already handing out may still reach consumers it has not
    /// visited yet, so a consumer can see at most one event after a
    /// concurrent `cancel` returns `true`. Cancelling from inside a callback
    /// stops delivery to every later consumer.
    pub fn cancel(&self) -> bool {
        let cancelled = self.shared.close(CloseReason::Cancelled);
        if cancelled {
            self.shared.cancel.notify_one();
        }
        cancelled
    }

    /// Wait until the subscription is closed and return why.
    pub async fn closed(&self) -> CloseReason {
        let mut state = self.shared.state.subscribe();
        loop {
            if let SubscriptionState::Closed(reason) = &*state.borrow_and_update() {
                return reason.clone();
            }
            if state.changed().await.is_err() {
                return CloseReason::Cancelled;
            }
        }
    }
}

impl<E: PushEvent> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<E: PushEvent> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.shared.id)
            .field("kind", &E::KIND)
            .field("state", &self.state())
            .finish()
    }
}

/// Pull adapter over a subscription's events.
pub struct EventStream<E> {
    receiver: mpsc::UnboundedReceiver<E>,
}

impl<E> EventStream<E> {
    /// Receive the next event; `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }
}

impl<E> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
