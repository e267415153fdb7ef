//! # Connection Handle
//!
//! Owns the node transport and the shutdown signal shared by every call and
//! subscription made through it.
//!
//! ## Lifecycle
//!
//! ```text
//! open() ──► Open ──► close() ──► Closed
//!                        │
//!                        └─ waits for in-flight calls and subscription
//!                           tasks, at most `shutdown_grace`
//! ```
//!
//! Once closed, calls fail with [`ClientError::ConnectionClosed`] without
//! reaching the transport; calls still in flight resolve with the same error.
//! After the drain the transport is released, even while clones of the
//! handle are still alive.

use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bchd_telemetry::{RpcTimer, CONNECTION_EVENTS};

use crate::adapters::GrpcTransport;
use crate::config::ClientConfig;
use crate::domain::ClientError;
use crate::ports::NodeTransport;

struct Inner {
    id: Uuid,
    endpoint: String,
    /// Emptied by close.
    transport: RwLock<Option<Arc<dyn NodeTransport>>>,
    shutdown: watch::Sender<bool>,
    in_flight: AtomicUsize,
    drained: Notify,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    grace: Duration,
}

/// Shared handle to one node connection.
///
/// Cloning is cheap; all clones share the transport and the shutdown signal.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

/// Decrements the in-flight count when a call finishes or is abandoned.
struct InFlight<'a> {
    inner: &'a Inner,
}

impl<'a> InFlight<'a> {
    fn enter(inner: &'a Inner) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self { inner }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}

impl Connection {
    /// Dial the node described by `config` over gRPC.
    pub async fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        match GrpcTransport::connect(config).await {
            Ok(transport) => {
                CONNECTION_EVENTS.with_label_values(&["open", "ok"]).inc();
                Ok(Self::with_transport(Arc::new(transport), config))
            }
            Err(e) => {
                CONNECTION_EVENTS.with_label_values(&["open", "failed"]).inc();
                warn!(endpoint = %config.endpoint_uri(), error = %e, "Connection failed");
                Err(e)
            }
        }
    }

    /// Wrap an existing transport.
    pub fn with_transport(transport: Arc<dyn NodeTransport>, config: &ClientConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        let inner = Inner {
            id: Uuid::new_v4(),
            endpoint: transport.endpoint().to_string(),
            transport: RwLock::new(Some(transport)),
            shutdown,
            in_flight: AtomicUsize::new(0),
            drained: Notify::new(),
            tasks: Mutex::new(Vec::new()),
            grace: config.shutdown_grace(),
        };
        debug!(connection = %inner.id, endpoint = %inner.endpoint, "Connection ready");
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Connection identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Endpoint of the underlying transport.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    /// Number of calls currently awaiting a reply.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Resolves once the connection is closed.
    pub async fn closed(&self) {
        let mut shutdown = self.inner.shutdown.subscribe();
        loop {
            if *shutdown.borrow_and_update() {
                return;
            }
            if shutdown.changed().await.is_err() {
                return;
            }
        }
    }

    /// Close the connection.
    ///
    /// Raises the shutdown signal, then waits for in-flight calls and
    /// subscription tasks to finish and drops the transport. Fails with
    /// [`ClientError::ShutdownFailed`] if they do not drain within the grace
    /// period; the transport is dropped either way. Closing an already
    /// closed connection returns `Ok`.
    pub async fn close(&self) -> Result<(), ClientError> {
        let first = self.inner.shutdown.send_if_modified(|closed| {
            if *closed {
                false
            } else {
                *closed = true;
                true
            }
        });
        if !first {
            return Ok(());
        }

        info!(connection = %self.inner.id, in_flight = self.in_flight(), "Closing connection");

        let tasks = std::mem::take(&mut *self.inner.tasks.lock());
        let drain = async {
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(connection = %self.inner.id, error = %e, "Subscription task ended abnormally");
                }
            }
            self.wait_idle().await;
        };

        let drained = tokio::time::timeout(self.inner.grace, drain).await;
        // Stragglers keep their own clone until they return.
        self.inner.transport.write().take();

        match drained {
            Ok(()) => {
                CONNECTION_EVENTS.with_label_values(&["close", "ok"]).inc();
                info!(connection = %self.inner.id, "Connection closed");
                Ok(())
            }
            Err(_) => {
                CONNECTION_EVENTS.with_label_values(&["close", "failed"]).inc();
                let pending = self.in_flight();
                warn!(connection = %self.inner.id, pending, "Connection did not drain in time");
                Err(ClientError::ShutdownFailed(format!(
                    "{} calls still in flight after {:?}",
                    pending, self.inner.grace
                )))
            }
        }
    }

    async fn wait_idle(&self) {
        loop {
            let drained = self.inner.drained.notified();
            if self.in_flight() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Run one remote call, bounded by the connection's lifetime.
    ///
    /// `call` receives the transport; the call holds it only while pending.
    pub(crate) async fn call<T, F>(&self, method: &'static str, call: F) -> Result<T, ClientError>
    where
        F: for<'t> FnOnce(&'t dyn NodeTransport) -> BoxFuture<'t, Result<T, ClientError>>,
    {
        let slot = self.inner.transport.read().clone();
        let transport = match slot {
            Some(transport) if !self.is_closed() => transport,
            _ => {
                RpcTimer::start(method).finish("closed");
                return Err(ClientError::ConnectionClosed);
            }
        };

        let _in_flight = InFlight::enter(&self.inner);
        let timer = RpcTimer::start(method);
        debug!(connection = %self.inner.id, method, "Calling node");

        let result = tokio::select! {
            biased;
            _ = self.closed() => Err(ClientError::ConnectionClosed),
            result = call(transport.as_ref()) => result,
        };

        match &result {
            Ok(_) => timer.finish("ok"),
            Err(e) => {
                debug!(connection = %self.inner.id, method, error = %e, "Call failed");
                timer.finish(e.outcome());
            }
        }
        result
    }

    /// Track a subscription task so close can wait for it.
    pub(crate) fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.inner.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.inner.id)
            .field("endpoint", &self.endpoint())
            .field("closed", &self.is_closed())
            .finish()
    }
}
