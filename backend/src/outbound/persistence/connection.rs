//! Store connection lifecycle.
//!
//! [`StoreConnection`] drives a [`StoreConnector`] through a single connection
//! attempt and then watches the store with periodic pings. The current
//! [`ConnectionState`] is published on a `watch` channel; transitions are also
//! broadcast as [`ConnectionEvent`]s so the process can log them and update
//! readiness.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::pool::{DbPool, PoolConfig, PoolError};

const EVENT_CAPACITY: usize = 16;

/// Observable state of the store connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No attempt has been made yet.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The store answered the last attempt or ping.
    Connected,
    /// The last attempt or ping failed.
    Failed { message: String },
}

/// Connection transitions broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The store became reachable.
    Connected,
    /// The store could not be reached.
    Error { message: String },
}

/// Opens and probes a store.
#[async_trait]
pub trait StoreConnector: Send + Sync + 'static {
    /// Handle returned by a successful connection, shared with repositories.
    type Handle: Clone + Send + Sync + 'static;

    /// Establish a connection, proving the store answers.
    async fn connect(&self) -> Result<Self::Handle, PoolError>;

    /// Check that an established handle still reaches the store.
    async fn ping(&self, handle: &Self::Handle) -> Result<(), PoolError>;
}

/// Connector producing a PostgreSQL [`DbPool`].
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: PoolConfig,
}

impl PgConnector {
    /// Create a connector for the given pool configuration.
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    type Handle = DbPool;

    async fn connect(&self) -> Result<DbPool, PoolError> {
        let pool = DbPool::new(self.config.clone()).await?;
        pool.ping().await?;
        Ok(pool)
    }

    async fn ping(&self, handle: &DbPool) -> Result<(), PoolError> {
        handle.ping().await
    }
}

struct Inner<C> {
    connector: C,
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<ConnectionEvent>,
}

/// Shared connection lifecycle around a [`StoreConnector`].
///
/// Cloning is cheap; clones observe the same state and events.
pub struct StoreConnection<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for StoreConnection<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: StoreConnector> StoreConnection<C> {
    /// Wrap `connector` in a disconnected lifecycle.
    pub fn new(connector: C) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                connector,
                state,
                events,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to connection events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: ConnectionEvent) {
        if let Err(unsent) = self.inner.events.send(event) {
            debug!(event = ?unsent.0, "connection event had no subscribers");
        }
    }

    fn mark_connected(&self) {
        self.inner.state.send_replace(ConnectionState::Connected);
        self.emit(ConnectionEvent::Connected);
    }

    fn mark_failed(&self, error: &PoolError) {
        let message = error.to_string();
        self.inner.state.send_replace(ConnectionState::Failed {
            message: message.clone(),
        });
        self.emit(ConnectionEvent::Error { message });
    }

    /// Make one connection attempt.
    ///
    /// # Errors
    ///
    /// Returns the connector's [`PoolError`] after publishing `Failed` and an
    /// `Error` event.
    pub async fn connect(&self) -> Result<C::Handle, PoolError> {
        self.inner.state.send_replace(ConnectionState::Connecting);
        match self.inner.connector.connect().await {
            Ok(handle) => {
                self.mark_connected();
                Ok(handle)
            }
            Err(error) => {
                self.mark_failed(&error);
                Err(error)
            }
        }
    }

    /// Ping the store every `interval` until the returned task is aborted.
    ///
    /// Each failed ping emits an `Error` event; the first successful ping
    /// after a failure emits `Connected` again. The monitor never reconnects.
    pub fn spawn_monitor(&self, handle: C::Handle, interval: Duration) -> JoinHandle<()> {
        let connection = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match connection.inner.connector.ping(&handle).await {
                    Ok(()) => {
                        if connection.state() != ConnectionState::Connected {
                            connection.mark_connected();
                        }
                    }
                    Err(error) => {
                        warn!(%error, "store ping failed");
                        connection.mark_failed(&error);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use rstest::rstest;

    const TICK: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(2);

    struct FakeConnector {
        connect_result: Mutex<Option<Result<u32, PoolError>>>,
        pings: Mutex<VecDeque<Result<(), PoolError>>>,
    }

    impl FakeConnector {
        fn new(connect: Result<u32, PoolError>, pings: Vec<Result<(), PoolError>>) -> Self {
            Self {
                connect_result: Mutex::new(Some(connect)),
                pings: Mutex::new(pings.into()),
            }
        }
    }

    #[async_trait]
    impl StoreConnector for FakeConnector {
        type Handle = u32;

        async fn connect(&self) -> Result<u32, PoolError> {
            self.connect_result
                .lock()
                .expect("connect lock")
                .take()
                .expect("single connect call")
        }

        async fn ping(&self, _handle: &u32) -> Result<(), PoolError> {
            self.pings
                .lock()
                .expect("ping lock")
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    async fn next_event(rx: &mut broadcast::Receiver<ConnectionEvent>) -> ConnectionEvent {
        tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("event before timeout")
            .expect("channel open")
    }

    #[rstest]
    #[tokio::test]
    async fn starts_disconnected() {
        let connection = StoreConnection::new(FakeConnector::new(Ok(1), vec![]));
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[rstest]
    #[tokio::test]
    async fn successful_connect_publishes_connected() {
        let connection = StoreConnection::new(FakeConnector::new(Ok(7), vec![]));
        let mut events = connection.subscribe();

        let handle = connection.connect().await.expect("connects");

        assert_eq!(handle, 7);
        assert_eq!(connection.state(), ConnectionState::Connected);
        assert_eq!(next_event(&mut events).await, ConnectionEvent::Connected);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_connect_publishes_error() {
        let connection = StoreConnection::new(FakeConnector::new(
            Err(PoolError::build("connection refused")),
            vec![],
        ));
        let mut events = connection.subscribe();

        let err = connection.connect().await.expect_err("connect fails");

        assert_eq!(err, PoolError::build("connection refused"));
        assert!(matches!(
            connection.state(),
            ConnectionState::Failed { ref message } if message.contains("connection refused")
        ));
        assert!(matches!(
            next_event(&mut events).await,
            ConnectionEvent::Error { .. }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn connect_without_subscribers_still_succeeds() {
        let connection = StoreConnection::new(FakeConnector::new(Ok(1), vec![]));
        connection.connect().await.expect("connects");
        assert_eq!(connection.state(), ConnectionState::Connected);
    }

    #[rstest]
    #[tokio::test]
    async fn monitor_reports_failure_then_recovery() {
        let connection = StoreConnection::new(FakeConnector::new(
            Ok(1),
            vec![Err(PoolError::ping("server closed the connection")), Ok(())],
        ));
        let handle = connection.connect().await.expect("connects");
        let mut events = connection.subscribe();

        let monitor = connection.spawn_monitor(handle, TICK);

        assert!(matches!(
            next_event(&mut events).await,
            ConnectionEvent::Error { ref message } if message.contains("server closed")
        ));
        assert_eq!(next_event(&mut events).await, ConnectionEvent::Connected);
        assert_eq!(connection.state(), ConnectionState::Connected);
        monitor.abort();
    }

    #[rstest]
    #[tokio::test]
    async fn watch_state_observes_transitions() {
        let connection = StoreConnection::new(FakeConnector::new(Ok(1), vec![]));
        let mut state = connection.watch_state();

        connection.connect().await.expect("connects");

        state.changed().await.expect("state changed");
        assert_eq!(*state.borrow_and_update(), ConnectionState::Connected);
    }
}
