//! Simulated device pairing state machine
//!
//! ```text
//!            connect()                 latency elapsed
//!   idle ──────────────▶ connecting ───────────────────▶ connected | failed
//!    ▲                       │                              (popup shown)
//!    │      disconnect()     │                                   │
//!    └───────────────────────┴───────────────────────────────────┘
//! ```
//!
//! One uniform draw per attempt decides the outcome. The popup hides itself
//! after the notification window unless a newer transition got there first.
//! Every scheduled callback carries a token; `connect`, `disconnect` and
//! `dismiss_notification` retire outstanding tokens so late callbacks are
//! ignored.

use crate::config::models::{ConnectionState, ConnectionStatus};
use crate::connection::random::{RandomSource, SystemRandom};
use crate::connection::scheduler::{Scheduler, ThreadScheduler};
use crate::error::Result;
use crate::store::SharedStore;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing and odds of the pairing simulation
///
/// Deserializing and [`ConnectionController::with_parts`] both pass the
/// value through [`ConnectionTiming::sanitized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionTiming {
    /// Simulated pairing latency in milliseconds
    pub latency_ms: u64,
    /// How long the result popup stays up, in milliseconds
    pub notification_ms: u64,
    /// Chance that an attempt fails, `[0, 1]`
    pub failure_probability: f64,
}

impl Default for ConnectionTiming {
    fn default() -> Self {
        Self {
            latency_ms: 2000,
            notification_ms: 3000,
            failure_probability: 0.10,
        }
    }
}

impl ConnectionTiming {
    /// Parse from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy with `failure_probability` clamped to `[0, 1]`
    ///
    /// A non-finite probability is replaced by the default.
    pub fn sanitized(self) -> Self {
        let failure_probability = if self.failure_probability.is_finite() {
            self.failure_probability.clamp(0.0, 1.0)
        } else {
            Self::default().failure_probability
        };
        Self {
            failure_probability,
            ..self
        }
    }

    /// Pairing latency
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Popup lifetime
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

impl<'de> Deserialize<'de> for ConnectionTiming {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(default)]
        struct Fields {
            latency_ms: u64,
            notification_ms: u64,
            failure_probability: f64,
        }

        impl Default for Fields {
            fn default() -> Self {
                let timing = ConnectionTiming::default();
                Self {
                    latency_ms: timing.latency_ms,
                    notification_ms: timing.notification_ms,
                    failure_probability: timing.failure_probability,
                }
            }
        }

        let fields = Fields::deserialize(deserializer)?;
        Ok(ConnectionTiming {
            latency_ms: fields.latency_ms,
            notification_ms: fields.notification_ms,
            failure_probability: fields.failure_probability,
        }
        .sanitized())
    }
}

/// Handle to the outcome of a [`ConnectionController::connect`] call
///
/// Resolves to `Connected` or `Failed` when the attempt completes, or to
/// `Idle` when it is cancelled by a disconnect.
pub struct ConnectAttempt {
    rx: mpsc::Receiver<ConnectionStatus>,
    outcome: Option<ConnectionStatus>,
    joined: bool,
}

impl ConnectAttempt {
    /// Outcome if the attempt has finished, without blocking
    pub fn try_outcome(&mut self) -> Option<ConnectionStatus> {
        if self.outcome.is_none() {
            self.outcome = self.rx.try_recv().ok();
        }
        self.outcome
    }

    /// Block for at most `timeout` waiting for the outcome
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<ConnectionStatus> {
        if self.outcome.is_none() {
            self.outcome = self.rx.recv_timeout(timeout).ok();
        }
        self.outcome
    }

    /// Whether this call joined an attempt that was already in flight
    pub fn joined_existing(&self) -> bool {
        self.joined
    }
}

#[derive(Default)]
struct Timers {
    next_token: u64,
    attempt: Option<u64>,
    dismiss: Option<u64>,
    waiters: Vec<mpsc::Sender<ConnectionStatus>>,
}

impl Timers {
    fn issue(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn release_waiters(&mut self, status: ConnectionStatus) {
        for waiter in self.waiters.drain(..) {
            // A dropped handle just means nobody is waiting
            let _ = waiter.send(status);
        }
    }
}

struct Shared {
    store: SharedStore,
    scheduler: Arc<dyn Scheduler>,
    random: Mutex<Box<dyn RandomSource>>,
    timing: ConnectionTiming,
    // Lock order: timers, then store
    timers: Mutex<Timers>,
}

impl Shared {
    fn resolve_attempt(self: &Arc<Self>, token: u64) {
        let mut timers = self.timers.lock();
        if timers.attempt != Some(token) {
            debug!("Ignoring stale pairing callback {token}");
            return;
        }
        timers.attempt = None;

        let draw = self.random.lock().next_f64();
        let status = if draw < self.timing.failure_probability {
            ConnectionStatus::Failed
        } else {
            ConnectionStatus::Connected
        };
        info!("Pairing attempt {token} finished: {status}");

        let dismiss = timers.issue();
        timers.dismiss = Some(dismiss);
        self.store.lock().apply_connection(ConnectionState {
            status,
            show_notification: true,
        });
        timers.release_waiters(status);
        drop(timers);

        let shared = Arc::clone(self);
        self.scheduler.schedule(
            self.timing.notification_ttl(),
            Box::new(move || shared.auto_dismiss(dismiss)),
        );
    }

    fn auto_dismiss(&self, token: u64) {
        let mut timers = self.timers.lock();
        if timers.dismiss != Some(token) {
            debug!("Ignoring stale dismiss callback {token}");
            return;
        }
        timers.dismiss = None;
        debug!("Auto-dismissing pairing popup");
        hide_notification(&self.store);
    }
}

fn hide_notification(store: &SharedStore) {
    let mut store = store.lock();
    let state = store.connection();
    store.apply_connection(ConnectionState {
        show_notification: false,
        ..state
    });
}

/// Drives the pairing lifecycle and publishes it into the store
#[derive(Clone)]
pub struct ConnectionController {
    shared: Arc<Shared>,
}

impl ConnectionController {
    /// Controller with default timing, thread timers and system randomness
    pub fn new(store: SharedStore) -> Self {
        Self::with_parts(
            store,
            Arc::new(ThreadScheduler),
            Box::new(SystemRandom::new()),
            ConnectionTiming::default(),
        )
    }

    /// Controller with injected timers, randomness and timing
    pub fn with_parts(
        store: SharedStore,
        scheduler: Arc<dyn Scheduler>,
        random: Box<dyn RandomSource>,
        timing: ConnectionTiming,
    ) -> Self {
        let checked = timing.sanitized();
        if checked.failure_probability.to_bits() != timing.failure_probability.to_bits() {
            warn!(
                "Failure probability {} replaced by {}",
                timing.failure_probability, checked.failure_probability
            );
        }
        let timing = checked;
        Self {
            shared: Arc::new(Shared {
                store,
                scheduler,
                random: Mutex::new(random),
                timing,
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    /// Store this controller publishes into
    pub fn store(&self) -> &SharedStore {
        &self.shared.store
    }

    /// Timing in effect
    pub fn timing(&self) -> ConnectionTiming {
        self.shared.timing
    }

    /// Current pairing status and popup visibility
    pub fn state(&self) -> ConnectionState {
        self.shared.store.lock().connection()
    }

    /// Start a pairing attempt and return immediately
    ///
    /// While an attempt is in flight this changes nothing and the returned
    /// handle resolves with that attempt. Otherwise any visible popup is
    /// hidden, the status becomes `connecting` and the outcome lands after
    /// the configured latency.
    pub fn connect(&self) -> ConnectAttempt {
        let (tx, rx) = mpsc::channel();
        let mut timers = self.shared.timers.lock();

        if timers.attempt.is_some() {
            debug!("Pairing already in progress, joining current attempt");
            timers.waiters.push(tx);
            return ConnectAttempt {
                rx,
                outcome: None,
                joined: true,
            };
        }

        let token = timers.issue();
        timers.attempt = Some(token);
        timers.dismiss = None;
        timers.waiters.push(tx);
        self.shared.store.lock().apply_connection(ConnectionState {
            status: ConnectionStatus::Connecting,
            show_notification: false,
        });
        drop(timers);

        info!("Pairing attempt {token} started");
        let shared = Arc::clone(&self.shared);
        self.shared.scheduler.schedule(
            self.shared.timing.latency(),
            Box::new(move || shared.resolve_attempt(token)),
        );

        ConnectAttempt {
            rx,
            outcome: None,
            joined: false,
        }
    }

    /// Drop the connection (or abandon the attempt) and hide the popup
    pub fn disconnect(&self) {
        let mut timers = self.shared.timers.lock();
        if let Some(token) = timers.attempt.take() {
            info!("Pairing attempt {token} cancelled");
        }
        timers.dismiss = None;
        self.shared.store.lock().apply_connection(ConnectionState {
            status: ConnectionStatus::Idle,
            show_notification: false,
        });
        timers.release_waiters(ConnectionStatus::Idle);
        info!("Disconnected");
    }

    /// Close the result popup ahead of its timeout
    pub fn dismiss_notification(&self) {
        let mut timers = self.shared.timers.lock();
        timers.dismiss = None;
        hide_notification(&self.shared.store);
    }
}
