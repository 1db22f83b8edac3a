//! Device pairing simulation
//!
//! [`ConnectionController`] owns the pairing lifecycle and is the only writer
//! of [`ConnectionState`](crate::config::ConnectionState) in the store.
//! Timers go through a [`Scheduler`] and outcomes through a
//! [`RandomSource`], so both can be swapped for deterministic versions:
//!
//! ```
//! use smartcube::config::ConnectionStatus;
//! use smartcube::connection::{
//!     ConnectionController, ConnectionTiming, FixedRandom, ManualScheduler,
//! };
//! use smartcube::store::ConfigStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let controller = ConnectionController::with_parts(
//!     ConfigStore::in_memory().into_shared(),
//!     scheduler.clone(),
//!     Box::new(FixedRandom::always_connect()),
//!     ConnectionTiming::default(),
//! );
//!
//! let mut attempt = controller.connect();
//! scheduler.advance(Duration::from_millis(2000));
//! assert_eq!(attempt.try_outcome(), Some(ConnectionStatus::Connected));
//! assert!(controller.state().show_notification);
//! ```

pub mod controller;
pub mod random;
pub mod scheduler;

pub use controller::{ConnectAttempt, ConnectionController, ConnectionTiming};
pub use random::{FixedRandom, RandomSource, SeededRandom, SystemRandom};
pub use scheduler::{ManualScheduler, Scheduler, Task, ThreadScheduler};
