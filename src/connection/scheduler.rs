//! Delayed task scheduling
//!
//! Timers fire arbitrary callbacks after a delay. Callbacks cannot be
//! revoked once scheduled; instead the controller tags each one with a
//! token and ignores callbacks whose token is no longer current.

use parking_lot::Mutex;
use std::thread;
use std::time::Duration;
use tracing::error;

/// Callback run when a timer expires
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed
    fn schedule(&self, delay: Duration, task: Task);
}

/// Scheduler backed by one sleeping thread per task
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let spawned = thread::Builder::new()
            .name("cube-timer".to_string())
            .spawn(move || {
                thread::sleep(delay);
                task();
            });

        if let Err(e) = spawned {
            error!("Failed to spawn timer thread, task dropped: {e}");
        }
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler driven by a virtual clock
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock. Tasks
/// fire in due-time order, ties in scheduling order, on the calling thread.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<ManualQueue>,
}

impl ManualScheduler {
    /// Create a scheduler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.queue.lock().now
    }

    /// Number of tasks not yet run
    pub fn pending(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Move the clock forward by `by`, running every task that falls due
    ///
    /// Tasks scheduled by a running task are due relative to that task's
    /// due time and run in the same call if they fall inside the window.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        loop {
            let next = {
                let mut queue = self.queue.lock();
                let earliest = queue
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.seq))
                    .map(|(index, _)| index);

                earliest.map(|index| {
                    let pending = queue.pending.swap_remove(index);
                    queue.now = pending.due;
                    pending.task
                })
            };

            // Run without holding the lock so the task can schedule more work
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        self.queue.lock().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut queue = self.queue.lock();
        let due = queue.now + delay;
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.pending.push(PendingTask { due, seq, task });
    }
}
