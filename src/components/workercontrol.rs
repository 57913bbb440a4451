//! Cooperative pause/kill control shared between a worker and its owner.
//!
//! The owner flips flags; the worker polls them at its natural iteration
//! boundaries (per frame, per tick, per interval). Sleeps go through
//! [`WorkerControl::sleep`] so a kill wakes the worker immediately instead of
//! waiting out a long idle interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};

/// Observable lifecycle of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Paused,
    Killed,
}

/// Pause/kill flags plus a wake-up channel for interruptible sleeps.
#[derive(Debug)]
pub struct WorkerControl {
    paused: AtomicBool,
    killed: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for WorkerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerControl {
    pub fn new() -> Self {
        // A single pending wake-up is enough; extra ones would only spin the loop.
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            paused: AtomicBool::new(false),
            killed: AtomicBool::new(false),
            wake_tx,
            wake_rx,
        }
    }

    pub fn pause(&self) {
        if !self.is_killed() {
            self.paused.store(true, Ordering::SeqCst);
        }
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.wake();
    }

    /// Request termination. Idempotent. Clears any pause so a paused worker
    /// observes the kill on its next poll.
    pub fn kill(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.killed.store(true, Ordering::SeqCst);
        self.wake();
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SchedulerState {
        if self.is_killed() {
            SchedulerState::Killed
        } else if self.is_paused() {
            SchedulerState::Paused
        } else {
            SchedulerState::Running
        }
    }

    /// Block while paused, polling every `poll`. Returns `true` if the worker
    /// has been killed and must exit.
    pub fn wait_while_paused(&self, poll: Duration) -> bool {
        while self.is_paused() {
            if self.is_killed() {
                return true;
            }
            let _ = self.wake_rx.recv_timeout(poll);
        }
        self.is_killed()
    }

    /// Sleep for `duration` unless killed first. Returns `true` on kill.
    ///
    /// Pause/resume wake-ups do not shorten the sleep; only a kill does.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_killed() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let _ = self.wake_rx.recv_timeout(deadline - now);
        }
    }

    fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }
}
