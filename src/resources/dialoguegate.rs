//! Process-wide "a dialogue bubble is visible" gate.
//!
//! Any producer that wants to show text polls the gate until it is free,
//! takes it for the duration of the display, then releases it. There is no
//! queue and no fairness: whoever observes the gate free first wins. The
//! gate is not reentrant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::components::workercontrol::WorkerControl;

#[derive(Debug, Default)]
pub struct DialogueGate {
    showing: AtomicBool,
}

/// Held while a dialogue is visible. Dropping it releases the gate.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a DialogueGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.showing.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_GATE: OnceLock<Arc<DialogueGate>> = OnceLock::new();

impl DialogueGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gate shared by every dialogue producer in the process.
    pub fn global() -> Arc<DialogueGate> {
        Arc::clone(GLOBAL_GATE.get_or_init(|| Arc::new(DialogueGate::new())))
    }

    pub fn is_showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    /// Take the gate if it is free right now.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.showing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    /// Poll every `poll` until the gate is free, then take it.
    ///
    /// Gives up and returns `None` if `control` is killed while waiting.
    pub fn acquire(&self, poll: Duration, control: &WorkerControl) -> Option<GateGuard<'_>> {
        loop {
            if let Some(guard) = self.try_acquire() {
                return Some(guard);
            }
            if control.sleep(poll) {
                return None;
            }
        }
    }
}
