//! Shared plumbing for the background workers.
//!
//! Every worker runs its loop on a named OS thread spawned through
//! [`spawn_worker`]. A panic in the loop body is caught at the thread
//! boundary, logged and sent as a [`WorkerFault`] on the fault channel so
//! the coordination thread can decide what to do. A worker never dies
//! silently.

use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use log::{debug, error, info};

use crate::components::workercontrol::SchedulerState;
use crate::error::{ResourceError, WorkerFault, WorkerKind};
use crate::events::pet::PetEvent;

/// Commands every worker accepts from the coordination layer.
pub trait PetWorker {
    fn kind(&self) -> WorkerKind;
    fn pause(&self);
    fn resume(&self);
    /// Request termination. Idempotent; does not wait.
    fn kill(&self);
    fn state(&self) -> SchedulerState;
    /// Block until the worker thread has exited. No timeout.
    fn join(&mut self);
}

/// Whether a loop should keep going after an emission or a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// Send one event; a closed channel means nobody is listening any more.
pub(crate) fn emit(events: &Sender<PetEvent>, event: PetEvent) -> Flow {
    match events.send(event) {
        Ok(()) => Flow::Continue,
        Err(_) => {
            debug!("event receiver dropped, worker stopping");
            Flow::Stop
        }
    }
}

/// Spawn `body` on a named thread, turning a panic into a fault.
pub(crate) fn spawn_worker<F>(
    kind: WorkerKind,
    pet: &str,
    faults: Sender<WorkerFault>,
    body: F,
) -> Result<JoinHandle<()>, ResourceError>
where
    F: FnOnce() + Send + 'static,
{
    let pet = pet.to_string();
    std::thread::Builder::new()
        .name(format!("{}-{}", kind, pet))
        .spawn(move || {
            info!("{} worker for pet '{}' started", kind, pet);
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(body)) {
                let fault = WorkerFault::from_panic(kind, pet.clone(), payload);
                error!("{}", fault);
                let _ = faults.send(fault);
            }
            info!("{} worker for pet '{}' stopped", kind, pet);
        })
        .map_err(ResourceError::Thread)
}

/// Join a worker thread, logging if it went down in a way the boundary
/// could not catch.
pub(crate) fn join_worker(kind: WorkerKind, handle: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = handle.take() {
        debug!("waiting for {} worker to exit", kind);
        if handle.join().is_err() {
            error!("{} worker thread terminated abnormally", kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_panic_becomes_fault() {
        let (tx, rx) = unbounded();
        let handle = spawn_worker(WorkerKind::Animation, "cat", tx, || panic!("frame index")).unwrap();
        handle.join().unwrap();
        let fault = rx.try_recv().unwrap();
        assert_eq!(fault.worker, WorkerKind::Animation);
        assert_eq!(fault.pet, "cat");
        assert!(fault.message.contains("frame index"));
    }

    #[test]
    fn test_clean_exit_sends_nothing() {
        let (tx, rx) = unbounded();
        let handle = spawn_worker(WorkerKind::Interaction, "cat", tx, || {}).unwrap();
        handle.join().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_reports_closed_channel() {
        let (tx, rx) = unbounded();
        assert_eq!(emit(&tx, PetEvent::RepaintRequested), Flow::Continue);
        drop(rx);
        assert_eq!(emit(&tx, PetEvent::RepaintRequested), Flow::Stop);
    }
}
