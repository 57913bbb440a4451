//! Idle animation worker.
//!
//! Continuously plays idle scenes drawn from the catalog's weighted groups.
//! For every displayed frame it emits, in order:
//!
//! 1. [`PetEvent::FrameChanged`] with the new frame,
//! 2. (after the frame's display duration) [`PetEvent::MoveBy`] if the action moves,
//! 3. [`PetEvent::RepaintRequested`].
//!
//! After each scene it waits the catalog's refresh interval before drawing
//! the next one.
//!
//! # Pause and kill
//!
//! Pause and kill are checked before each action, each repeat and each
//! frame. While paused the loop polls every [`PAUSE_POLL`] without consuming
//! frame time. Kill clears the pause and interrupts any sleep, so the loop
//! exits at the next check and never finishes a partially played scene.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, trace};

use crate::components::action::{Action, ActionGroup};
use crate::components::workercontrol::{SchedulerState, WorkerControl};
use crate::error::{ResourceError, WorkerFault, WorkerKind};
use crate::events::pet::PetEvent;
use crate::resources::actioncatalog::ActionCatalog;
use crate::systems::worker::{Flow, PetWorker, emit, join_worker, spawn_worker};

/// Poll interval while paused.
pub const PAUSE_POLL: Duration = Duration::from_millis(200);

/// Handle to a running idle animation loop.
pub struct AnimationWorker {
    control: Arc<WorkerControl>,
    handle: Option<JoinHandle<()>>,
}

impl AnimationWorker {
    /// Start the loop. `seed` fixes the idle-scene draw sequence.
    pub fn spawn(
        catalog: Arc<ActionCatalog>,
        seed: Option<u64>,
        events: Sender<PetEvent>,
        faults: Sender<WorkerFault>,
    ) -> Result<Self, ResourceError> {
        let control = Arc::new(WorkerControl::new());
        let loop_control = Arc::clone(&control);
        let pet = catalog.pet_name.clone();
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let handle = spawn_worker(WorkerKind::Animation, &pet, faults, move || {
            run(&catalog, &loop_control, rng, &events);
        })?;
        Ok(Self {
            control,
            handle: Some(handle),
        })
    }
}

impl PetWorker for AnimationWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Animation
    }

    fn pause(&self) {
        self.control.pause();
    }

    fn resume(&self) {
        self.control.resume();
    }

    fn kill(&self) {
        self.control.kill();
    }

    fn state(&self) -> SchedulerState {
        self.control.state()
    }

    fn join(&mut self) {
        join_worker(WorkerKind::Animation, &mut self.handle);
    }
}

impl Drop for AnimationWorker {
    fn drop(&mut self) {
        self.kill();
        self.join();
    }
}

fn run(
    catalog: &ActionCatalog,
    control: &WorkerControl,
    mut rng: fastrand::Rng,
    events: &Sender<PetEvent>,
) {
    while !control.is_killed() {
        let group = catalog.draw_group(&mut rng);
        debug!(target: "animation", "pet '{}' plays idle group '{}'", catalog.pet_name, group.name);
        if play_group(group, control, events) == Flow::Stop {
            break;
        }
        if control.wait_while_paused(PAUSE_POLL) {
            break;
        }
        if control.sleep(catalog.refresh) {
            break;
        }
    }
}

/// Play every action of `group` in order.
pub(crate) fn play_group(
    group: &ActionGroup,
    control: &WorkerControl,
    events: &Sender<PetEvent>,
) -> Flow {
    for action in &group.actions {
        if control.is_killed() {
            return Flow::Stop;
        }
        if play_action(action, control, events) == Flow::Stop {
            return Flow::Stop;
        }
    }
    Flow::Continue
}

fn play_action(action: &Action, control: &WorkerControl, events: &Sender<PetEvent>) -> Flow {
    for _ in 0..action.repeat {
        if control.wait_while_paused(PAUSE_POLL) {
            return Flow::Stop;
        }
        for frame in &action.frames {
            if control.wait_while_paused(PAUSE_POLL) {
                return Flow::Stop;
            }
            trace!(target: "animation", "frame of '{}'", action.name);
            let changed = PetEvent::FrameChanged {
                source: WorkerKind::Animation,
                frame: Arc::clone(frame),
            };
            if emit(events, changed) == Flow::Stop {
                return Flow::Stop;
            }
            if control.sleep(action.frame_duration) {
                return Flow::Stop;
            }
            if action.moves() {
                let (dx, dy) = action.step();
                let moved = PetEvent::MoveBy {
                    source: WorkerKind::Animation,
                    dx,
                    dy,
                };
                if emit(events, moved) == Flow::Stop {
                    return Flow::Stop;
                }
            }
            if emit(events, PetEvent::RepaintRequested) == Flow::Stop {
                return Flow::Stop;
            }
        }
    }
    Flow::Continue
}
