//! Tick-driven interaction worker.
//!
//! The worker plays at most one routine at a time against the catalog's
//! named groups. Playback lives in [`RoutinePlayer`], a plain state machine
//! advanced once per tick; the thread around it only multiplexes the tick
//! source with the command channel.
//!
//! # Frame expansion
//!
//! Each frame of an action is held for `ceil(frame_duration / tick)` ticks
//! and the expanded sequence is played `repeat` times. A cursor walks the
//! fully expanded sequence; once it is exhausted the next action of the
//! group starts. The tick after the last action emits
//! [`PetEvent::RoutineFinished`] and clears the routine.
//!
//! # Pause
//!
//! Pausing stops the tick source. Resuming the worker only clears the pause
//! flag; ticking restarts when the owner calls
//! [`InteractionWorker::restart_ticks`].

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, never, select, tick, unbounded};
use log::{debug, trace, warn};

use crate::components::action::{Action, Frame};
use crate::components::workercontrol::{SchedulerState, WorkerControl};
use crate::error::{ResourceError, WorkerFault, WorkerKind};
use crate::events::interaction::{InteractionCmd, Routine};
use crate::events::pet::PetEvent;
use crate::resources::actioncatalog::ActionCatalog;
use crate::systems::worker::{Flow, PetWorker, emit, join_worker, spawn_worker};

/// Number of ticks one frame of an action is held for. Never zero.
pub fn frame_repeat(frame_duration: Duration, tick: Duration) -> usize {
    let tick = tick.as_nanos().max(1);
    usize::try_from(frame_duration.as_nanos().div_ceil(tick).max(1)).unwrap_or(usize::MAX)
}

/// Length of an action's fully expanded sequence, all repeats included.
///
/// Saturates at `usize::MAX` for absurd repeat counts.
pub fn expanded_len(action: &Action, tick: Duration) -> usize {
    frame_repeat(action.frame_duration, tick)
        .saturating_mul(action.frames.len())
        .saturating_mul(action.repeat)
}

#[derive(Debug, Clone)]
struct ActiveRoutine {
    routine: Routine,
    group: String,
}

/// Playback cursor of the interaction worker.
#[derive(Debug, Default)]
pub struct RoutinePlayer {
    active: Option<ActiveRoutine>,
    action_index: usize,
    cursor: usize,
    last_frame: Option<Frame>,
}

impl RoutinePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Name of the group the active routine targets.
    pub fn target(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.group.as_str())
    }

    /// Select `routine` on `group`.
    ///
    /// While a routine is running only its target changes; the cursor keeps
    /// its position. A fresh start resets the cursor.
    pub fn start(&mut self, routine: Routine, group: impl Into<String>) {
        if self.active.is_none() {
            self.action_index = 0;
            self.cursor = 0;
            self.last_frame = None;
        }
        self.active = Some(ActiveRoutine {
            routine,
            group: group.into(),
        });
    }

    fn finish(&mut self) -> Option<String> {
        self.action_index = 0;
        self.cursor = 0;
        self.last_frame = None;
        self.active.take().map(|a| a.group)
    }

    /// Advance by one tick, returning the events to emit in order.
    pub fn tick(&mut self, catalog: &ActionCatalog) -> Vec<PetEvent> {
        let Some(routine) = self.active.as_ref().map(|a| a.routine) else {
            return Vec::new();
        };
        match routine {
            Routine::Animate => self.animate_tick(catalog),
            Routine::MouseDrag | Routine::Drop => {
                self.finish();
                Vec::new()
            }
        }
    }

    fn animate_tick(&mut self, catalog: &ActionCatalog) -> Vec<PetEvent> {
        let target = self.target().unwrap_or_default().to_string();
        let Some(group) = catalog.group(&target) else {
            warn!(target: "interaction", "pet '{}' has no group '{}', routine dropped", catalog.pet_name, target);
            self.finish();
            return vec![PetEvent::RoutineFinished { group: target }];
        };
        let Some(action) = group.actions.get(self.action_index) else {
            debug!(target: "interaction", "routine on '{}' finished", target);
            self.finish();
            return vec![PetEvent::RoutineFinished { group: target }];
        };

        let per_frame = frame_repeat(action.frame_duration, catalog.interaction_tick);
        let total = expanded_len(action, catalog.interaction_tick);
        let frame = &action.frames[(self.cursor / per_frame) % action.frames.len()];
        trace!(target: "interaction", "'{}' action {} cursor {}/{}", target, self.action_index, self.cursor, total);

        self.cursor += 1;
        if self.cursor >= total {
            self.action_index += 1;
            self.cursor = 0;
        }

        let unchanged = self
            .last_frame
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, frame));
        if unchanged {
            return Vec::new();
        }
        self.last_frame = Some(Arc::clone(frame));

        let mut events = vec![PetEvent::FrameChanged {
            source: WorkerKind::Interaction,
            frame: Arc::clone(frame),
        }];
        if action.moves() {
            let (dx, dy) = action.step();
            events.push(PetEvent::MoveBy {
                source: WorkerKind::Interaction,
                dx,
                dy,
            });
        }
        events.push(PetEvent::RepaintRequested);
        events
    }
}

/// Handle to a running interaction worker.
pub struct InteractionWorker {
    control: Arc<WorkerControl>,
    commands: Sender<InteractionCmd>,
    handle: Option<JoinHandle<()>>,
}

impl InteractionWorker {
    pub fn spawn(
        catalog: Arc<ActionCatalog>,
        events: Sender<PetEvent>,
        faults: Sender<WorkerFault>,
    ) -> Result<Self, ResourceError> {
        let control = Arc::new(WorkerControl::new());
        let (commands, command_rx) = unbounded();
        let loop_control = Arc::clone(&control);
        let pet = catalog.pet_name.clone();
        let handle = spawn_worker(WorkerKind::Interaction, &pet, faults, move || {
            run(&catalog, &loop_control, &command_rx, &events);
        })?;
        Ok(Self {
            control,
            commands,
            handle: Some(handle),
        })
    }

    /// Select `routine` on `group`.
    pub fn start(&self, routine: Routine, group: &str) {
        self.send(InteractionCmd::Start {
            routine,
            group: group.to_string(),
        });
    }

    /// Select a routine by name. Returns `false` for an unknown name.
    pub fn start_routine(&self, name: &str, group: &str) -> bool {
        match Routine::from_name(name) {
            Some(routine) => {
                self.start(routine, group);
                true
            }
            None => {
                warn!(target: "interaction", "unknown routine '{}'", name);
                false
            }
        }
    }

    /// Restart the tick source, e.g. after a pause.
    pub fn restart_ticks(&self) {
        self.send(InteractionCmd::RestartTicks);
    }

    fn send(&self, cmd: InteractionCmd) {
        if self.commands.send(cmd).is_err() {
            debug!(target: "interaction", "interaction worker already stopped");
        }
    }
}

impl PetWorker for InteractionWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Interaction
    }

    fn pause(&self) {
        self.control.pause();
        self.send(InteractionCmd::Pause);
    }

    fn resume(&self) {
        self.control.resume();
        self.send(InteractionCmd::Resume);
    }

    fn kill(&self) {
        self.control.kill();
        self.send(InteractionCmd::Shutdown);
    }

    fn state(&self) -> SchedulerState {
        self.control.state()
    }

    fn join(&mut self) {
        join_worker(WorkerKind::Interaction, &mut self.handle);
    }
}

impl Drop for InteractionWorker {
    fn drop(&mut self) {
        self.kill();
        self.join();
    }
}

fn run(
    catalog: &ActionCatalog,
    control: &WorkerControl,
    commands: &Receiver<InteractionCmd>,
    events: &Sender<PetEvent>,
) {
    let mut player = RoutinePlayer::new();
    let mut ticker = tick(catalog.interaction_tick);
    loop {
        if control.is_killed() {
            break;
        }
        let cmd = select! {
            recv(commands) -> cmd => Some(cmd.unwrap_or(InteractionCmd::Shutdown)),
            recv(ticker) -> _ => None,
        };
        match cmd {
            Some(InteractionCmd::Start { routine, group }) => {
                debug!(target: "interaction", "start routine '{}' on '{}'", routine.name(), group);
                player.start(routine, group);
            }
            Some(InteractionCmd::Pause) => ticker = never(),
            Some(InteractionCmd::Resume) => {}
            Some(InteractionCmd::RestartTicks) => ticker = tick(catalog.interaction_tick),
            Some(InteractionCmd::Shutdown) => break,
            None if control.is_paused() => {}
            None => {
                for event in player.tick(catalog) {
                    if emit(events, event) == Flow::Stop {
                        return;
                    }
                }
            }
        }
    }
}
