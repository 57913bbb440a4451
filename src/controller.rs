//! Pet controller: owns the active pet and its three workers.
//!
//! The controller is driven from a single coordination thread. Workers only
//! ever send [`PetEvent`]s; [`PetController::pump`] applies them to the
//! [`DisplayState`] and the host [`PetSurface`] in arrival order.
//!
//! # Switching pets
//!
//! [`PetController::activate`] performs, in order:
//!
//! 1. kill every worker of the current pet and join their threads,
//! 2. drop the old catalog and frames,
//! 3. load frames and build the catalog for the new pet,
//! 4. reset the display state and hide the dialogue bubble,
//! 5. start fresh animation, interaction and dialogue workers,
//! 6. size and place the window and show the initial frame.
//!
//! A failure in step 3 or 5 hides the window and leaves the controller
//! inactive. It is never left half switched.

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, info, warn};

use crate::components::workercontrol::SchedulerState;
use crate::error::{ActivationError, WorkerFault, WorkerKind};
use crate::events::interaction::Routine;
use crate::events::pet::{DialogueText, PetEvent};
use crate::resources::actioncatalog::ActionCatalog;
use crate::resources::appconfig::AppConfig;
use crate::resources::dialoguegate::DialogueGate;
use crate::resources::displaystate::DisplayState;
use crate::resources::framestore::SpriteFrameStore;
use crate::resources::geometry::WindowGeometry;
use crate::surface::PetSurface;
use crate::systems::animation::AnimationWorker;
use crate::systems::dialogue::{DialogueScript, DialogueWorker, wrap_text};
use crate::systems::interaction::InteractionWorker;
use crate::systems::movement::move_window;
use crate::systems::worker::PetWorker;

/// Everything that lives exactly as long as one pet activation.
struct ActivePet {
    catalog: Arc<ActionCatalog>,
    window: WindowGeometry,
    events: Receiver<PetEvent>,
    animation: AnimationWorker,
    interaction: InteractionWorker,
    dialogue: DialogueWorker,
}

impl ActivePet {
    fn worker(&self, kind: WorkerKind) -> &dyn PetWorker {
        match kind {
            WorkerKind::Animation => &self.animation,
            WorkerKind::Interaction => &self.interaction,
            WorkerKind::Dialogue => &self.dialogue,
        }
    }

    /// Kill all workers, then wait for every thread to exit.
    fn shut_down(mut self) {
        self.animation.kill();
        self.interaction.kill();
        self.dialogue.kill();
        self.animation.join();
        self.interaction.join();
        self.dialogue.join();
    }
}

pub struct PetController<S: PetSurface> {
    config: AppConfig,
    surface: S,
    gate: Arc<DialogueGate>,
    script: DialogueScript,
    display: DisplayState,
    faults_tx: Sender<WorkerFault>,
    faults_rx: Receiver<WorkerFault>,
    faults: Vec<WorkerFault>,
    active: Option<ActivePet>,
}

impl<S: PetSurface> PetController<S> {
    /// Controller using the process-wide dialogue gate.
    pub fn new(config: AppConfig, surface: S) -> Self {
        Self::with_gate(config, surface, DialogueGate::global())
    }

    /// Controller using `gate` instead of the process-wide one.
    pub fn with_gate(config: AppConfig, surface: S, gate: Arc<DialogueGate>) -> Self {
        let (faults_tx, faults_rx) = unbounded();
        Self {
            config,
            surface,
            gate,
            script: DialogueScript::default(),
            display: DisplayState::new(),
            faults_tx,
            faults_rx,
            faults: Vec::new(),
            active: None,
        }
    }

    /// Replace the idle dialogue lines. Takes effect on the next activation.
    pub fn set_script(&mut self, script: DialogueScript) {
        self.script = script;
    }

    pub fn gate(&self) -> &Arc<DialogueGate> {
        &self.gate
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn active_pet(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.catalog.pet_name.as_str())
    }

    pub fn catalog(&self) -> Option<&Arc<ActionCatalog>> {
        self.active.as_ref().map(|a| &a.catalog)
    }

    pub fn window(&self) -> Option<&WindowGeometry> {
        self.active.as_ref().map(|a| &a.window)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// State of one worker of the active pet.
    pub fn worker_state(&self, kind: WorkerKind) -> Option<SchedulerState> {
        self.active.as_ref().map(|a| a.worker(kind).state())
    }

    /// Activate `pet_name`, replacing the current pet.
    pub fn activate(&mut self, pet_name: &str) -> Result<(), ActivationError> {
        self.deactivate();
        info!(target: "controller", "activating pet '{}'", pet_name);
        match self.start(pet_name) {
            Ok(active) => {
                self.place(&active);
                self.active = Some(active);
                Ok(())
            }
            Err(e) => {
                error!(target: "controller", "cannot activate pet '{}': {}", pet_name, e);
                self.surface.hide();
                Err(e)
            }
        }
    }

    /// Alias of [`activate`](Self::activate) for readability at call sites.
    pub fn switch_to(&mut self, pet_name: &str) -> Result<(), ActivationError> {
        self.activate(pet_name)
    }

    /// Re-activate the current pet from scratch, e.g. after a worker fault.
    pub fn restart(&mut self) -> Result<(), ActivationError> {
        match self.active_pet().map(str::to_string) {
            Some(name) => self.activate(&name),
            None => Ok(()),
        }
    }

    fn start(&mut self, pet_name: &str) -> Result<ActivePet, ActivationError> {
        let roles_dir: &Path = &self.config.roles_dir;
        let frames = SpriteFrameStore::load(roles_dir, pet_name)?;
        let catalog = Arc::new(ActionCatalog::build(roles_dir, pet_name, frames)?);

        self.display.reset();
        self.surface.clear_dialogue();

        let (events_tx, events) = unbounded();
        let seed = self.config.seed;
        // Workers already started are killed and joined by their Drop if a
        // later one fails to spawn.
        let animation = AnimationWorker::spawn(
            Arc::clone(&catalog),
            seed,
            events_tx.clone(),
            self.faults_tx.clone(),
        )?;
        let interaction = InteractionWorker::spawn(
            Arc::clone(&catalog),
            events_tx.clone(),
            self.faults_tx.clone(),
        )?;
        let dialogue = DialogueWorker::spawn(
            pet_name,
            self.script.clone(),
            self.config.dialogue,
            Arc::clone(&self.gate),
            seed.map(|s| s.wrapping_add(1)),
            events_tx,
            self.faults_tx.clone(),
        )?;

        let window = WindowGeometry::for_sprite(
            catalog.width,
            catalog.height,
            self.config.bubble_height,
            &self.config.screen,
        );
        Ok(ActivePet {
            catalog,
            window,
            events,
            animation,
            interaction,
            dialogue,
        })
    }

    fn place(&mut self, active: &ActivePet) {
        let window = &active.window;
        self.surface.resize(window.width as u32, window.height as u32);
        self.display.placement.x = window.start_x;
        self.display.placement.y = window.start_y;
        // The start position is on the floor line.
        self.display.on_floor = window.start_y >= window.floor;
        self.surface.move_to(window.start_x as i32, window.start_y as i32);
        let frame = Arc::clone(active.catalog.initial_frame());
        self.surface.set_frame(&frame);
        self.display.set_frame(frame);
        self.surface.show();
        self.surface.repaint();
    }

    /// Stop every worker of the current pet and wait for them to exit.
    pub fn deactivate(&mut self) {
        if let Some(active) = self.active.take() {
            info!(target: "controller", "deactivating pet '{}'", active.catalog.pet_name);
            active.shut_down();
        }
    }

    /// Deactivate and hide the window.
    pub fn quit(&mut self) {
        self.deactivate();
        self.surface.clear_dialogue();
        self.surface.hide();
        self.display.reset();
    }

    pub fn pause(&self, kind: WorkerKind) {
        if let Some(active) = &self.active {
            active.worker(kind).pause();
        }
    }

    /// Resume a worker. The interaction worker also gets its tick restarted.
    pub fn resume(&self, kind: WorkerKind) {
        if let Some(active) = &self.active {
            active.worker(kind).resume();
            if kind == WorkerKind::Interaction {
                active.interaction.restart_ticks();
            }
        }
    }

    /// Play `group` once as an interactive routine, suspending the idle
    /// animation until it finishes.
    ///
    /// Refused while the interaction worker is paused, since nothing would
    /// play the routine and the pet would stay frozen.
    pub fn show_routine(&self, group: &str) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        if active.interaction.state() != SchedulerState::Running {
            warn!(target: "controller", "interaction worker is paused, routine '{}' refused", group);
            return false;
        }
        if active.catalog.group(group).is_none() {
            warn!(target: "controller", "pet '{}' has no group '{}'", active.catalog.pet_name, group);
            return false;
        }
        active.animation.pause();
        active.interaction.start(Routine::Animate, group);
        true
    }

    /// Start a routine by name on the interaction worker.
    pub fn start_routine(&self, name: &str, group: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.interaction.start_routine(name, group))
    }

    /// Apply every pending worker event. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        for fault in self.faults_rx.try_iter() {
            self.faults.push(fault);
        }
        let pending: Vec<PetEvent> = match &self.active {
            Some(active) => active.events.try_iter().collect(),
            None => return 0,
        };
        let count = pending.len();
        for event in pending {
            self.apply(event);
        }
        count
    }

    /// Faults reported by workers since the last call.
    pub fn take_faults(&mut self) -> Vec<WorkerFault> {
        for fault in self.faults_rx.try_iter() {
            self.faults.push(fault);
        }
        std::mem::take(&mut self.faults)
    }

    fn apply(&mut self, event: PetEvent) {
        match event {
            PetEvent::FrameChanged { frame, .. } => {
                self.surface.set_frame(&frame);
                self.display.set_frame(frame);
            }
            PetEvent::MoveBy { dx, dy, .. } => self.move_by(dx, dy),
            PetEvent::RepaintRequested => self.surface.repaint(),
            PetEvent::RoutineFinished { group } => {
                info!(target: "controller", "routine on '{}' finished", group);
                if let Some(active) = &self.active {
                    active.animation.resume();
                }
            }
            PetEvent::DialogueTextChanged(DialogueText::Show(text)) => {
                let text = wrap_text(&text, self.config.line_length);
                self.surface.set_dialogue(&text);
                self.display.dialogue = Some(text);
            }
            PetEvent::DialogueTextChanged(DialogueText::Clear) => {
                self.surface.clear_dialogue();
                self.display.dialogue = None;
            }
        }
    }

    fn move_by(&mut self, dx: f64, dy: f64) {
        let Some(active) = &self.active else {
            return;
        };
        let outcome = move_window(
            self.display.placement,
            dx,
            dy,
            &active.window,
            self.config.screen.width,
            &mut self.display.on_floor,
        );
        self.display.placement = outcome.placement;
        self.surface
            .move_to(outcome.placement.x as i32, outcome.placement.y as i32);
        if outcome.landed {
            let frame = Arc::clone(active.catalog.initial_frame());
            self.surface.set_frame(&frame);
            self.display.set_frame(frame);
            active.animation.resume();
        }
    }
}

impl<S: PetSurface> Drop for PetController<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
