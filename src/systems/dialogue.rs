//! Dialogue worker: a greeting on activation, then idle chatter.
//!
//! Every line goes through the shared [`DialogueGate`], so at most one
//! bubble is visible across all producers. A shown line always ends with a
//! [`DialogueText::Clear`] and the gate is released afterwards, including
//! when the display is cut short by a kill.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Timelike;
use crossbeam_channel::Sender;
use log::{debug, info};

use crate::components::workercontrol::{SchedulerState, WorkerControl};
use crate::error::{ResourceError, WorkerFault, WorkerKind};
use crate::events::pet::{DialogueText, PetEvent};
use crate::resources::dialoguegate::DialogueGate;
use crate::systems::worker::{Flow, PetWorker, emit, join_worker, spawn_worker};

/// Cadence of the dialogue loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueTiming {
    /// Wait after the greeting before idle chatter starts.
    pub greeting_delay: Duration,
    /// Wait between idle lines. Kept while paused.
    pub interval: Duration,
    /// How long one line stays visible.
    pub display: Duration,
    /// Poll period while waiting for the gate.
    pub gate_poll: Duration,
}

impl Default for DialogueTiming {
    fn default() -> Self {
        Self {
            greeting_delay: Duration::from_secs(10),
            interval: Duration::from_secs(10),
            display: Duration::from_secs(5),
            gate_poll: Duration::from_secs(1),
        }
    }
}

/// Pool of idle lines the worker picks from.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueScript {
    pub lines: Vec<String>,
}

impl Default for DialogueScript {
    fn default() -> Self {
        let lines = [
            "Something smells like a bug. Which line is misbehaving?",
            "On patrol. Every bug in sight gets caught!",
            "Bugs are not scary while I'm around.",
            "Gotcha! It was hiding right behind that line.",
            "Looked everywhere and found nothing. Sneaky bug...",
            "Hold on, digging through the debugging toolbox.",
            "Even after a whole day of debugging, let's stay cheerful.",
            "Such a nice breeze today. Perfect for... not working.",
            "Too many bugs, my head is spinning!",
        ];
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Greeting for the local `hour` (0-23).
pub fn greeting(hour: u32, pet_name: &str) -> String {
    let salutation = match hour {
        0..=10 => "Good morning!",
        11..=12 => "Good noon!",
        13..=17 => "Good afternoon!",
        18..=23 => "Good evening!",
        _ => "Hello!",
    };
    format!("{} I'm {}, your desktop companion.", salutation, pet_name)
}

/// Break `text` into lines of at most `width` characters.
///
/// Counts characters, not bytes. Existing line breaks are kept and restart
/// the count. A zero width leaves the text untouched.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut wrapped = String::with_capacity(text.len() + text.len() / width);
    let mut column = 0;
    for c in text.chars() {
        if c == '\n' {
            column = 0;
        } else {
            if column == width {
                wrapped.push('\n');
                column = 0;
            }
            column += 1;
        }
        wrapped.push(c);
    }
    wrapped
}

/// Show `texts` one after another while holding the gate.
///
/// Returns `Flow::Stop` if the worker was killed or the receiver is gone.
pub(crate) fn show_dialogue(
    texts: &[String],
    gate: &DialogueGate,
    timing: &DialogueTiming,
    control: &WorkerControl,
    events: &Sender<PetEvent>,
) -> Flow {
    let Some(_guard) = gate.acquire(timing.gate_poll, control) else {
        return Flow::Stop;
    };
    let mut flow = Flow::Continue;
    for text in texts {
        if emit(events, PetEvent::DialogueTextChanged(DialogueText::Show(text.clone()))) == Flow::Stop
            || control.sleep(timing.display)
        {
            flow = Flow::Stop;
            break;
        }
    }
    if emit(events, PetEvent::DialogueTextChanged(DialogueText::Clear)) == Flow::Stop {
        flow = Flow::Stop;
    }
    flow
}

/// Handle to a running dialogue worker.
pub struct DialogueWorker {
    control: Arc<WorkerControl>,
    handle: Option<JoinHandle<()>>,
}

impl DialogueWorker {
    pub fn spawn(
        pet_name: &str,
        script: DialogueScript,
        timing: DialogueTiming,
        gate: Arc<DialogueGate>,
        seed: Option<u64>,
        events: Sender<PetEvent>,
        faults: Sender<WorkerFault>,
    ) -> Result<Self, ResourceError> {
        let control = Arc::new(WorkerControl::new());
        let loop_control = Arc::clone(&control);
        let pet = pet_name.to_string();
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let handle = spawn_worker(WorkerKind::Dialogue, pet_name, faults, move || {
            let hour = chrono::Local::now().hour();
            run(&pet, hour, &script, &timing, &gate, &loop_control, rng, &events);
        })?;
        Ok(Self {
            control,
            handle: Some(handle),
        })
    }
}

impl PetWorker for DialogueWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Dialogue
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
        join_worker(WorkerKind::Dialogue, &mut self.handle);
    }
}

impl Drop for DialogueWorker {
    fn drop(&mut self) {
        self.kill();
        self.join();
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    pet: &str,
    hour: u32,
    script: &DialogueScript,
    timing: &DialogueTiming,
    gate: &DialogueGate,
    control: &WorkerControl,
    mut rng: fastrand::Rng,
    events: &Sender<PetEvent>,
) {
    info!(target: "dialogue", "greeting from pet '{}' at hour {}", pet, hour);
    if show_dialogue(&[greeting(hour, pet)], gate, timing, control, events) == Flow::Stop {
        return;
    }
    if control.sleep(timing.greeting_delay) {
        return;
    }
    while !control.is_killed() {
        if !control.is_paused() && !script.lines.is_empty() {
            let line = &script.lines[rng.usize(..script.lines.len())];
            debug!(target: "dialogue", "pet '{}' says '{}'", pet, line);
            if show_dialogue(std::slice::from_ref(line), gate, timing, control, events) == Flow::Stop {
                return;
            }
        }
        if control.sleep(timing.interval) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn fast() -> DialogueTiming {
        DialogueTiming {
            greeting_delay: Duration::from_millis(5),
            interval: Duration::from_millis(5),
            display: Duration::from_millis(5),
            gate_poll: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_greeting_by_hour() {
        assert!(greeting(7, "cat").starts_with("Good morning!"));
        assert!(greeting(10, "cat").starts_with("Good morning!"));
        assert!(greeting(11, "cat").starts_with("Good noon!"));
        assert!(greeting(13, "cat").starts_with("Good afternoon!"));
        assert!(greeting(23, "cat").starts_with("Good evening!"));
        assert!(greeting(24, "cat").starts_with("Hello!"));
        assert!(greeting(9, "cat").contains("cat"));
    }

    #[test]
    fn test_wrap_text_counts_chars() {
        assert_eq!(wrap_text("abcdefg", 3), "abc\ndef\ng");
        assert_eq!(wrap_text("héllo wörld", 5), "héllo\n wörl\nd");
        assert_eq!(wrap_text("ab\ncdef", 3), "ab\ncde\nf");
        assert_eq!(wrap_text("abc", 3), "abc");
        assert_eq!(wrap_text("abc", 0), "abc");
    }

    #[test]
    fn test_show_dialogue_shows_then_clears_and_releases() {
        let gate = DialogueGate::new();
        let control = WorkerControl::new();
        let (tx, rx) = unbounded();
        let texts = vec!["hi".to_string(), "there".to_string()];
        assert_eq!(show_dialogue(&texts, &gate, &fast(), &control, &tx), Flow::Continue);
        assert!(!gate.is_showing());
        let shown: Vec<DialogueText> = rx
            .try_iter()
            .filter_map(|e| match e {
                PetEvent::DialogueTextChanged(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(
            shown,
            vec![
                DialogueText::Show("hi".to_string()),
                DialogueText::Show("there".to_string()),
                DialogueText::Clear,
            ]
        );
    }

    #[test]
    fn test_show_dialogue_gives_up_on_kill_while_gate_busy() {
        let gate = DialogueGate::new();
        let _held = gate.try_acquire().unwrap();
        let control = WorkerControl::new();
        control.kill();
        let (tx, rx) = unbounded();
        let flow = show_dialogue(&["hi".to_string()], &gate, &fast(), &control, &tx);
        assert_eq!(flow, Flow::Stop);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_worker_greets_then_chatters() {
        let gate = Arc::new(DialogueGate::new());
        let (events, rx) = unbounded();
        let (faults, _fault_rx) = unbounded();
        let script = DialogueScript {
            lines: vec!["only line".to_string()],
        };
        let mut worker = DialogueWorker::spawn(
            "cat",
            script,
            fast(),
            Arc::clone(&gate),
            Some(1),
            events,
            faults,
        )
        .unwrap();

        let mut shown = Vec::new();
        while shown.len() < 2 {
            match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
                PetEvent::DialogueTextChanged(DialogueText::Show(text)) => shown.push(text),
                _ => {}
            }
        }
        worker.kill();
        worker.join();
        assert!(shown[0].contains("cat"));
        assert_eq!(shown[1], "only line");
        assert!(!gate.is_showing());
    }

    #[test]
    fn test_paused_worker_skips_lines() {
        let gate = Arc::new(DialogueGate::new());
        let (events, rx) = unbounded();
        let (faults, _fault_rx) = unbounded();
        let worker = DialogueWorker::spawn(
            "cat",
            DialogueScript::default(),
            fast(),
            gate,
            None,
            events,
            faults,
        )
        .unwrap();
        worker.pause();
        // The greeting may already be on its way; wait for it to clear.
        std::thread::sleep(Duration::from_millis(50));
        let _ = rx.try_iter().count();
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
        assert_eq!(worker.state(), SchedulerState::Paused);
    }
}
