//! Fully resolved action catalog for one pet.
//!
//! The catalog binds the pet's configuration documents to its decoded
//! frames: every action definition becomes an immutable [`Action`] with
//! scaled frames, every idle group becomes an [`ActionGroup`], and the
//! declared group probabilities become a cumulative table used for weighted
//! random selection.
//!
//! A catalog is built once per activation and replaced wholesale on pet
//! switch. Workers share it read-only through an `Arc`.
//!
//! # Weighted selection
//!
//! With cumulative boundaries `c[0] <= c[1] <= ... <= c[n-1] == 1.0` and a
//! draw `u` in `[0, 1]`, the chosen group is the number of boundaries strictly
//! less than `u`. For `[0.3, 1.0]`: `u = 0.25` picks 0, `u = 0.5` and `u = 1.0`
//! pick 1.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::imageops::{self, FilterType};
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::components::action::{Action, ActionGroup, Frame};
use crate::error::{ActivationError, CatalogError};
use crate::resources::framestore::SpriteFrameStore;
use crate::resources::petconfig::{ActionDefs, ActionParams, PetParams, load_action_defs};

/// The five named core actions of a pet.
///
/// Not used by the idle loop; the controller uses `default` for the initial
/// and on-floor frame.
#[derive(Debug, Clone)]
pub struct CoreActions {
    pub default: Arc<Action>,
    pub up: Arc<Action>,
    pub down: Arc<Action>,
    pub left: Arc<Action>,
    pub right: Arc<Action>,
}

#[derive(Debug)]
pub struct ActionCatalog {
    pub pet_name: String,
    pub scale: f64,
    /// Scaled sprite width in pixels.
    pub width: f64,
    /// Scaled sprite height in pixels.
    pub height: f64,
    /// Default per-frame movement unit, scaled.
    pub base_move: f64,
    /// Pause between idle scenes.
    pub refresh: Duration,
    /// Period of the interaction tick.
    pub interaction_tick: Duration,
    pub core: CoreActions,
    actions: FxHashMap<String, Arc<Action>>,
    groups: Vec<ActionGroup>,
    cumulative: Vec<f64>,
    frames: SpriteFrameStore,
}

impl ActionCatalog {
    /// Read the pet's documents from `<roles_dir>/<pet_name>/` and bind them
    /// to `frames`.
    pub fn build(
        roles_dir: &Path,
        pet_name: &str,
        frames: SpriteFrameStore,
    ) -> Result<Self, ActivationError> {
        let pet_dir = roles_dir.join(pet_name);
        let params = PetParams::load(&pet_dir)?;
        let defs = load_action_defs(&pet_dir)?;
        Ok(Self::assemble(pet_name, &params, &defs, frames)?)
    }

    /// Validate parsed documents against `frames` and build the catalog.
    pub fn assemble(
        pet_name: &str,
        params: &PetParams,
        defs: &ActionDefs,
        frames: SpriteFrameStore,
    ) -> Result<Self, CatalogError> {
        let scale = params.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CatalogError::InvalidScale(scale));
        }
        let refresh = seconds("refresh", params.refresh)?;
        let interaction_tick = seconds("interact_speed", params.interact_speed)?;
        if interaction_tick.is_zero() {
            return Err(CatalogError::InvalidTiming("interact_speed".to_string()));
        }

        let mut scaled: FxHashMap<String, Vec<Frame>> = FxHashMap::default();
        let mut actions: FxHashMap<String, Arc<Action>> = FxHashMap::default();
        for (name, def) in defs {
            let action = build_action(name, def, scale, &frames, &mut scaled)?;
            actions.insert(name.clone(), Arc::new(action));
        }

        let core = CoreActions {
            default: core_action(&actions, "default", &params.default)?,
            up: core_action(&actions, "up", &params.up)?,
            down: core_action(&actions, "down", &params.down)?,
            left: core_action(&actions, "left", &params.left)?,
            right: core_action(&actions, "right", &params.right)?,
        };

        if params.random_act.is_empty() {
            return Err(CatalogError::NoIdleGroups);
        }
        if !params.random_act_name.is_empty()
            && params.random_act_name.len() != params.random_act.len()
        {
            warn!(
                "pet '{}': {} group names for {} idle groups; unnamed groups get generated names",
                pet_name,
                params.random_act_name.len(),
                params.random_act.len()
            );
        }
        let mut groups = Vec::with_capacity(params.random_act.len());
        for (index, names) in params.random_act.iter().enumerate() {
            if names.is_empty() {
                return Err(CatalogError::EmptyGroup(index));
            }
            let mut group_actions = Vec::with_capacity(names.len());
            for action_name in names {
                let action =
                    actions
                        .get(action_name)
                        .ok_or_else(|| CatalogError::UnknownAction {
                            group: index,
                            action: action_name.clone(),
                        })?;
                group_actions.push(Arc::clone(action));
            }
            let name = params
                .random_act_name
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("group-{}", index));
            groups.push(ActionGroup {
                name,
                actions: group_actions,
            });
        }

        let cumulative =
            cumulative_probabilities(pet_name, params.act_prob.as_deref(), groups.len())?;

        info!(
            "Built catalog for pet '{}': {} actions, {} idle groups, scale {}",
            pet_name,
            actions.len(),
            groups.len(),
            scale
        );

        Ok(Self {
            pet_name: pet_name.to_string(),
            scale,
            width: params.width * scale,
            height: params.height * scale,
            base_move: DEFAULT_FRAME_MOVE * scale,
            refresh,
            interaction_tick,
            core,
            actions,
            groups,
            cumulative,
            frames,
        })
    }

    pub fn groups(&self) -> &[ActionGroup] {
        &self.groups
    }

    /// Cumulative probability boundaries, one per idle group.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn group(&self, name: &str) -> Option<&ActionGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn action(&self, name: &str) -> Option<&Arc<Action>> {
        self.actions.get(name)
    }

    /// Raw (unscaled) frames this catalog was built from.
    pub fn frames(&self) -> &SpriteFrameStore {
        &self.frames
    }

    /// Frame shown when the pet appears or lands on the floor.
    pub fn initial_frame(&self) -> &Frame {
        // Actions always hold at least one frame once built.
        &self.core.default.frames[0]
    }

    /// Group selected by the draw `u`.
    pub fn pick_group(&self, u: f64) -> &ActionGroup {
        &self.groups[pick_index(&self.cumulative, u)]
    }

    /// Draw a group from `rng` according to the configured probabilities.
    pub fn draw_group(&self, rng: &mut fastrand::Rng) -> &ActionGroup {
        self.pick_group(rng.f64())
    }
}

const DEFAULT_FRAME_MOVE: f64 = 10.0;

/// Index of the group selected by `u`: the count of boundaries strictly
/// less than `u`, capped to the last group.
pub fn pick_index(cumulative: &[f64], u: f64) -> usize {
    let index = cumulative.iter().filter(|&&c| c < u).count();
    index.min(cumulative.len().saturating_sub(1))
}

/// Turn declared group weights into cumulative boundaries ending exactly at 1.0.
///
/// Falls back to a uniform distribution when weights are absent, sized
/// differently from the group list, or sum to zero. Negative or non-finite
/// weights are rejected.
pub fn cumulative_probabilities(
    pet_name: &str,
    declared: Option<&[f64]>,
    groups: usize,
) -> Result<Vec<f64>, CatalogError> {
    if groups == 0 {
        return Err(CatalogError::NoIdleGroups);
    }
    let uniform = vec![1.0 / groups as f64; groups];
    let weights = match declared {
        None => uniform,
        Some(weights) if weights.len() != groups => {
            warn!(
                "pet '{}': {} probabilities for {} idle groups, using uniform distribution",
                pet_name,
                weights.len(),
                groups
            );
            uniform
        }
        Some(weights) => {
            for (index, &value) in weights.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(CatalogError::InvalidProbability { index, value });
                }
            }
            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                warn!(
                    "pet '{}': group probabilities sum to {}, using uniform distribution",
                    pet_name, sum
                );
                uniform
            } else {
                weights.iter().map(|w| w / sum).collect()
            }
        }
    };

    let mut running = 0.0;
    let mut cumulative: Vec<f64> = weights
        .iter()
        .map(|w| {
            running += w;
            running
        })
        .collect();
    if let Some(last) = cumulative.last_mut() {
        *last = 1.0;
    }
    Ok(cumulative)
}

fn seconds(field: &str, value: f64) -> Result<Duration, CatalogError> {
    Duration::try_from_secs_f64(value).map_err(|_| CatalogError::InvalidTiming(field.to_string()))
}

fn core_action(
    actions: &FxHashMap<String, Arc<Action>>,
    role: &'static str,
    name: &str,
) -> Result<Arc<Action>, CatalogError> {
    actions
        .get(name)
        .cloned()
        .ok_or_else(|| CatalogError::UnknownCoreAction {
            role,
            action: name.to_string(),
        })
}

fn build_action(
    name: &str,
    def: &ActionParams,
    scale: f64,
    frames: &SpriteFrameStore,
    scaled: &mut FxHashMap<String, Vec<Frame>>,
) -> Result<Action, CatalogError> {
    if def.act_num == 0 {
        return Err(CatalogError::InvalidRepeat(name.to_string()));
    }
    let frame_duration = seconds(name, def.frame_refresh)?;
    if !def.frame_move.is_finite() {
        return Err(CatalogError::InvalidTiming(name.to_string()));
    }

    let sequence = match scaled.get(&def.images) {
        Some(sequence) => sequence.clone(),
        None => {
            let sequence = resolve_frames(name, &def.images, scale, frames)?;
            scaled.insert(def.images.clone(), sequence.clone());
            sequence
        }
    };

    Ok(Action {
        name: name.to_string(),
        frames: sequence,
        repeat: def.act_num,
        need_move: def.need_move,
        direction: def.direction,
        frame_move: def.frame_move * scale,
        frame_duration,
    })
}

/// Collect `<base>_0 .. <base>_n` in order and scale each one.
fn resolve_frames(
    action: &str,
    base: &str,
    scale: f64,
    frames: &SpriteFrameStore,
) -> Result<Vec<Frame>, CatalogError> {
    let numbered = frames.numbered(base);
    if numbered.is_empty() {
        return Err(CatalogError::MissingFrames {
            action: action.to_string(),
            base: base.to_string(),
        });
    }
    let mut sequence = Vec::with_capacity(numbered.len());
    for (expected, (index, frame)) in numbered.into_iter().enumerate() {
        if index != expected {
            return Err(CatalogError::FrameGap {
                action: action.to_string(),
                base: base.to_string(),
                index: expected,
            });
        }
        sequence.push(scale_frame(frame, scale));
    }
    Ok(sequence)
}

fn scale_frame(frame: &Frame, scale: f64) -> Frame {
    if scale == 1.0 {
        return Arc::clone(frame);
    }
    let width = ((frame.width() as f64 * scale) as u32).max(1);
    let height = ((frame.height() as f64 * scale) as u32).max(1);
    Arc::new(imageops::resize(
        &**frame,
        width,
        height,
        FilterType::CatmullRom,
    ))
}
