//! Per-pet configuration documents.
//!
//! Each pet lives under `<roles_dir>/<pet>/` with two JSON documents:
//!
//! `pet_conf.json` – pet-level parameters:
//!
//! ```json
//! {
//!   "scale": 0.5, "width": 256, "height": 256,
//!   "refresh": 5, "interact_speed": 0.02,
//!   "default": "stand", "up": "stand", "down": "fall",
//!   "left": "walk_left", "right": "walk_right",
//!   "random_act": [["stand"], ["walk_left", "stand"]],
//!   "act_prob": [0.3, 0.7],
//!   "random_act_name": ["idle", "stroll"]
//! }
//! ```
//!
//! `act_conf.json` – action definitions keyed by action name:
//!
//! ```json
//! {
//!   "walk_left": { "images": "left_walk", "act_num": 3, "need_move": true,
//!                  "direction": "left", "frame_move": 10, "frame_refresh": 0.2 }
//! }
//! ```
//!
//! Missing fields take the defaults below.

use std::path::Path;

use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::components::action::Direction;
use crate::error::ResourceError;

pub const PET_CONF_FILENAME: &str = "pet_conf.json";
pub const ACT_CONF_FILENAME: &str = "act_conf.json";

fn default_scale() -> f64 {
    1.0
}
fn default_size() -> f64 {
    128.0
}
fn default_refresh() -> f64 {
    5.0
}
fn default_interact_speed() -> f64 {
    0.02
}
fn default_act_num() -> usize {
    1
}
fn default_frame_move() -> f64 {
    10.0
}
fn default_frame_refresh() -> f64 {
    0.5
}

/// Contents of `pet_conf.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PetParams {
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Unscaled sprite width in pixels.
    #[serde(default = "default_size")]
    pub width: f64,
    /// Unscaled sprite height in pixels.
    #[serde(default = "default_size")]
    pub height: f64,
    /// Seconds between idle scenes.
    #[serde(default = "default_refresh")]
    pub refresh: f64,
    /// Seconds between interaction ticks.
    #[serde(default = "default_interact_speed")]
    pub interact_speed: f64,
    pub default: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    #[serde(default)]
    pub random_act: Vec<Vec<String>>,
    #[serde(default)]
    pub act_prob: Option<Vec<f64>>,
    #[serde(default)]
    pub random_act_name: Vec<String>,
}

/// One entry of `act_conf.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionParams {
    /// Base name of the numbered frame files (`<images>_<n>.png`).
    pub images: String,
    #[serde(default = "default_act_num")]
    pub act_num: usize,
    #[serde(default)]
    pub need_move: bool,
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Unscaled pixels moved per frame.
    #[serde(default = "default_frame_move")]
    pub frame_move: f64,
    /// Seconds each frame is displayed.
    #[serde(default = "default_frame_refresh")]
    pub frame_refresh: f64,
}

/// Contents of `act_conf.json`.
pub type ActionDefs = FxHashMap<String, ActionParams>;

impl PetParams {
    pub fn load(pet_dir: &Path) -> Result<Self, ResourceError> {
        read_json(&pet_dir.join(PET_CONF_FILENAME))
    }
}

/// Load `act_conf.json` from a pet directory.
pub fn load_action_defs(pet_dir: &Path) -> Result<ActionDefs, ResourceError> {
    read_json(&pet_dir.join(ACT_CONF_FILENAME))
}

/// Names of the pets under `roles_dir`: sub-directories holding a
/// `pet_conf.json`, sorted by name.
pub fn list_pets(roles_dir: &Path) -> Result<Vec<String>, ResourceError> {
    let entries = std::fs::read_dir(roles_dir).map_err(|source| ResourceError::Io {
        path: roles_dir.to_path_buf(),
        source,
    })?;
    let mut pets: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join(PET_CONF_FILENAME).is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    pets.sort();
    Ok(pets)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    debug!("reading {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ResourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}
