//! Shared helpers: throwaway role directories with generated sprite sets.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{Rgba, RgbaImage};
use petaler::resources::appconfig::AppConfig;
use petaler::systems::dialogue::DialogueTiming;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Pet-level document for a pet with two idle groups.
pub const PET_CONF: &str = r#"{
    "scale": 1.0, "width": 64, "height": 48,
    "refresh": 0.02, "interact_speed": 0.01,
    "default": "stand", "up": "stand", "down": "stand",
    "left": "walk", "right": "walk",
    "random_act": [["stand"], ["walk", "stand"]],
    "act_prob": [0.5, 0.5],
    "random_act_name": ["idle", "stroll"]
}"#;

/// Action definitions matching [`PET_CONF`].
pub const ACT_CONF: &str = r#"{
    "stand": {"images": "stand", "frame_refresh": 0.01},
    "walk": {"images": "walk", "act_num": 2, "need_move": true,
             "direction": "right", "frame_move": 5, "frame_refresh": 0.01}
}"#;

/// Frames matching [`ACT_CONF`]: `(stem, width, height)`.
pub const FRAMES: &[(&str, u32, u32)] = &[
    ("stand_0", 8, 6),
    ("stand_1", 8, 6),
    ("walk_0", 8, 6),
    ("walk_1", 8, 6),
    ("walk_2", 8, 6),
];

/// A role directory removed on drop.
pub struct TempRoles {
    pub dir: PathBuf,
}

impl TempRoles {
    pub fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "petaler-{}-{}-{}",
            tag,
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    /// Write a pet with the given documents and frames.
    pub fn add_pet(&self, name: &str, pet_conf: &str, act_conf: &str, frames: &[(&str, u32, u32)]) {
        let pet_dir = self.dir.join(name);
        fs::create_dir_all(pet_dir.join("action")).unwrap();
        fs::write(pet_dir.join("pet_conf.json"), pet_conf).unwrap();
        fs::write(pet_dir.join("act_conf.json"), act_conf).unwrap();
        for (stem, w, h) in frames {
            write_png(&pet_dir.join("action").join(format!("{}.png", stem)), *w, *h);
        }
    }

    /// Write the standard test pet.
    pub fn add_standard_pet(&self, name: &str) {
        self.add_pet(name, PET_CONF, ACT_CONF, FRAMES);
    }

    /// Application config pointing at this directory, with fast dialogue.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::with_path(self.dir.join("petaler.ini"));
        config.roles_dir = self.dir.clone();
        config.seed = Some(3);
        config.dialogue = DialogueTiming {
            greeting_delay: Duration::from_millis(20),
            interval: Duration::from_millis(20),
            display: Duration::from_millis(20),
            gate_poll: Duration::from_millis(5),
        };
        config.line_length = 10;
        config
    }
}

impl Drop for TempRoles {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    image.save(path).unwrap();
}
