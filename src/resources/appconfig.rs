//! Application configuration resource.
//!
//! Settings come from an INI file. Every value has a safe default so the
//! application starts with a missing or partial file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [pets]
//! roles_dir = ./res/role
//! default = bugsy
//! seed = 42
//!
//! [screen]
//! width = 1920
//! usable_height = 1040
//!
//! [dialogue]
//! greeting_delay = 10
//! interval = 10
//! display = 5
//! gate_poll = 1
//! line_length = 16
//! bubble_height = 80
//! ```

use std::path::PathBuf;
use std::time::Duration;

use configparser::ini::Ini;
use log::info;

use crate::error::ResourceError;
use crate::resources::geometry::ScreenGeometry;
use crate::resources::petconfig::list_pets;
use crate::systems::dialogue::DialogueTiming;

const DEFAULT_ROLES_DIR: &str = "./res/role";
const DEFAULT_LINE_LENGTH: usize = 16;
const DEFAULT_BUBBLE_HEIGHT: f64 = 80.0;
const DEFAULT_CONFIG_PATH: &str = "./petaler.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding one sub-directory per pet.
    pub roles_dir: PathBuf,
    /// Pet activated at startup. `None` picks the first available pet.
    pub default_pet: Option<String>,
    /// Seed for idle selection and dialogue picks. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub screen: ScreenGeometry,
    pub dialogue: DialogueTiming,
    /// Characters per dialogue bubble line.
    pub line_length: usize,
    /// Height reserved above the sprite for the dialogue bubble.
    pub bubble_height: f64,
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Configuration with safe default values.
    pub fn new() -> Self {
        Self {
            roles_dir: PathBuf::from(DEFAULT_ROLES_DIR),
            default_pet: None,
            seed: None,
            screen: ScreenGeometry::default(),
            dialogue: DialogueTiming::default(),
            line_length: DEFAULT_LINE_LENGTH,
            bubble_height: DEFAULT_BUBBLE_HEIGHT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), ResourceError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|e| {
            ResourceError::Config(format!(
                "failed to load '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        // [pets]
        if let Some(dir) = config.get("pets", "roles_dir") {
            self.roles_dir = PathBuf::from(dir);
        }
        if let Some(name) = config.get("pets", "default") {
            self.default_pet = Some(name).filter(|n| !n.is_empty());
        }
        if let Some(seed) = config.getuint("pets", "seed").map_err(ResourceError::Config)? {
            self.seed = Some(seed);
        }

        // [screen]
        if let Some(width) = config.getfloat("screen", "width").map_err(ResourceError::Config)? {
            self.screen.width = width;
        }
        if let Some(height) = config
            .getfloat("screen", "usable_height")
            .map_err(ResourceError::Config)?
        {
            self.screen.usable_height = height;
        }

        // [dialogue]
        let timing = &mut self.dialogue;
        for (key, slot) in [
            ("greeting_delay", &mut timing.greeting_delay),
            ("interval", &mut timing.interval),
            ("display", &mut timing.display),
            ("gate_poll", &mut timing.gate_poll),
        ] {
            if let Some(secs) = config.getfloat("dialogue", key).map_err(ResourceError::Config)? {
                *slot = Duration::try_from_secs_f64(secs).map_err(|_| {
                    ResourceError::Config(format!("[dialogue] {} must be a non-negative number", key))
                })?;
            }
        }
        if let Some(len) = config
            .getuint("dialogue", "line_length")
            .map_err(ResourceError::Config)?
        {
            self.line_length = len as usize;
        }
        if let Some(height) = config
            .getfloat("dialogue", "bubble_height")
            .map_err(ResourceError::Config)?
        {
            self.bubble_height = height;
        }

        info!(
            "Loaded config: roles_dir={:?}, default={:?}, screen {}x{}",
            self.roles_dir, self.default_pet, self.screen.width, self.screen.usable_height
        );
        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), ResourceError> {
        let mut config = Ini::new();

        config.set(
            "pets",
            "roles_dir",
            Some(self.roles_dir.to_string_lossy().into_owned()),
        );
        if let Some(name) = &self.default_pet {
            config.set("pets", "default", Some(name.clone()));
        }
        if let Some(seed) = self.seed {
            config.set("pets", "seed", Some(seed.to_string()));
        }

        config.set("screen", "width", Some(self.screen.width.to_string()));
        config.set(
            "screen",
            "usable_height",
            Some(self.screen.usable_height.to_string()),
        );

        let timing = &self.dialogue;
        for (key, value) in [
            ("greeting_delay", timing.greeting_delay),
            ("interval", timing.interval),
            ("display", timing.display),
            ("gate_poll", timing.gate_poll),
        ] {
            config.set("dialogue", key, Some(value.as_secs_f64().to_string()));
        }
        config.set("dialogue", "line_length", Some(self.line_length.to_string()));
        config.set(
            "dialogue",
            "bubble_height",
            Some(self.bubble_height.to_string()),
        );

        config.write(&self.config_path).map_err(|source| ResourceError::Io {
            path: self.config_path.clone(),
            source,
        })?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Pets available under `roles_dir`, sorted by name.
    pub fn available_pets(&self) -> Result<Vec<String>, ResourceError> {
        list_pets(&self.roles_dir)
    }

    /// Pet to activate first: the configured default if present, otherwise
    /// the first available one.
    pub fn startup_pet(&self) -> Result<Option<String>, ResourceError> {
        let pets = self.available_pets()?;
        match &self.default_pet {
            Some(name) if pets.contains(name) => Ok(Some(name.clone())),
            _ => Ok(pets.into_iter().next()),
        }
    }
}
