//! Decoded sprite frames for one pet.
//!
//! The store is built once per pet activation by scanning the pet's
//! `action/` directory and decoding every PNG it finds, keyed by filename
//! stem (`walk_0`, `walk_1`, ...). It is immutable afterwards and handed to
//! [`ActionCatalog::build`](crate::resources::actioncatalog::ActionCatalog::build),
//! which resolves and scales the frames each action needs.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::components::action::Frame;
use crate::error::ResourceError;

/// Sub-directory of a pet's role directory holding its frames.
pub const ACTION_DIR: &str = "action";

/// Frame bitmaps keyed by filename stem.
#[derive(Debug, Clone, Default)]
pub struct SpriteFrameStore {
    frames: FxHashMap<String, Frame>,
}

impl SpriteFrameStore {
    /// Load every PNG under `<roles_dir>/<pet_name>/action/`.
    ///
    /// Fails if the directory is missing or unreadable, or if a PNG cannot be
    /// decoded. Whether the right frames are present is checked later, when
    /// the catalog is built.
    pub fn load(roles_dir: &Path, pet_name: &str) -> Result<Self, ResourceError> {
        let dir = roles_dir.join(pet_name).join(ACTION_DIR);
        let entries = std::fs::read_dir(&dir).map_err(|source| ResourceError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut frames = FxHashMap::default();
        for entry in entries {
            let entry = entry.map_err(|source| ResourceError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || !is_png(&path) {
                debug!("skipping non-frame entry {:?}", path);
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!("skipping frame with non UTF-8 name {:?}", path);
                continue;
            };
            let image = image::open(&path).map_err(|source| ResourceError::Decode {
                path: path.clone(),
                source,
            })?;
            frames.insert(stem.to_string(), Arc::new(image.to_rgba8()));
        }

        info!("Loaded {} frames for pet '{}' from {:?}", frames.len(), pet_name, dir);
        Ok(Self { frames })
    }

    /// Build a store from frames already in memory.
    pub fn from_frames<I, K>(frames: I) -> Self
    where
        I: IntoIterator<Item = (K, Frame)>,
        K: Into<String>,
    {
        Self {
            frames: frames.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Frame> {
        self.frames.get(key)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Numbered frames for `base`, ascending by their numeric suffix.
    ///
    /// A key matches when it is `<base>_<digits>`. Keys such as
    /// `<base>_extra_1` belong to a different base and are ignored.
    pub fn numbered(&self, base: &str) -> Vec<(usize, &Frame)> {
        let prefix = format!("{}_", base);
        let mut found: Vec<(usize, &Frame)> = self
            .frames
            .iter()
            .filter_map(|(key, frame)| {
                let suffix = key.strip_prefix(&prefix)?;
                if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                suffix.parse::<usize>().ok().map(|n| (n, frame))
            })
            .collect();
        found.sort_by_key(|(n, _)| *n);
        found
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn frame(w: u32) -> Frame {
        Arc::new(RgbaImage::new(w, 1))
    }

    #[test]
    fn test_numbered_sorts_numerically() {
        let store = SpriteFrameStore::from_frames([
            ("walk_10", frame(10)),
            ("walk_2", frame(2)),
            ("walk_0", frame(1)),
            ("walk_1", frame(1)),
        ]);
        let order: Vec<usize> = store.numbered("walk").iter().map(|(n, _)| *n).collect();
        assert_eq!(order, vec![0, 1, 2, 10]);
    }

    #[test]
    fn test_numbered_ignores_other_bases() {
        let store = SpriteFrameStore::from_frames([
            ("walk_0", frame(1)),
            ("walk_fast_0", frame(1)),
            ("walkabout_0", frame(1)),
            ("walk_", frame(1)),
        ]);
        let order: Vec<usize> = store.numbered("walk").iter().map(|(n, _)| *n).collect();
        assert_eq!(order, vec![0]);
        assert_eq!(store.numbered("walk_fast").len(), 1);
    }

    #[test]
    fn test_load_missing_directory_is_resource_error() {
        let root = std::env::temp_dir().join("petaler-framestore-missing");
        let err = SpriteFrameStore::load(&root, "nobody").unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }

    #[test]
    fn test_load_decodes_pngs_and_skips_others() {
        let root = std::env::temp_dir().join(format!(
            "petaler-framestore-load-{}",
            std::process::id()
        ));
        let dir = root.join("cat").join(ACTION_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        RgbaImage::new(4, 3).save(dir.join("sit_0.png")).unwrap();
        RgbaImage::new(4, 3).save(dir.join("sit_1.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let store = SpriteFrameStore::load(&root, "cat").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("sit_1").unwrap().dimensions(), (4, 3));
        assert!(store.get("notes").is_none());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_load_corrupt_png_is_decode_error() {
        let root = std::env::temp_dir().join(format!(
            "petaler-framestore-corrupt-{}",
            std::process::id()
        ));
        let dir = root.join("cat").join(ACTION_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("sit_0.png"), b"definitely not png").unwrap();

        let err = SpriteFrameStore::load(&root, "cat").unwrap_err();
        assert!(matches!(err, ResourceError::Decode { .. }));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
