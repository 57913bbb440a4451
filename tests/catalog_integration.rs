//! Building frame stores and catalogs from pet directories on disk.

mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::{ACT_CONF, FRAMES, PET_CONF, TempRoles};
use petaler::error::{ActivationError, CatalogError, ResourceError};
use petaler::resources::actioncatalog::ActionCatalog;
use petaler::resources::framestore::SpriteFrameStore;
use petaler::resources::petconfig::list_pets;

#[test]
fn test_build_standard_pet_from_disk() {
    let roles = TempRoles::new("catalog");
    roles.add_standard_pet("cat");

    let frames = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    assert_eq!(frames.len(), FRAMES.len());
    let catalog = ActionCatalog::build(&roles.dir, "cat", frames).unwrap();

    assert_eq!(catalog.pet_name, "cat");
    assert_eq!(catalog.width, 64.0);
    assert_eq!(catalog.height, 48.0);
    assert_eq!(catalog.refresh, Duration::from_millis(20));
    assert_eq!(catalog.interaction_tick, Duration::from_millis(10));
    assert_eq!(catalog.cumulative(), &[0.5, 1.0]);
    let stroll = catalog.group("stroll").unwrap();
    assert_eq!(stroll.len(), 2);
    assert_eq!(stroll.actions[0].frames.len(), 3);
    assert!(Arc::ptr_eq(&stroll.actions[1], &catalog.core.default));
    assert_eq!(catalog.initial_frame().dimensions(), (8, 6));
}

#[test]
fn test_frames_are_ordered_numerically() {
    let roles = TempRoles::new("numeric");
    let frames: Vec<(String, u32, u32)> = (0..12).map(|i| (format!("walk_{}", i), i + 1, 1)).collect();
    let frame_refs: Vec<(&str, u32, u32)> = frames.iter().map(|(s, w, h)| (s.as_str(), *w, *h)).collect();
    let pet_conf = r#"{"default":"walk","up":"walk","down":"walk","left":"walk","right":"walk",
                      "random_act":[["walk"]]}"#;
    roles.add_pet("cat", pet_conf, r#"{"walk":{"images":"walk"}}"#, &frame_refs);

    let store = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    let catalog = ActionCatalog::build(&roles.dir, "cat", store).unwrap();
    let widths: Vec<u32> = catalog.core.default.frames.iter().map(|f| f.width()).collect();
    assert_eq!(widths, (1..=12).collect::<Vec<u32>>());
}

#[test]
fn test_scale_resizes_loaded_frames() {
    let roles = TempRoles::new("scale");
    roles.add_pet("cat", &PET_CONF.replace("\"scale\": 1.0", "\"scale\": 0.5"), ACT_CONF, FRAMES);
    let store = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    let catalog = ActionCatalog::build(&roles.dir, "cat", store).unwrap();
    assert_eq!(catalog.width, 32.0);
    assert_eq!(catalog.core.left.frames[0].dimensions(), (4, 3));
    assert_eq!(catalog.core.left.frame_move, 2.5);
}

#[test]
fn test_missing_action_dir_is_resource_error() {
    let roles = TempRoles::new("nodir");
    assert!(matches!(
        SpriteFrameStore::load(&roles.dir, "ghost"),
        Err(ResourceError::Io { .. })
    ));
}

#[test]
fn test_undecodable_png_is_resource_error() {
    let roles = TempRoles::new("corrupt");
    roles.add_standard_pet("cat");
    fs::write(roles.dir.join("cat").join("action").join("broken_0.png"), b"not a png").unwrap();
    assert!(matches!(
        SpriteFrameStore::load(&roles.dir, "cat"),
        Err(ResourceError::Decode { .. })
    ));
}

#[test]
fn test_non_png_files_are_ignored() {
    let roles = TempRoles::new("notes");
    roles.add_standard_pet("cat");
    fs::write(roles.dir.join("cat").join("action").join("README.txt"), "frames").unwrap();
    let store = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    assert_eq!(store.len(), FRAMES.len());
}

#[test]
fn test_malformed_pet_document_is_resource_error() {
    let roles = TempRoles::new("badjson");
    roles.add_pet("cat", "{ not json", ACT_CONF, FRAMES);
    let store = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    assert!(matches!(
        ActionCatalog::build(&roles.dir, "cat", store),
        Err(ActivationError::Resource(ResourceError::Json { .. }))
    ));
}

#[test]
fn test_missing_frames_is_catalog_error() {
    let roles = TempRoles::new("noframes");
    roles.add_pet("cat", PET_CONF, ACT_CONF, &FRAMES[..2]);
    let store = SpriteFrameStore::load(&roles.dir, "cat").unwrap();
    match ActionCatalog::build(&roles.dir, "cat", store) {
        Err(ActivationError::Catalog(CatalogError::MissingFrames { base, .. })) => {
            assert_eq!(base, "walk")
        }
        other => panic!("unexpected result: {:?}", other.map(|c| c.pet_name)),
    }
}

#[test]
fn test_roster_lists_configured_pets() {
    let roles = TempRoles::new("roster");
    roles.add_standard_pet("zed");
    roles.add_standard_pet("amy");
    fs::create_dir_all(roles.dir.join("not-a-pet")).unwrap();
    assert_eq!(list_pets(&roles.dir).unwrap(), vec!["amy", "zed"]);
}
