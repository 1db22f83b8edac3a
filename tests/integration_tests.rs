//! Integration tests for `smartcube`
//!
//! Tests snapshot persistence across store instances, startup recovery from
//! damaged storage and the mode / hardware workflows end to end.

use smartcube::{
    config::{
        CaseMaterial, FileSnapshotStore, Mode, PartId, STORAGE_KEY, SettingsPatch, SnapshotStore,
        registry,
    },
    error::{CubeError, get_user_friendly_error},
    store::{ConfigStore, StoreEvent},
};
use std::sync::Arc;
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<dyn SnapshotStore> {
    Arc::new(FileSnapshotStore::new(dir.path()))
}

/// State written by one store instance is restored by the next
#[test]
fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = ConfigStore::load(file_store(&dir));
        store.set_mode(Mode::Custom);
        store.set_custom_mode_name("Deep Work");
        store
            .update_mode_settings(&SettingsPatch {
                noise_threshold: Some(45.0),
                led_color: Some("#FF00AA".to_string()),
                ..SettingsPatch::default()
            })
            .unwrap();
        store.set_case_config("#0066CC", CaseMaterial::Metal).unwrap();
        store.toggle_exploded();
        store.set_highlighted_part(Some(PartId::from("led_strip")));
    }

    let store = ConfigStore::load(file_store(&dir));
    assert_eq!(store.current_mode(), Mode::Custom);
    assert_eq!(store.custom_mode_name(), "Deep Work");
    assert_eq!(store.current_mode_label(), "Deep Work");
    assert!((store.current_settings().noise_threshold - 45.0).abs() < f64::EPSILON);
    assert_eq!(store.effective_led_color(), "#ff00aa");
    assert_eq!(store.case_color(), "#0066CC");
    assert_eq!(store.case_material(), CaseMaterial::Metal);

    // Interaction state is never persisted
    assert!(!store.is_exploded());
    assert_eq!(store.highlighted_part(), None);

    // Untouched modes keep their factory settings
    assert_eq!(store.modes().get(Mode::Sleep), &registry::defaults_for(Mode::Sleep));
}

/// The stored file uses the versioned camelCase envelope
#[test]
fn test_snapshot_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSnapshotStore::new(dir.path());

    let mut store = ConfigStore::load(Arc::new(storage.clone()));
    store.set_mode(Mode::Sleep);

    let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["version"], 0);
    assert_eq!(value["state"]["currentMode"], "sleep");
    assert_eq!(value["state"]["caseMaterial"], "matte");
    assert_eq!(value["state"]["customModeName"], "My Mode");
    assert_eq!(value["state"]["modes"]["party"]["ledColor"], "#d900ff");
    assert_eq!(value["state"]["modes"]["study"]["noiseThreshold"], 60.0);
}

/// Garbage on disk yields a default store that still works and persists
#[test]
fn test_corrupt_snapshot_starts_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSnapshotStore::new(dir.path());
    std::fs::write(storage.path_for(STORAGE_KEY), "{\"state\": {\"caseCol").unwrap();

    let mut store = ConfigStore::load(Arc::new(storage.clone()));
    assert_eq!(store.current_mode(), Mode::Study);
    assert_eq!(store.case_color(), "#FFFFFF");
    assert_eq!(store.effective_led_color(), "#00eaff");

    store.set_mode(Mode::Party);
    let reloaded = ConfigStore::load(Arc::new(storage));
    assert_eq!(reloaded.current_mode(), Mode::Party);
}

/// Damaged fields fall back individually, intact ones are kept
#[test]
fn test_partially_damaged_snapshot_keeps_valid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSnapshotStore::new(dir.path());
    let raw = r##"{
        "state": {
            "caseColor": "not-a-colour",
            "caseMaterial": "transparent",
            "currentMode": "disco",
            "customModeName": "Reading",
            "modes": {
                "sleep": { "brightness": 5, "ledColor": "#112233" },
                "party": { "brightness": "loud" }
            }
        },
        "version": 0
    }"##;
    storage.set(STORAGE_KEY, raw).unwrap();

    let store = ConfigStore::load(Arc::new(storage));
    assert_eq!(store.case_color(), "#FFFFFF");
    assert_eq!(store.case_material(), CaseMaterial::Transparent);
    assert_eq!(store.current_mode(), Mode::Study);
    assert_eq!(store.custom_mode_name(), "Reading");

    let sleep = store.modes().get(Mode::Sleep);
    assert!((sleep.brightness - 5.0).abs() < f64::EPSILON);
    assert_eq!(sleep.led_color, "#112233");
    assert!((sleep.white_noise_volume - 60.0).abs() < f64::EPSILON);
    assert_eq!(store.modes().get(Mode::Party), &registry::defaults_for(Mode::Party));
}

/// Case configuration is independent of mode switches and resets
#[test]
fn test_case_config_independent_of_modes() {
    let mut store = ConfigStore::in_memory();
    let events = store.subscribe();

    store.set_case_config("cc0033", CaseMaterial::Transparent).unwrap();
    store.set_mode(Mode::Party);
    store.update_mode_settings(&SettingsPatch::brightness(10.0)).unwrap();
    store.reset_current_mode();

    assert_eq!(store.case_color(), "#cc0033");
    assert_eq!(store.case_material(), CaseMaterial::Transparent);
    assert_eq!(store.current_settings(), &registry::defaults_for(Mode::Party));

    let received: Vec<_> = events.try_iter().collect();
    assert!(matches!(received.first(), Some(StoreEvent::CaseConfigChanged(_))));
    assert!(matches!(received.last(), Some(StoreEvent::ModeReset(Mode::Party))));
}

/// Invalid input is rejected without touching state
#[test]
fn test_invalid_commands_leave_state_untouched() {
    let mut store = ConfigStore::in_memory();
    let before = store.snapshot();

    let err = store.set_case_config("#GGGGGG", CaseMaterial::Metal).unwrap_err();
    assert!(matches!(err, CubeError::InvalidColorFormat(_)));
    assert!(get_user_friendly_error(&err).contains("#GGGGGG"));

    assert!(matches!(
        store.set_mode_by_name("rave"),
        Err(CubeError::UnknownMode(_))
    ));
    assert!(matches!(
        store.set_case_config_by_name("#FFFFFF", "wood"),
        Err(CubeError::UnknownMaterial(_))
    ));
    assert!(
        store
            .update_mode_settings(&SettingsPatch::led_color("blue"))
            .is_err()
    );

    assert_eq!(store.snapshot(), before);
}

/// Live hue editing through the store
#[test]
fn test_hue_edit_workflow() {
    let mut store = ConfigStore::in_memory();
    store.set_mode(Mode::Custom);

    // Pure green at full saturation rotated to blue
    let color = store.set_led_hue(240.0).unwrap();
    assert_eq!(color, "#0000ff");
    assert_eq!(store.effective_led_color(), "#0000ff");

    // Dark grey gains the saturation and lightness floor
    store
        .update_mode_settings(&SettingsPatch::led_color("#111111"))
        .unwrap();
    assert_eq!(store.set_led_hue(120.0).unwrap(), "#40bf40");
}
