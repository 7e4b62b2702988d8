//! Tests for the Hall of Chiefs record store.

use std::fs;

use serde_json::json;
use tempfile::{tempdir, TempDir};
use wosmax::error::Error;
use wosmax::models::{
    ActivityEntry, Category, PointsPerPower, PowerActivity, SpeedupInventory, TrainingActivity,
};
use wosmax::store::RecordStore;

fn open_store() -> (TempDir, RecordStore) {
    let dir = tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("hall_of_chiefs_data.json")).unwrap();
    (dir, store)
}

fn furnace() -> ActivityEntry {
    ActivityEntry::Construction(PowerActivity {
        description: "Furnace 25".to_string(),
        power: 12_000.0,
        speedup_minutes: 3_000.0,
        points_per_power: PointsPerPower::Thirty,
    })
}

fn zero_time_training() -> ActivityEntry {
    ActivityEntry::Training(TrainingActivity {
        description: "Forgot the timer".to_string(),
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        troops_per_batch: 426,
        points_per_troop: 830.0,
    })
}

#[test]
fn test_open_bootstraps_empty_document() {
    let (_dir, store) = open_store();
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();

    assert_eq!(raw["construction"], json!([]));
    assert_eq!(raw["research"], json!([]));
    assert_eq!(raw["training"], json!([]));
    assert_eq!(raw["metadata"]["version"], "1.0");
    assert!(raw["metadata"]["created"].is_string());
}

#[test]
fn test_add_update_delete_round_trip() {
    let (_dir, store) = open_store();

    let outcome = store.add(furnace()).unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Entry added successfully to construction");

    let entries = store.get_entries(Category::Construction).unwrap();
    assert_eq!(entries.len(), 1);
    let added = entries[0].clone();
    assert!(added.id.starts_with("construction_"));
    assert!(added.updated_at.is_none());

    let changed = ActivityEntry::Construction(PowerActivity {
        description: "Furnace 26".to_string(),
        power: 15_000.0,
        speedup_minutes: 4_000.0,
        points_per_power: PointsPerPower::FortyFive,
    });
    let outcome = store.update(Category::Construction, &added.id, changed.clone()).unwrap();
    assert!(outcome.success, "{}", outcome.message);

    let updated = store.get_entries(Category::Construction).unwrap()[0].clone();
    assert_eq!(updated.id, added.id);
    assert_eq!(updated.created_at, added.created_at);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.fields, changed);

    let outcome = store.delete(Category::Construction, &added.id).unwrap();
    assert!(outcome.success);
    assert!(store.get_entries(Category::Construction).unwrap().is_empty());
}

#[test]
fn test_ids_are_unique_for_rapid_adds() {
    let (_dir, store) = open_store();
    for _ in 0..5 {
        assert!(store.add(furnace()).unwrap().success);
    }
    let mut ids: Vec<String> = store
        .get_entries(Category::Construction)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_add_rejects_domain_violations() {
    let (_dir, store) = open_store();
    let outcome = store
        .add(ActivityEntry::Research(PowerActivity {
            description: "Lab".to_string(),
            power: 0.0,
            speedup_minutes: 10.0,
            points_per_power: PointsPerPower::Thirty,
        }))
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Power must be greater than 0");
    assert!(store.get_entries(Category::Research).unwrap().is_empty());
}

#[test]
fn test_add_value_reports_field_problems() {
    let (_dir, store) = open_store();

    let outcome = store
        .add_value(Category::Research, &json!({"description": "Lab", "power": 10.0}))
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Missing required field: speedup_minutes");

    let outcome = store
        .add_value(
            Category::Construction,
            &json!({
                "description": "Wall",
                "power": "lots",
                "speedup_minutes": 10.0,
                "points_per_power": 30
            }),
        )
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid type for power: expected float, got str");

    let outcome = store
        .add_value(
            Category::Construction,
            &json!({
                "description": "Wall",
                "power": 10.0,
                "speedup_minutes": 10.0,
                "points_per_power": 40
            }),
        )
        .unwrap();
    assert_eq!(outcome.message, "Points per power must be 30 or 45");
}

#[test]
fn test_zero_time_training_is_accepted() {
    let (_dir, store) = open_store();
    let outcome = store.add(zero_time_training()).unwrap();
    assert!(outcome.success);
    assert_eq!(store.get_entry_count(Some(Category::Training)).unwrap()[&Category::Training], 1);
}

#[test]
fn test_update_rejects_category_change_and_unknown_id() {
    let (_dir, store) = open_store();
    store.add(furnace()).unwrap();
    let id = store.get_entries(Category::Construction).unwrap()[0].id.clone();

    let outcome = store.update(Category::Construction, &id, zero_time_training()).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Entry category training does not match construction");

    let outcome = store.update(Category::Construction, "construction_missing", furnace()).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Entry with ID construction_missing not found");
}

#[test]
fn test_delete_unknown_id() {
    let (_dir, store) = open_store();
    let outcome = store.delete(Category::Training, "nope").unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Entry with ID nope not found");
}

#[test]
fn test_delete_all() {
    let (_dir, store) = open_store();
    store.add(furnace()).unwrap();
    store.add(zero_time_training()).unwrap();

    let outcome = store.delete_all(Some(Category::Construction)).unwrap();
    assert_eq!(outcome.message, "All entries from construction deleted");
    let counts = store.get_entry_count(None).unwrap();
    assert_eq!(counts[&Category::Construction], 0);
    assert_eq!(counts[&Category::Training], 1);

    let outcome = store.delete_all(None).unwrap();
    assert_eq!(outcome.message, "All entries from all categories deleted");
    assert!(store.get_all_entries().unwrap().is_empty());
}

#[test]
fn test_reads_reflect_external_changes() {
    let (_dir, store) = open_store();
    let other = RecordStore::open(store.path()).unwrap();
    other.add(furnace()).unwrap();
    assert_eq!(store.get_entries(Category::Construction).unwrap().len(), 1);
}

#[test]
fn test_backup_is_verbatim_copy() {
    let (dir, store) = open_store();
    store.add(furnace()).unwrap();

    let backup = dir.path().join("backups").join("hall.json");
    store.backup_data(&backup).unwrap();
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        fs::read_to_string(store.path()).unwrap()
    );
}

#[test]
fn test_persist_speedup_inventory_keeps_entries() {
    let (_dir, store) = open_store();
    store.add(furnace()).unwrap();

    let inventory = SpeedupInventory {
        general: 100.0,
        ..Default::default()
    };
    store.persist_speedup_inventory(&inventory).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["metadata"]["speedup_inventory"]["general"], 100.0);
    assert_eq!(store.get_entries(Category::Construction).unwrap().len(), 1);
}

#[test]
fn test_malformed_document_is_an_error() {
    let (_dir, store) = open_store();
    fs::write(store.path(), "[]").unwrap();
    assert!(matches!(store.get_all_entries(), Err(Error::Json { .. })));
}

#[test]
fn test_open_reads_timestamps_without_offset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hall_of_chiefs_data.json");
    let doc = json!({
        "construction": [{
            "id": "construction_20240101_120000_000001",
            "description": "Furnace",
            "power": 100.0,
            "speedup_minutes": 50.0,
            "points_per_power": 30,
            "created_at": "2024-01-01T12:00:00.123456",
            "updated_at": "2024-01-02T08:30:00"
        }],
        "research": [],
        "training": [],
        "metadata": {"created": "2024-01-01T11:59:59.000001", "version": "1.0"}
    });
    fs::write(&path, doc.to_string()).unwrap();

    let store = RecordStore::open(path.clone()).unwrap();
    let entries = store.get_entries(Category::Construction).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].created_at.naive_local().to_string(),
        "2024-01-01 12:00:00.123456"
    );
    assert!(entries[0].updated_at.is_some());
}
