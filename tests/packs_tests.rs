//! Tests for pack value comparison and pack contents.

use std::collections::BTreeMap;
use std::fs;

use tempfile::tempdir;
use wosmax::error::Error;
use wosmax::models::{PackRewards, SpeedupContent};
use wosmax::packs::{
    aggregate_pack_rewards, build_entry, export_csv, filter_rows, format_item_name,
    load_pack_rewards, sorted, sorted_indexed, summary_rows, PackSortKey, PackValueStore,
};

fn rewards(items: &[(&str, i64)]) -> PackRewards {
    PackRewards {
        name: Some("Pack".to_string()),
        rewards: Some(items.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
    }
}

#[test]
fn test_build_entry_from_units() {
    let entry = build_entry(
        "  Weekly  ",
        15.0,
        SpeedupContent::Units {
            hours: 10,
            five_minutes: 20,
        },
    );
    assert_eq!(entry.pack_name, "Weekly");
    assert_eq!(entry.hour_speedups, Some(10));
    assert_eq!(entry.five_minute_speedups, Some(20));
    assert_eq!(entry.total_speedup_minutes, 700.0);
    assert_eq!(entry.cost_per_minute, 0.0214);
}

#[test]
fn test_store_add_list_remove_clear() {
    let dir = tempdir().unwrap();
    let store = PackValueStore::open(dir.path().join("pack_value_comparison.json"));
    assert!(store.entries().unwrap().is_empty());

    let outcome = store.add("Big", 20.0, SpeedupContent::Minutes(100.0)).unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Pack 'Big' added.");
    store
        .add(
            "Small",
            5.0,
            SpeedupContent::Units {
                hours: 1,
                five_minutes: 0,
            },
        )
        .unwrap();

    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].pack_name, "Big");
    assert_eq!(entries[0].hour_speedups, None);

    let outcome = store.remove(5).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "No pack at position 5");

    let outcome = store.remove(0).unwrap();
    assert_eq!(outcome.message, "Removed 'Big'.");
    assert_eq!(store.entries().unwrap()[0].pack_name, "Small");

    let outcome = store.clear().unwrap();
    assert_eq!(outcome.message, "All history cleared.");
    assert!(store.entries().unwrap().is_empty());
}

#[test]
fn test_store_rejects_invalid_packs() {
    let dir = tempdir().unwrap();
    let store = PackValueStore::open(dir.path().join("packs.json"));

    let outcome = store.add("   ", 5.0, SpeedupContent::Minutes(10.0)).unwrap();
    assert_eq!(outcome.message, "Pack name cannot be empty.");
    let outcome = store.add("Free", 0.0, SpeedupContent::Minutes(10.0)).unwrap();
    assert_eq!(outcome.message, "Price must be greater than 0.");
    let outcome = store
        .add(
            "Empty",
            5.0,
            SpeedupContent::Units {
                hours: 0,
                five_minutes: 0,
            },
        )
        .unwrap();
    assert_eq!(outcome.message, "At least one speedup must be greater than 0.");

    assert!(store.entries().unwrap().is_empty());
}

#[test]
fn test_store_reads_minutes_only_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packs.json");
    fs::write(
        &path,
        r#"[{"Pack Name": "Old", "Price": 10.0, "Total Speedup Minutes": 200.0, "Cost per Minute": 0.05}]"#,
    )
    .unwrap();

    let entries = PackValueStore::open(&path).entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].five_minute_speedups, None);
    assert_eq!(entries[0].cost_per_minute, 0.05);
}

#[test]
fn test_store_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packs.json");
    fs::write(&path, "{").unwrap();
    assert!(matches!(
        PackValueStore::open(&path).entries(),
        Err(Error::Json { .. })
    ));
}

#[test]
fn test_sorted_by_columns() {
    let packs = vec![
        build_entry("B", 20.0, SpeedupContent::Minutes(100.0)),
        build_entry("A", 5.0, SpeedupContent::Minutes(50.0)),
        build_entry("C", 10.0, SpeedupContent::Minutes(400.0)),
    ];
    let names = |v: Vec<wosmax::models::PackValueEntry>| -> Vec<String> {
        v.into_iter().map(|e| e.pack_name).collect()
    };

    assert_eq!(names(sorted(&packs, PackSortKey::Name, true)), ["A", "B", "C"]);
    assert_eq!(names(sorted(&packs, PackSortKey::Price, false)), ["B", "C", "A"]);
    assert_eq!(names(sorted(&packs, PackSortKey::TotalMinutes, true)), ["A", "B", "C"]);
    assert_eq!(names(sorted(&packs, PackSortKey::CostPerMinute, true)), ["C", "A", "B"]);
    assert_eq!("cost-per-minute".parse::<PackSortKey>().unwrap(), PackSortKey::CostPerMinute);
    assert!("colour".parse::<PackSortKey>().is_err());
}

#[test]
fn test_sorted_listing_index_removes_that_pack() {
    let dir = tempdir().unwrap();
    let store = PackValueStore::open(dir.path().join("pack_value_comparison.json"));
    store.add("Expensive", 50.0, SpeedupContent::Minutes(100.0)).unwrap();
    store.add("Cheap", 5.0, SpeedupContent::Minutes(100.0)).unwrap();

    let listing = sorted_indexed(&store.entries().unwrap(), PackSortKey::CostPerMinute, true);
    assert_eq!(listing[0].1.pack_name, "Cheap");
    assert_eq!(listing[0].0, 1);
    assert_eq!(listing[1].0, 0);

    let outcome = store.remove(listing[0].0).unwrap();
    assert_eq!(outcome.message, "Removed 'Cheap'.");
    let left = store.entries().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].pack_name, "Expensive");
}

#[test]
fn test_export_csv_has_every_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packs.csv");
    let packs = vec![
        build_entry("Minutes", 10.0, SpeedupContent::Minutes(100.0)),
        build_entry(
            "Units",
            5.0,
            SpeedupContent::Units {
                hours: 1,
                five_minutes: 2,
            },
        ),
    ];
    export_csv(&packs, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Pack Name,Price,60min Speedups,5min Speedups,Total Speedup Minutes,Cost per Minute"
    );
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].split(',').count(), 6);
    assert_eq!(lines[2].split(',').count(), 6);
}

#[test]
fn test_aggregate_pack_rewards_converts_speedups() {
    let packs = vec![
        rewards(&[("1h_speedups", 2), ("5m_speedups_training", 6), ("meat_10k", 3)]),
        rewards(&[("1h_speedups_training", 1), ("meat_10k", 2), ("fire_crystal", 40)]),
        PackRewards {
            name: Some("Broken".to_string()),
            rewards: None,
        },
    ];
    let summary = aggregate_pack_rewards(&packs);

    assert_eq!(summary.pack_count, 3);
    assert_eq!(summary.total_speedup_minutes, 120 + 30 + 60);
    assert_eq!(summary.items["speedup_minutes"], 210);
    assert_eq!(summary.items["meat_10k"], 5);
    assert!(!summary.items.contains_key("1h_speedups"));

    let rows = summary_rows(&summary);
    assert_eq!(
        rows,
        vec![
            ("Speed-up Minutes".to_string(), 210),
            ("Fire Crystal".to_string(), 40),
            ("Meat (10K)".to_string(), 5),
        ]
    );
    assert_eq!(filter_rows(&rows, "MEAT"), vec![("Meat (10K)".to_string(), 5)]);
}

#[test]
fn test_format_item_name() {
    assert_eq!(format_item_name("steel_100k"), "Steel (100K)");
    assert_eq!(format_item_name("wood_1k"), "Wood (1K)");
    assert_eq!(format_item_name("chief_gear_charm"), "Chief Gear Charm");
}

#[test]
fn test_load_pack_rewards() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pack_items.json");
    assert!(load_pack_rewards(&path).unwrap().is_empty());

    fs::write(
        &path,
        r#"[{"name": "Daily", "rewards": {"1h_speedups": 1}}, {"name": "Odd"}]"#,
    )
    .unwrap();
    let packs = load_pack_rewards(&path).unwrap();
    assert_eq!(packs.len(), 2);
    assert_eq!(
        packs[0].rewards,
        Some(BTreeMap::from([("1h_speedups".to_string(), 1)]))
    );
    assert_eq!(packs[1].rewards, None);
}
