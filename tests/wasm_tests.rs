//! Tests for the JSON entry points used by the browser front-end.

use serde_json::{json, Value};
use wosmax::wasm::{
    allocate_json, analyze_training_json, compare_packs_json, efficiency_report_json, get_version,
};

fn call(f: fn(&str) -> String, input: Value) -> Value {
    serde_json::from_str(&f(&input.to_string())).unwrap()
}

#[test]
fn test_analyze_training_uses_defaults() {
    let out = call(
        analyze_training_json,
        json!({"inventory": {"general": 18000.0, "training": 1515.0}}),
    );
    assert_eq!(out["success"], true);
    assert_eq!(out["error"], Value::Null);
    assert_eq!(out["data"]["batches"], 67);
    assert_eq!(out["data"]["base_training_time"], 290.0);
}

#[test]
fn test_invalid_json_is_reported() {
    let out: Value = serde_json::from_str(&analyze_training_json("{oops")).unwrap();
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().starts_with("Invalid input"));
    assert_eq!(out["data"], Value::Null);
}

#[test]
fn test_allocate_rejects_general() {
    let out = call(
        allocate_json,
        json!({"category": "general", "required_minutes": 10.0, "inventory": {"general": 100.0}}),
    );
    assert_eq!(out["success"], false);

    let out = call(
        allocate_json,
        json!({"category": "training", "required_minutes": 500.0,
               "inventory": {"general": 1000.0, "training": 300.0}}),
    );
    assert_eq!(out["data"]["general_used"], 200.0);
    assert_eq!(out["data"]["can_complete"], true);
}

#[test]
fn test_efficiency_report() {
    let out = call(
        efficiency_report_json,
        json!({
            "construction": [
                {"description": "Furnace", "power": 100.0, "speedup_minutes": 50.0, "points_per_power": 30}
            ],
            "training": [
                {"description": "Idle", "days": 0, "hours": 0, "minutes": 0, "seconds": 0,
                 "troops_per_batch": 10, "points_per_troop": 5.0}
            ],
            "inventory": {"general": 100.0}
        }),
    );
    assert_eq!(out["success"], true);
    let rows = out["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Activity Type"], "Construction");
    assert_eq!(rows[0]["Efficiency (Points/Min)"], 60.0);
    assert_eq!(out["data"]["invalid_training"], json!(["Idle"]));
    assert_eq!(out["data"]["summary"]["overall"]["entry_count"], 2);
}

#[test]
fn test_efficiency_report_rejects_invalid_activity() {
    let out = call(
        efficiency_report_json,
        json!({"research": [
            {"description": "Lab", "power": -5.0, "speedup_minutes": 1.0, "points_per_power": 30}
        ]}),
    );
    assert_eq!(out["success"], false);
    assert_eq!(out["error"], "research[0]: Power must be greater than 0");
}

#[test]
fn test_compare_packs() {
    let out = call(
        compare_packs_json,
        json!({"packs": [
            {"name": "Big", "price": 20.0, "total_minutes": 100.0},
            {"name": "Units", "price": 15.0, "hour_speedups": 10, "five_minute_speedups": 20}
        ]}),
    );
    assert_eq!(out["success"], true);
    let packs = out["data"].as_array().unwrap();
    assert_eq!(packs[0]["Pack Name"], "Units");
    assert_eq!(packs[0]["Total Speedup Minutes"], 700.0);
    assert_eq!(packs[1]["Cost per Minute"], 0.2);

    let out = call(
        compare_packs_json,
        json!({"packs": [{"name": "Free", "price": 0.0, "total_minutes": 10.0}]}),
    );
    assert_eq!(out["error"], "Free: Price must be greater than 0.");
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
