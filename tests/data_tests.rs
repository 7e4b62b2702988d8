//! Tests for purchase CSV loading and exports.

use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;
use wosmax::data::{
    append_manual_purchase, export_combined_purchases, export_efficiency_csv,
    load_automatic_purchases, load_manual_purchases, parse_purchase_date, save_manual_purchases,
    table_to_csv, validate_manual_purchase,
};
use wosmax::error::Error;
use wosmax::models::{Category, EfficiencyRow, ManualPurchase};
use wosmax::report::merge_purchases;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn purchase(name: &str, spending: f64) -> ManualPurchase {
    ManualPurchase {
        date: date(2024, 4, 2),
        pack_name: name.to_string(),
        spending,
        speedups: 300.0,
    }
}

#[test]
fn test_parse_purchase_date_formats() {
    let expected = date(2024, 3, 1);
    assert_eq!(parse_purchase_date("2024-03-01").unwrap(), expected);
    assert_eq!(parse_purchase_date("01/03/2024").unwrap(), expected);
    assert_eq!(parse_purchase_date(" 2024-03-01T23:59:59 ").unwrap(), expected);
    assert!(matches!(
        parse_purchase_date("March 1st"),
        Err(Error::InvalidDate(_))
    ));
}

#[test]
fn test_missing_files_load_as_none() {
    let dir = tempdir().unwrap();
    assert!(load_automatic_purchases(&dir.path().join("purchase_history.csv"))
        .unwrap()
        .is_none());
    assert!(load_manual_purchases(&dir.path().join("manual_purchases.csv"))
        .unwrap()
        .is_none());
}

#[test]
fn test_load_automatic_purchases() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("purchase_history.csv");
    fs::write(
        &path,
        "Date,Purchase Name,Value (R$)\n2024-01-10 08:15:00, Starter ,4.9\n2024-03-05,Weekly Pack,24.9\n",
    )
    .unwrap();

    let rows = load_automatic_purchases(&path).unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date(2024, 1, 10));
    assert_eq!(rows[0].purchase_name, "Starter");
    assert_eq!(rows[1].value, 24.9);
}

#[test]
fn test_bad_date_in_csv_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("purchase_history.csv");
    fs::write(&path, "Date,Purchase Name,Value (R$)\nyesterday,Starter,4.9\n").unwrap();
    assert!(matches!(
        load_automatic_purchases(&path),
        Err(Error::Csv { .. })
    ));
}

#[test]
fn test_append_writes_header_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual_purchases.csv");

    append_manual_purchase(&path, &purchase("First", 9.99)).unwrap();
    append_manual_purchase(&path, &purchase("Second", 4.99)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("Pack Name").count(), 1);
    assert!(text.starts_with("Date,Pack Name,Spending ($),Speed-ups (min)\n"));

    let rows = load_manual_purchases(&path).unwrap().unwrap();
    assert_eq!(rows, vec![purchase("First", 9.99), purchase("Second", 4.99)]);
}

#[test]
fn test_manual_file_without_speedups_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual_purchases.csv");
    fs::write(&path, "Date,Pack Name,Spending ($)\n2024-02-01,Bundle,9.99\n").unwrap();

    let rows = load_manual_purchases(&path).unwrap().unwrap();
    assert_eq!(rows[0].speedups, 0.0);
}

#[test]
fn test_save_manual_purchases_rewrites_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual_purchases.csv");
    append_manual_purchase(&path, &purchase("First", 9.99)).unwrap();
    append_manual_purchase(&path, &purchase("Second", 4.99)).unwrap();

    save_manual_purchases(&path, &[purchase("Second", 4.99)]).unwrap();
    let rows = load_manual_purchases(&path).unwrap().unwrap();
    assert_eq!(rows, vec![purchase("Second", 4.99)]);
}

#[test]
fn test_validate_manual_purchase() {
    assert!(validate_manual_purchase(&purchase("Ok", 1.0)).is_ok());
    assert_eq!(
        validate_manual_purchase(&purchase(" ", 1.0)).unwrap_err(),
        "Pack name is required"
    );
    assert_eq!(
        validate_manual_purchase(&purchase("Free", 0.0)).unwrap_err(),
        "Spending must be greater than 0"
    );
}

#[test]
fn test_export_combined_purchases() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("combined_purchases.csv");

    assert!(!export_combined_purchases(&path, &[]).unwrap());
    assert!(!path.exists());

    let manual = vec![purchase("First", 9.99)];
    let merged = merge_purchases(None, Some(manual.as_slice()));
    assert!(export_combined_purchases(&path, &merged).unwrap());

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Date,Pack Name,Amount,Speed-ups,Source"));
    assert_eq!(lines.next(), Some("2024-04-02,First,9.99,300.0,Manual"));
}

#[test]
fn test_export_efficiency_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let row = EfficiencyRow {
        id: "research_1".to_string(),
        activity_type: Category::Research,
        description: "Lab".to_string(),
        power: 10.0,
        total_points: 450.0,
        speedup_minutes: 90.0,
        efficiency: 5.0,
        points_per_power: 45,
        invalid: false,
    };
    export_efficiency_csv(&path, &[row.clone()]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(
        "id,Activity Type,Description,Power,Total Points,Speed-up Minutes,Efficiency (Points/Min),Points per Power\n"
    ));
    assert!(text.contains("research_1,Research,Lab"));
    assert_eq!(table_to_csv(&[row]).unwrap(), text);
}
