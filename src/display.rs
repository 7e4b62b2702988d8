//! Display and formatting utilities for Wosmax.
//!
//! This module provides the number formatters shared by the CLI and the
//! WebAssembly front-end, and the `display_*` functions that print results
//! to stdout.

use crate::formulas::cost_per_minute;
use crate::models::{
    ActivityEntry, Allocation, Category, EfficiencyRow, EfficiencySummary, PackValueEntry,
    PurchaseRecord, PurchaseStats, RewardSummary, SpeedupInventory, StoreOutcome,
    StoredActivity, TrainingAnalysis,
};

const RULE: &str = "----------------------------------------------------------------";

/// Formats a duration in minutes to a human-readable string.
///
/// Zero-valued units are omitted; a duration under one minute prints as `0m`.
/// Negative durations print as whole minutes.
///
/// # Example
///
/// ```
/// use wosmax::display::format_duration;
///
/// assert_eq!(format_duration(1565.0), "1d 2h 5m");
/// assert_eq!(format_duration(120.0), "2h");
/// assert_eq!(format_duration(0.0), "0m");
/// assert_eq!(format_duration(-30.0), "-30m");
/// ```
pub fn format_duration(minutes: f64) -> String {
    if minutes < 0.0 {
        return format!("{}m", minutes.trunc() as i64);
    }
    let days = (minutes / 1440.0).floor() as u64;
    let hours = ((minutes % 1440.0) / 60.0).floor() as u64;
    let mins = (minutes % 60.0).floor() as u64;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(format!("{mins}m"));
    }
    parts.join(" ")
}

/// Inserts `,` between every group of three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if value < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{}.{f}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(int_part)),
    }
}

/// Formats an amount as dollars with two decimals.
///
/// ```
/// use wosmax::display::format_currency;
///
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// ```
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_grouped(amount, 2))
}

/// Formats a number rounded to an integer with thousands separators.
///
/// ```
/// use wosmax::display::format_number;
///
/// assert_eq!(format_number(1_234_567.4), "1,234,567");
/// ```
pub fn format_number(number: f64) -> String {
    format_grouped(number, 0)
}

/// Warning for a training entry whose batch time is zero. The entry stays in
/// the efficiency report with zero points.
///
/// ```
/// use wosmax::display::zero_training_warning;
///
/// assert!(zero_training_warning("Idle").contains("will show 0 points"));
/// ```
pub fn zero_training_warning(description: &str) -> String {
    format!("[WARNING] '{description}' has zero training time and will show 0 points in the report.")
}

/// Prints a store outcome message verbatim.
pub fn display_outcome(outcome: &StoreOutcome) {
    if outcome.success {
        println!("{}", outcome.message);
    } else {
        println!("[REJECTED] {}", outcome.message);
    }
}

pub fn display_inventory(inventory: &SpeedupInventory) {
    println!();
    println!("[SPEED-UP INVENTORY]");
    println!("{RULE}");
    println!("  General:       {:>12}  ({})", format_number(inventory.general), format_duration(inventory.general));
    println!("  Construction:  {:>12}  ({})", format_number(inventory.construction), format_duration(inventory.construction));
    println!("  Research:      {:>12}  ({})", format_number(inventory.research), format_duration(inventory.research));
    println!("  Training:      {:>12}  ({})", format_number(inventory.training), format_duration(inventory.training));
    println!("{RULE}");
    println!("  Total:         {:>12}  ({})", format_number(inventory.total()), format_duration(inventory.total()));
    println!();
}

/// Prints how a requirement would be split between the category and general pools.
pub fn display_allocation(category: Category, required_minutes: f64, allocation: &Allocation) {
    println!();
    println!("[ALLOCATION] {} needs {}", category.label(), format_duration(required_minutes));
    println!("{RULE}");
    println!("  {} speed-ups used: {}", category.label(), format_number(allocation.category_used));
    println!("  General speed-ups used: {}", format_number(allocation.general_used));
    println!("  Total used:             {}", format_number(allocation.total_used));
    println!("  Remaining {}: {}", category.key(), format_number(allocation.remaining_category));
    println!("  Remaining general:      {}", format_number(allocation.remaining_general));
    if allocation.can_complete {
        println!("  Status: enough speed-ups to finish");
    } else {
        println!(
            "  Status: short by {}",
            format_duration(required_minutes - allocation.total_used)
        );
    }
    println!();
}

/// Displays the complete training calculator results to stdout.
pub fn display_training_analysis(analysis: &TrainingAnalysis) {
    println!();
    println!("+================================================================+");
    println!("|              TROOP TRAINING SPEED-UP ANALYSIS                 |");
    println!("+================================================================+");
    println!();
    println!("[TRAINING]");
    println!("{RULE}");
    println!("  Base time per batch:      {}", format_duration(analysis.base_training_time));
    println!("  Effective time per batch: {}", format_duration(analysis.effective_training_time));
    println!("  Points per batch:         {}", format_number(analysis.points_per_batch));
    println!();
    println!("[RESULTS]");
    println!("{RULE}");
    println!("  Available speed-ups:  {} ({})", format_number(analysis.available_speedups), format_duration(analysis.available_speedups));
    println!("  Batches:              {}", analysis.batches);
    println!("  Total points:         {}", format_number(analysis.total_points));
    println!("  Speed-ups used:       {}", format_duration(analysis.training_time_used));
    println!("  Speed-ups remaining:  {}", format_duration(analysis.remaining_speedups));
    println!("  Points per minute:    {:.2}", analysis.efficiency.points_per_minute);
    println!("  Efficiency score:     {:.2}", analysis.efficiency.score);
    if let Some(minutes) = analysis.minutes_to_target {
        println!("  Needed for target:    {}", format_duration(minutes));
    }
    println!();
    println!("[SPEED-UP USAGE]");
    println!("{RULE}");
    println!("  Training speed-ups:   {}", format_number(analysis.allocation.category_used));
    println!("  General speed-ups:    {}", format_number(analysis.allocation.general_used));
    println!();
}

/// Prints stored entries of one category with their ids.
pub fn display_entries(entries: &[StoredActivity]) {
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    for entry in entries {
        match &entry.fields {
            ActivityEntry::Construction(a) | ActivityEntry::Research(a) => println!(
                "  {}  {}  power {}  {}  x{}",
                entry.id,
                a.description,
                format_number(a.power),
                format_duration(a.speedup_minutes),
                a.points_per_power.value()
            ),
            ActivityEntry::Training(t) => println!(
                "  {}  {}  {}  {} troops x {} pts",
                entry.id,
                t.description,
                format_duration(t.base_minutes()),
                t.troops_per_batch,
                format_number(t.points_per_troop)
            ),
        }
    }
}

/// Prints the efficiency table ranked by points per minute, then the summary.
pub fn display_efficiency_report(rows: &[EfficiencyRow], summary: &EfficiencySummary) {
    println!();
    println!("[HALL OF CHIEFS EFFICIENCY]");
    println!("{RULE}");
    println!(
        "{:<13} {:<28} {:>12} {:>10} {:>10}",
        "Type", "Description", "Points", "Minutes", "Pts/Min"
    );
    println!("{RULE}");

    let mut ranked: Vec<&EfficiencyRow> = rows.iter().collect();
    ranked.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
    for row in ranked {
        println!(
            "{:<13} {:<28} {:>12} {:>10} {:>10.2}",
            row.activity_type.label(),
            row.description,
            format_number(row.total_points),
            format_number(row.speedup_minutes),
            row.efficiency
        );
    }

    println!();
    println!("[SUMMARY]");
    println!("{RULE}");
    for (category, s) in &summary.by_category {
        if s.entry_count == 0 {
            continue;
        }
        println!(
            "  {:<13} {:>3} entries  {:>12} pts  {:>10} min  avg {:.2}",
            category.label(),
            s.entry_count,
            format_number(s.total_points),
            format_number(s.total_speedups),
            s.avg_efficiency
        );
    }
    let overall = &summary.overall;
    println!(
        "  {:<13} {:>3} entries  {:>12} pts  {:>10} min  avg {:.2}",
        "Overall",
        overall.entry_count,
        format_number(overall.total_points),
        format_number(overall.total_speedups),
        overall.avg_efficiency
    );
    println!();
}

/// Prints the pack comparison table in the given order. Each row is numbered
/// with the entry's stored index so it can be passed to `packs remove`.
pub fn display_packs(entries: &[(usize, PackValueEntry)]) {
    if entries.is_empty() {
        println!("No packs recorded.");
        return;
    }
    println!();
    println!("[PACK VALUE COMPARISON]");
    println!("{RULE}");
    println!(
        "{:>3} {:<24} {:>10} {:>12} {:>10}",
        "#", "Pack", "Price", "Minutes", "$/Min"
    );
    println!("{RULE}");
    for (index, entry) in entries {
        println!(
            "{:>3} {:<24} {:>10} {:>12} {:>10.4}",
            index,
            entry.pack_name,
            format_currency(entry.price),
            format_number(entry.total_speedup_minutes),
            entry.cost_per_minute
        );
    }

    let total_price: f64 = entries.iter().map(|(_, e)| e.price).sum();
    let total_minutes: f64 = entries.iter().map(|(_, e)| e.total_speedup_minutes).sum();
    println!("{RULE}");
    println!(
        "    {:<24} {:>10} {:>12} {:>10.4}",
        "Combined",
        format_currency(total_price),
        format_number(total_minutes),
        cost_per_minute(total_price, total_minutes)
    );
    println!();
}

/// Prints aggregated pack rewards.
pub fn display_reward_summary(rows: &[(String, i64)], summary: &RewardSummary) {
    println!();
    println!("[PACK CONTENTS] {} packs", summary.pack_count);
    println!("{RULE}");
    println!(
        "  Speed-ups: {} ({})",
        format_number(summary.total_speedup_minutes as f64),
        format_duration(summary.total_speedup_minutes as f64)
    );
    println!("{RULE}");
    for (name, quantity) in rows {
        println!("  {:<36} {:>14}", name, format_number(*quantity as f64));
    }
    println!();
}

/// Prints merged purchases (numbered for deletion) and spending statistics.
pub fn display_purchases(records: &[PurchaseRecord], stats: &PurchaseStats) {
    println!();
    println!("[PURCHASES]");
    println!("{RULE}");
    if records.is_empty() {
        println!("  No purchases in range.");
    }
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>3} {}  {:<26} {:>10} {:>8}  {:?}",
            i,
            record.date,
            record.pack_name,
            format_currency(record.amount),
            format_number(record.speedups),
            record.source
        );
    }
    println!();
    println!("[SPENDING]");
    println!("{RULE}");
    println!("  Automatic:       {}", format_currency(stats.total_spent_auto));
    println!("  Manual:          {}", format_currency(stats.total_spent_manual));
    println!("  Manual speed-ups: {}", format_duration(stats.total_speedups));
    println!("  Daily average:   {}", format_currency(stats.daily.average));
    println!();
}
