//! Aggregation and reporting.
//!
//! Every function here recomputes its result from the snapshot it is given;
//! nothing is cached or updated incrementally. Per-row problems (a training
//! entry with no duration, a formula rejecting a row) are absorbed into
//! annotated zero rows instead of failing the whole table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{Error, Result};
use crate::formulas::{
    batches_and_points, effective_training_time, efficiency_metrics, speedups_needed,
};
use crate::inventory::{allocate, total_for_category};
use crate::models::{
    AllEntries, AutomaticPurchase, Category, CategorySummary, DailySpending, EfficiencyRow,
    EfficiencySummary, ManualPurchase, PowerActivity, PurchaseRecord, PurchaseSource,
    PurchaseStats, SpeedupInventory, StoredEntry, TrainingActivity, TrainingAnalysis,
    TrainingParameters,
};

/// Suffix appended to the description of a training row with no duration.
pub const INVALID_TRAINING_MARKER: &str = " ⚠️ (Invalid: Zero training time)";

fn ratio(points: f64, minutes: f64) -> f64 {
    if minutes > 0.0 {
        points / minutes
    } else {
        0.0
    }
}

fn power_row(category: Category, entry: &StoredEntry<PowerActivity>) -> EfficiencyRow {
    let activity = &entry.fields;
    let points_per_power = activity.points_per_power.value();
    let total_points = activity.power * f64::from(points_per_power);
    EfficiencyRow {
        id: entry.id.clone(),
        activity_type: category,
        description: activity.description.clone(),
        power: activity.power,
        total_points,
        speedup_minutes: activity.speedup_minutes,
        efficiency: ratio(total_points, activity.speedup_minutes),
        points_per_power,
        invalid: false,
    }
}

fn training_row(entry: &StoredEntry<TrainingActivity>, pool: f64) -> EfficiencyRow {
    let activity = &entry.fields;
    let base_minutes = activity.base_minutes();
    let mut row = EfficiencyRow {
        id: entry.id.clone(),
        activity_type: Category::Training,
        description: activity.description.clone(),
        power: 0.0,
        total_points: 0.0,
        speedup_minutes: 0.0,
        efficiency: 0.0,
        points_per_power: 0,
        invalid: false,
    };

    if base_minutes <= 0.0 {
        warn!(id = %entry.id, "training entry has zero training time");
        row.description.push_str(INVALID_TRAINING_MARKER);
        row.invalid = true;
        return row;
    }

    match batches_and_points(pool, base_minutes, activity.points_per_batch(), 0.0) {
        Ok((batches, points)) => {
            row.total_points = points;
            row.speedup_minutes = batches as f64 * base_minutes;
            row.efficiency = ratio(row.total_points, row.speedup_minutes);
        }
        Err(err) => warn!(id = %entry.id, %err, "could not score training entry"),
    }
    row
}

/// Builds one efficiency row per stored entry.
///
/// Construction and research points are `power * points_per_power`. Training
/// rows are projected against the speed-ups available to training (its own
/// pool plus general), counting only whole batches.
pub fn efficiency_table(entries: &AllEntries, inventory: &SpeedupInventory) -> Vec<EfficiencyRow> {
    let pool = total_for_category(Category::Training, inventory);

    let mut rows = Vec::with_capacity(
        entries.construction.len() + entries.research.len() + entries.training.len(),
    );
    rows.extend(
        entries
            .construction
            .iter()
            .map(|e| power_row(Category::Construction, e)),
    );
    rows.extend(entries.research.iter().map(|e| power_row(Category::Research, e)));
    rows.extend(entries.training.iter().map(|e| training_row(e, pool)));
    rows
}

/// Descriptions of training entries whose duration is zero.
pub fn invalid_training_descriptions(entries: &AllEntries) -> Vec<String> {
    entries
        .training
        .iter()
        .filter(|e| e.fields.base_minutes() <= 0.0)
        .map(|e| e.fields.description.clone())
        .collect()
}

fn summarize_rows<'a>(rows: impl Iterator<Item = &'a EfficiencyRow>) -> CategorySummary {
    let mut summary = CategorySummary::default();
    let mut efficiency_sum = 0.0;
    for row in rows {
        summary.entry_count += 1;
        summary.total_points += row.total_points;
        summary.total_speedups += row.speedup_minutes;
        efficiency_sum += row.efficiency;
    }
    if summary.entry_count > 0 {
        summary.avg_efficiency = efficiency_sum / summary.entry_count as f64;
    }
    summary
}

/// Count, totals and mean row efficiency for one category.
pub fn category_summary(rows: &[EfficiencyRow], category: Category) -> CategorySummary {
    summarize_rows(rows.iter().filter(|r| r.activity_type == category))
}

/// Per-category summaries for all three categories plus the overall totals.
pub fn summarize(rows: &[EfficiencyRow]) -> EfficiencySummary {
    EfficiencySummary {
        by_category: Category::ALL
            .iter()
            .map(|c| (*c, category_summary(rows, *c)))
            .collect(),
        overall: summarize_rows(rows.iter()),
    }
}

/// Runs the troop-training calculator against the training pool.
///
/// # Arguments
///
/// * `params` - Batch size, points per troop, base duration and reduction bonus
/// * `inventory` - Current speed-up balances; training may use its own pool and general
/// * `target_points` - Optional point goal to back-solve the missing minutes for
///
/// # Errors
///
/// Fails with [`Error::InvalidInput`] when the reduction is outside `[0, 1]`
/// or the effective batch time is zero.
pub fn analyze_training(
    params: &TrainingParameters,
    inventory: &SpeedupInventory,
    target_points: Option<f64>,
) -> Result<TrainingAnalysis> {
    let base_training_time = params.duration.total_minutes();
    let effective = effective_training_time(base_training_time, params.time_reduction_bonus)?;
    let points_per_batch = params.points_per_batch();
    let available = total_for_category(Category::Training, inventory);

    let (batches, total_points) = batches_and_points(available, effective, points_per_batch, 0.0)?;
    let training_time_used = batches as f64 * effective;
    let efficiency = efficiency_metrics(available, total_points)?;
    let allocation = allocate(Category::Training, training_time_used, inventory)?;

    let minutes_to_target = target_points
        .map(|target| speedups_needed(target, points_per_batch, total_points, effective))
        .transpose()?;

    Ok(TrainingAnalysis {
        base_training_time,
        effective_training_time: effective,
        points_per_batch,
        available_speedups: available,
        batches,
        total_points,
        training_time_used,
        remaining_speedups: available - training_time_used,
        efficiency,
        allocation,
        minutes_to_target,
    })
}

// ============================================================================
// Purchases
// ============================================================================

/// Reconciles the automatic import and the manual entries into one list,
/// sorted by date. Either source may be absent.
///
/// Automatic rows contribute no speed-ups; their `Purchase Name` becomes the
/// pack name.
pub fn merge_purchases(
    automatic: Option<&[AutomaticPurchase]>,
    manual: Option<&[ManualPurchase]>,
) -> Vec<PurchaseRecord> {
    let mut records: Vec<PurchaseRecord> = automatic
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(row, p)| PurchaseRecord {
            date: p.date,
            pack_name: p.purchase_name.clone(),
            amount: p.value,
            speedups: 0.0,
            source: PurchaseSource::Automatic,
            row,
        })
        .collect();

    records.extend(
        manual
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(row, p)| PurchaseRecord {
                date: p.date,
                pack_name: p.pack_name.clone(),
                amount: p.spending,
                speedups: p.speedups,
                source: PurchaseSource::Manual,
                row,
            }),
    );

    records.sort_by_key(|r| r.date);
    records
}

/// Keeps the records dated within `from..=to`; an open bound is unbounded.
pub fn filter_by_date(
    records: &[PurchaseRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<PurchaseRecord> {
    records
        .iter()
        .filter(|r| from.map_or(true, |f| r.date >= f))
        .filter(|r| to.map_or(true, |t| r.date <= t))
        .cloned()
        .collect()
}

/// Deletes the merged row at `index` from the manual purchase list.
///
/// # Errors
///
/// * [`Error::PurchaseNotFound`] - `index` is outside the merged list
/// * [`Error::ReadOnlyPurchase`] - the row came from the automatic import
pub fn remove_purchase(
    records: &[PurchaseRecord],
    index: usize,
    manual: &mut Vec<ManualPurchase>,
) -> Result<ManualPurchase> {
    let record = records.get(index).ok_or(Error::PurchaseNotFound(index))?;
    if record.source != PurchaseSource::Manual {
        return Err(Error::ReadOnlyPurchase(index));
    }
    if record.row >= manual.len() {
        return Err(Error::PurchaseNotFound(index));
    }
    Ok(manual.remove(record.row))
}

/// Sums spending per day.
///
/// # Returns
///
/// An empty [`DailySpending`] with a zero average when there are no records.
pub fn daily_spending(records: &[PurchaseRecord]) -> DailySpending {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *by_day.entry(record.date).or_default() += record.amount;
    }
    if by_day.is_empty() {
        return DailySpending::default();
    }

    let total: f64 = by_day.values().sum();
    let average = total / by_day.len() as f64;
    DailySpending {
        days: by_day.into_iter().collect(),
        total,
        average,
    }
}

/// Totals per source and the combined daily rollup.
pub fn purchase_stats(
    automatic: Option<&[AutomaticPurchase]>,
    manual: Option<&[ManualPurchase]>,
) -> PurchaseStats {
    let auto_rows = automatic.unwrap_or_default();
    let manual_rows = manual.unwrap_or_default();
    PurchaseStats {
        total_spent_auto: auto_rows.iter().map(|p| p.value).sum(),
        total_spent_manual: manual_rows.iter().map(|p| p.spending).sum(),
        total_speedups: manual_rows.iter().map(|p| p.speedups).sum(),
        daily: daily_spending(&merge_purchases(automatic, manual)),
    }
}
