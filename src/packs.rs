//! Pack value comparison and pack contents summaries.
//!
//! [`PackValueStore`] keeps a flat JSON array of packs compared by cost per
//! speed-up minute. [`aggregate_pack_rewards`] sums the items rewarded by
//! purchased packs, folding every speed-up item into minutes.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data::{write_atomic, write_json_atomic};
use crate::error::{Error, Result};
use crate::formulas::cost_per_minute;
use crate::models::{PackRewards, PackValueEntry, RewardSummary, SpeedupContent, StoreOutcome};

/// Reward item names that are speed-ups, with the minutes each one is worth.
pub const SPEEDUP_CONVERSIONS: [(&str, i64); 4] = [
    ("1h_speedups", 60),
    ("1h_speedups_training", 60),
    ("5m_speedups", 5),
    ("5m_speedups_training", 5),
];

/// Aggregated item name used for converted speed-ups.
pub const SPEEDUP_MINUTES_ITEM: &str = "speedup_minutes";

/// Column a pack table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackSortKey {
    Name,
    Price,
    TotalMinutes,
    #[default]
    CostPerMinute,
}

impl FromStr for PackSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Ok(PackSortKey::Name),
            "price" => Ok(PackSortKey::Price),
            "total_minutes" | "minutes" => Ok(PackSortKey::TotalMinutes),
            "cost_per_minute" | "cost" => Ok(PackSortKey::CostPerMinute),
            other => Err(format!("Unknown sort column: {other}")),
        }
    }
}

/// Builds a comparison entry, deriving total minutes and cost per minute.
pub fn build_entry(pack_name: &str, price: f64, content: SpeedupContent) -> PackValueEntry {
    let total_speedup_minutes = content.total_minutes();
    let (hour_speedups, five_minute_speedups) = match content {
        SpeedupContent::Units {
            hours,
            five_minutes,
        } => (Some(hours), Some(five_minutes)),
        SpeedupContent::Minutes(_) => (None, None),
    };
    PackValueEntry {
        pack_name: pack_name.trim().to_string(),
        price,
        hour_speedups,
        five_minute_speedups,
        total_speedup_minutes,
        cost_per_minute: cost_per_minute(price, total_speedup_minutes),
    }
}

/// Checks the inputs of a new pack; the message is meant for the user.
pub fn validate_pack(pack_name: &str, price: f64, content: &SpeedupContent) -> Result<(), String> {
    if pack_name.trim().is_empty() {
        return Err("Pack name cannot be empty.".to_string());
    }
    if !(price.is_finite() && price > 0.0) {
        return Err("Price must be greater than 0.".to_string());
    }
    if content.total_minutes() <= 0.0 {
        return Err("At least one speedup must be greater than 0.".to_string());
    }
    Ok(())
}

/// Returns `entries` sorted by one column.
///
/// # Example
///
/// ```
/// use wosmax::models::SpeedupContent;
/// use wosmax::packs::{build_entry, sorted, PackSortKey};
///
/// let packs = vec![
///     build_entry("Big", 20.0, SpeedupContent::Minutes(100.0)),
///     build_entry("Small", 5.0, SpeedupContent::Minutes(50.0)),
/// ];
/// let cheapest = sorted(&packs, PackSortKey::CostPerMinute, true);
/// assert_eq!(cheapest[0].pack_name, "Small");
/// ```
pub fn sorted(entries: &[PackValueEntry], key: PackSortKey, ascending: bool) -> Vec<PackValueEntry> {
    sorted_indexed(entries, key, ascending)
        .into_iter()
        .map(|(_, entry)| entry)
        .collect()
}

/// Like [`sorted`], but each entry keeps its stored position, which is the
/// index [`PackValueStore::remove`] expects.
pub fn sorted_indexed(
    entries: &[PackValueEntry],
    key: PackSortKey,
    ascending: bool,
) -> Vec<(usize, PackValueEntry)> {
    let mut out: Vec<(usize, PackValueEntry)> = entries.iter().cloned().enumerate().collect();
    out.sort_by(|(_, a), (_, b)| {
        let ord = match key {
            PackSortKey::Name => a.pack_name.cmp(&b.pack_name),
            PackSortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            PackSortKey::TotalMinutes => a
                .total_speedup_minutes
                .partial_cmp(&b.total_speedup_minutes)
                .unwrap_or(Ordering::Equal),
            PackSortKey::CostPerMinute => a
                .cost_per_minute
                .partial_cmp(&b.cost_per_minute)
                .unwrap_or(Ordering::Equal),
        };
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    out
}

/// Flat CSV row for the comparison export; every column is always present.
#[derive(Debug, Serialize)]
struct PackCsvRow<'a> {
    #[serde(rename = "Pack Name")]
    pack_name: &'a str,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "60min Speedups")]
    hour_speedups: Option<i64>,
    #[serde(rename = "5min Speedups")]
    five_minute_speedups: Option<i64>,
    #[serde(rename = "Total Speedup Minutes")]
    total_speedup_minutes: f64,
    #[serde(rename = "Cost per Minute")]
    cost_per_minute: f64,
}

/// Writes the comparison table as CSV.
pub fn export_csv(entries: &[PackValueEntry], path: &Path) -> Result<()> {
    let rows: Vec<PackCsvRow<'_>> = entries
        .iter()
        .map(|e| PackCsvRow {
            pack_name: &e.pack_name,
            price: e.price,
            hour_speedups: e.hour_speedups,
            five_minute_speedups: e.five_minute_speedups,
            total_speedup_minutes: e.total_speedup_minutes,
            cost_per_minute: e.cost_per_minute,
        })
        .collect();
    let text = crate::data::table_to_csv(&rows)?;
    write_atomic(path, text.as_bytes())
}

/// Append-only list of compared packs stored in `pack_value_comparison.json`.
#[derive(Debug, Clone)]
pub struct PackValueStore {
    path: PathBuf,
}

impl PackValueStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        PackValueStore { path: path.into() }
    }

    /// Every stored pack in insertion order. A missing file is an empty list.
    pub fn entries(&self) -> Result<Vec<PackValueEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let entries: Vec<PackValueEntry> =
            serde_json::from_str(&text).map_err(|e| Error::json(&self.path, e))?;
        debug!(path = %self.path.display(), count = entries.len(), "loaded pack history");
        Ok(entries)
    }

    fn save(&self, entries: &[PackValueEntry]) -> Result<()> {
        write_json_atomic(&self.path, &entries)
    }

    /// Validates and appends a pack.
    pub fn add(&self, pack_name: &str, price: f64, content: SpeedupContent) -> Result<StoreOutcome> {
        if let Err(reason) = validate_pack(pack_name, price, &content) {
            warn!(pack = pack_name, %reason, "rejected pack");
            return Ok(StoreOutcome::rejected(reason));
        }
        let entry = build_entry(pack_name, price, content);
        let mut entries = self.entries()?;
        let message = format!("Pack '{}' added.", entry.pack_name);
        info!(pack = %entry.pack_name, cost_per_minute = entry.cost_per_minute, "added pack");
        entries.push(entry);
        self.save(&entries)?;
        Ok(StoreOutcome::ok(message))
    }

    /// Removes the pack at `index` (insertion order).
    pub fn remove(&self, index: usize) -> Result<StoreOutcome> {
        let mut entries = self.entries()?;
        if index >= entries.len() {
            return Ok(StoreOutcome::rejected(format!("No pack at position {index}")));
        }
        let removed = entries.remove(index);
        self.save(&entries)?;
        info!(pack = %removed.pack_name, "removed pack");
        Ok(StoreOutcome::ok(format!("Removed '{}'.", removed.pack_name)))
    }

    pub fn clear(&self) -> Result<StoreOutcome> {
        self.save(&[])?;
        info!("cleared pack history");
        Ok(StoreOutcome::ok("All history cleared."))
    }
}

// ============================================================================
// Pack contents
// ============================================================================

/// Loads purchased packs and their rewards. A missing file is an empty list.
pub fn load_pack_rewards(path: &Path) -> Result<Vec<PackRewards>> {
    if !path.exists() {
        warn!(path = %path.display(), "pack data file not found");
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

fn speedup_minutes_per_item(item: &str) -> Option<i64> {
    SPEEDUP_CONVERSIONS
        .iter()
        .find(|(name, _)| *name == item)
        .map(|(_, minutes)| *minutes)
}

/// Sums the rewards of all packs. Packs without a reward list are skipped but
/// still counted.
pub fn aggregate_pack_rewards(packs: &[PackRewards]) -> RewardSummary {
    let mut items: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_speedup_minutes = 0;

    for rewards in packs.iter().filter_map(|p| p.rewards.as_ref()) {
        for (name, quantity) in rewards {
            match speedup_minutes_per_item(name) {
                Some(per_item) => {
                    let minutes = quantity * per_item;
                    total_speedup_minutes += minutes;
                    *items.entry(SPEEDUP_MINUTES_ITEM.to_string()).or_default() += minutes;
                }
                None => *items.entry(name.clone()).or_default() += quantity,
            }
        }
    }

    RewardSummary {
        items,
        total_speedup_minutes,
        pack_count: packs.len(),
    }
}

/// Display name for a reward item: `fire_crystal_10k` → `Fire Crystal (10K)`.
///
/// ```
/// use wosmax::packs::format_item_name;
///
/// assert_eq!(format_item_name("speedup_minutes"), "Speed-up Minutes");
/// assert_eq!(format_item_name("fire_crystal"), "Fire Crystal");
/// assert_eq!(format_item_name("meat_10k"), "Meat (10K)");
/// ```
pub fn format_item_name(item: &str) -> String {
    if item == SPEEDUP_MINUTES_ITEM {
        return "Speed-up Minutes".to_string();
    }

    let words: Vec<String> = item
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            if matches!(lower.as_str(), "1k" | "5k" | "10k" | "100k") {
                return format!("({})", lower.to_ascii_uppercase());
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    words.join(" ")
}

/// Summary rows (display name, quantity): speed-up minutes first, then by
/// quantity descending.
pub fn summary_rows(summary: &RewardSummary) -> Vec<(String, i64)> {
    let mut rows: Vec<(bool, String, i64)> = summary
        .items
        .iter()
        .map(|(name, qty)| (name != SPEEDUP_MINUTES_ITEM, format_item_name(name), *qty))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)));
    rows.into_iter().map(|(_, name, qty)| (name, qty)).collect()
}

/// Keeps only rows whose display name contains `term`, case-insensitively.
pub fn filter_rows(rows: &[(String, i64)], term: &str) -> Vec<(String, i64)> {
    let needle = term.to_lowercase();
    rows.iter()
        .filter(|(name, _)| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
