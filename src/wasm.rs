//! WebAssembly bindings for Wosmax.
//!
//! Every entry point takes a JSON string and returns a JSON envelope
//! `{"success": bool, "error": string|null, "data": ...}`. The browser keeps
//! all state; nothing here touches the filesystem.

use chrono::Local;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::default_training_parameters;
use crate::formulas::training_minutes;
use crate::inventory::allocate_named;
use crate::models::{
    ActivityEntry, AllEntries, EfficiencyRow, EfficiencySummary, PackValueEntry, PowerActivity,
    SpeedupContent, SpeedupInventory, StoredEntry, TrainingActivity, TrainingAnalysis,
    TrainingDuration, TrainingParameters,
};
use crate::packs::{build_entry, sorted, validate_pack, PackSortKey};
use crate::report::{analyze_training, efficiency_table, invalid_training_descriptions, summarize};

/// JSON envelope returned by every entry point.
#[derive(Debug, Clone, Serialize)]
pub struct JsResponse<T: Serialize> {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

fn respond<T: Serialize>(result: Result<T, String>) -> String {
    let response = match result {
        Ok(data) => JsResponse {
            success: true,
            error: None,
            data: Some(data),
        },
        Err(error) => JsResponse {
            success: false,
            error: Some(error),
            data: None,
        },
    };
    serde_json::to_string(&response).unwrap_or_default()
}

fn report_invalid_input(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!(%message, "invalid wasm input");
}

fn parse_input<'a, T: Deserialize<'a>>(input_json: &'a str) -> Result<T, String> {
    serde_json::from_str(input_json).map_err(|e| {
        let message = format!("Invalid input: {e}");
        report_invalid_input(&message);
        message
    })
}

/// JavaScript-friendly input for the training calculator.
///
/// Omitted timer fields and batch settings fall back to the calculator defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct JsTrainingInput {
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub minutes: Option<u32>,
    #[serde(default)]
    pub seconds: Option<u32>,
    #[serde(default)]
    pub troops_per_batch: Option<u32>,
    #[serde(default)]
    pub points_per_troop: Option<f64>,
    /// Training-time reduction as a fraction in `[0, 1]`
    #[serde(default)]
    pub time_reduction_bonus: f64,
    #[serde(default)]
    pub inventory: SpeedupInventory,
    #[serde(default)]
    pub target_points: Option<f64>,
}

impl JsTrainingInput {
    fn parameters(&self) -> TrainingParameters {
        let defaults = default_training_parameters();
        let timer_given = self.days.is_some()
            || self.hours.is_some()
            || self.minutes.is_some()
            || self.seconds.is_some();
        let duration = if timer_given {
            TrainingDuration {
                days: self.days.unwrap_or(0),
                hours: self.hours.unwrap_or(0),
                minutes: self.minutes.unwrap_or(0),
                seconds: self.seconds.unwrap_or(0),
            }
        } else {
            defaults.duration
        };
        TrainingParameters {
            duration,
            troops_per_batch: self.troops_per_batch.unwrap_or(defaults.troops_per_batch),
            points_per_troop: self.points_per_troop.unwrap_or(defaults.points_per_troop),
            time_reduction_bonus: self.time_reduction_bonus,
        }
    }
}

/// Run the troop-training calculator.
///
/// Takes a JSON string input and returns a JSON string result whose `data` is
/// the full training analysis.
#[wasm_bindgen]
pub fn analyze_training_json(input_json: &str) -> String {
    let result = parse_input::<JsTrainingInput>(input_json).and_then(|input| {
        analyze_training(&input.parameters(), &input.inventory, input.target_points)
            .map_err(|e| e.to_string())
    });
    respond::<TrainingAnalysis>(result)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsAllocateInput {
    pub category: String,
    pub required_minutes: f64,
    #[serde(default)]
    pub inventory: SpeedupInventory,
}

/// Project how a category requirement is covered by the inventory.
#[wasm_bindgen]
pub fn allocate_json(input_json: &str) -> String {
    let result = parse_input::<JsAllocateInput>(input_json).and_then(|input| {
        allocate_named(&input.category, input.required_minutes, &input.inventory)
            .map_err(|e| e.to_string())
    });
    respond(result)
}

/// Hall of Chiefs activities as held by the browser, without ids.
#[derive(Debug, Clone, Deserialize)]
pub struct JsEfficiencyInput {
    #[serde(default)]
    pub construction: Vec<PowerActivity>,
    #[serde(default)]
    pub research: Vec<PowerActivity>,
    #[serde(default)]
    pub training: Vec<TrainingActivity>,
    #[serde(default)]
    pub inventory: SpeedupInventory,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsEfficiencyReport {
    pub rows: Vec<EfficiencyRow>,
    pub summary: EfficiencySummary,
    pub invalid_training: Vec<String>,
}

impl JsEfficiencyInput {
    /// Validates every activity and wraps it with a positional id.
    fn into_entries(self) -> Result<AllEntries, String> {
        let now = Local::now();
        let mut entries = AllEntries::default();

        for (i, activity) in self.construction.into_iter().enumerate() {
            ActivityEntry::Construction(activity.clone())
                .validate()
                .map_err(|e| format!("construction[{i}]: {e}"))?;
            entries.construction.push(wrap("construction", i, activity, now));
        }
        for (i, activity) in self.research.into_iter().enumerate() {
            ActivityEntry::Research(activity.clone())
                .validate()
                .map_err(|e| format!("research[{i}]: {e}"))?;
            entries.research.push(wrap("research", i, activity, now));
        }
        for (i, activity) in self.training.into_iter().enumerate() {
            ActivityEntry::Training(activity.clone())
                .validate()
                .map_err(|e| format!("training[{i}]: {e}"))?;
            entries.training.push(wrap("training", i, activity, now));
        }
        Ok(entries)
    }
}

fn wrap<T>(prefix: &str, index: usize, fields: T, now: chrono::DateTime<Local>) -> StoredEntry<T> {
    StoredEntry {
        id: format!("{prefix}_{index}"),
        fields,
        created_at: now,
        updated_at: None,
    }
}

/// Build the Hall of Chiefs efficiency table and summary.
#[wasm_bindgen]
pub fn efficiency_report_json(input_json: &str) -> String {
    let result = parse_input::<JsEfficiencyInput>(input_json).and_then(|input| {
        let inventory = input.inventory;
        let entries = input.into_entries()?;
        let rows = efficiency_table(&entries, &inventory);
        Ok(JsEfficiencyReport {
            summary: summarize(&rows),
            invalid_training: invalid_training_descriptions(&entries),
            rows,
        })
    });
    respond(result)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsPack {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub hour_speedups: i64,
    #[serde(default)]
    pub five_minute_speedups: i64,
    /// Plain minutes; takes precedence over the unit counts when present
    #[serde(default)]
    pub total_minutes: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsPackInput {
    pub packs: Vec<JsPack>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// Compute and rank packs by cost per speed-up minute.
#[wasm_bindgen]
pub fn compare_packs_json(input_json: &str) -> String {
    let result = parse_input::<JsPackInput>(input_json).and_then(|input| {
        let key = match input.sort_by.as_deref() {
            Some(column) => column.parse::<PackSortKey>()?,
            None => PackSortKey::default(),
        };
        let entries = input
            .packs
            .iter()
            .map(|pack| {
                let content = match pack.total_minutes {
                    Some(minutes) => SpeedupContent::Minutes(minutes),
                    None => SpeedupContent::Units {
                        hours: pack.hour_speedups,
                        five_minutes: pack.five_minute_speedups,
                    },
                };
                validate_pack(&pack.name, pack.price, &content)
                    .map_err(|e| format!("{}: {e}", pack.name))?;
                Ok(build_entry(&pack.name, pack.price, content))
            })
            .collect::<Result<Vec<PackValueEntry>, String>>()?;
        Ok(sorted(&entries, key, input.ascending))
    });
    respond(result)
}

/// Total minutes for a timer entry, for live form feedback.
#[wasm_bindgen]
pub fn training_minutes_for(days: u32, hours: u32, minutes: u32, seconds: u32) -> f64 {
    training_minutes(days, hours, minutes, seconds)
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
