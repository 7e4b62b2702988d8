//! Data models and structures for Wosmax.
//!
//! This module contains the typed records used throughout the crate: activity
//! categories, the speed-up inventory, training parameters, Hall of Chiefs
//! entries, purchase rows and pack comparison entries, plus the result
//! structures produced by the formula and reporting layers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Schema version stamped into freshly created data files.
pub const SCHEMA_VERSION: &str = "1.0";

// ============================================================================
// Categories and inventory
// ============================================================================

/// An activity category that can request speed-ups and hold entries.
///
/// `general` is not a variant: it is only ever a fallback pool
/// inside [`SpeedupInventory`], never a category of its own.
///
/// # Example
///
/// ```
/// use wosmax::models::Category;
///
/// assert_eq!("training".parse::<Category>().unwrap(), Category::Training);
/// assert!("general".parse::<Category>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Construction,
    Research,
    Training,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Construction, Category::Research, Category::Training];

    /// Lower-case key used in file names, ids and JSON documents.
    pub fn key(self) -> &'static str {
        match self {
            Category::Construction => "construction",
            Category::Research => "research",
            Category::Training => "training",
        }
    }

    /// Human-readable name used as the "Activity Type" column.
    pub fn label(self) -> &'static str {
        match self {
            Category::Construction => "Construction",
            Category::Research => "Research",
            Category::Training => "Training",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "construction" => Ok(Category::Construction),
            "research" => Ok(Category::Research),
            "training" => Ok(Category::Training),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

/// Speed-up minutes held per pool.
///
/// `general` can be spent on any category; the other three are restricted to
/// their own category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedupInventory {
    #[serde(default)]
    pub general: f64,
    #[serde(default)]
    pub construction: f64,
    #[serde(default)]
    pub training: f64,
    #[serde(default)]
    pub research: f64,
}

impl SpeedupInventory {
    /// Balance of the category-restricted pool (excluding `general`).
    pub fn balance(&self, category: Category) -> f64 {
        match category {
            Category::Construction => self.construction,
            Category::Research => self.research,
            Category::Training => self.training,
        }
    }

    /// Sum of all four pools.
    pub fn total(&self) -> f64 {
        self.general + self.construction + self.training + self.research
    }
}

// ============================================================================
// Training
// ============================================================================

/// A training duration as entered in the game's timer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainingDuration {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TrainingDuration {
    /// Total length in minutes; seconds contribute fractionally.
    ///
    /// ```
    /// use wosmax::models::TrainingDuration;
    ///
    /// let d = TrainingDuration { days: 0, hours: 4, minutes: 50, seconds: 30 };
    /// assert_eq!(d.total_minutes(), 290.5);
    /// ```
    pub fn total_minutes(&self) -> f64 {
        crate::formulas::training_minutes(self.days, self.hours, self.minutes, self.seconds)
    }
}

/// Inputs to the troop-training calculator. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParameters {
    /// Base time to train one batch
    pub duration: TrainingDuration,
    /// Troops trained per batch
    pub troops_per_batch: u32,
    /// Event points awarded per trained troop
    pub points_per_troop: f64,
    /// Training-time reduction as a fraction in `[0, 1]`
    #[serde(default)]
    pub time_reduction_bonus: f64,
}

impl TrainingParameters {
    /// Points earned by one full batch.
    pub fn points_per_batch(&self) -> f64 {
        f64::from(self.troops_per_batch) * self.points_per_troop
    }
}

// ============================================================================
// Hall of Chiefs entries
// ============================================================================

/// Fixed multiplier converting power into event points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PointsPerPower {
    Thirty,
    FortyFive,
}

impl PointsPerPower {
    pub fn value(self) -> u32 {
        match self {
            PointsPerPower::Thirty => 30,
            PointsPerPower::FortyFive => 45,
        }
    }
}

impl TryFrom<i64> for PointsPerPower {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(PointsPerPower::Thirty),
            45 => Ok(PointsPerPower::FortyFive),
            _ => Err("Points per power must be 30 or 45".to_string()),
        }
    }
}

impl From<PointsPerPower> for i64 {
    fn from(value: PointsPerPower) -> Self {
        i64::from(value.value())
    }
}

/// A construction or research activity, scored from the power it adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerActivity {
    pub description: String,
    pub power: f64,
    pub speedup_minutes: f64,
    pub points_per_power: PointsPerPower,
}

impl PowerActivity {
    fn validate(&self) -> Result<(), String> {
        validate_description(&self.description)?;
        if !(self.power.is_finite() && self.power > 0.0) {
            return Err("Power must be greater than 0".to_string());
        }
        if !self.speedup_minutes.is_finite() || self.speedup_minutes < 0.0 {
            return Err("Speed-up minutes cannot be negative".to_string());
        }
        Ok(())
    }
}

/// A troop-training activity, scored through batches of troops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingActivity {
    pub description: String,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub troops_per_batch: u32,
    pub points_per_troop: f64,
}

impl TrainingActivity {
    pub fn duration(&self) -> TrainingDuration {
        TrainingDuration {
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }

    /// Base training time per batch in minutes. Zero is a storable state.
    pub fn base_minutes(&self) -> f64 {
        self.duration().total_minutes()
    }

    pub fn points_per_batch(&self) -> f64 {
        f64::from(self.troops_per_batch) * self.points_per_troop
    }

    fn validate(&self) -> Result<(), String> {
        validate_description(&self.description)?;
        if self.troops_per_batch == 0 {
            return Err("Troops per batch must be greater than 0".to_string());
        }
        if !(self.points_per_troop.is_finite() && self.points_per_troop > 0.0) {
            return Err("Points per troop must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }
    Ok(())
}

/// A Hall of Chiefs activity. The variant fixes the category for the
/// lifetime of the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ActivityEntry {
    Construction(PowerActivity),
    Research(PowerActivity),
    Training(TrainingActivity),
}

impl ActivityEntry {
    pub fn category(&self) -> Category {
        match self {
            ActivityEntry::Construction(_) => Category::Construction,
            ActivityEntry::Research(_) => Category::Research,
            ActivityEntry::Training(_) => Category::Training,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ActivityEntry::Construction(a) | ActivityEntry::Research(a) => &a.description,
            ActivityEntry::Training(t) => &t.description,
        }
    }

    /// Domain checks: positivity, enum membership and a non-empty description.
    ///
    /// Returns the violated rule as a user-facing message.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ActivityEntry::Construction(a) | ActivityEntry::Research(a) => a.validate(),
            ActivityEntry::Training(t) => t.validate(),
        }
    }

    /// Builds an entry from loosely-typed JSON, checking field presence and
    /// primitive types before any domain rule.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use wosmax::models::{ActivityEntry, Category};
    ///
    /// let err = ActivityEntry::from_value(Category::Research, &json!({"description": "Lab"}))
    ///     .unwrap_err();
    /// assert_eq!(err, "Missing required field: power");
    /// ```
    pub fn from_value(category: Category, value: &Value) -> Result<ActivityEntry, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| format!("Entry must be an object, got {}", type_name(value)))?;

        match category {
            Category::Construction | Category::Research => {
                let description = string_field(obj, "description")?;
                let power = float_field(obj, "power")?;
                let speedup_minutes = float_field(obj, "speedup_minutes")?;
                let points_per_power = int_field(obj, "points_per_power")?;

                if power <= 0.0 {
                    return Err("Power must be greater than 0".to_string());
                }
                if speedup_minutes < 0.0 {
                    return Err("Speed-up minutes cannot be negative".to_string());
                }
                let activity = PowerActivity {
                    description,
                    power,
                    speedup_minutes,
                    points_per_power: PointsPerPower::try_from(points_per_power)?,
                };
                activity.validate()?;
                Ok(match category {
                    Category::Construction => ActivityEntry::Construction(activity),
                    _ => ActivityEntry::Research(activity),
                })
            }
            Category::Training => {
                let description = string_field(obj, "description")?;
                let days = int_field(obj, "days")?;
                let hours = int_field(obj, "hours")?;
                let minutes = int_field(obj, "minutes")?;
                let seconds = int_field(obj, "seconds")?;
                let troops_per_batch = int_field(obj, "troops_per_batch")?;
                let points_per_troop = float_field(obj, "points_per_troop")?;

                if troops_per_batch <= 0 {
                    return Err("Troops per batch must be greater than 0".to_string());
                }
                if points_per_troop <= 0.0 {
                    return Err("Points per troop must be greater than 0".to_string());
                }
                if days < 0 || hours < 0 || minutes < 0 || seconds < 0 {
                    return Err("Time values cannot be negative".to_string());
                }
                let activity = TrainingActivity {
                    description,
                    days: to_u32("days", days)?,
                    hours: to_u32("hours", hours)?,
                    minutes: to_u32("minutes", minutes)?,
                    seconds: to_u32("seconds", seconds)?,
                    troops_per_batch: to_u32("troops_per_batch", troops_per_batch)?,
                    points_per_troop,
                };
                activity.validate()?;
                Ok(ActivityEntry::Training(activity))
            }
        }
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, String> {
    obj.get(name)
        .ok_or_else(|| format!("Missing required field: {name}"))
}

fn type_error(name: &str, expected: &str, got: &Value) -> String {
    format!(
        "Invalid type for {name}: expected {expected}, got {}",
        type_name(got)
    )
}

fn string_field(obj: &Map<String, Value>, name: &str) -> Result<String, String> {
    match field(obj, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_error(name, "str", other)),
    }
}

fn float_field(obj: &Map<String, Value>, name: &str) -> Result<f64, String> {
    let value = field(obj, name)?;
    value
        .as_f64()
        .ok_or_else(|| type_error(name, "float", value))
}

fn int_field(obj: &Map<String, Value>, name: &str) -> Result<i64, String> {
    let value = field(obj, name)?;
    match value {
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => {
            Err(format!("Value for {name} is out of range"))
        }
        _ => value.as_i64().ok_or_else(|| type_error(name, "int", value)),
    }
}

fn to_u32(name: &str, value: i64) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("Value for {name} is out of range"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Parses a stored timestamp. RFC 3339 with an offset is preferred; a bare
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` is read as local time.
///
/// ```
/// use wosmax::models::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01T12:00:00+00:00").is_some());
/// assert!(parse_timestamp("2024-01-01T12:00:00.123456").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Serde adapter for stored timestamps, written as RFC 3339.
pub(crate) mod timestamp {
    use chrono::{DateTime, Local};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Local};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Local>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Local>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => crate::models::parse_timestamp(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
                None => Ok(None),
            }
        }
    }
}

/// A persisted entry: the activity fields plus its id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry<T> {
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Local>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Local>>,
}

impl<T> StoredEntry<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StoredEntry<U> {
        StoredEntry {
            id: self.id,
            fields: f(self.fields),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A stored entry of any category.
pub type StoredActivity = StoredEntry<ActivityEntry>;

/// Every stored entry, grouped by category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllEntries {
    #[serde(default)]
    pub construction: Vec<StoredEntry<PowerActivity>>,
    #[serde(default)]
    pub research: Vec<StoredEntry<PowerActivity>>,
    #[serde(default)]
    pub training: Vec<StoredEntry<TrainingActivity>>,
}

impl AllEntries {
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Construction => self.construction.len(),
            Category::Research => self.research.len(),
            Category::Training => self.training.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Entries of one category as the category-tagged sum type.
    pub fn activities(&self, category: Category) -> Vec<StoredActivity> {
        match category {
            Category::Construction => self
                .construction
                .iter()
                .cloned()
                .map(|e| e.map(ActivityEntry::Construction))
                .collect(),
            Category::Research => self
                .research
                .iter()
                .cloned()
                .map(|e| e.map(ActivityEntry::Research))
                .collect(),
            Category::Training => self
                .training
                .iter()
                .cloned()
                .map(|e| e.map(ActivityEntry::Training))
                .collect(),
        }
    }
}

/// Metadata envelope of the Hall of Chiefs document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(with = "timestamp")]
    pub created: DateTime<Local>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speedup_inventory: Option<SpeedupInventory>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            created: Local::now(),
            version: SCHEMA_VERSION.to_string(),
            speedup_inventory: None,
        }
    }
}

/// The on-disk shape of `hall_of_chiefs_data.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HallDocument {
    #[serde(flatten)]
    pub entries: AllEntries,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Result of a store mutation. A rejected mutation is not an error: the
/// message names the violated rule and is meant to be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    pub success: bool,
    pub message: String,
}

impl StoreOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        StoreOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        StoreOutcome {
            success: false,
            message: message.into(),
        }
    }
}

// ============================================================================
// Purchases
// ============================================================================

/// CSV row structure for `purchase_history.csv`, the read-only automatic import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomaticPurchase {
    #[serde(rename = "Date", with = "crate::data::purchase_date")]
    pub date: NaiveDate,
    #[serde(rename = "Purchase Name")]
    pub purchase_name: String,
    #[serde(rename = "Value (R$)")]
    pub value: f64,
}

/// CSV row structure for `manual_purchases.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPurchase {
    #[serde(rename = "Date", with = "crate::data::purchase_date")]
    pub date: NaiveDate,
    #[serde(rename = "Pack Name")]
    pub pack_name: String,
    #[serde(rename = "Spending ($)")]
    pub spending: f64,
    #[serde(rename = "Speed-ups (min)", default)]
    pub speedups: f64,
}

/// Where a merged purchase row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseSource {
    Automatic,
    Manual,
}

/// A purchase in the common shape shared by both sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Pack Name")]
    pub pack_name: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Speed-ups")]
    pub speedups: f64,
    #[serde(rename = "Source")]
    pub source: PurchaseSource,
    /// Index of this row within its source list
    #[serde(skip)]
    pub row: usize,
}

/// Spending summed per calendar day.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailySpending {
    pub days: Vec<(NaiveDate, f64)>,
    pub total: f64,
    pub average: f64,
}

/// Combined statistics over both purchase sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PurchaseStats {
    pub total_spent_auto: f64,
    pub total_spent_manual: f64,
    pub total_speedups: f64,
    pub daily: DailySpending,
}

// ============================================================================
// Packs
// ============================================================================

/// Speed-up content of a pack, either as item counts or as plain minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedupContent {
    Units { hours: i64, five_minutes: i64 },
    Minutes(f64),
}

impl SpeedupContent {
    pub fn total_minutes(&self) -> f64 {
        match *self {
            SpeedupContent::Units {
                hours,
                five_minutes,
            } => crate::formulas::total_minutes_from_speedup_units(hours, five_minutes) as f64,
            SpeedupContent::Minutes(m) => m,
        }
    }
}

/// One row of the pack value comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackValueEntry {
    #[serde(rename = "Pack Name")]
    pub pack_name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "60min Speedups", default, skip_serializing_if = "Option::is_none")]
    pub hour_speedups: Option<i64>,
    #[serde(rename = "5min Speedups", default, skip_serializing_if = "Option::is_none")]
    pub five_minute_speedups: Option<i64>,
    #[serde(rename = "Total Speedup Minutes")]
    pub total_speedup_minutes: f64,
    #[serde(rename = "Cost per Minute")]
    pub cost_per_minute: f64,
}

/// A purchased pack and the raw items it rewarded (`pack_items.json`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackRewards {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rewards: Option<BTreeMap<String, i64>>,
}

/// Rewards summed across many packs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RewardSummary {
    /// Quantity per item name; speed-ups are folded into `speedup_minutes`
    pub items: BTreeMap<String, i64>,
    pub total_speedup_minutes: i64,
    pub pack_count: usize,
}

// ============================================================================
// Calculation results
// ============================================================================

/// Ratios of points to speed-up minutes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EfficiencyMetrics {
    pub points_per_minute: f64,
    pub time_per_point: f64,
    /// `points_per_minute * 100`, a display-only figure
    pub score: f64,
}

/// A projected split of required minutes across the category and general pools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    pub category_used: f64,
    pub general_used: f64,
    pub total_used: f64,
    pub remaining_category: f64,
    pub remaining_general: f64,
    pub can_complete: bool,
}

/// Output of the training calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingAnalysis {
    pub base_training_time: f64,
    pub effective_training_time: f64,
    pub points_per_batch: f64,
    pub available_speedups: f64,
    pub batches: u64,
    pub total_points: f64,
    pub training_time_used: f64,
    pub remaining_speedups: f64,
    pub efficiency: EfficiencyMetrics,
    pub allocation: Allocation,
    /// Further speed-up minutes needed to reach a requested point target
    pub minutes_to_target: Option<f64>,
}

/// One row of the Hall of Chiefs efficiency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub id: String,
    #[serde(rename = "Activity Type", serialize_with = "serialize_label")]
    pub activity_type: Category,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Power")]
    pub power: f64,
    #[serde(rename = "Total Points")]
    pub total_points: f64,
    #[serde(rename = "Speed-up Minutes")]
    pub speedup_minutes: f64,
    #[serde(rename = "Efficiency (Points/Min)")]
    pub efficiency: f64,
    #[serde(rename = "Points per Power")]
    pub points_per_power: u32,
    #[serde(skip)]
    pub invalid: bool,
}

fn serialize_label<S: serde::Serializer>(category: &Category, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(category.label())
}

/// Totals for one category (or for everything).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategorySummary {
    pub entry_count: usize,
    pub total_points: f64,
    pub total_speedups: f64,
    pub avg_efficiency: f64,
}

/// Per-category and overall totals of an efficiency table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EfficiencySummary {
    pub by_category: BTreeMap<Category, CategorySummary>,
    pub overall: CategorySummary,
}
