//! File access for Wosmax.
//!
//! This module loads and writes the CSV purchase histories, exports computed
//! tables, and provides the atomic whole-file write used by every JSON store.
//!
//! # Files
//!
//! - `purchase_history.csv`: automatic import, `Date, Purchase Name, Value (R$)`
//! - `manual_purchases.csv`: user entries, `Date, Pack Name, Spending ($), Speed-ups (min)`
//! - `combined_purchases.csv`: export of both, `Date, Pack Name, Amount, Speed-ups, Source`

use std::fs::{self, OpenOptions};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{AutomaticPurchase, EfficiencyRow, ManualPurchase, PurchaseRecord};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a purchase date as written by spreadsheets and the game export.
///
/// Accepted forms: `2024-03-01`, `01/03/2024`, `2024-03-01 10:30:00` and
/// `2024-03-01T10:30:00`. The time of day is discarded.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use wosmax::data::parse_purchase_date;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(parse_purchase_date("2024-03-01").unwrap(), expected);
/// assert_eq!(parse_purchase_date("01/03/2024").unwrap(), expected);
/// assert_eq!(parse_purchase_date("2024-03-01 10:30:00").unwrap(), expected);
/// ```
pub fn parse_purchase_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(datetime.date());
        }
    }
    Err(Error::InvalidDate(s.to_string()))
}

/// Serde adapter for purchase dates in CSV rows.
pub(crate) mod purchase_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_purchase_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Writes `bytes` to a temporary sibling file and renames it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, bytes).map_err(|e| Error::io(tmp, e))?;
    fs::rename(tmp, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it with [`write_atomic`].
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    write_atomic(path, text.as_bytes())
}

fn to_csv_bytes<T: Serialize>(path: &Path, rows: &[T]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row).map_err(|e| Error::csv(path, e))?;
    }
    wtr.into_inner()
        .map_err(|e| Error::io(path, e.into_error()))
}

/// Reads every row of a CSV file, or `None` when the file does not exist.
fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        debug!(path = %path.display(), "CSV file absent");
        return Ok(None);
    }
    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result.map_err(|e| Error::csv(path, e))?);
    }
    debug!(path = %path.display(), rows = rows.len(), "loaded CSV");
    Ok(Some(rows))
}

/// Loads the automatic purchase import.
///
/// # Returns
///
/// `Ok(None)` when the file is absent, which callers treat as an empty
/// contribution. Malformed rows or dates fail with [`Error::Csv`].
pub fn load_automatic_purchases(path: &Path) -> Result<Option<Vec<AutomaticPurchase>>> {
    load_csv(path)
}

/// Loads the manually entered purchases. `Ok(None)` when the file is absent.
pub fn load_manual_purchases(path: &Path) -> Result<Option<Vec<ManualPurchase>>> {
    load_csv(path)
}

/// Checks a manual purchase before it is written.
pub fn validate_manual_purchase(purchase: &ManualPurchase) -> Result<(), String> {
    if purchase.pack_name.trim().is_empty() {
        return Err("Pack name is required".to_string());
    }
    if !(purchase.spending.is_finite() && purchase.spending > 0.0) {
        return Err("Spending must be greater than 0".to_string());
    }
    if !purchase.speedups.is_finite() || purchase.speedups < 0.0 {
        return Err("Speed-up amount cannot be negative".to_string());
    }
    Ok(())
}

/// Appends one manual purchase, writing the header when the file is new.
pub fn append_manual_purchase(path: &Path, purchase: &ManualPurchase) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let is_new = !path.exists() || fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let mut wtr = WriterBuilder::new().has_headers(is_new).from_writer(file);
    wtr.serialize(purchase).map_err(|e| Error::csv(path, e))?;
    wtr.flush().map_err(|e| Error::io(path, e))?;

    info!(pack = %purchase.pack_name, spending = purchase.spending, "recorded manual purchase");
    Ok(())
}

/// Rewrites the manual purchase file with exactly `purchases`.
pub fn save_manual_purchases(path: &Path, purchases: &[ManualPurchase]) -> Result<()> {
    let bytes = to_csv_bytes(path, purchases)?;
    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), rows = purchases.len(), "rewrote manual purchases");
    Ok(())
}

/// Writes the merged purchase history.
///
/// # Returns
///
/// `Ok(false)` without touching the file when there is nothing to export.
pub fn export_combined_purchases(path: &Path, records: &[PurchaseRecord]) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }
    let bytes = to_csv_bytes(path, records)?;
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), rows = records.len(), "exported combined purchases");
    Ok(true)
}

/// Writes a Hall of Chiefs efficiency table as CSV.
pub fn export_efficiency_csv(path: &Path, rows: &[EfficiencyRow]) -> Result<()> {
    let bytes = to_csv_bytes(path, rows)?;
    write_atomic(path, &bytes)
}

/// Serializes any table of rows to CSV text, for downloads.
pub fn table_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let bytes = to_csv_bytes(Path::new("<memory>"), rows)?;
    String::from_utf8(bytes).map_err(|e| {
        Error::io(
            Path::new("<memory>"),
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}
