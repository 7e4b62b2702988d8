//! JSON-file-backed record store for Hall of Chiefs activity entries.
//!
//! The whole document is re-read on every call and rewritten on every
//! mutation; there is no caching inside the store. Writes go through a temp
//! file and a rename, so a crash mid-write leaves the previous document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::write_json_atomic;
use crate::error::{Error, Result};
use crate::models::{
    ActivityEntry, AllEntries, Category, HallDocument, SpeedupInventory, StoreOutcome,
    StoredActivity, StoredEntry,
};

static LAST_ID_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Picks the timestamp used in a new id, strictly after any id generated
/// earlier in this process.
fn next_id_timestamp(now: DateTime<Local>) -> DateTime<Local> {
    let wanted = now.timestamp_micros();
    let previous = LAST_ID_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wanted.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    let micros = wanted.max(previous.saturating_add(1));

    Utc.timestamp_micros(micros)
        .single()
        .map(|t| t.with_timezone(&Local))
        .unwrap_or(now)
}

/// Generates `{category}_{YYYYMMDD_HHMMSS_micros}`.
fn generate_entry_id(category: Category, now: DateTime<Local>) -> String {
    let stamp = next_id_timestamp(now);
    format!("{}_{}", category.key(), stamp.format("%Y%m%d_%H%M%S_%6f"))
}

fn stamp<T>(id: &str, fields: T, now: DateTime<Local>) -> StoredEntry<T> {
    StoredEntry {
        id: id.to_string(),
        fields,
        created_at: now,
        updated_at: None,
    }
}

fn replace_entry<T>(list: &mut [StoredEntry<T>], id: &str, fields: T, now: DateTime<Local>) -> bool {
    match list.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            entry.fields = fields;
            entry.updated_at = Some(now);
            true
        }
        None => false,
    }
}

fn remove_entry<T>(list: &mut Vec<StoredEntry<T>>, id: &str) -> bool {
    match list.iter().position(|e| e.id == id) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// CRUD access to `hall_of_chiefs_data.json`.
///
/// # Example
///
/// ```no_run
/// use wosmax::models::{ActivityEntry, PointsPerPower, PowerActivity};
/// use wosmax::store::RecordStore;
///
/// let store = RecordStore::open("data/hall_of_chiefs_data.json").unwrap();
/// let outcome = store
///     .add(ActivityEntry::Construction(PowerActivity {
///         description: "Furnace 25".to_string(),
///         power: 12_000.0,
///         speedup_minutes: 3_000.0,
///         points_per_power: PointsPerPower::Thirty,
///     }))
///     .unwrap();
/// assert!(outcome.success);
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Opens the store, creating an empty document if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = RecordStore { path: path.into() };
        store.ensure_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            write_json_atomic(&self.path, &HallDocument::default())?;
            info!(path = %self.path.display(), "created Hall of Chiefs data file");
        }
        Ok(())
    }

    fn read(&self) -> Result<HallDocument> {
        self.ensure_exists()?;
        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let doc = serde_json::from_str(&text).map_err(|e| Error::json(&self.path, e))?;
        debug!(path = %self.path.display(), "read Hall of Chiefs document");
        Ok(doc)
    }

    fn write(&self, doc: &HallDocument) -> Result<()> {
        write_json_atomic(&self.path, doc)?;
        debug!(path = %self.path.display(), "wrote Hall of Chiefs document");
        Ok(())
    }

    /// Validates and appends a new entry, stamping its id and creation time.
    pub fn add(&self, entry: ActivityEntry) -> Result<StoreOutcome> {
        let category = entry.category();
        if let Err(reason) = entry.validate() {
            warn!(%category, %reason, "rejected new entry");
            return Ok(StoreOutcome::rejected(reason));
        }

        let mut doc = self.read()?;
        let now = Local::now();
        let id = generate_entry_id(category, now);
        match entry {
            ActivityEntry::Construction(a) => doc.entries.construction.push(stamp(&id, a, now)),
            ActivityEntry::Research(a) => doc.entries.research.push(stamp(&id, a, now)),
            ActivityEntry::Training(t) => doc.entries.training.push(stamp(&id, t, now)),
        }
        self.write(&doc)?;

        info!(%category, %id, "added entry");
        Ok(StoreOutcome::ok(format!("Entry added successfully to {category}")))
    }

    /// Adds an entry given as loosely-typed JSON, reporting missing fields and
    /// wrong primitive types by name.
    pub fn add_value(&self, category: Category, value: &Value) -> Result<StoreOutcome> {
        match ActivityEntry::from_value(category, value) {
            Ok(entry) => self.add(entry),
            Err(reason) => {
                warn!(%category, %reason, "rejected new entry");
                Ok(StoreOutcome::rejected(reason))
            }
        }
    }

    /// Replaces the fields of entry `id`, keeping its id and creation time and
    /// stamping `updated_at`.
    pub fn update(&self, category: Category, id: &str, entry: ActivityEntry) -> Result<StoreOutcome> {
        if entry.category() != category {
            return Ok(StoreOutcome::rejected(format!(
                "Entry category {} does not match {category}",
                entry.category()
            )));
        }
        if let Err(reason) = entry.validate() {
            warn!(%category, %id, %reason, "rejected entry update");
            return Ok(StoreOutcome::rejected(reason));
        }

        let mut doc = self.read()?;
        let now = Local::now();
        let found = match entry {
            ActivityEntry::Construction(a) => replace_entry(&mut doc.entries.construction, id, a, now),
            ActivityEntry::Research(a) => replace_entry(&mut doc.entries.research, id, a, now),
            ActivityEntry::Training(t) => replace_entry(&mut doc.entries.training, id, t, now),
        };
        if !found {
            return Ok(StoreOutcome::rejected(format!("Entry with ID {id} not found")));
        }
        self.write(&doc)?;

        info!(%category, %id, "updated entry");
        Ok(StoreOutcome::ok("Entry updated successfully"))
    }

    pub fn update_value(&self, category: Category, id: &str, value: &Value) -> Result<StoreOutcome> {
        match ActivityEntry::from_value(category, value) {
            Ok(entry) => self.update(category, id, entry),
            Err(reason) => Ok(StoreOutcome::rejected(reason)),
        }
    }

    /// Removes the first entry with the given id.
    pub fn delete(&self, category: Category, id: &str) -> Result<StoreOutcome> {
        let mut doc = self.read()?;
        let found = match category {
            Category::Construction => remove_entry(&mut doc.entries.construction, id),
            Category::Research => remove_entry(&mut doc.entries.research, id),
            Category::Training => remove_entry(&mut doc.entries.training, id),
        };
        if !found {
            return Ok(StoreOutcome::rejected(format!("Entry with ID {id} not found")));
        }
        self.write(&doc)?;

        info!(%category, %id, "deleted entry");
        Ok(StoreOutcome::ok("Entry deleted successfully"))
    }

    /// Clears one category, or all three when `category` is `None`.
    pub fn delete_all(&self, category: Option<Category>) -> Result<StoreOutcome> {
        let mut doc = self.read()?;
        let message = match category {
            Some(Category::Construction) => {
                doc.entries.construction.clear();
                "All entries from construction deleted".to_string()
            }
            Some(Category::Research) => {
                doc.entries.research.clear();
                "All entries from research deleted".to_string()
            }
            Some(Category::Training) => {
                doc.entries.training.clear();
                "All entries from training deleted".to_string()
            }
            None => {
                doc.entries = AllEntries::default();
                "All entries from all categories deleted".to_string()
            }
        };
        self.write(&doc)?;

        info!(?category, "cleared entries");
        Ok(StoreOutcome::ok(message))
    }

    pub fn get_entries(&self, category: Category) -> Result<Vec<StoredActivity>> {
        Ok(self.read()?.entries.activities(category))
    }

    pub fn get_all_entries(&self) -> Result<AllEntries> {
        Ok(self.read()?.entries)
    }

    /// Entry counts for one category, or for all three.
    pub fn get_entry_count(&self, category: Option<Category>) -> Result<BTreeMap<Category, usize>> {
        let entries = self.read()?.entries;
        let categories = match category {
            Some(c) => vec![c],
            None => Category::ALL.to_vec(),
        };
        Ok(categories
            .into_iter()
            .map(|c| (c, entries.len(c)))
            .collect())
    }

    /// Writes a verbatim copy of the current document to `backup_path`.
    pub fn backup_data(&self, backup_path: &Path) -> Result<()> {
        self.ensure_exists()?;
        if let Some(parent) = backup_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        fs::copy(&self.path, backup_path).map_err(|e| Error::io(backup_path, e))?;
        info!(path = %backup_path.display(), "backed up Hall of Chiefs data");
        Ok(())
    }

    /// Stores the inventory inside the document's metadata envelope.
    pub fn persist_speedup_inventory(&self, inventory: &SpeedupInventory) -> Result<()> {
        let mut doc = self.read()?;
        doc.metadata.speedup_inventory = Some(*inventory);
        self.write(&doc)
    }
}
