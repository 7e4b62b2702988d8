//! Speed-up inventory allocation and persistence.
//!
//! Category-restricted speed-ups are always drawn before general ones. The
//! allocator only projects usage; nothing here deducts from a real balance.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::write_json_atomic;
use crate::error::{ensure_non_negative, Error, Result};
use crate::models::{Allocation, Category, SpeedupInventory, SCHEMA_VERSION};

/// Projects how `required_minutes` would be covered for `category`.
///
/// The inventory is not mutated; remaining balances are reported instead.
///
/// # Example
///
/// ```
/// use wosmax::inventory::allocate;
/// use wosmax::models::{Category, SpeedupInventory};
///
/// let inventory = SpeedupInventory { general: 1000.0, training: 300.0, ..Default::default() };
/// let plan = allocate(Category::Training, 500.0, &inventory).unwrap();
///
/// assert_eq!(plan.category_used, 300.0);
/// assert_eq!(plan.general_used, 200.0);
/// assert!(plan.can_complete);
/// ```
pub fn allocate(
    category: Category,
    required_minutes: f64,
    inventory: &SpeedupInventory,
) -> Result<Allocation> {
    ensure_non_negative("required_minutes", required_minutes)?;

    let category_balance = inventory.balance(category);
    let general_balance = inventory.general;

    let category_used = category_balance.min(required_minutes);
    let remainder = required_minutes - category_used;
    let general_used = general_balance.min(remainder);
    let total_used = category_used + general_used;

    Ok(Allocation {
        category_used,
        general_used,
        total_used,
        remaining_category: category_balance - category_used,
        remaining_general: general_balance - general_used,
        can_complete: total_used >= required_minutes,
    })
}

/// Like [`allocate`], but takes a category name as entered by a user.
///
/// `"general"` is rejected: it is a fallback pool, not a request category.
pub fn allocate_named(
    category: &str,
    required_minutes: f64,
    inventory: &SpeedupInventory,
) -> Result<Allocation> {
    allocate(category.parse()?, required_minutes, inventory)
}

/// The most a category could draw on: its own pool plus the general pool.
pub fn total_for_category(category: Category, inventory: &SpeedupInventory) -> f64 {
    inventory.balance(category) + inventory.general
}

pub fn total_for_category_named(category: &str, inventory: &SpeedupInventory) -> Result<f64> {
    Ok(total_for_category(category.parse()?, inventory))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InventoryMetadata {
    #[serde(with = "crate::models::timestamp")]
    created: DateTime<Local>,
    version: String,
}

/// On-disk shape of `speedup_inventory.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InventoryFile {
    #[serde(flatten)]
    inventory: SpeedupInventory,
    metadata: InventoryMetadata,
}

fn read_inventory_file(path: &Path) -> Result<Option<InventoryFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let file = serde_json::from_str(&text).map_err(|e| Error::json(path, e))?;
    Ok(Some(file))
}

/// Loads a persisted inventory. Returns `None` when the file does not exist.
pub fn load_inventory(path: &Path) -> Result<Option<SpeedupInventory>> {
    let file = read_inventory_file(path)?;
    debug!(path = %path.display(), found = file.is_some(), "loaded speed-up inventory");
    Ok(file.map(|f| f.inventory))
}

/// Replaces the persisted inventory wholesale, keeping the first creation
/// stamp when the file already exists.
pub fn save_inventory(path: &Path, inventory: &SpeedupInventory) -> Result<()> {
    let metadata = match read_inventory_file(path)? {
        Some(existing) => existing.metadata,
        None => InventoryMetadata {
            created: Local::now(),
            version: SCHEMA_VERSION.to_string(),
        },
    };
    let file = InventoryFile {
        inventory: *inventory,
        metadata,
    };
    write_json_atomic(path, &file)?;
    debug!(path = %path.display(), ?inventory, "saved speed-up inventory");
    Ok(())
}
