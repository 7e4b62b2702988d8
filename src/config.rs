//! File locations, defaults and the explicit application state.
//!
//! There is no configuration file; everything lives in one data directory
//! chosen on the command line.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::inventory::{load_inventory, save_inventory};
use crate::models::{SpeedupInventory, TrainingDuration, TrainingParameters};
use crate::packs::PackValueStore;
use crate::store::RecordStore;

pub const HALL_OF_CHIEFS_FILE: &str = "hall_of_chiefs_data.json";
pub const PACK_VALUE_FILE: &str = "pack_value_comparison.json";
pub const INVENTORY_FILE: &str = "speedup_inventory.json";
pub const AUTOMATIC_PURCHASES_FILE: &str = "purchase_history.csv";
pub const MANUAL_PURCHASES_FILE: &str = "manual_purchases.csv";
pub const COMBINED_PURCHASES_FILE: &str = "combined_purchases.csv";
pub const PACK_ITEMS_FILE: &str = "pack_items.json";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

pub const DEFAULT_TROOPS_PER_BATCH: u32 = 426;
pub const DEFAULT_POINTS_PER_TROOP: f64 = 830.0;
pub const DEFAULT_GENERAL_SPEEDUPS: f64 = 18_000.0;
pub const DEFAULT_TRAINING_SPEEDUPS: f64 = 1_515.0;

/// Base batch time of the default training calculator: 4h 50m.
pub const DEFAULT_TRAINING_DURATION: TrainingDuration = TrainingDuration {
    days: 0,
    hours: 4,
    minutes: 50,
    seconds: 0,
};

/// Training inputs shown before the user enters their own.
pub fn default_training_parameters() -> TrainingParameters {
    TrainingParameters {
        duration: DEFAULT_TRAINING_DURATION,
        troops_per_batch: DEFAULT_TROOPS_PER_BATCH,
        points_per_troop: DEFAULT_POINTS_PER_TROOP,
        time_reduction_bonus: 0.0,
    }
}

/// Inventory used when no `speedup_inventory.json` exists yet.
pub fn default_inventory() -> SpeedupInventory {
    SpeedupInventory {
        general: DEFAULT_GENERAL_SPEEDUPS,
        training: DEFAULT_TRAINING_SPEEDUPS,
        ..Default::default()
    }
}

/// Paths of every data file inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub hall_of_chiefs: PathBuf,
    pub pack_values: PathBuf,
    pub inventory: PathBuf,
    pub automatic_purchases: PathBuf,
    pub manual_purchases: PathBuf,
    pub combined_purchases: PathBuf,
    pub pack_items: PathBuf,
}

impl DataPaths {
    /// Resolves every file name against `dir`.
    ///
    /// ```
    /// use std::path::Path;
    /// use wosmax::config::DataPaths;
    ///
    /// let paths = DataPaths::new("state");
    /// assert_eq!(paths.inventory, Path::new("state/speedup_inventory.json"));
    /// ```
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        DataPaths {
            hall_of_chiefs: dir.join(HALL_OF_CHIEFS_FILE),
            pack_values: dir.join(PACK_VALUE_FILE),
            inventory: dir.join(INVENTORY_FILE),
            automatic_purchases: dir.join(AUTOMATIC_PURCHASES_FILE),
            manual_purchases: dir.join(MANUAL_PURCHASES_FILE),
            combined_purchases: dir.join(COMBINED_PURCHASES_FILE),
            pack_items: dir.join(PACK_ITEMS_FILE),
            dir,
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths::new(DEFAULT_DATA_DIR)
    }
}

/// Everything a session works with, passed explicitly to each operation.
#[derive(Debug, Clone)]
pub struct AppState {
    pub paths: DataPaths,
    pub inventory: SpeedupInventory,
    pub training: TrainingParameters,
}

impl AppState {
    /// Loads the saved inventory, writing the defaults on first use.
    pub fn load(paths: DataPaths) -> Result<Self> {
        let inventory = match load_inventory(&paths.inventory)? {
            Some(inventory) => inventory,
            None => {
                let inventory = default_inventory();
                save_inventory(&paths.inventory, &inventory)?;
                info!(path = %paths.inventory.display(), "initialized speed-up inventory");
                inventory
            }
        };
        Ok(AppState {
            paths,
            inventory,
            training: default_training_parameters(),
        })
    }

    pub fn persist_inventory(&self) -> Result<()> {
        save_inventory(&self.paths.inventory, &self.inventory)
    }

    pub fn record_store(&self) -> Result<RecordStore> {
        RecordStore::open(&self.paths.hall_of_chiefs)
    }

    pub fn pack_store(&self) -> PackValueStore {
        PackValueStore::open(&self.paths.pack_values)
    }
}
