//! # Wosmax
//!
//! A command-line tool and library of calculators for Whiteout Survival event
//! planning.
//!
//! This crate answers three questions players ask before spending speed-ups:
//!
//! - How many troop-training batches, and how many event points, do my
//!   training speed-ups buy?
//! - Which Hall of Chiefs activities earn the most points per speed-up minute?
//! - Which packs give speed-ups at the lowest cost per minute, and how much
//!   have I spent on them?
//!
//! ## Modules
//!
//! - [`formulas`] - Pure formulas for training time, batches, points and pack value
//! - [`inventory`] - Speed-up allocation across category and general pools
//! - [`store`] - JSON-backed Hall of Chiefs activity log
//! - [`report`] - Efficiency tables, summaries and purchase-history rollups
//! - [`packs`] - Pack value comparison and pack contents summaries
//! - [`data`] - CSV purchase histories and exports
//! - [`models`] - Core data structures
//! - [`config`] - File locations, defaults and the application state
//! - [`display`] - Output formatting and display utilities
//! - [`wasm`] - JSON entry points for the browser front-end
//!
//! ## Example Usage
//!
//! ```
//! use wosmax::{
//!     config::{default_inventory, default_training_parameters},
//!     report::analyze_training,
//! };
//!
//! let params = default_training_parameters();
//! let inventory = default_inventory();
//!
//! let analysis = analyze_training(&params, &inventory, None).unwrap();
//! assert_eq!(analysis.available_speedups, 19_515.0);
//! assert_eq!(analysis.batches, 67);
//! ```
//!
//! ## Speed-up pools
//!
//! Every category (construction, research, training) has its own pool and may
//! also draw on the shared general pool. Category speed-ups are always used
//! first; see [`inventory::allocate`].

pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod formulas;
pub mod inventory;
pub mod models;
pub mod packs;
pub mod report;
pub mod store;
pub mod wasm;
