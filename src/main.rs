//! Wosmax - Command Line Interface
//!
//! This is the main entry point for the Whiteout Survival calculators.
//! Run with `--help` to see all available commands.

use clap::{ArgAction, Args, Parser, Subcommand};
use chrono::{Local, NaiveDate};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, Level};

use wosmax::{
    config::{AppState, DataPaths, DEFAULT_DATA_DIR},
    data::{
        append_manual_purchase, export_combined_purchases, export_efficiency_csv,
        load_automatic_purchases, load_manual_purchases, parse_purchase_date,
        save_manual_purchases, validate_manual_purchase,
    },
    display::{
        display_allocation, display_efficiency_report, display_entries, display_inventory,
        display_outcome, display_packs, display_purchases, display_reward_summary,
        display_training_analysis, format_duration, zero_training_warning,
    },
    inventory::allocate,
    models::{Category, ManualPurchase, SpeedupContent, TrainingDuration},
    packs::{
        aggregate_pack_rewards, export_csv, filter_rows, load_pack_rewards, sorted_indexed,
        summary_rows, PackSortKey,
    },
    report::{
        analyze_training, efficiency_table, filter_by_date, invalid_training_descriptions,
        merge_purchases, purchase_stats, remove_purchase, summarize,
    },
};

/// Speed-up and event-point calculators for Whiteout Survival.
#[derive(Parser, Debug)]
#[command(name = "wosmax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding all data files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate batches and points from the training speed-ups
    Train(TrainArgs),

    /// Project how a requirement is covered by category and general speed-ups
    Allocate {
        /// construction, research or training
        category: Category,
        /// Required speed-up minutes
        minutes: f64,
    },

    /// Show or change the speed-up inventory
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Hall of Chiefs activity log and efficiency report
    #[command(subcommand)]
    Hall(HallCommand),

    /// Pack value comparison and pack contents
    #[command(subcommand)]
    Packs(PacksCommand),

    /// Purchase history
    #[command(subcommand)]
    Purchases(PurchasesCommand),
}

#[derive(Args, Debug)]
struct TrainArgs {
    #[arg(long, default_value = "0")]
    days: u32,
    #[arg(long)]
    hours: Option<u32>,
    #[arg(long)]
    minutes: Option<u32>,
    #[arg(long, default_value = "0")]
    seconds: u32,

    /// Troops trained per batch
    #[arg(long)]
    troops: Option<u32>,

    /// Event points per trained troop
    #[arg(long)]
    points_per_troop: Option<f64>,

    /// Training-time reduction in percent
    #[arg(long, default_value = "0", value_parser = validate_percent)]
    reduction: f64,

    /// Point target to back-solve the missing speed-ups for
    #[arg(long)]
    target: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    /// Print all balances
    Show,
    /// Replace one or more balances (minutes)
    Set {
        #[arg(long)]
        general: Option<f64>,
        #[arg(long)]
        construction: Option<f64>,
        #[arg(long)]
        research: Option<f64>,
        #[arg(long)]
        training: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct PowerArgs {
    description: String,
    /// Power gained by the activity
    #[arg(long)]
    power: f64,
    /// Speed-up minutes spent
    #[arg(long)]
    speedups: f64,
    /// Points per power (30 or 45)
    #[arg(long, default_value = "30")]
    points_per_power: i64,
}

#[derive(Subcommand, Debug)]
enum HallCommand {
    AddConstruction(PowerArgs),
    AddResearch(PowerArgs),
    AddTraining {
        description: String,
        #[arg(long, default_value = "0")]
        days: i64,
        #[arg(long, default_value = "0")]
        hours: i64,
        #[arg(long, default_value = "0")]
        minutes: i64,
        #[arg(long, default_value = "0")]
        seconds: i64,
        #[arg(long)]
        troops: i64,
        #[arg(long)]
        points_per_troop: f64,
    },
    /// List entries of one category, or all
    List { category: Option<Category> },
    Delete { category: Category, id: String },
    /// Delete every entry of one category, or all categories
    Clear {
        category: Option<Category>,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Copy the data file to another path
    Backup { path: PathBuf },
    /// Efficiency table ranked by points per minute
    Report,
    /// Write the efficiency table as CSV
    Export { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum PacksCommand {
    Add {
        name: String,
        #[arg(long)]
        price: f64,
        /// Number of 60-minute speed-ups
        #[arg(long, default_value = "0")]
        hours: i64,
        /// Number of 5-minute speed-ups
        #[arg(long, default_value = "0")]
        five_minutes: i64,
        /// Total minutes, instead of unit counts
        #[arg(long, conflicts_with_all = ["hours", "five_minutes"])]
        total_minutes: Option<f64>,
    },
    List {
        /// name, price, total_minutes or cost_per_minute
        #[arg(long, default_value = "cost_per_minute")]
        sort: PackSortKey,
        #[arg(long)]
        descending: bool,
    },
    /// Remove a pack by its position in insertion order
    Remove { index: usize },
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    Export { path: PathBuf },
    /// Summarise the rewards of purchased packs
    Contents {
        /// Only show items whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PurchasesCommand {
    Add {
        pack_name: String,
        #[arg(long)]
        spending: f64,
        #[arg(long, default_value = "0")]
        speedups: f64,
        /// Purchase date, defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    Report {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },
    /// Write the merged history to combined_purchases.csv
    Export,
    /// Delete a manual purchase by its position in an unfiltered `purchases report`
    Delete { index: usize },
}

fn validate_percent(value: &str) -> Result<f64, String> {
    let percent: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=100.0).contains(&percent) {
        Ok(percent / 100.0)
    } else {
        Err("Reduction must be between 0 and 100".to_string())
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_purchase_date(value).map_err(|e| e.to_string())
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(cli.verbose))
        .with_level(true)
        .init();
    debug!(?cli, "parsed arguments");

    let mut state = AppState::load(DataPaths::new(&cli.data_dir))?;

    match cli.command {
        Command::Train(args) => run_train(&state, args)?,
        Command::Allocate { category, minutes } => {
            let allocation = allocate(category, minutes, &state.inventory)?;
            display_allocation(category, minutes, &allocation);
        }
        Command::Inventory(cmd) => run_inventory(&mut state, cmd)?,
        Command::Hall(cmd) => run_hall(&state, cmd)?,
        Command::Packs(cmd) => run_packs(&state, cmd)?,
        Command::Purchases(cmd) => run_purchases(&state, cmd)?,
    }
    Ok(())
}

fn run_train(state: &AppState, args: TrainArgs) -> Result<(), Box<dyn Error>> {
    let mut params = state.training.clone();
    if args.hours.is_some() || args.minutes.is_some() || args.days > 0 || args.seconds > 0 {
        params.duration = TrainingDuration {
            days: args.days,
            hours: args.hours.unwrap_or(0),
            minutes: args.minutes.unwrap_or(0),
            seconds: args.seconds,
        };
    }
    if let Some(troops) = args.troops {
        params.troops_per_batch = troops;
    }
    if let Some(points) = args.points_per_troop {
        params.points_per_troop = points;
    }
    params.time_reduction_bonus = args.reduction;

    let analysis = analyze_training(&params, &state.inventory, args.target)?;
    display_training_analysis(&analysis);
    Ok(())
}

fn run_inventory(state: &mut AppState, cmd: InventoryCommand) -> Result<(), Box<dyn Error>> {
    match cmd {
        InventoryCommand::Show => display_inventory(&state.inventory),
        InventoryCommand::Set {
            general,
            construction,
            research,
            training,
        } => {
            let inventory = &mut state.inventory;
            for (slot, value) in [
                (&mut inventory.general, general),
                (&mut inventory.construction, construction),
                (&mut inventory.research, research),
                (&mut inventory.training, training),
            ] {
                if let Some(minutes) = value {
                    if !(minutes.is_finite() && minutes >= 0.0) {
                        return Err(format!("Speed-up balance cannot be negative: {minutes}").into());
                    }
                    *slot = minutes;
                }
            }
            state.persist_inventory()?;
            display_inventory(&state.inventory);
        }
    }
    Ok(())
}

fn power_value(args: &PowerArgs) -> serde_json::Value {
    json!({
        "description": args.description,
        "power": args.power,
        "speedup_minutes": args.speedups,
        "points_per_power": args.points_per_power,
    })
}

fn run_hall(state: &AppState, cmd: HallCommand) -> Result<(), Box<dyn Error>> {
    let store = state.record_store()?;
    match cmd {
        HallCommand::AddConstruction(args) => {
            display_outcome(&store.add_value(Category::Construction, &power_value(&args))?)
        }
        HallCommand::AddResearch(args) => {
            display_outcome(&store.add_value(Category::Research, &power_value(&args))?)
        }
        HallCommand::AddTraining {
            description,
            days,
            hours,
            minutes,
            seconds,
            troops,
            points_per_troop,
        } => {
            let value = json!({
                "description": description,
                "days": days,
                "hours": hours,
                "minutes": minutes,
                "seconds": seconds,
                "troops_per_batch": troops,
                "points_per_troop": points_per_troop,
            });
            let outcome = store.add_value(Category::Training, &value)?;
            display_outcome(&outcome);
            if outcome.success && days == 0 && hours == 0 && minutes == 0 && seconds == 0 {
                println!("[WARNING] Training time is zero; this entry scores no points.");
            }
        }
        HallCommand::List { category } => {
            let categories = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };
            for c in categories {
                println!("[{}]", c.label().to_uppercase());
                display_entries(&store.get_entries(c)?);
            }
        }
        HallCommand::Delete { category, id } => display_outcome(&store.delete(category, &id)?),
        HallCommand::Clear { category, yes } => {
            if !yes {
                println!("Refusing to delete entries without --yes.");
                return Ok(());
            }
            display_outcome(&store.delete_all(category)?);
        }
        HallCommand::Backup { path } => {
            store.backup_data(&path)?;
            println!("Backup written to {}", path.display());
        }
        HallCommand::Report => {
            let entries = store.get_all_entries()?;
            if entries.is_empty() {
                println!("No Hall of Chiefs entries yet.");
                return Ok(());
            }
            for description in invalid_training_descriptions(&entries) {
                println!("{}", zero_training_warning(&description));
            }
            let rows = efficiency_table(&entries, &state.inventory);
            display_efficiency_report(&rows, &summarize(&rows));
        }
        HallCommand::Export { path } => {
            let rows = efficiency_table(&store.get_all_entries()?, &state.inventory);
            export_efficiency_csv(&path, &rows)?;
            println!("Exported {} rows to {}", rows.len(), path.display());
        }
    }
    Ok(())
}

fn run_packs(state: &AppState, cmd: PacksCommand) -> Result<(), Box<dyn Error>> {
    let store = state.pack_store();
    match cmd {
        PacksCommand::Add {
            name,
            price,
            hours,
            five_minutes,
            total_minutes,
        } => {
            let content = match total_minutes {
                Some(minutes) => SpeedupContent::Minutes(minutes),
                None => SpeedupContent::Units {
                    hours,
                    five_minutes,
                },
            };
            display_outcome(&store.add(&name, price, content)?);
        }
        PacksCommand::List { sort, descending } => {
            display_packs(&sorted_indexed(&store.entries()?, sort, !descending));
        }
        PacksCommand::Remove { index } => display_outcome(&store.remove(index)?),
        PacksCommand::Clear { yes } => {
            if !yes {
                println!("Refusing to clear pack history without --yes.");
                return Ok(());
            }
            display_outcome(&store.clear()?);
        }
        PacksCommand::Export { path } => {
            let entries = store.entries()?;
            export_csv(&entries, &path)?;
            println!("Exported {} packs to {}", entries.len(), path.display());
        }
        PacksCommand::Contents { search } => {
            let packs = load_pack_rewards(&state.paths.pack_items)?;
            if packs.is_empty() {
                println!("No pack data found in {}", state.paths.pack_items.display());
                return Ok(());
            }
            let summary = aggregate_pack_rewards(&packs);
            let mut rows = summary_rows(&summary);
            if let Some(term) = search {
                rows = filter_rows(&rows, &term);
            }
            display_reward_summary(&rows, &summary);
        }
    }
    Ok(())
}

fn run_purchases(state: &AppState, cmd: PurchasesCommand) -> Result<(), Box<dyn Error>> {
    let paths = &state.paths;
    match cmd {
        PurchasesCommand::Add {
            pack_name,
            spending,
            speedups,
            date,
        } => {
            let purchase = ManualPurchase {
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                pack_name,
                spending,
                speedups,
            };
            if let Err(reason) = validate_manual_purchase(&purchase) {
                println!("[REJECTED] {reason}");
                return Ok(());
            }
            append_manual_purchase(&paths.manual_purchases, &purchase)?;
            println!("Purchase '{}' recorded.", purchase.pack_name);
        }
        PurchasesCommand::Report { from, to } => {
            let automatic = load_automatic_purchases(&paths.automatic_purchases)?;
            let manual = load_manual_purchases(&paths.manual_purchases)?;
            let merged = merge_purchases(automatic.as_deref(), manual.as_deref());
            let shown = filter_by_date(&merged, from, to);
            let stats = purchase_stats(automatic.as_deref(), manual.as_deref());
            display_purchases(&shown, &stats);
            println!(
                "  Speed-ups bought in range: {}",
                format_duration(shown.iter().map(|r| r.speedups).sum())
            );
        }
        PurchasesCommand::Export => {
            let automatic = load_automatic_purchases(&paths.automatic_purchases)?;
            let manual = load_manual_purchases(&paths.manual_purchases)?;
            let merged = merge_purchases(automatic.as_deref(), manual.as_deref());
            if export_combined_purchases(&paths.combined_purchases, &merged)? {
                println!("Exported {} purchases to {}", merged.len(), paths.combined_purchases.display());
            } else {
                println!("No purchases to export.");
            }
        }
        PurchasesCommand::Delete { index } => {
            let automatic = load_automatic_purchases(&paths.automatic_purchases)?;
            let mut manual = load_manual_purchases(&paths.manual_purchases)?.unwrap_or_default();
            let merged = merge_purchases(automatic.as_deref(), Some(manual.as_slice()));
            let removed = remove_purchase(&merged, index, &mut manual)?;
            save_manual_purchases(&paths.manual_purchases, &manual)?;
            println!("Deleted purchase '{}' from {}.", removed.pack_name, removed.date);
        }
    }
    Ok(())
}
