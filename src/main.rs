mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chairbook_core::clock::{Clock, FixedClock, SystemClock};
use chairbook_core::config::ChairbookConfig;
use chairbook_core::roster::Seed;
use chairbook_core::scheduler::{Scheduler, Settings};
use chairbook_core::view_state::ViewMode;
use chairbook_core::waitlist::{DateBucket, SortKey, WaitlistStatus};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chairbook")]
#[command(about = "Admin calendar for your salon: views, waitlist and bookings")]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar
    View {
        /// day, week or month
        #[arg(short, long)]
        mode: Option<ViewMode>,

        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List bookable time slots
    Slots {
        /// First hour of the day (defaults to config)
        #[arg(long)]
        start: Option<u32>,

        /// Hour the last slot ends at (defaults to config)
        #[arg(long)]
        end: Option<u32>,

        /// Slot length in minutes (defaults to config)
        #[arg(long)]
        interval: Option<u32>,
    },
    /// Snap a pointer offset in a day column to the 15-minute grid
    Snap {
        /// Pointer offset from the top of the column, in pixels
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Pixels per hour (defaults to config)
        #[arg(long)]
        zoom: Option<u32>,

        /// Staff column the pointer is in
        #[arg(long)]
        staff: Option<String>,
    },
    /// Show the waitlist
    Waitlist {
        /// upcoming, expired or booked
        #[arg(long)]
        status: Option<WaitlistStatus>,

        /// today, 3days, 7days, 30days or all
        #[arg(long)]
        bucket: Option<DateBucket>,

        /// created-oldest, created-newest, price-highest, price-lowest,
        /// requested-nearest or requested-furthest
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Run a JSON array of commands against the seed and print the result
    Replay {
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ChairbookConfig::load()?;
    let mut scheduler = load_scheduler(&config, cli.today)?;

    match cli.command {
        Commands::View { mode, date } => commands::view::run(&mut scheduler, mode, date),
        Commands::Slots {
            start,
            end,
            interval,
        } => commands::slots::run(
            start.unwrap_or(config.day_start_hour),
            end.unwrap_or(config.day_end_hour),
            interval.unwrap_or(config.slot_interval_minutes),
        ),
        Commands::Snap { y, zoom, staff } => commands::snap::run(&mut scheduler, y, zoom, staff),
        Commands::Waitlist {
            status,
            bucket,
            sort,
        } => commands::waitlist::run(&mut scheduler, status, bucket, sort),
        Commands::Replay { script } => commands::replay::run(&mut scheduler, &script),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scheduler(config: &ChairbookConfig, today: Option<NaiveDate>) -> Result<Scheduler> {
    let seed = match config.seed_path() {
        Some(path) => Seed::load(&path)
            .with_context(|| format!("Could not load seed file {}", path.display()))?,
        None => Seed::default(),
    };

    let clock: Box<dyn Clock> = match today {
        Some(date) => Box::new(FixedClock::at_date(date)),
        None => Box::new(SystemClock),
    };

    let settings = Settings::from_config(config)?;
    Ok(Scheduler::new(settings, seed, clock))
}
