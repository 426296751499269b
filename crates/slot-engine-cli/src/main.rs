//! `slots` CLI — compute bookable slots from a tenant data file.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for an event type on a date (JSON on stdout)
//! slots available --data tenant.json --event-type evt-1 --date 2026-03-16
//!
//! # Pin "now" for reproducible output
//! slots available --data tenant.json --event-type evt-1 --date 2026-03-16 --now 2026-03-01T00:00:00Z
//!
//! # Re-validate a requested booking start
//! slots check --data tenant.json --event-type evt-1 --start 2026-03-16T10:00:00Z
//!
//! # Show the weekly windows seeded for new hosts
//! slots defaults --config slots.toml
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=slot_engine=debug` for details.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use slot_engine::source::{InMemoryCalendar, InMemoryStore, TimeoutCalendar};
use slot_engine::{
    AvailabilityEngine, AvailabilityWindow, Booking, BookingDecision, Clock, EngineConfig,
    EventType, FixedClock, SystemClock, TimeRange,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable slot computation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the available slots of an event type on a date
    Available {
        /// Tenant data file (JSON)
        #[arg(short, long)]
        data: String,
        /// Event type id
        #[arg(short, long)]
        event_type: String,
        /// Calendar date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Override the current instant (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Check whether a booking may start at the given instant
    Check {
        /// Tenant data file (JSON)
        #[arg(short, long)]
        data: String,
        /// Event type id
        #[arg(short, long)]
        event_type: String,
        /// Requested start (RFC 3339)
        #[arg(long)]
        start: String,
        /// Override the current instant (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the weekly windows seeded for a host's first event type
    Defaults,
}

/// Tenant data as stored in a data file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct TenantData {
    event_types: Vec<EventType>,
    windows: Vec<AvailabilityWindow>,
    bookings: Vec<Booking>,
    /// Busy ranges from each host's external calendar.
    external_busy: HashMap<String, Vec<TimeRange>>,
    /// Hosts whose external calendar lookup fails.
    external_failing_hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Available {
            data,
            event_type,
            date,
            now,
        } => {
            let engine = build_engine(&data, now.as_deref(), &config)?;
            let response = engine
                .availability(&event_type, &date)
                .await
                .context("Failed to compute availability")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Check {
            data,
            event_type,
            start,
            now,
        } => {
            let engine = build_engine(&data, now.as_deref(), &config)?;
            let start = parse_instant(&start)?;
            let decision = engine
                .check_booking(&event_type, start)
                .await
                .context("Failed to check booking")?;
            let output = match decision {
                BookingDecision::Accepted(range) => json!({
                    "accepted": true,
                    "start": range.start,
                    "end": range.end,
                }),
                BookingDecision::Rejected(reason) => json!({
                    "accepted": false,
                    "reason": reason.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Defaults => {
            let windows = config.defaults.windows_for("");
            let output: Vec<_> = windows
                .iter()
                .map(|w| {
                    json!({
                        "day_of_week": w.day_of_week,
                        "start_minute": w.start_minute,
                        "end_minute": w.end_minute,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Install a stderr fmt subscriber; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(
    data_path: &str,
    now: Option<&str>,
    config: &EngineConfig,
) -> Result<AvailabilityEngine> {
    let data = load_tenant_data(data_path)?;

    let mut calendar = InMemoryCalendar::new();
    for (host_id, ranges) in data.external_busy {
        for range in ranges {
            calendar.add_busy(host_id.clone(), range);
        }
    }
    for host_id in data.external_failing_hosts {
        calendar.fail_for(host_id);
    }

    let store = Arc::new(InMemoryStore::with_data(
        data.event_types,
        data.windows,
        data.bookings,
    ));
    let clock: Arc<dyn Clock> = match now {
        Some(now) => Arc::new(FixedClock(parse_instant(now)?)),
        None => Arc::new(SystemClock),
    };

    Ok(AvailabilityEngine::new(
        store.clone(),
        store,
        Arc::new(TimeoutCalendar::from_config(calendar, config)),
    )
    .with_clock(clock)
    .with_config(config))
}

fn load_tenant_data(path: &str) -> Result<TenantData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse tenant data: {}", path))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 instant: {}", raw))
}
