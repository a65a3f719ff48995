//! `slots` CLI — common meeting slots from a snapshot of backend responses.
//!
//! ## Usage
//!
//! ```sh
//! # Free slots shared with user "inv-1" on a date (snapshot from stdin)
//! slots match --with inv-1 --date 2024-06-01 < snapshot.json
//!
//! # Same, in a timezone, 12-hour labels, JSON output
//! slots match -i snapshot.json --with inv-1 --date 2024-06-01 \
//!     --tz Europe/Berlin --twelve-hour --json
//!
//! # Booking request body for the 2nd listed slot
//! slots book -i snapshot.json --with inv-1 --date 2024-06-01 --pick 2 --title "Pitch review"
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `error`); logs go to stderr.
//! Rejected input is always reported on stderr as `warning: skipped ...`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slot_engine::records::parse_date;
use slot_engine::{
    propose_slots, BookingRequest, DstPolicy, LabelFormat, MatchOptions, Proposal, Session,
    SnapshotBackend,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Common meeting slot finder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the free slots shared with another user
    Match {
        #[command(flatten)]
        query: Query,
        /// Print slots as JSON instead of labels
        #[arg(long)]
        json: bool,
    },
    /// Print the booking request body for one listed slot
    Book {
        #[command(flatten)]
        query: Query,
        /// 1-based slot number, as listed by `match`
        #[arg(long)]
        pick: usize,
        /// Meeting title
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Args)]
struct Query {
    /// Snapshot file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// The other participant's user id
    #[arg(long = "with")]
    participant: String,
    /// Date to match, YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Acting user (defaults to the snapshot's "user")
    #[arg(long)]
    user: Option<String>,
    /// Bearer token for the session (defaults to the snapshot's "token")
    #[arg(long)]
    token: Option<String>,
    /// IANA timezone the availability is declared in
    #[arg(long, default_value = "UTC")]
    tz: String,
    /// What to do with slot times that fall in a DST gap
    #[arg(long, value_enum, default_value_t = DstArg::Shift)]
    dst: DstArg,
    /// Label slots with 12-hour times
    #[arg(long)]
    twelve_hour: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DstArg {
    Shift,
    Skip,
}

impl From<DstArg> for DstPolicy {
    fn from(arg: DstArg) -> Self {
        match arg {
            DstArg::Shift => DstPolicy::ShiftForward,
            DstArg::Skip => DstPolicy::Skip,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match { query, json } => {
            let proposal = run_query(&query)?;
            if json {
                let out = serde_json::to_string_pretty(&proposal.slots)?;
                println!("{}", out);
            } else if proposal.slots.is_empty() {
                println!("No common slots for this date");
            } else {
                for (i, slot) in proposal.slots.iter().enumerate() {
                    println!("{}. {}", i + 1, slot.label);
                }
            }
        }
        Commands::Book { query, pick, title } => {
            let proposal = run_query(&query)?;
            let slot = proposal.pick(pick).with_context(|| {
                format!(
                    "No slot #{} on {} ({} available)",
                    pick,
                    proposal.date,
                    proposal.slots.len()
                )
            })?;
            let request = BookingRequest::for_slot(&query.participant, slot, title.as_deref())
                .context("Failed to build booking request")?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

fn run_query(query: &Query) -> Result<Proposal> {
    let snapshot = read_input(query.input.as_deref())?;
    let backend = SnapshotBackend::from_json(&snapshot).context("Failed to parse snapshot")?;
    let session = build_session(query, &backend)?;

    let date = parse_date(&query.date).context("Invalid --date")?;
    let options = MatchOptions::in_timezone(&query.tz)
        .context("Invalid --tz")?
        .with_dst_policy(query.dst.into())
        .with_label_format(if query.twelve_hour {
            LabelFormat::TwelveHour
        } else {
            LabelFormat::TwentyFourHour
        });

    let proposal = propose_slots(&backend, &session, &query.participant, date, &options)
        .context("Failed to compute common slots")?;

    for rejected in &proposal.rejected {
        eprintln!("warning: skipped {}: {}", rejected.location, rejected.error);
    }

    Ok(proposal)
}

fn build_session(query: &Query, backend: &SnapshotBackend) -> Result<Session> {
    let default = backend.session();
    let user = query
        .user
        .clone()
        .or_else(|| default.as_ref().map(|s| s.user_id().to_string()))
        .context("No acting user: pass --user or set \"user\" in the snapshot")?;
    let token = query
        .token
        .clone()
        .or_else(|| default.map(|s| s.token().to_string()))
        .unwrap_or_default();
    Ok(Session::new(user, token))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
