//! Command line for the quorum scheduling engine.
//!
//! Every subcommand is JSON in, JSON out: structured input comes from a
//! file argument or stdin, results go to stdout, and errors exit nonzero
//! with the engine's message on stderr.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use quorum_engine::{
    offset_minutes, parse_utc_instant, ranked, resolve_for_roster, tally, translate_grid,
    AvailabilityGrid, Member, MeetingCandidate, Vote, WeekGeometry,
};

#[derive(Parser)]
#[command(name = "quorum")]
#[command(about = "Cross-timezone availability translation, rosters, and vote tallies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wall-clock offset in minutes between two zones at an instant
    Offset {
        /// IANA zone to measure from
        #[arg(long)]
        from_tz: String,

        /// IANA zone to measure to
        #[arg(long)]
        to_tz: String,

        /// Reference instant (RFC 3339)
        #[arg(long)]
        at: String,
    },

    /// Translate an availability grid into another zone
    Translate {
        /// IANA zone the grid is expressed in
        #[arg(long)]
        from_tz: String,

        /// IANA zone to translate into
        #[arg(long)]
        to_tz: String,

        /// Reference instant for offset resolution (RFC 3339)
        #[arg(long)]
        at: String,

        /// Minutes per slot
        #[arg(long, default_value_t = 60)]
        slot_interval_minutes: u32,

        /// Slots in one day
        #[arg(long, default_value_t = 24)]
        slots_per_day: u32,

        /// Days in one week
        #[arg(long, default_value_t = 7)]
        days_per_week: u32,

        /// Grid JSON file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Render an instant in every roster member's local time
    Roster {
        /// Proposed meeting instant (RFC 3339)
        #[arg(long)]
        at: String,

        /// Members JSON file (default: stdin)
        input: Option<PathBuf>,
    },

    /// Tally votes for a meeting against its ballot
    Tally {
        /// Meeting whose votes count
        #[arg(long)]
        meeting_id: String,

        /// Ballot JSON file with candidates and votes (default: stdin)
        input: Option<PathBuf>,
    },
}

/// Input shape for `tally`: the ballot plus the vote collection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TallyInput {
    candidates: Vec<MeetingCandidate>,
    #[serde(default)]
    votes: Vec<Vote>,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Offset { from_tz, to_tz, at } => {
            let at = parse_utc_instant(&at)?;
            let minutes = offset_minutes(&from_tz, &to_tz, at)?;
            println!("{}", serde_json::json!({ "offsetMinutes": minutes }));
        }

        Command::Translate {
            from_tz,
            to_tz,
            at,
            slot_interval_minutes,
            slots_per_day,
            days_per_week,
            input,
        } => {
            let at = parse_utc_instant(&at)?;
            let geometry = WeekGeometry {
                slot_interval_minutes,
                slots_per_day,
                days_per_week,
            };
            let raw = read_input(input.as_ref())?;
            let grid: AvailabilityGrid =
                serde_json::from_str(&raw).context("parsing availability grid")?;
            let translated = translate_grid(&grid, &from_tz, &to_tz, &geometry, at)?;
            println!("{}", serde_json::to_string_pretty(&translated)?);
        }

        Command::Roster { at, input } => {
            let at = parse_utc_instant(&at)?;
            let raw = read_input(input.as_ref())?;
            let members: Vec<Member> = serde_json::from_str(&raw).context("parsing members")?;
            let roster = resolve_for_roster(at, &members);
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }

        Command::Tally { meeting_id, input } => {
            let raw = read_input(input.as_ref())?;
            let ballot: TallyInput = serde_json::from_str(&raw).context("parsing ballot")?;
            let results = tally(&meeting_id, &ballot.candidates, &ballot.votes);
            let order: Vec<&String> = ranked(&results).into_iter().map(|(k, _)| k).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "results": results,
                    "ranked": order,
                }))?
            );
        }
    }

    Ok(())
}
