//! Gavel: structured vote records out of council meeting minutes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use gavel_core::{ExtractOptions, MemberRoster};
use gavel_extract::extract_document;

mod display;

#[derive(Parser, Debug)]
#[command(name = "gavel")]
#[command(about = "Extract motion and vote records from meeting minutes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract vote records from a plain-text minutes document
    Extract {
        /// Path to the minutes text file
        file: PathBuf,

        /// Meeting date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Roster JSON file of canonical member names and aliases
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Known body size, used to resolve unanimous voice votes
        #[arg(long, env = "GAVEL_EXPECTED_VOTERS")]
        expected_voters: Option<u32>,

        /// Emit the full extract as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Validate a roster file and list its members
    Roster {
        /// Roster JSON file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gavel=info".into()),
        )
        .init();
    tracing::info!("gavel v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Extract {
            file,
            date,
            roster,
            expected_voters,
            json,
        } => extract(&file, date, roster.as_deref(), expected_voters, json),
        Command::Roster { file } => roster_summary(&file),
    }
}

fn extract(
    file: &Path,
    date: NaiveDate,
    roster_path: Option<&Path>,
    expected_voters: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let roster = load_roster(roster_path)?;
    let opts = ExtractOptions {
        total_expected_voters: expected_voters,
        ..ExtractOptions::default()
    };

    let document_id = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let out = extract_document(&document_id, date, &text, &roster, &opts);

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        display::print_extract(&out);
    }
    Ok(())
}

fn roster_summary(file: &Path) -> anyhow::Result<()> {
    let json =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let roster = MemberRoster::from_json(&json)
        .with_context(|| format!("parsing {}", file.display()))?;

    println!("{} members", roster.len());
    for member in roster.members() {
        if member.aliases.is_empty() {
            println!("  {}", member.name);
        } else {
            println!("  {} (aka {})", member.name, member.aliases.join(", "));
        }
    }
    Ok(())
}

fn load_roster(path: Option<&Path>) -> anyhow::Result<MemberRoster> {
    match path {
        Some(p) => {
            let json =
                fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            MemberRoster::from_json(&json).with_context(|| format!("parsing {}", p.display()))
        }
        // Without a roster every enumerated name goes unmatched, which
        // still yields summaries and tallies.
        None => Ok(MemberRoster::from_names(Vec::<String>::new())?),
    }
}
