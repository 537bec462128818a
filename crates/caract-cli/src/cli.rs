use std::path::PathBuf;

use caract_types::{Location, Mode, Team};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "caract",
    about = "Waste characterization recorder: weights to the ledger, photos to the archive",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./caract.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List material groups in ledger column order
    Materials(ModeArgs),
    /// List selectable flux/client values
    Sources(ModeArgs),
    /// Show ledger store location and next free row
    Status(StatusArgs),
    /// Record one session: weights to the ledger, photos to the archive
    Record(RecordArgs),
}

#[derive(Args)]
pub struct ModeArgs {
    /// incoming | outgoing
    #[arg(short, long)]
    pub mode: Mode,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Restrict to one mode
    #[arg(short, long)]
    pub mode: Option<Mode>,
}

#[derive(Args)]
pub struct RecordArgs {
    #[arg(short, long)]
    pub mode: Mode,

    /// Session date, dd-mm-YYYY (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Flux (outgoing) or client (incoming)
    #[arg(short, long)]
    pub flux: String,

    #[arg(short, long, default_value = "morning")]
    pub team: Team,

    #[arg(short, long, default_value = "silo")]
    pub location: Location,

    /// Weight in kg, as MATERIAL=KG (decimal comma accepted)
    #[arg(short, long = "weight", value_parser = parse_pair)]
    pub weights: Vec<(String, String)>,

    /// Photo file, as MATERIAL=PATH
    #[arg(short, long = "photo", value_parser = parse_pair)]
    pub photos: Vec<(String, String)>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MATERIAL=VALUE, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing material name in {s:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pairs_split_on_first_equals() {
        assert_eq!(
            parse_pair("PET Q9=1,5").unwrap(),
            ("PET Q9".to_string(), "1,5".to_string())
        );
        assert!(parse_pair("CARTON").is_err());
        assert!(parse_pair("=3").is_err());
    }

    #[test]
    fn record_parses_repeated_flags() {
        let cli = Cli::try_parse_from([
            "caract", "record", "--mode", "outgoing", "--flux", "ELA", "--team", "apres-midi",
            "-w", "ELA=4,2", "-w", "FILM=1", "-p", "ELA=ela.jpg",
        ])
        .unwrap();
        let Command::Record(args) = cli.command else {
            panic!("expected record");
        };
        assert_eq!(args.mode, Mode::Outgoing);
        assert_eq!(args.team, Team::Afternoon);
        assert_eq!(args.location, Location::Silo);
        assert_eq!(args.weights.len(), 2);
        assert_eq!(args.photos, vec![("ELA".to_string(), "ela.jpg".to_string())]);
    }
}
