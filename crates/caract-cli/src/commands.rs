use std::fs;
use std::sync::Arc;

use anyhow::Context;
use caract_ledger::{LedgerReader, FIRST_VALUE_COLUMN};
use caract_session::Session;
use caract_types::{Mode, PresentationHints};
use colored::{ColoredString, Colorize};
use serde_json::json;

use crate::cli::*;
use crate::config::CaractConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CaractConfig::load(cli.config.as_deref())?;
    let format = cli.format;
    match cli.command {
        Command::Materials(args) => cmd_materials(&config, args, format),
        Command::Sources(args) => cmd_sources(&config, args, format),
        Command::Status(args) => cmd_status(&config, args, format),
        Command::Record(args) => cmd_record(&config, args, format),
    }
}

fn cmd_materials(
    config: &CaractConfig,
    args: ModeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (taxonomy, hints) = config.taxonomy()?;
    let mode = args.mode;
    // Weight columns follow the header block.
    let first = FIRST_VALUE_COLUMN + mode.header_width() as u32;

    if format == OutputFormat::Json {
        let mut column = first;
        let groups: Vec<_> = taxonomy
            .groups(mode)
            .iter()
            .map(|g| {
                let materials: Vec<_> = g
                    .materials
                    .iter()
                    .map(|m| {
                        let entry = json!({ "material": m, "column": column });
                        column += 1;
                        entry
                    })
                    .collect();
                json!({
                    "label": g.label,
                    "color": hints.color(mode, &g.label),
                    "materials": materials,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "mode": mode, "groups": groups }))?);
        return Ok(());
    }

    println!(
        "{} materials ({}), ledger columns {}..{}",
        mode.to_string().bold(),
        taxonomy.material_count(mode),
        first,
        first + taxonomy.material_count(mode) as u32 - 1
    );
    let mut column = first;
    for group in taxonomy.groups(mode) {
        println!("\n{}", paint(&group.label, &hints, mode).bold());
        for material in &group.materials {
            println!("  {:>3}  {}", column.to_string().dimmed(), material);
            column += 1;
        }
    }
    Ok(())
}

fn cmd_sources(config: &CaractConfig, args: ModeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (taxonomy, _) = config.taxonomy()?;
    let sources = taxonomy.sources(args.mode);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(sources)?);
        return Ok(());
    }
    let label = match args.mode {
        Mode::Incoming => "Clients",
        Mode::Outgoing => "Flux",
    };
    println!("{} ({}):", label.bold(), args.mode);
    for source in sources {
        println!("  {}", source.cyan());
    }
    Ok(())
}

fn cmd_status(config: &CaractConfig, args: StatusArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = config.ledger();
    let modes = match args.mode {
        Some(mode) => vec![mode],
        None => Mode::ALL.to_vec(),
    };

    let mut report = Vec::with_capacity(modes.len());
    for mode in modes {
        let path = ledger.path(mode).display().to_string();
        let next = if ledger.is_provisioned(mode) {
            Some(ledger.next_free_row(mode).map_err(|e| e.to_string()))
        } else {
            None
        };
        report.push((mode, path, next));
    }

    if format == OutputFormat::Json {
        let entries: Vec<_> = report
            .iter()
            .map(|(mode, path, next)| {
                json!({
                    "mode": mode,
                    "path": path,
                    "sheet": ledger.sheet(),
                    "provisioned": next.is_some(),
                    "next_row": next.as_ref().and_then(|r| r.as_ref().ok()),
                    "error": next.as_ref().and_then(|r| r.as_ref().err()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Photo archive: {}", config.photos.root.display().to_string().cyan());
    for (mode, path, next) in report {
        println!("\n{} {}", mode.to_string().bold(), path.yellow());
        match next {
            None => println!("  {} ledger workbook not found", "✗".red().bold()),
            Some(Ok(row)) => {
                println!("  Sheet: {}", ledger.sheet());
                println!("  Next free row: {}", row.to_string().green().bold());
            }
            Some(Err(err)) => println!("  {} {}", "✗".red().bold(), err),
        }
    }
    Ok(())
}

fn cmd_record(config: &CaractConfig, args: RecordArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (taxonomy, _) = config.taxonomy()?;
    let mut session = Session::new(Arc::new(taxonomy));
    session.begin(args.mode)?;

    if let Some(date) = args.date {
        session.set_date(date)?;
    }
    session.set_flux_or_client(args.flux)?;
    session.set_team(args.team)?;
    session.set_location(args.location)?;

    for (material, raw) in args.weights {
        let kg = session.set_weight(&material, raw)?;
        tracing::debug!(material = %material, kg, "weight entered");
    }
    for (material, path) in args.photos {
        let data = fs::read(&path).with_context(|| format!("reading photo {path}"))?;
        session.stage_photo(&material, data)?;
    }

    let receipt = session
        .commit(&config.ledger(), &config.archive())
        .context("commit failed; nothing was written to the ledger")?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }
    println!("{} {}", "✓".green().bold(), receipt.summary());
    for photo in &receipt.photos {
        println!("  {} {}", "photo:".green(), photo.display());
    }
    Ok(())
}

/// Group label in its configured color, plain when none or malformed.
fn paint(label: &str, hints: &PresentationHints, mode: Mode) -> ColoredString {
    match hints.color(mode, label).and_then(parse_hex) {
        Some((r, g, b)) => label.truecolor(r, g, b),
        None => label.normal(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
