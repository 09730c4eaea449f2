//! Websheet - command-line front end for the spreadsheet engine

mod config_path;

use anyhow::{Context, Result, bail};
use std::env;
use std::path::{Path, PathBuf};
use websheet_core::{CellRef, Sheet, SheetConfig};

fn print_usage() {
    eprintln!("Usage: websheet [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet to open (.wss, .json or .csv)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result (can be repeated)");
    eprintln!("  -s, --set <ID=TEXT>       Commit TEXT to cell ID first (can be repeated)");
    eprintln!("  --csv <FILE>              Export the sheet as CSV");
    eprintln!("  --json <FILE>             Export the sheet as a JSON snapshot");
    eprintln!("  --config <FILE>           Load configuration from FILE");
    eprintln!("  --no-config               Ignore the per-user config file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Default)]
struct Options {
    file_path: Option<PathBuf>,
    commands: Vec<String>,
    sets: Vec<(String, String)>,
    csv_output: Option<PathBuf>,
    json_output: Option<PathBuf>,
    config_file: Option<PathBuf>,
    no_config: bool,
}

/// Returns None when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{} requires a value", name))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" | "--command" => opts.commands.push(value("--command")?),
            "-s" | "--set" => {
                let assignment = value("--set")?;
                let Some((id, text)) = assignment.split_once('=') else {
                    bail!("--set expects ID=TEXT, got '{}'", assignment);
                };
                if CellRef::parse(id).is_none() {
                    bail!("Invalid cell identifier: {}", id);
                }
                opts.sets.push((id.to_string(), text.to_string()));
            }
            "--csv" => opts.csv_output = Some(PathBuf::from(value("--csv")?)),
            "--json" => opts.json_output = Some(PathBuf::from(value("--json")?)),
            "--config" => opts.config_file = Some(PathBuf::from(value("--config")?)),
            "--no-config" => opts.no_config = true,
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if opts.file_path.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                opts.file_path = Some(PathBuf::from(other));
            }
        }
    }
    Ok(Some(opts))
}

fn load_config(explicit: Option<&Path>, no_config: bool) -> Result<SheetConfig> {
    if let Some(path) = explicit {
        return SheetConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    if no_config {
        return Ok(SheetConfig::default());
    }
    let Some(path) = config_path::default_config_path().filter(|p| p.is_file()) else {
        return Ok(SheetConfig::default());
    };
    match SheetConfig::load(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("Warning: ignoring {}: {}", path.display(), e);
            Ok(SheetConfig::default())
        }
    }
}

fn run(opts: Options) -> Result<()> {
    let config = load_config(opts.config_file.as_deref(), opts.no_config)?;
    let mut sheet = Sheet::with_file(opts.file_path.clone(), config).with_context(|| {
        format!(
            "Failed to open {}",
            opts.file_path.as_deref().unwrap_or(Path::new("")).display()
        )
    })?;

    for (id, text) in &opts.sets {
        sheet.update_cell(id, text);
    }

    for command in &opts.commands {
        let formula = if command.starts_with('=') {
            command.clone()
        } else {
            format!("={}", command)
        };
        println!("{}", sheet.engine.parse_formula(&formula, &sheet.store).as_text());
    }

    if let Some(path) = &opts.csv_output {
        std::fs::write(path, sheet.export_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    if let Some(path) = &opts.json_output {
        std::fs::write(path, sheet.export_json().to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    if opts.commands.is_empty() && opts.csv_output.is_none() && opts.json_output.is_none() {
        println!("{}", sheet.export_csv()?);
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
