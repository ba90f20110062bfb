//! glogread command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List every quantity found in the log
//! glogread water.log
//!
//! # Print a single quantity (elements, charges, charge_sum, energies,
//! # LUMO, HOMO, excited_states) or a derived view (levels, charges_table,
//! # charges_by_element)
//! glogread water.log HOMO
//! glogread water.log levels
//!
//! # JSON to stdout, or to a file
//! glogread water.log --json
//! glogread water.log --json water.json
//!
//! # Create a settings template
//! glogread ci glogread.cfg
//! ```

use glogread::levels;
use glogread::settings::{OutputFormat, SettingsManager, CONFIG_FILE_NAME};
use glogread::{io, scan_file, LogRecord, Quantity, Value};
use log::{debug, error};
use std::env;
use std::path::Path;
use std::process;

fn main() {
    let settings = SettingsManager::load().unwrap_or_else(|e| {
        eprintln!("Error loading settings: {}", e);
        process::exit(1);
    });

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(
            settings
                .logging()
                .level
                .parse()
                .unwrap_or(log::LevelFilter::Warn),
        )
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .init();
    debug!("Settings from {}", settings.config_source());

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }
    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        process::exit(0);
    }

    let command = &args[1];
    if command == "ci" {
        let target = args.get(2).map(String::as_str).unwrap_or(CONFIG_FILE_NAME);
        match SettingsManager::create_template(Path::new(target)) {
            Ok(()) => println!("✓ Settings template created: {}", target),
            Err(e) => {
                eprintln!("Error creating settings template: {}", e);
                process::exit(1);
            }
        }
        return;
    }
    if command.starts_with('-') {
        eprintln!("Error: Unknown option: {}", command);
        print_usage(&args[0]);
        process::exit(1);
    }

    if let Err(e) = run(Path::new(command), &args[2..], &settings) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(
    log_path: &Path,
    rest: &[String],
    settings: &SettingsManager,
) -> Result<(), Box<dyn std::error::Error>> {
    if !io::is_log_file(log_path, &settings.input().extensions) {
        return Err(format!(
            "{} is not a Gaussian log file (accepted extensions: {})",
            log_path.display(),
            settings.input().extensions.join(", ")
        )
        .into());
    }

    let record = scan_file(log_path).map_err(|e| {
        error!("Scan of {} failed: {}", log_path.display(), e);
        format!("could not fully parse {}: {}", log_path.display(), e)
    })?;

    let view_args = parse_view_args(rest);
    let json = view_args.json || settings.output().format == OutputFormat::Json;
    let json_path = view_args.json_path;
    let view = view_args.view;

    if json {
        match json_path {
            Some(path) => {
                io::write_json(&record, Path::new(path))?;
                println!("✓ Wrote {}", path);
            }
            None => println!("{}", record.to_json()?),
        }
        return Ok(());
    }

    let precision = settings.output().precision;
    match view {
        None => print_record(&record, precision),
        Some("levels") => print_levels(&record, settings)?,
        Some("charges_table") => print_charges_table(&record, precision)?,
        Some("charges_by_element") => print_charges_by_element(&record, precision)?,
        Some(name) => {
            let quantity: Quantity = name.parse()?;
            let value = record
                .get(quantity)
                .ok_or_else(|| format!("{} not found in {}", quantity, log_path.display()))?;
            println!("{:.*}", precision, value);
        }
    }
    Ok(())
}

fn print_record(record: &LogRecord, precision: usize) {
    let keys = record.keys();
    if keys.is_empty() {
        println!("No recognized sections found.");
        return;
    }
    for key in keys {
        if let Some(value) = record.get(key) {
            match key {
                Quantity::ExcitedStates => println!("{}:\n{:.*}", key, precision, value),
                _ => println!("{}: {:.*}", key, precision, value),
            }
        }
    }
    if let Some(gap) = record.homo_lumo_gap() {
        println!("HOMO-LUMO gap: {:.*} eV", precision, gap);
    }
}

fn print_levels(record: &LogRecord, settings: &SettingsManager) -> Result<(), String> {
    let energies = record
        .energies
        .as_deref()
        .ok_or("energies not found in log")?;
    let cfg = settings.levels();
    let bins = levels::degenerate_levels(energies, cfg.decimals);
    let segments = levels::level_segments(energies, (cfg.x_min, cfg.x_max), cfg.decimals, cfg.gap);

    println!("{:>12} {:>6}", "E (eV)", "Degen");
    for bin in &bins {
        println!("{:>12.*} {:>6}", cfg.decimals as usize, bin.energy, bin.multiplicity);
    }
    println!();
    println!("{:>12} {:>10} {:>10}", "E (eV)", "x start", "x end");
    for seg in &segments {
        println!(
            "{:>12.*} {:>10.4} {:>10.4}",
            cfg.decimals as usize, seg.energy, seg.x_start, seg.x_end
        );
    }
    Ok(())
}

fn print_charges_table(record: &LogRecord, precision: usize) -> Result<(), String> {
    let table = record
        .charges_table()
        .ok_or("charges not found in log")?;
    for (label, charge) in &table {
        println!("{:<8} {:>12.*}", label, precision, charge);
    }
    if let Some(sum) = record.charge_sum {
        println!("{:<8} {:>12.*}", "Sum", precision, sum);
    }
    Ok(())
}

fn print_charges_by_element(record: &LogRecord, precision: usize) -> Result<(), String> {
    let grouped = record
        .charges_by_element()
        .ok_or("charges not found in log")?;
    for (element, charges) in &grouped {
        println!("{}: {:.*}", element, precision, Value::Floats(charges));
    }
    Ok(())
}

/// Derived views accepted after the log file, besides the quantity names.
const VIEWS: [&str; 3] = ["levels", "charges_table", "charges_by_element"];

fn is_view_name(arg: &str) -> bool {
    VIEWS.iter().any(|view| *view == arg) || arg.parse::<Quantity>().is_ok()
}

/// Arguments following the log file.
#[derive(Debug, Default, PartialEq)]
struct ViewArgs<'a> {
    json: bool,
    json_path: Option<&'a str>,
    view: Option<&'a str>,
}

/// `--json` takes the next argument as its output file unless that argument
/// names a quantity, a view, or another option.
fn parse_view_args(rest: &[String]) -> ViewArgs<'_> {
    let mut args = ViewArgs::default();
    let mut iter = rest.iter().map(String::as_str).peekable();
    while let Some(arg) = iter.next() {
        match arg {
            "--json" => {
                args.json = true;
                if let Some(next) = iter.next_if(|next| !next.starts_with('-') && !is_view_name(next)) {
                    args.json_path = Some(next);
                }
            }
            other => args.view = Some(other),
        }
    }
    args
}

fn print_usage(program_name: &str) {
    eprintln!("glogread - orbital energies, Mulliken charges and excited states from Gaussian logs");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} <log_file>", program_name);
    eprintln!("                    List every quantity found");
    eprintln!();
    eprintln!("  {} <log_file> <quantity>", program_name);
    eprintln!("                    Print one quantity:");
    eprintln!(
        "                    {}",
        Quantity::ALL.map(|q| q.as_str()).join(", ")
    );
    eprintln!("                    or a derived view: {}", VIEWS.join(", "));
    eprintln!();
    eprintln!("  {} <log_file> --json [output_file]", program_name);
    eprintln!("                    Print the record as JSON, or write it to a file");
    eprintln!();
    eprintln!("  {} ci [{}]", program_name, CONFIG_FILE_NAME);
    eprintln!("                    Create a settings template");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} benzene.log", program_name);
    eprintln!("  {} benzene.log HOMO", program_name);
    eprintln!("  {} benzene.log --json benzene.json", program_name);
}
