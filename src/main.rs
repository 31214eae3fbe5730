use std::path::Path;

use anyhow::{Context, Result};

use drainwatch::config::{default_config_path, AnalysisConfig};
use drainwatch::{loader, report};

fn main() {
    drainwatch::init_logger();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "analyze" => {
                if let Err(e) = run_analyze(&args[2..]) {
                    eprintln!("Error analyzing battery log: {:#}", e);
                    std::process::exit(1);
                }
            }
            "config" => {
                if let Err(e) = run_config() {
                    eprintln!("Error showing configuration: {:#}", e);
                    std::process::exit(1);
                }
            }
            _ => print_usage(),
        }
    } else {
        print_usage();
    }
}

fn run_analyze(args: &[String]) -> Result<()> {
    let mut json = false;
    let mut paths = Vec::new();
    for arg in args {
        if arg == "--json" {
            json = true;
        } else {
            paths.push(arg.as_str());
        }
    }
    let battery_path = *paths.first().context("missing battery log path")?;

    let config = AnalysisConfig::load_or_default();

    let loaded = loader::read_battery_log(Path::new(battery_path))
        .with_context(|| format!("failed to read battery log {}", battery_path))?;
    for record in &loaded.rejected {
        eprintln!(
            "Skipping line {}: '{}' - {}",
            record.line_number, record.line, record.reason
        );
    }

    let events = match paths.get(1) {
        Some(events_path) => {
            let loaded_events = loader::read_event_log(Path::new(events_path))
                .with_context(|| format!("failed to read event log {}", events_path))?;
            for record in &loaded_events.rejected {
                eprintln!(
                    "Skipping line {}: '{}' - {}",
                    record.line_number, record.line, record.reason
                );
            }
            loaded_events.events
        }
        None => Vec::new(),
    };

    let analysis_report = drainwatch::run(&loaded.samples, &events, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis_report)?);
    } else {
        print!("{}", report::render_text(&analysis_report));
    }
    Ok(())
}

fn run_config() -> Result<()> {
    let config = AnalysisConfig::load_or_default();
    println!("Configuration file: {}", default_config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_usage() {
    println!("drainwatch - battery usage log analyzer");
    println!("\nUsage:");
    println!("  drainwatch analyze <battery-log> [events-log] [--json]  - Analyze a battery log");
    println!("  drainwatch config                                       - Show the analysis configuration");
}
