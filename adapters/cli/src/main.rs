#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a treasure hunt and narrates it.

mod layout;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hex_treasure_core::{EffectTrigger, TriggerKind};
use hex_treasure_rendering::{format_path, render_grid};
use hex_treasure_system_sequencer::{HuntReport, TreasureSequencer};
use log::info;

/// Find every treasure on a hex grid under compounding terrain effects.
#[derive(Debug, Parser)]
#[command(name = "hex-treasure", version)]
struct Args {
    /// TOML map file; the built-in expedition is used when omitted.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,
    /// Skip the map drawings and print only paths and totals.
    #[arg(long)]
    quiet: bool,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

/// Entry point for the hex treasure command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .init();

    let expedition = match &args.map {
        Some(path) => layout::load(path)?,
        None => layout::default_expedition()?,
    };
    info!(
        "hunting {} treasures from {}",
        expedition.goals().len(),
        expedition.start()
    );

    if !args.quiet {
        println!("Initial map:");
        println!("{}", render_grid(expedition.map()));
        println!();
    }

    let report = TreasureSequencer::new(expedition)
        .run()
        .context("treasure hunt failed")?;
    print_report(&report, args.quiet);
    Ok(())
}

fn print_report(report: &HuntReport, quiet: bool) {
    for (index, phase) in report.phases().iter().enumerate() {
        let result = phase.result();
        println!("Phase {}: treasure at {}", index + 1, phase.goal());
        for trigger in result.triggers() {
            narrate(trigger);
        }
        println!("  path {}", format_path(result.path()));
        println!(
            "  energy {:.3}, steps {:.3}",
            result.energy_cost(),
            result.step_cost()
        );
        if !quiet {
            println!("{}", render_grid(phase.map()));
        }
        println!();
    }

    println!("All treasures obtained.");
    if !quiet {
        println!("{}", render_grid(report.final_map()));
    }
    println!("Path: {}", format_path(&report.concatenated_path()));
    println!("Total energy: {:.3}", report.total_energy());
    println!("Total steps: {:.3}", report.total_steps());
    println!("Total cost: {:.3}", report.total_cost());
}

fn narrate(trigger: &EffectTrigger) {
    let cell = trigger.cell;
    match (trigger.kind, trigger.factor) {
        (TriggerKind::Displacement, _) | (_, None) => {
            info!("displacement trap at {cell} threw the searcher back");
        }
        (TriggerKind::RewardEnergy, Some(factor)) => {
            info!("energy reward at {cell}: energy discount now {factor}");
        }
        (TriggerKind::RewardStep, Some(factor)) => {
            info!("step reward at {cell}: step discount now {factor}");
        }
        (TriggerKind::TrapEnergy, Some(factor)) => {
            info!("energy trap at {cell}: energy penalty now {factor}");
        }
        (TriggerKind::TrapStep, Some(factor)) => {
            info!("step trap at {cell}: step penalty now {factor}");
        }
    }
}
