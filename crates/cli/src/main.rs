#![deny(unsafe_code)]
//! CLI binary for the flowfield simulations.
//!
//! Subcommands:
//! - `run <engine>`: run an engine N steps, write a JSON snapshot
//! - `list`: print available engines
//! - `schema <engine>`: print an engine's parameter schema
//!
//! Logging goes to stderr and is filtered by `RUST_LOG`.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use flowfield_core::{Engine, Seed};
use flowfield_engines::snapshot::{build_snapshot, write_json};
use flowfield_engines::EngineKind;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "flowfield", about = "Flow-field steering and random-walk simulations")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N steps and write a JSON snapshot.
    Run {
        /// Engine name (e.g. "flow").
        #[arg(required_unless_present = "seed_file")]
        engine: Option<String>,

        /// Plane width.
        #[arg(short = 'W', long, default_value_t = 360)]
        width: usize,

        /// Plane height.
        #[arg(short = 'H', long, default_value_t = 240)]
        height: usize,

        /// Number of simulation steps.
        #[arg(short, long, default_value_t = 500)]
        steps: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Read engine, size, seed, params and steps from a JSON file.
        /// Replaces the other run flags; `--steps` is used only if the file
        /// has none.
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Include the flow field cells in the snapshot.
        #[arg(long)]
        debug: bool,
    },
    /// List available engines.
    List,
    /// Print the parameter schema of an engine.
    Schema {
        /// Engine name.
        engine: String,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the run record from a seed file or the individual flags.
fn resolve_run(
    engine: Option<String>,
    width: usize,
    height: usize,
    steps: usize,
    seed: u64,
    params: &str,
    seed_file: Option<PathBuf>,
) -> Result<Seed, CliError> {
    let run = match seed_file {
        Some(path) => {
            let mut run = Seed::load(&path)?;
            if run.steps == 0 {
                run.steps = steps;
            }
            run
        }
        None => {
            let engine =
                engine.ok_or_else(|| CliError::Input("missing engine name".into()))?;
            let params: serde_json::Value = serde_json::from_str(params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let mut run = Seed::new(&engine, width, height, seed);
            run.params = params;
            run.steps = steps;
            run
        }
    };
    if !run.params.is_object() {
        return Err(CliError::Input("params must be a JSON object".into()));
    }
    run.validate()?;
    Ok(run)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let info = serde_json::json!({ "engines": engines });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
            }
        }
        Command::Schema { engine } => {
            let eng = EngineKind::from_name(&engine, 64, 64, 0, &serde_json::json!({}))?;
            // Schema is JSON either way.
            println!("{}", serde_json::to_string_pretty(&eng.param_schema())?);
        }
        Command::Run {
            engine,
            width,
            height,
            steps,
            seed,
            params,
            seed_file,
            output,
            debug,
        } => {
            let run = resolve_run(engine, width, height, steps, seed, &params, seed_file)?;

            let mut eng =
                EngineKind::from_name(&run.engine, run.width, run.height, run.seed, &run.params)?;

            (0..run.steps).try_for_each(|_| eng.step())?;

            let include_debug = debug || eng.params()["debug"] == true;
            let snapshot = build_snapshot(&run, &eng, include_debug);
            write_json(&snapshot, &output)?;

            tracing::info!(
                engine = %run.engine,
                steps = run.steps,
                seed = run.seed,
                trail_mean = eng.field().mean(),
                "run complete"
            );

            if cli.json {
                let info = serde_json::json!({
                    "engine": run.engine,
                    "width": run.width,
                    "height": run.height,
                    "steps": run.steps,
                    "seed": run.seed,
                    "agents": eng.agents().len(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "ran {} ({}x{}, {} steps, seed {}) -> {}",
                    run.engine,
                    run.width,
                    run.height,
                    run.steps,
                    run.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({
                "error": e.to_string(),
                "exit_code": e.exit_code(),
                "configuration": e.is_configuration(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
