#![deny(unsafe_code)]
//! CLI for the sakura-fx effects.
//!
//! Subcommands:
//! - `list`: print available effects and their presets
//! - `render [effect]`: run an effect N frames (or replay a seed file), write PNG
//! - `clouds`: print ASCII cloud frames
//! - `petals`: dump petal transforms as JSON lines

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::PetalRun;
use error::CliError;
use sakura_fx_core::Seed;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sakura-fx", about = "Portfolio visual effects, headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available effects and presets.
    List,
    /// Run an effect for N frames and write a PNG snapshot.
    Render {
        /// Effect name ("petals" or "clouds"). Optional with --seed-file.
        engine: Option<String>,

        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: usize,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: usize,

        /// Number of simulated frames.
        #[arg(short, long, default_value_t = 120)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Effect parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Replay a saved seed file instead of the flags above.
        #[arg(long, conflicts_with = "engine")]
        seed_file: Option<PathBuf>,

        /// Also write the run's seed as JSON.
        #[arg(long)]
        save_seed: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Print the ASCII cloud backdrop.
    Clouds {
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        #[arg(short = 'H', long, default_value_t = 720.0)]
        height: f64,

        /// Scroll steps before printing.
        #[arg(short, long, default_value_t = 0)]
        ticks: usize,

        /// Print every frame instead of only the last.
        #[arg(long)]
        every: bool,

        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Simulate petals and dump per-frame transforms as JSON lines.
    Petals {
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        #[arg(short = 'H', long, default_value_t = 720.0)]
        height: f64,

        #[arg(short, long, default_value_t = 60)]
        frames: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Pointer position held for every frame, as X,Y.
        #[arg(long)]
        pointer: Option<String>,

        /// Excitation strength applied at the center before frame 1.
        #[arg(long)]
        excite: Option<f64>,

        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let info = commands::list();
            if cli.json {
                print_json(&info)?;
            } else {
                println!("Effects:");
                for name in sakura_fx_engines::EngineKind::list_engines() {
                    let presets = sakura_fx_engines::EngineKind::presets(name);
                    if presets.is_empty() {
                        println!("  {name}");
                    } else {
                        println!("  {name} (presets: {})", presets.join(", "));
                    }
                }
            }
        }
        Command::Render {
            engine,
            width,
            height,
            frames,
            seed,
            params,
            seed_file,
            save_seed,
            output,
        } => {
            let run_seed = match (seed_file, engine) {
                (Some(path), _) => commands::load_seed(&path)?,
                (None, Some(engine)) => {
                    let mut s = Seed::new(&engine, width, height, seed);
                    s.params = commands::parse_params(&params)?;
                    s.frames = frames;
                    s
                }
                (None, None) => {
                    return Err(CliError::Input("render needs an effect name or --seed-file".into()))
                }
            };
            let info = commands::render(&run_seed, &output, save_seed.as_deref())?;
            if cli.json {
                print_json(&info)?;
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    run_seed.engine,
                    run_seed.width,
                    run_seed.height,
                    run_seed.frames,
                    run_seed.seed,
                    output.display()
                );
            }
        }
        Command::Clouds {
            width,
            height,
            ticks,
            every,
            params,
        } => {
            let params = commands::parse_params(&params)?;
            let frames = commands::clouds(width, height, ticks, &params, every)?;
            if cli.json {
                print_json(&serde_json::json!({ "ticks": ticks, "frames": frames }))?;
            } else {
                for frame in frames {
                    print!("{frame}");
                    if every {
                        println!();
                    }
                }
            }
        }
        Command::Petals {
            width,
            height,
            frames,
            seed,
            pointer,
            excite,
            params,
        } => {
            let params = commands::parse_params(&params)?;
            let pointer = pointer.as_deref().map(commands::parse_pointer).transpose()?;
            let lines = commands::petals(
                &PetalRun {
                    width,
                    height,
                    frames,
                    seed,
                    pointer,
                    excite,
                },
                &params,
            )?;
            // JSON lines regardless of --json
            for line in lines {
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        tracing::debug!(error = %e, code = e.exit_code(), "command failed");
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
