//! Command-line front end for the multilayer impedance solver.
//!
//! ```sh
//! tlwall run job.toml -o results/
//! tlwall validate job.toml
//! tlwall materials
//! ```

mod config;
mod runner;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use tlwall::materials::PRESETS;

#[derive(Parser)]
#[command(name = "tlwall")]
#[command(about = "Beam-coupling impedance and wake functions of multilayer beam pipes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute impedances (and optionally wakes) from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides the job file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a job file without running it.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the builtin material presets.
    Materials,
}

fn base_dir(config: &Path) -> &Path {
    config.parent().unwrap_or_else(|| Path::new("."))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            let job = config::load_config(&config)?.build(base_dir(&config))?;
            println!("Configuration: {}", config.display());
            println!(
                "  {} layers, b = {} m, L = {} m, {:?} chamber",
                job.wall.layers().len(),
                job.wall.radius(),
                job.wall.length(),
                job.shape
            );
            println!("  {} frequencies, modes {:?}", job.grid.len(), job.modes);

            let out_dir = output.unwrap_or_else(|| job.output_dir.clone());
            let summary = runner::run_job(&job, &out_dir)?;
            for file in &summary.files {
                println!("  wrote {}", file.display());
            }
            if summary.failures > 0 {
                println!("  {} samples failed (see log)", summary.failures);
            }
            println!("Done.");
            Ok(())
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?.build(base_dir(&config))?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Materials => {
            println!("Available materials:");
            println!();
            for preset in PRESETS {
                let sigma = preset
                    .conductivity
                    .map_or_else(|| "-".to_string(), |s| format!("{s:.3e} S/m"));
                println!(
                    "  {:<16} {:>14}  {} (aliases: {})",
                    preset.name,
                    sigma,
                    preset.description,
                    preset.aliases.join(", ")
                );
            }
            Ok(())
        }
    }
}
