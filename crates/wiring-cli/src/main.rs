mod builder;
mod checks;
mod config;
mod discovery;
mod prompt;
mod workdir;

use anyhow::Result;
use builder::{BuildOptions, build, print_summary};
use clap::{Parser, Subcommand};
use config::Config;
use prompt::{AutoYes, Confirm, stdin_prompt};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "wiring-documentation",
    about = "Build construction wiring documentation packs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build documentation pack from configuration
    Build {
        /// YAML configuration file
        config: PathBuf,

        /// Output PDF file (default: <config name>.pdf)
        output: Option<PathBuf>,

        /// Automatically answer yes to prompts
        #[arg(short = 'y', long)]
        auto_yes: bool,

        /// Retain working directory for debugging
        #[arg(long)]
        debug_retain_working_directory: bool,

        /// Use this timestamp text instead of the current time
        #[arg(long, value_name = "TEXT")]
        set_timestamp: Option<String>,
    },

    /// Check configuration validity without building
    Check {
        /// YAML configuration file
        config: PathBuf,
    },
}

/// `<config stem>.pdf` in the current directory
fn default_output(config: &Path) -> PathBuf {
    let stem = config.file_stem().unwrap_or(config.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".pdf");
    PathBuf::from(name)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            config,
            output,
            auto_yes,
            debug_retain_working_directory,
            set_timestamp,
        } => {
            let options = BuildOptions {
                output: output.unwrap_or_else(|| default_output(&config)),
                retain_working_directory: debug_retain_working_directory,
                timestamp: set_timestamp,
            };
            let config = Config::load(&config).await?;

            let mut confirm: Box<dyn Confirm> = if auto_yes {
                Box::new(AutoYes)
            } else {
                Box::new(stdin_prompt())
            };

            let summary = build(&config, &options, confirm.as_mut()).await?;
            print_summary(&summary);
        }

        Commands::Check { config } => {
            println!("Checking configuration...");
            let config = Config::load(&config).await?;
            let warnings = checks::check_config(&config).await?;

            if !warnings.is_empty() {
                println!("\nWarnings:");
                for warning in &warnings {
                    println!("{}", warning);
                }
            }
            println!("\n✓ Configuration is valid");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
