use crate::analysis::cannibal::format_cluster_report;
use crate::analysis::simulation::{format_report, run_simulation};
use crate::commands::{batch, scoring, settings};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prunepro")]
#[command(about = "Score URLs, pick keep/refresh/consolidate/redirect/prune actions and simulate the impact")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline over a batch of URLs with metrics and content
    Analyze {
        /// JSON file with the URLs to analyze
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding .prunepro/settings.json
        #[arg(short, long, default_value = ".")]
        workspace: String,

        /// Write the full batch result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },

    /// Simulate an already decided batch
    Simulate {
        /// JSON file with url/action/risk/metrics entries
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show or update the effective settings
    Settings {
        #[arg(short, long, default_value = ".")]
        workspace: String,

        /// key=value overrides, dotted keys for nested values (weights.cannibal=0.2)
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli.command)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

pub fn execute(command: Commands) -> Result<(), String> {
    match command {
        Commands::Analyze {
            input,
            workspace,
            output,
            format,
        } => {
            let effective = settings::load_effective_settings(&workspace)?;
            let items = batch::load_batch_items(&input)?;
            let result = scoring::run_batch_analysis_internal(&items, &effective, |progress| {
                log::debug!(
                    "[{}/{}] {}",
                    progress.current,
                    progress.total,
                    progress.current_url
                );
            });

            if let Some(path) = output {
                batch::write_batch_result(&path, &result)?;
                log::info!("Wrote batch result to {}", path.display());
            }

            match format {
                OutputFormat::Markdown => {
                    println!("{}\n", format_report(&result.report));
                    println!("{}", format_cluster_report(&result.clusters));
                }
                OutputFormat::Json => {
                    let raw = serde_json::to_string_pretty(&result)
                        .map_err(|e| format!("Failed to serialize batch result: {e}"))?;
                    println!("{raw}");
                }
            }
            Ok(())
        }
        Commands::Simulate { input } => {
            let entries = batch::load_simulation_entries(&input)?;
            log::info!("Simulating {} decisions", entries.len());
            println!("{}", format_report(&run_simulation(&entries)));
            Ok(())
        }
        Commands::Settings { workspace, set } => {
            let current = if set.is_empty() {
                settings::get_settings(&workspace)?
            } else {
                settings::save_settings(&workspace, settings::parse_overrides(&set)?)?
            };
            let raw = serde_json::to_string_pretty(&current)
                .map_err(|e| format!("Failed to serialize settings: {e}"))?;
            println!("{raw}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "prunepro",
            "-v",
            "analyze",
            "--input",
            "urls.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                input,
                workspace,
                output,
                format,
            } => {
                assert_eq!(input, PathBuf::from("urls.json"));
                assert_eq!(workspace, ".");
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn collects_repeated_settings_overrides() {
        let cli = Cli::try_parse_from([
            "prunepro",
            "settings",
            "--set",
            "clusterThreshold=0.8",
            "--set",
            "weights.cannibal=0.2",
        ])
        .unwrap();

        let Commands::Settings { set, .. } = cli.command else {
            panic!("expected settings command");
        };
        assert_eq!(set, vec!["clusterThreshold=0.8", "weights.cannibal=0.2"]);
    }
}
