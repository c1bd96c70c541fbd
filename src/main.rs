//! CV analyzer: semantic resume analysis against a job description

mod cli;
mod config;
mod error;
mod input;
mod llm;
mod output;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::Config;
use error::{CvAnalyzerError, Result};
use indicatif::ProgressBar;
use input::manager::InputManager;
use llm::analyzer::AnalysisEngine;
use llm::client::GeminiClient;
use log::{error, info};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            no_color,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| CvAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| CvAnalyzerError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format =
                cli::parse_output_format(&output).map_err(CvAnalyzerError::InvalidInput)?;

            // Fail fast before any extraction work if the key is missing.
            let api_key = config::api_key()?;

            info!("Starting semantic CV analysis");

            let mut input_manager = InputManager::new();

            info!("Extracting text from {}", resume.display());
            let cv_text = input_manager.extract_text(&resume).await?;

            info!("Reading job description from {}", job.display());
            let job_text = input_manager.extract_text(&job).await?;

            info!(
                "Extracted {} chars of CV text, {} chars of job description",
                cv_text.len(),
                job_text.len()
            );

            let client = GeminiClient::new(&config, api_key)?;
            let engine = AnalysisEngine::new(client);

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Analyzing semantics...");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let analysis = engine.analyze(&job_text, &cv_text).await;
            spinner.finish_and_clear();
            let result = analysis?;

            let use_colors = config.output.color_output && !no_color;
            let rendered = output::render(&result, &output_format, use_colors)?;

            match save {
                Some(path) => {
                    tokio::fs::write(&path, &rendered).await?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration ({})", Config::config_path().display());
                println!("  Model: {}", config.model.name);
                println!("  Endpoint: {}", config.model.endpoint);
                println!("  Timeout: {}s", config.model.timeout_secs);
                println!("  Output format: {:?}", config.output.format);
                println!("  Color output: {}", config.output.color_output);
                let key_status = if std::env::var(config::API_KEY_ENV).is_ok() {
                    "set"
                } else {
                    "not set"
                };
                println!("  {}: {}", config::API_KEY_ENV, key_status);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save()?;
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}
