//! modvet CLI entry point.
//!
//! This binary provides the command-line interface for modvet.

use clap::Parser;
use modvet::cli::{Cli, Commands, ToolchainArgs};
use modvet::config::DEFAULT_CONFIG_FILES;
use modvet::reporter::{Reporter, TextReporter};
use modvet::toolchain::FixtureToolchain;
use modvet::{Config, ModvetError, VetReport, Vetter};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Run the appropriate command
    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            // Print modvet frames if RUST_BACKTRACE is set
            let backtrace = e.backtrace();
            if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
                eprintln!("\nStack backtrace:");
                let backtrace_str = backtrace.to_string();
                let mut in_modvet = false;
                for line in backtrace_str.lines() {
                    let trimmed = line.trim();
                    if trimmed.contains("modvet::") {
                        in_modvet = true;
                        eprintln!("{line}");
                    } else if in_modvet && trimmed.starts_with("at ") {
                        eprintln!("{line}");
                        in_modvet = false;
                    } else {
                        in_modvet = false;
                    }
                }
            }

            let code = e.downcast_ref::<ModvetError>().map_or(1, ModvetError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over -v
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,modvet={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Check(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            config.merge_check_args(&args);
            tracing::debug!(checks = ?config.checks, "Executing check command");

            let vetter = build_vetter(config, &args.toolchain)?;
            let mut report = VetReport::new();
            let outcome = vetter.run(&mut report).await;

            // Render what was collected, even when the pass aborted
            let rendered = Reporter::new(vetter.config()).generate(&report, args.format)?;
            emit(&rendered, args.output.as_deref(), "Report")?;

            outcome?;
            Ok(ExitCode::from(u8::from(report.flagged())))
        }

        Commands::Graph(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            config.merge_toolchain_args(&args.toolchain);

            let vetter = build_vetter(config, &args.toolchain)?;
            let graph = vetter.requirement_graph().await?;
            let graph_output = modvet::graph::export_graph(&graph, args.format)?;
            emit(&graph_output, args.output.as_deref(), "Graph")?;

            Ok(ExitCode::SUCCESS)
        }

        Commands::Rules => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", TextReporter::new(&config).rule_catalog(&config));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init => {
            let config_path = Path::new(DEFAULT_CONFIG_FILES[0]);

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => match Config::from_file(&args.config) {
            Ok(_) => {
                println!("Configuration is valid: {}", args.config.display());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Configuration error: {e}");
                Ok(ExitCode::from(1))
            }
        },
    }
}

fn build_vetter(config: Config, toolchain: &ToolchainArgs) -> anyhow::Result<Vetter> {
    let Some(path) = &toolchain.fixture else {
        return Ok(Vetter::new(config));
    };

    tracing::debug!(path = %path.display(), "Using recorded toolchain fixture");
    let fixture = Arc::new(FixtureToolchain::from_file(path)?);
    Ok(Vetter::with_clients(config, fixture.clone(), fixture))
}

fn emit(content: &str, output: Option<&Path>, what: &str) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        std::fs::write(output_path, content)?;
        tracing::info!(path = %output_path.display(), "{what} written");
    } else {
        println!("{content}");
    }
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(config_path) = explicit {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        return Ok(Config::from_file(config_path)?);
    }

    // Look for default config files
    tracing::debug!("Searching for default configuration files");
    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Found configuration file");
            return Ok(Config::from_file(path)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
