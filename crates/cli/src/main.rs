//! EduAccess Mapper descriptor tool - command line entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{ConfigLoader, LoggingConfig, Settings};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CommandOutput, OutputFormat};

/// Check and maintain the EduAccess Mapper plugin descriptor
#[derive(Debug, Parser)]
#[command(name = "edu-access-mapper", version, about)]
struct Cli {
    /// Settings file (defaults to $CONFIG_PATH, then edu-access-mapper.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse, validate and lint a descriptor
    Validate {
        path: Option<PathBuf>,
        /// Also check that this host version would load the plugin
        #[arg(long)]
        host_version: Option<String>,
        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },
    /// Print the typed descriptor
    Show {
        path: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print or write the descriptor in canonical form
    Normalize {
        path: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the sample descriptor
    Init {
        path: PathBuf,
        #[arg(long)]
        force: bool,
    },
    /// Check whether a host version would load the plugin
    CheckHost {
        path: Option<PathBuf>,
        #[arg(long)]
        host_version: Option<String>,
    },
    /// Write an example settings file
    ExampleConfig { path: PathBuf },
}

fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    init_logging(&settings.logging)?;

    match dotenv_result {
        Ok(path) => debug!("Loaded environment variables from {}", path.display()),
        Err(e) if !e.not_found() => warn!("Could not load .env file: {}", e),
        Err(_) => {}
    }

    info!("Starting EduAccess Mapper tools v{}", env!("CARGO_PKG_VERSION"));

    let output = run(cli.command, &settings)?;
    println!("{}", output.text);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_settings(explicit: Option<&PathBuf>) -> Result<Settings> {
    let config_path = explicit
        .cloned()
        .or_else(|| env::var("CONFIG_PATH").ok().map(PathBuf::from));

    match config_path {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => ConfigLoader::load_default().context("Failed to load settings"),
    }
}

fn run(command: Command, settings: &Settings) -> Result<CommandOutput> {
    let descriptor_path =
        |path: Option<PathBuf>| path.unwrap_or_else(|| PathBuf::from(&settings.descriptor.path));

    match command {
        Command::Validate {
            path,
            host_version,
            strict,
        } => {
            let host_version = host_version.or_else(|| settings.descriptor.host_version.clone());
            commands::validate(
                &descriptor_path(path),
                host_version.as_deref(),
                strict || settings.descriptor.strict,
            )
        }
        Command::Show { path, format } => commands::show(&descriptor_path(path), format),
        Command::Normalize { path, output } => {
            commands::normalize(&descriptor_path(path), output.as_deref())
        }
        Command::Init { path, force } => commands::init(&path, force),
        Command::CheckHost { path, host_version } => {
            let host_version = host_version
                .or_else(|| settings.descriptor.host_version.clone())
                .context("No host version given (use --host-version or descriptor.host_version)")?;
            commands::check_host(&descriptor_path(path), &host_version)
        }
        Command::ExampleConfig { path } => {
            ConfigLoader::create_example(&path)?;
            Ok(CommandOutput {
                text: format!("Wrote example settings to {}", path.display()),
                success: true,
            })
        }
    }
}

/// Initialize logging from settings; RUST_LOG takes precedence over the level
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    debug!("Log level: {}", logging.level);
    debug!("Log format: {}", logging.format);

    Ok(())
}
