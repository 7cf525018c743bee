/*!
 * Pulsar CLI - Command Line Interface
 */

use clap::{Parser, Subcommand, ValueEnum};
use pulsar::{
    commands,
    config::{CliConfig, LogLevel},
    error::{PulsarError, Result, EXIT_SUCCESS},
    logging, IntegrityManager, TracingMedic,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pulsar")]
#[command(version, about = "Integrity monitoring and self-healing for log event streams", long_about = None)]
struct Cli {
    /// CLI settings file (TOML)
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Write logs to a file as JSON instead of stderr
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor a JSON-lines log stream and heal according to policy
    Watch {
        /// Integrity policy document (YAML, JSON or TOML)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Input file with one log record per line ("-" or omitted: stdin)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Run the manual integrity check and print the report
    Check {
        /// Integrity policy document (YAML, JSON or TOML)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Classify a single event and print the verdict
    Classify {
        /// Event level: INFO, WARNING, ERROR or CRITICAL
        #[arg(short, long)]
        level: String,

        /// Component that emitted the event
        #[arg(short, long, default_value = "cli")]
        source: String,

        /// Event message
        message: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.settings {
        Some(ref path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }
    config.verbose |= cli.verbose;

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Classify {
            level,
            source,
            message,
        } => {
            let verdict = commands::classify(&level, &source, &message)?;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            Ok(())
        }
        Commands::Check { config: policy } => {
            let manager = build_manager(&config, policy)?;
            let runtime = runtime()?;
            let report = runtime.block_on(commands::check(&manager));
            println!("{}", serde_json::to_string_pretty(&report)?);
            commands::require_nominal(&report)
        }
        Commands::Watch {
            config: policy,
            input,
        } => {
            let manager = build_manager(&config, policy)?;
            let runtime = runtime()?;
            let summary = runtime.block_on(async {
                let input = commands::open_input(input.as_deref()).await?;
                commands::watch(&manager, input, ctrl_c()).await
            })?;
            println!("{}", summary.stats.summary());
            if summary.rejected > 0 {
                println!("{} record(s) rejected", summary.rejected);
            }
            Ok(())
        }
    }
}

fn build_manager(config: &CliConfig, policy: Option<PathBuf>) -> Result<IntegrityManager> {
    let policy_path = policy.unwrap_or_else(|| config.policy_path.clone());
    let medic = TracingMedic::with_settle_delay(Duration::from_millis(config.restart_settle_ms));
    Ok(IntegrityManager::from_config(policy_path, Arc::new(medic))?)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(PulsarError::Io)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
