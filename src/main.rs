// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::Path;

use episcribe::app_config::{self, Config};
use episcribe::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch transcripts and render episode documents (default command)
    #[command(alias = "fetch")]
    Fetch(FetchArgs),

    /// Generate shell completions for episcribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FetchArgs {
    /// Number of listing pages to crawl
    #[arg(short, long)]
    pages: Option<usize>,

    /// Root directory for generated documents
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Bound on concurrently in-flight episodes (unbounded when omitted)
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "episcribe.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// episcribe - episodic transcripts to paginated scripts
///
/// Crawls a transcript forum, classifies each episode's dialogue and
/// scene cues, and renders one paginated PDF per episode.
#[derive(Parser, Debug)]
#[command(name = "episcribe")]
#[command(version)]
#[command(about = "Render episodic dialogue transcripts into paginated PDF scripts")]
#[command(long_about = "episcribe enumerates episode transcripts from a forum listing, classifies \
each transcript into speaker lines and scene cues, and renders one paginated PDF per episode.

EXAMPLES:
    episcribe                                  # Crawl one listing page with default config
    episcribe -p 3                             # Crawl the first three listing pages
    episcribe -o out/scripts                   # Write documents below out/scripts
    episcribe --max-in-flight 8                # Bound concurrent episodes
    episcribe --log-level debug                # Show classification drop traces
    episcribe completions bash > episcribe.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in episcribe.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of listing pages to crawl
    #[arg(short, long)]
    pages: Option<usize>,

    /// Root directory for generated documents
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Bound on concurrently in-flight episodes (unbounded when omitted)
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "episcribe.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // We'll update the level after loading the config if needed.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "episcribe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Fetch(args)) => run_fetch(args).await,
        None => {
            // Default behavior - use top-level args
            let fetch_args = FetchArgs {
                pages: cli.pages,
                output_dir: cli.output_dir,
                max_in_flight: cli.max_in_flight,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_fetch(fetch_args).await
        }
    }
}

async fn run_fetch(options: FetchArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .write_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(pages) = options.pages {
        config.listing.page_count = pages;
    }
    if let Some(output_dir) = &options.output_dir {
        config.output.base_dir = output_dir.clone();
    }
    if let Some(max_in_flight) = options.max_in_flight {
        config.max_in_flight = Some(max_in_flight);
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    let report = controller.run().await?;

    // The batch itself never fails outright; a run where every episode
    // failed is the CLI's cue for a non-zero exit.
    if report.total() > 0 && report.succeeded.is_empty() {
        return Err(anyhow!("all {} episode(s) failed", report.total()));
    }

    Ok(())
}
