// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use cinefluent::app_config::{self, Config};
use cinefluent::file_utils::FileManager;
use cinefluent::{Controller, TextEncoding};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align a source subtitle file with its translation
    Align {
        /// Subtitle file in the source language
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Subtitle file in the target language
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the JSON outcome to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse one subtitle file and report cue problems
    Validate {
        /// Subtitle file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Language of the file (defaults to the configured source language)
        #[arg(long)]
        language: Option<String>,
    },

    /// Align every `<title>.<lang>.<ext>` pair found under a directory
    Batch {
        /// Directory to scan recursively
        #[arg(value_name = "DIR")]
        input_dir: PathBuf,

        /// Directory receiving one `<folder>/<title>.alignment.json` per movie
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completions for cinefluent
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Text encoding of the subtitle files (utf-8, utf-16le, utf-16be, latin-1)
    #[arg(short, long, global = true)]
    encoding: Option<TextEncoding>,
}

/// cinefluent - Subtitle alignment engine
///
/// Parses subtitle files of two languages and pairs their cues into
/// translation pairs with quality reports.
#[derive(Parser, Debug)]
#[command(name = "cinefluent")]
#[command(version)]
#[command(about = "Subtitle parsing, validation and cross-language alignment")]
#[command(long_about = "cinefluent parses subtitle files (SRT, WebVTT, ASS, SSA), validates their cues and aligns two language tracks of the same movie.

EXAMPLES:
    cinefluent align movie.en.srt movie.de.srt          # Print the alignment outcome as JSON
    cinefluent align -o out.json movie.en.srt movie.de.vtt
    cinefluent validate movie.en.srt                    # Check one file
    cinefluent -s en -t fr batch /movies -o /reports     # Align a whole directory
    cinefluent -e latin-1 validate old.srt               # Read a Latin-1 file
    cinefluent completions bash > cinefluent.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
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

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let command = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cinefluent", &mut std::io::stdout());
            return Ok(());
        }
        command => command,
    };

    let config = load_config(&cli.global)?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)?;

    match command {
        Commands::Align { source, target, output } => {
            let outcome = controller
                .align_files(&source, &target)
                .with_context(|| format!("Failed to align {} with {}", source.display(), target.display()))?;
            let report = &outcome.alignment_report;

            if outcome.is_acceptable() {
                info!(
                    "Aligned {} pairs, rate {:.3} ({})",
                    report.total_pairs, report.alignment_rate, report.quality
                );
            } else {
                warn!(
                    "Alignment not acceptable: {}",
                    report.error.clone().unwrap_or_else(|| format!("rate {:.3} ({})", report.alignment_rate, report.quality))
                );
            }

            emit_json(&outcome, output.as_deref())?;
        }
        Commands::Validate { file, language } => {
            let language = language.unwrap_or_else(|| controller.config().source_language.clone());
            let (track, report) = controller
                .validate_file(&file, &language)
                .with_context(|| format!("Failed to validate {}", file.display()))?;

            info!("{}", track);
            for message in report.messages() {
                warn!("{}", message);
            }

            emit_json(&report, None)?;
        }
        Commands::Batch { input_dir, output_dir } => {
            let summary = controller.run_folder(input_dir, output_dir).await?;
            emit_json(&summary, None)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the configuration file, creating a default one when missing, and
/// apply command line overrides
fn load_config(options: &GlobalOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);

        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", options.config_path))?;
        config
    };

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(encoding) = options.encoding {
        config.encoding = encoding;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

/// Print a value as pretty JSON, or write it to a file
fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;

    match output {
        Some(path) => {
            FileManager::write_to_file(path, &json)?;
            info!("Success: {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", json).map_err(|e| anyhow!("Failed to write to stdout: {}", e))?;
        }
    }

    Ok(())
}
