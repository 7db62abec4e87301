// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use ocrsub::app_config::{self, Config, TranslationEngine};
use ocrsub::app_controller::Controller;
use ocrsub::subtitle_writer::SubtitleFormat;

/// CLI Wrapper for TranslationEngine to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationEngine {
    Naver,
    Google,
}

impl From<CliTranslationEngine> for TranslationEngine {
    fn from(cli_engine: CliTranslationEngine) -> Self {
        match cli_engine {
            CliTranslationEngine::Naver => TranslationEngine::Naver,
            CliTranslationEngine::Google => TranslationEngine::Google,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleFormat {
    Vtt,
    Srt,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Vtt => SubtitleFormat::Vtt,
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
        }
    }
}

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
    /// Extract subtitles from a video (default command)
    #[command(alias = "extract")]
    Run {
        /// Video file, gs:// URI or saved annotation JSON
        #[arg(value_name = "INPUT")]
        input: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Generate shell completions for ocrsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings that override the configuration file
#[derive(Args, Debug, Clone)]
struct RunOptions {
    /// Output subtitle file (defaults to the input name with the format extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output subtitle format
    #[arg(long, value_enum)]
    format: Option<CliSubtitleFormat>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translate the subtitles after extraction
    #[arg(long)]
    translate: bool,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliTranslationEngine>,

    /// Source language code (e.g., 'ko', 'ja')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Video Intelligence API key
    #[arg(long, env = "OCRSUB_VIDEO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// OCRSub - hardcoded subtitle extraction through OCR
///
/// Runs text detection over a video, keeps the detections that look like
/// subtitles, merges repeated lines and writes a subtitle file.
#[derive(Parser, Debug)]
#[command(name = "ocrsub")]
#[command(version)]
#[command(about = "Extract hardcoded subtitles from videos with OCR")]
#[command(long_about = "OCRSub detects on-screen text in a video with Google Video Intelligence and turns it into subtitles.

EXAMPLES:
    ocrsub movie.mp4                             # Extract using default config
    ocrsub -f movie.mp4                          # Overwrite an existing movie.vtt
    ocrsub --format srt -o out.srt movie.mp4     # Write SubRip to a chosen path
    ocrsub gs://bucket/movie.mp4                 # Video already in Cloud Storage
    ocrsub annotations.json                      # Reuse a saved annotation response
    ocrsub --translate -e google -t en movie.mp4 # Translate the cues to English
    ocrsub completions bash > ocrsub.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in config.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

TRANSLATION ENGINES:
    naver  - Naver Papago (requires client id and secret)
    google - Google Cloud Translation (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Video file, gs:// URI or saved annotation JSON
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    #[command(flatten)]
    options: RunOptions,
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
        // the boxed logger passes everything; log::max_level does the gating
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, color) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {}{}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or CLI says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ocrsub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run { input, options }) => run_extract(input, options).await,
        // without INPUT the config's input_file is used
        None => run_extract(cli.input.unwrap_or_default(), cli.options).await,
    }
}

/// Load the config file, or write a default one if it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

fn apply_overrides(config: &mut Config, options: &RunOptions) {
    if let Some(format) = &options.format {
        config.output_format = format.clone().into();
    }
    if options.translate {
        config.translation.translate = true;
    }
    if let Some(engine) = &options.engine {
        config.translation.engine = engine.clone().into();
    }
    if let Some(source_language) = &options.source_language {
        config.translation.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.translation.target_language = target_language.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.video_intelligence.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_extract(input: String, options: RunOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    config.validate()
        .context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let input = if input.is_empty() { config.input_file.clone() } else { input };
    if input.is_empty() {
        return Err(anyhow!("INPUT is required when the config file has no input_file"));
    }

    let controller = Controller::with_config(config)?;
    let report = controller.run(&input, options.output.clone(), options.force_overwrite).await?;

    info!("Done: {} cues written", report.cues);
    Ok(())
}
