// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use ddloc::app_config::{self, Config};
use ddloc::app_controller::Session;
use ddloc::file_utils::FileManager;
use ddloc::xml_tools::XmlEvent;

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
    /// Extract the texts of the source language section for translation
    Extract {
        /// Localization XML file, or a directory searched recursively for them
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file (single input) or directory (directory input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language tag to extract, overrides extract_lang_tag
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Substitute a translation into the target language section
    Apply {
        /// Localization XML file the translation was extracted from
        #[arg(value_name = "XML_FILE")]
        xml_file: PathBuf,

        /// Translated text, one line per extracted line
        #[arg(value_name = "TRANSLATION_FILE")]
        translation_file: PathBuf,

        /// Directory receiving the translated document (defaults to the XML file's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Source language tag, overrides extract_lang_tag
        #[arg(short, long)]
        source_language: Option<String>,

        /// Target language tag, overrides write_lang_tag
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// Check that the target section of a document holds every source entry
    Validate {
        /// Localization XML file to check
        #[arg(value_name = "XML_FILE")]
        xml_file: PathBuf,

        /// Source language tag, overrides extract_lang_tag
        #[arg(short, long)]
        source_language: Option<String>,

        /// Target language tag, overrides write_lang_tag
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// Generate shell completions for ddloc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ddloc - localization XML round-trip tool
///
/// Extracts the texts of one language section of a game localization file,
/// and writes a translation of them back into another section.
#[derive(Parser, Debug)]
#[command(name = "ddloc")]
#[command(version)]
#[command(about = "Localization XML extraction and substitution tool")]
#[command(long_about = "ddloc extracts translatable texts from localization XML files and substitutes translations back.

EXAMPLES:
    ddloc extract strings.xml                        # Write strings.schinese.txt next to the file
    ddloc extract -l english strings.xml             # Extract another language section
    ddloc extract mods/ -o texts/                    # Extract every XML file below mods/
    ddloc apply strings.xml strings.english.txt      # Write TR_strings.xml next to the file
    ddloc apply -t french strings.xml french.txt     # Substitute into another section
    ddloc validate TR_strings.xml                    # Check a translated document
    ddloc completions bash > ddloc.bash              # Generate bash completions

CONFIGURATION:
    Configuration is stored in ddloc.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "ddloc.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ddloc", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config_path, cli.log_level.clone())?;

    let mut events: Vec<XmlEvent> = Vec::new();
    let result = match cli.command {
        Commands::Extract { input_path, output, language } => {
            if let Some(language) = language {
                config.extract_lang_tag = language;
            }
            run_extract(config, &input_path, output.as_deref(), &mut events)
        }
        Commands::Apply {
            xml_file,
            translation_file,
            output_dir,
            source_language,
            target_language,
        } => {
            apply_tag_overrides(&mut config, source_language, target_language);
            run_apply(config, &xml_file, &translation_file, output_dir.as_deref(), &mut events)
        }
        Commands::Validate {
            xml_file,
            source_language,
            target_language,
        } => {
            apply_tag_overrides(&mut config, source_language, target_language);
            run_validate(config, &xml_file, &mut events)
        }
        Commands::Completions { .. } => Ok(()),
    };

    print_events(&events);
    result
}

// Load or create the configuration, then apply the command line log level
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;

    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn apply_tag_overrides(config: &mut Config, source_language: Option<String>, target_language: Option<String>) {
    if let Some(source_language) = source_language {
        config.extract_lang_tag = source_language;
    }
    if let Some(target_language) = target_language {
        config.write_lang_tag = target_language;
    }
}

fn run_extract(config: Config, input_path: &Path, output: Option<&Path>, events: &mut Vec<XmlEvent>) -> Result<()> {
    let mut session = Session::new(config);

    if FileManager::dir_exists(input_path) {
        info!("Starting extraction for directory: {:?}", input_path);
        let summary = session.extract_folder(input_path, output, events)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} files could not be extracted", summary.failed));
        }
        return Ok(());
    }

    if !FileManager::file_exists(input_path) {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    match output {
        Some(output_file) => {
            if !session.load(input_path, events) {
                return Err(anyhow!("Failed to sanitize {:?}", input_path));
            }
            let text = session.extracted_text().unwrap_or_default();
            FileManager::write_to_file(output_file, &text)?;
            info!("Success: {}", output_file.display());
        }
        None => {
            let output_dir = input_path.parent().unwrap_or(Path::new("."));
            session.extract_file(input_path, output_dir, events)?;
        }
    }
    Ok(())
}

fn run_apply(
    config: Config,
    xml_file: &Path,
    translation_file: &Path,
    output_dir: Option<&Path>,
    events: &mut Vec<XmlEvent>,
) -> Result<()> {
    let translation = FileManager::read_to_string(translation_file)?;

    let mut session = Session::new(config);
    if !session.load(xml_file, events) {
        return Err(anyhow!("Failed to sanitize {:?}", xml_file));
    }

    let report = session
        .apply_translation(&translation, events)
        .ok_or_else(|| anyhow!("No translated document was produced for {:?}", xml_file))?;

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| xml_file.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    session.save_preview(&output_dir)?;

    if !report.is_valid {
        warn!("The translated document did not pass validation");
    }
    Ok(())
}

fn run_validate(config: Config, xml_file: &Path, events: &mut Vec<XmlEvent>) -> Result<()> {
    let mut session = Session::new(config);
    let report = session
        .validate_file(xml_file, events)
        .ok_or_else(|| anyhow!("Failed to read {:?}", xml_file))?;

    if report.is_valid {
        info!("{:?} is valid", xml_file);
        Ok(())
    } else {
        Err(anyhow!("{:?} did not pass validation", xml_file))
    }
}

// Print the diagnostics reported by the passes
fn print_events(events: &[XmlEvent]) {
    let reportable: Vec<&XmlEvent> = events
        .iter()
        .filter(|event| !matches!(event, XmlEvent::PreviewValidityChanged { .. }))
        .collect();
    if reportable.is_empty() {
        return;
    }

    println!("Diagnostics:");
    for event in reportable {
        let marker = if event.is_blocking() { "!" } else { "-" };
        println!("  {} {}", marker, event);
    }

    if events.iter().any(|event| matches!(event, XmlEvent::ProcessException { .. })) {
        error!("Processing was aborted, see the diagnostics above");
    }
}
