use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language tag whose entries are extracted for translation
    #[serde(default = "default_extract_lang_tag")]
    pub extract_lang_tag: String,

    /// Language tag whose entries receive the translation
    #[serde(default = "default_write_lang_tag")]
    pub write_lang_tag: String,

    /// Color code separation settings
    #[serde(default)]
    pub color_codes: ColorCodeConfig,

    /// Prefix of the translated output file name
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Maximum number of characters in a diagnostic detail list
    #[serde(default = "default_message_size")]
    pub message_size: usize,

    /// Debug artifacts
    #[serde(default)]
    pub debug: DebugConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How color codes wrapping payload text are handled
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorCodeConfig {
    /// Whether color codes are stripped before translation and reattached after
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum text length of a run in entries with several runs.
    /// An entry with a single run is always separated.
    #[serde(default = "default_color_code_min_length")]
    pub min_length: usize,

    /// Character marking the splice points in translator-facing text
    #[serde(default = "default_color_code_delimiter")]
    pub delimiter: char,

    /// How many times the delimiter character is repeated
    #[serde(default = "default_color_code_delimiter_size")]
    pub delimiter_size: usize,
}

impl ColorCodeConfig {
    /// The joint placed between separated texts: `" " + delimiter * size + " "`
    pub fn padded_delimiter(&self) -> String {
        format!(" {} ", self.delimiter.to_string().repeat(self.delimiter_size))
    }
}

impl Default for ColorCodeConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            min_length: default_color_code_min_length(),
            delimiter: default_color_code_delimiter(),
            delimiter_size: default_color_code_delimiter_size(),
        }
    }
}

/// Debug output settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    /// Dump the sanitized document after every sanitize pass
    #[serde(default)]
    pub dump_sanitized: bool,

    /// Directory receiving the dump
    #[serde(default = "default_debug_dir")]
    pub directory: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            dump_sanitized: false,
            directory: default_debug_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_extract_lang_tag() -> String {
    "schinese".to_string()
}

fn default_write_lang_tag() -> String {
    "english".to_string()
}

fn default_output_prefix() -> String {
    "TR_".to_string()
}

fn default_message_size() -> usize {
    500
}

fn default_true() -> bool {
    true
}

fn default_color_code_min_length() -> usize {
    2
}

fn default_color_code_delimiter() -> char {
    '#'
}

fn default_color_code_delimiter_size() -> usize {
    3
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.extract_lang_tag.trim().is_empty() {
            return Err(anyhow!("Extraction language tag must not be empty"));
        }

        if self.write_lang_tag.trim().is_empty() {
            return Err(anyhow!("Write language tag must not be empty"));
        }

        if self.color_codes.delimiter.is_whitespace() {
            return Err(anyhow!("Color code delimiter must not be whitespace"));
        }

        if self.color_codes.delimiter_size == 0 {
            return Err(anyhow!("Color code delimiter size must be at least 1"));
        }

        if self.message_size == 0 {
            return Err(anyhow!("Message size must be at least 1"));
        }

        Ok(())
    }

    /// Load the configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the configuration, writing a default one first when the file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            extract_lang_tag: default_extract_lang_tag(),
            write_lang_tag: default_write_lang_tag(),
            color_codes: ColorCodeConfig::default(),
            output_prefix: default_output_prefix(),
            message_size: default_message_size(),
            debug: DebugConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
