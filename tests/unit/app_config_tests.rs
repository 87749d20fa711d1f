/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use ddloc::app_config::{Config, LogLevel};
use log::LevelFilter;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.extract_lang_tag, "schinese");
    assert_eq!(config.write_lang_tag, "english");
    assert!(config.color_codes.enabled);
    assert_eq!(config.color_codes.min_length, 2);
    assert_eq!(config.color_codes.padded_delimiter(), " ### ");
    assert_eq!(config.output_prefix, "TR_");
    assert_eq!(config.message_size, 500);
    assert!(!config.debug.dump_sanitized);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.extract_lang_tag = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.write_lang_tag = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.color_codes.delimiter = ' ';
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.color_codes.delimiter_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.message_size = 0;
    assert!(config.validate().is_err());
}

/// Test that a partial JSON config falls back to defaults for missing fields
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "write_lang_tag": "french",
        "color_codes": { "delimiter": "@", "delimiter_size": 2 },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.extract_lang_tag, "schinese");
    assert_eq!(config.write_lang_tag, "french");
    assert!(config.color_codes.enabled);
    assert_eq!(config.color_codes.padded_delimiter(), " @@ ");
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Debug);
    Ok(())
}

/// Test that load_or_create writes the default config when none exists
#[test]
fn test_load_or_create_withMissingFile_shouldCreateDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("ddloc.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

/// Test save then load keeps every field
#[test]
fn test_save_withCustomValues_shouldLoadBackEqual() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.extract_lang_tag = "english".to_string();
    config.write_lang_tag = "german".to_string();
    config.color_codes.enabled = false;
    config.debug.dump_sanitized = true;
    config.log_level = LogLevel::Trace;
    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

/// Test that an unparsable config file is an error naming the file
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    let error = Config::load(&path).unwrap_err();
    assert!(error.to_string().contains("broken.json"));
    Ok(())
}
