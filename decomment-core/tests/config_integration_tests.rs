// decomment-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use decomment_core::config::{self, StripConfig};
use decomment_core::ExcludeSet;

#[test]
fn test_load_default_config() {
    let config = StripConfig::load_default_config().unwrap();
    assert!(config.keep_directives.is_empty());
    assert!(config.excludes.iter().any(|g| g == "vendor/**"));
    assert!(config.excludes.iter().any(|g| g == "**/*.min.js"));
    assert!(config.php_enabled());
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
keep_directives:
  - "noqa"
  - "@license"
excludes:
  - "legacy/**"
whitespace:
  collapse_blank_lines: 0
php:
  enabled: false
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = StripConfig::load_from_file(file.path())?;
    assert_eq!(config.keep_directives, vec!["noqa", "@license"]);
    assert_eq!(config.excludes, vec!["legacy/**"]);
    assert_eq!(config.whitespace.normalize, None);
    assert_eq!(config.collapse_blank_lines(), Some(0));
    assert!(!config.php_enabled());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_bad_regex() -> Result<()> {
    let yaml_content = "keep_directives:\n  - \"(unclosed\"\n";
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = StripConfig::load_from_file(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("(unclosed"));
    Ok(())
}

#[test]
fn test_load_from_missing_file() {
    let err = StripConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_merged_excludes_apply() -> Result<()> {
    let user = StripConfig {
        excludes: vec!["legacy/**".to_string()],
        exclude_regexes: vec![r"\.generated\.".to_string()],
        ..Default::default()
    };
    let merged = config::merge_config(StripConfig::load_default_config()?, Some(user));
    config::validate_config(&merged)?;

    let set = ExcludeSet::from_config(&merged)?;
    assert!(set.is_excluded("legacy/old.js"));
    assert!(set.is_excluded("node_modules/x/index.js"));
    assert!(set.is_excluded("src/api.generated.ts"));
    assert!(set.is_excluded("public/app.min.js"));
    assert!(!set.is_excluded("src/app.js"));
    Ok(())
}
