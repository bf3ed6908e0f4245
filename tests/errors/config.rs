//! Configuration error tests

use std::path::PathBuf;

use constfold::{ConfigError, EvaluatorConfig};

/// Scratch file removed on drop
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("constfold-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).expect("write scratch config");
        ScratchFile(path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn load_from_file() {
    let file = ScratchFile::new(
        "load.toml",
        "[evaluator]\nallow-unknown = true\nallow-field-initializers = true\n",
    );
    let config = EvaluatorConfig::load(&file.0).unwrap();
    assert!(config.allow_unknown);
    assert!(config.allow_field_initializers);
}

#[test]
fn missing_file_names_the_path() {
    let path = std::env::temp_dir().join("constfold-does-not-exist.toml");
    let err = EvaluatorConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("constfold-does-not-exist.toml"));
}

#[test]
fn wrong_value_type_is_rejected() {
    let err = EvaluatorConfig::from_toml_str("allow-unknown = \"yes\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid evaluator config"));
}

#[test]
fn malformed_toml_is_rejected() {
    let file = ScratchFile::new("broken.toml", "[evaluator\nallow-unknown = true");
    assert!(matches!(EvaluatorConfig::load(&file.0), Err(ConfigError::Parse(_))));
}

#[test]
fn unknown_key_in_evaluator_table_is_rejected() {
    let err = EvaluatorConfig::from_toml_str("[evaluator]\nunroll-loops = true").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn config_written_back_loads_unchanged() {
    let config = EvaluatorConfig {
        allow_unknown: false,
        allow_field_initializers: true,
    };
    let file = ScratchFile::new("roundtrip.toml", &config.to_toml_string());
    assert_eq!(EvaluatorConfig::load(&file.0).unwrap(), config);
}
