//! Integration tests for configuration loading and environment overrides

use homology_core::{load_config, save_config, AlignerTool, Config, HomologyError};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_env_overrides_apply_on_top_of_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("homology.toml");

    let mut config = Config::default();
    config.aligner.tool = AlignerTool::Diamond;
    save_config(&path, &config).unwrap();

    std::env::set_var("HOMOLOGY_SCRATCH", "/tmp/homology-env-scratch");
    std::env::set_var("HOMOLOGY_ALIGNER_BIN", "/opt/aligners");
    std::env::set_var("HOMOLOGY_MAX_EVALUE", "1e-3");
    std::env::set_var("HOMOLOGY_PRESERVE_ON_FAILURE", "1");

    let loaded = load_config(&path).unwrap().with_env_overrides();

    std::env::remove_var("HOMOLOGY_SCRATCH");
    std::env::remove_var("HOMOLOGY_ALIGNER_BIN");
    std::env::remove_var("HOMOLOGY_MAX_EVALUE");
    std::env::remove_var("HOMOLOGY_PRESERVE_ON_FAILURE");

    assert_eq!(loaded.aligner.tool, AlignerTool::Diamond);
    assert_eq!(loaded.scratch.scratch_dir, PathBuf::from("/tmp/homology-env-scratch"));
    assert_eq!(
        loaded.aligner.binary_path("diamond"),
        PathBuf::from("/opt/aligners/diamond")
    );
    assert_eq!(loaded.aligner.max_evalue, "1e-3");
    assert!(loaded.scratch.preserve_on_failure);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, HomologyError::Io(_)));
}

#[test]
fn test_malformed_toml_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[aligner\nthreads = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, HomologyError::Configuration(_)));
    assert!(err.to_string().contains("Failed to parse config"));
}
