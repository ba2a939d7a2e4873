//! Integration tests for CropSense CLI commands.
//!
//! Uses tempfile for bundle files.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use cropsense::cli::{
    build_state, cmd_convert, cmd_inspect, cmd_predict, cmd_stages, inspect_bundle,
    predict_with_bundle,
};
use cropsense::config::ServerConfig;
use cropsense_core::formats::{detect_format, write_bundle};
use cropsense_core::{
    BundleFormat, ClassifierModel, Crop, DecisionTree, Forest, LabelDecoder, ModelBundle,
    StageEncoder,
};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create a maize bundle as the training process would write it.
fn create_bundle_json(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("maize_disease_model.json");
    let content = r#"{
        "model": {"table": {"rows": [[1, 0], [1, 1], [0, 1]]}},
        "label_encoder": {"classes": [3, 1, 2]},
        "mlb": {"classes": ["Northern Leaf Blight", "Common Rust"]}
    }"#;
    std::fs::write(&path, content).unwrap();
    path
}

/// Create a wheat bundle backed by a forest, in binary form.
fn create_bundle_binary(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("wheat_disease_model.bundle");
    let bundle = ModelBundle::new(
        ClassifierModel::Forest(Forest::new(vec![
            DecisionTree::leaf(vec![1, 0]),
            DecisionTree::leaf(vec![1, 1]),
            DecisionTree::leaf(vec![0, 1]),
        ])),
        StageEncoder::new([5, 6]).unwrap(),
        LabelDecoder::new(["Leaf Rust", "Powdery Mildew"]),
    )
    .unwrap();
    write_bundle(&path, &bundle, BundleFormat::Binary).unwrap();
    path
}

// =============================================================================
// INSPECT
// =============================================================================

#[test]
fn test_inspect_json_bundle() {
    let temp = create_temp_dir();
    let path = create_bundle_json(&temp);

    let summary = inspect_bundle(&path).unwrap();
    assert_eq!(summary.format, "json");
    assert_eq!(summary.classifier, "table");
    assert_eq!(summary.stages, vec![1, 2, 3]);
    assert_eq!(summary.labels, vec!["Northern Leaf Blight", "Common Rust"]);

    assert!(cmd_inspect(&path, false).is_ok());
    assert!(cmd_inspect(&path, true).is_ok());
}

#[test]
fn test_inspect_binary_bundle() {
    let temp = create_temp_dir();
    let path = create_bundle_binary(&temp);

    let summary = inspect_bundle(&path).unwrap();
    assert_eq!(summary.format, "binary");
    assert_eq!(summary.classifier, "forest");
    assert_eq!(summary.stages, vec![5, 6]);
}

#[test]
fn test_inspect_missing_file_fails() {
    let temp = create_temp_dir();
    assert!(cmd_inspect(&temp.path().join("absent.json"), false).is_err());
}

#[test]
fn test_inspect_invalid_json_fails() {
    let temp = create_temp_dir();
    let bad_file = temp.path().join("bad.json");
    std::fs::write(&bad_file, "not valid json").unwrap();
    assert!(inspect_bundle(&bad_file).is_err());
}

// =============================================================================
// STAGES / PREDICT
// =============================================================================

#[test]
fn test_stages_command() {
    let temp = create_temp_dir();
    let path = create_bundle_json(&temp);
    assert!(cmd_stages(&path, false).is_ok());
    assert!(cmd_stages(&path, true).is_ok());
}

#[test]
fn test_predict_with_bundle() {
    let temp = create_temp_dir();
    let path = create_bundle_json(&temp);

    assert_eq!(
        predict_with_bundle(&path, 2).unwrap(),
        vec!["Northern Leaf Blight", "Common Rust"]
    );
    assert_eq!(predict_with_bundle(&path, 3).unwrap(), vec!["Common Rust"]);
    assert!(cmd_predict(&path, 1, true).is_ok());
}

#[test]
fn test_predict_forest_majority() {
    let temp = create_temp_dir();
    let path = create_bundle_binary(&temp);
    // votes: Leaf Rust 2/3, Powdery Mildew 2/3
    assert_eq!(
        predict_with_bundle(&path, 5).unwrap(),
        vec!["Leaf Rust", "Powdery Mildew"]
    );
}

#[test]
fn test_predict_unknown_stage_fails() {
    let temp = create_temp_dir();
    let path = create_bundle_json(&temp);
    assert!(cmd_predict(&path, 99, false).is_err());
}

// =============================================================================
// CONVERT
// =============================================================================

#[test]
fn test_convert_json_to_binary_and_back() {
    let temp = create_temp_dir();
    let json_path = create_bundle_json(&temp);
    let bin_path = temp.path().join("maize.bundle");
    let back_path = temp.path().join("maize_again.json");

    cmd_convert(&json_path, &bin_path, "binary").unwrap();
    assert_eq!(
        detect_format(&std::fs::read(&bin_path).unwrap()),
        BundleFormat::Binary
    );

    cmd_convert(&bin_path, &back_path, "json").unwrap();
    assert_eq!(
        inspect_bundle(&json_path).unwrap().stages,
        inspect_bundle(&back_path).unwrap().stages
    );
    for stage in [1, 2, 3] {
        assert_eq!(
            predict_with_bundle(&json_path, stage).unwrap(),
            predict_with_bundle(&back_path, stage).unwrap()
        );
    }
}

#[test]
fn test_convert_unknown_format_fails() {
    let temp = create_temp_dir();
    let json_path = create_bundle_json(&temp);
    let out = temp.path().join("out.pkl");
    assert!(cmd_convert(&json_path, &out, "pickle").is_err());
    assert!(!out.exists());
}

// =============================================================================
// SERVER STATE
// =============================================================================

#[test]
fn test_build_state_loads_configured_bundles() {
    let temp = create_temp_dir();
    let config = ServerConfig {
        maize_model: create_bundle_json(&temp),
        wheat_model: create_bundle_binary(&temp),
        ..ServerConfig::default()
    };

    let state = build_state(&config);
    assert!(state.store.is_loaded(Crop::Maize));
    assert!(state.store.is_loaded(Crop::Wheat));
    assert_eq!(state.store.get_stages(Crop::Wheat), vec![5, 6]);
}

#[test]
fn test_build_state_degrades_on_corrupt_bundle() {
    let temp = create_temp_dir();
    let corrupt = temp.path().join("wheat.bundle");
    std::fs::write(&corrupt, b"CROPBNDL\x07").unwrap();

    let config = ServerConfig {
        maize_model: create_bundle_json(&temp),
        wheat_model: corrupt,
        index_file: Some(temp.path().join("missing.html")),
        ..ServerConfig::default()
    };

    let state = build_state(&config);
    assert!(state.store.is_loaded(Crop::Maize));
    assert!(!state.store.is_loaded(Crop::Wheat));
    assert!(state.store.load_error(Crop::Wheat).is_some());
    assert!(state.index_html.contains("Crop Disease Prediction"));
}

#[test]
fn test_build_state_reads_index_file() {
    let temp = create_temp_dir();
    let index = temp.path().join("index.html");
    std::fs::write(&index, "<h1>Field Office</h1>").unwrap();

    let config = ServerConfig {
        maize_model: temp.path().join("none.json"),
        wheat_model: temp.path().join("none.bundle"),
        index_file: Some(index),
        ..ServerConfig::default()
    };

    let state = build_state(&config);
    assert_eq!(&*state.index_html, "<h1>Field Office</h1>");
}
