//! Integration tests for saving and loading models.

use tempfile::TempDir;

use imputer::persistence::{MODEL_CLASS, read_metadata};
use imputer::{
    BlobStore, CleaningMode, Column, FsBlobStore, Frame, ImputationModel, Imputer, ImputerError,
    ImputerParams, MemoryBlobStore,
};

fn fitted_model() -> ImputationModel {
    let frame = Frame::new(vec![
        Column::double("age", vec![Some(1.0), Some(2.0), None, Some(4.0)]),
        Column::string("city", vec![Some("Oslo"), None, Some("Lima"), None]),
        Column::boolean("member", vec![Some(true), None, None, Some(false)]),
    ])
    .unwrap();

    let numeric = Imputer::new(
        ImputerParams::default()
            .with_input_cols(["age"])
            .with_output_cols(["age_clean"]),
    )
    .fit(&frame)
    .unwrap();
    let literal = Imputer::new(
        ImputerParams::in_place(["city", "member"])
            .with_mode(CleaningMode::Custom)
            .with_custom_value("true"),
    )
    .fit(&frame)
    .unwrap();

    // Combine both into one model covering all three value kinds.
    let mut values = numeric.replacement_values().clone();
    values.extend(literal.replacement_values().clone());
    ImputationModel::new(
        numeric.uid(),
        values,
        imputer::ColumnMapping::new(
            vec!["age".into(), "city".into(), "member".into()],
            vec!["age_clean".into(), "city".into(), "member".into()],
        )
        .unwrap(),
    )
    .unwrap()
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_round_trip_filesystem() {
    let dir = TempDir::new().unwrap();
    let store = FsBlobStore::new(dir.path());
    let model = fitted_model();

    model.save(&store, "models/age", false).unwrap();
    let loaded = ImputationModel::load(&store, "models/age").unwrap();

    assert_eq!(loaded, model);
    assert_eq!(loaded.uid(), model.uid());
    assert!(dir.path().join("models/age/replacementValues").is_file());
    assert!(dir.path().join("models/age/data").is_file());
}

#[test]
fn test_round_trip_directory_helpers() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("age_model");
    let model = fitted_model();

    model.save_to_dir(&target, false).unwrap();
    assert_eq!(ImputationModel::load_from_dir(&target).unwrap(), model);
}

#[test]
fn test_loaded_model_transforms_identically() {
    let store = MemoryBlobStore::new();
    let model = fitted_model();
    model.save(&store, "m", false).unwrap();
    let loaded = ImputationModel::load(&store, "m").unwrap();

    let frame = Frame::new(vec![
        Column::double("age", vec![None, Some(3.0)]),
        Column::string("city", vec![None, Some("Rome")]),
        Column::boolean("member", vec![None, Some(false)]),
    ])
    .unwrap();
    assert_eq!(loaded.transform(&frame).unwrap(), model.transform(&frame).unwrap());
}

// =============================================================================
// Overwrite rules
// =============================================================================

#[test]
fn test_second_save_without_overwrite_fails() {
    let dir = TempDir::new().unwrap();
    let store = FsBlobStore::new(dir.path());
    let model = fitted_model();

    model.save(&store, "p", false).unwrap();
    let before = store.read("p/metadata").unwrap();

    let other = Imputer::new(ImputerParams::in_place(["age"]))
        .fit(&Frame::new(vec![Column::double("age", vec![Some(9.0)])]).unwrap())
        .unwrap();
    assert!(matches!(
        other.save(&store, "p", false),
        Err(ImputerError::AlreadyExists(_))
    ));

    assert_eq!(store.read("p/metadata").unwrap(), before);
    assert_eq!(ImputationModel::load(&store, "p").unwrap(), model);
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_overwrite_replaces_artifact() {
    let store = MemoryBlobStore::new();
    let first = fitted_model();
    first.save(&store, "p", false).unwrap();

    let second = Imputer::new(ImputerParams::in_place(["x"]))
        .fit(&Frame::new(vec![Column::double("x", vec![Some(1.0), None])]).unwrap())
        .unwrap();
    second.save(&store, "p", true).unwrap();

    assert_eq!(ImputationModel::load(&store, "p").unwrap(), second);
    assert!(store.paths().iter().all(|p| p.starts_with("p/")));
    assert_eq!(store.paths().len(), 5);
}

#[test]
fn test_overwrite_on_filesystem() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("model");
    fitted_model().save_to_dir(&target, false).unwrap();

    let second = Imputer::new(ImputerParams::in_place(["x"]))
        .fit(&Frame::new(vec![Column::double("x", vec![Some(1.0)])]).unwrap())
        .unwrap();
    second.save_to_dir(&target, true).unwrap();

    assert_eq!(ImputationModel::load_from_dir(&target).unwrap(), second);
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

// =============================================================================
// Missing and corrupt components
// =============================================================================

fn saved() -> MemoryBlobStore {
    let store = MemoryBlobStore::new();
    fitted_model().save(&store, "m", false).unwrap();
    store
}

#[test]
fn test_missing_artifact_is_not_found() {
    let store = MemoryBlobStore::new();
    assert!(matches!(
        ImputationModel::load(&store, "nothing"),
        Err(ImputerError::NotFound(_))
    ));
}

#[test]
fn test_each_missing_component_is_not_found() {
    for component in ["metadata", "replacementValues", "inputCols", "outputCols", "data"] {
        let store = saved();
        store.delete(&format!("m/{}", component)).unwrap();
        assert!(
            matches!(ImputationModel::load(&store, "m"), Err(ImputerError::NotFound(_))),
            "missing {} should be NotFound",
            component
        );
    }
}

#[test]
fn test_tampered_component_is_corrupt() {
    let store = saved();
    store.write("m/inputCols", br#"["age","city","other"]"#).unwrap();
    assert!(matches!(
        ImputationModel::load(&store, "m"),
        Err(ImputerError::Corrupt { ref path, .. }) if path == "m/inputCols"
    ));
}

#[test]
fn test_unreadable_metadata_is_corrupt() {
    let store = saved();
    store.write("m/metadata", b"not json").unwrap();
    assert!(matches!(
        ImputationModel::load(&store, "m"),
        Err(ImputerError::Corrupt { .. })
    ));
}

#[test]
fn test_metadata_contents() {
    let store = saved();
    let metadata = read_metadata(&store, "m").unwrap();

    assert_eq!(metadata.class_name, MODEL_CLASS);
    assert_eq!(metadata.uid, ImputationModel::load(&store, "m").unwrap().uid());
    assert!(metadata.timestamp > 0);
    assert!(metadata.checksums.values().all(|c| c.starts_with("sha256:")));

    let raw: serde_json::Value = serde_json::from_slice(&store.read("m/metadata").unwrap()).unwrap();
    assert!(raw.get("className").is_some());
    assert!(raw.get("formatVersion").is_some());
}

#[test]
fn test_replacement_values_keep_their_kind() {
    let store = saved();
    let raw: serde_json::Value =
        serde_json::from_slice(&store.read("m/replacementValues").unwrap()).unwrap();

    assert_eq!(raw["age_clean"]["type"], "double");
    assert_eq!(raw["city"]["type"], "text");
    assert_eq!(raw["city"]["value"], "true");
    assert_eq!(raw["member"]["type"], "boolean");
    assert_eq!(raw["member"]["value"], true);
}

// =============================================================================
// Estimator persistence
// =============================================================================

#[test]
fn test_estimator_round_trip() {
    let dir = TempDir::new().unwrap();
    let imputer = Imputer::new(
        ImputerParams::default()
            .with_input_cols(["a", "b"])
            .with_output_cols(["a_out", "b_out"])
            .with_mode(CleaningMode::Median)
            .with_relative_error(0.01),
    );

    imputer.save_to_dir(dir.path().join("est"), false).unwrap();
    let loaded = Imputer::load_from_dir(dir.path().join("est")).unwrap();
    assert_eq!(loaded, imputer);

    assert!(matches!(
        ImputationModel::load_from_dir(dir.path().join("est")),
        Err(ImputerError::NotFound(_))
    ));
}

#[test]
fn test_invalid_paths_rejected() {
    let store = MemoryBlobStore::new();
    let model = fitted_model();
    assert!(matches!(model.save(&store, "", false), Err(ImputerError::Config(_))));
    assert!(matches!(model.save(&store, "../x", false), Err(ImputerError::Config(_))));
    assert!(store.paths().is_empty());
}
