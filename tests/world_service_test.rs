//! Tests for WorldService: file lifecycle, atomic replacement, queries.

use std::path::Path;

use rsworld::application::{LoadError, WorldService};
use rsworld::codec::{DecodeError, DocumentCodec};
use rsworld::schema::SchemaViolation;
use rsworld::util::testing;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests/resources/worlds").join(name)
}

#[test]
fn given_valid_file_when_loading_then_world_is_replaced() {
    testing::init_test_setup();
    let mut service = WorldService::new("World");
    service.load_path(&fixture("earth.xml")).unwrap();

    let world = service.world();
    assert_eq!(world.name(), "Earth");
    assert!(service.has_region("BY"));
    let path: Vec<&str> = service
        .path_from_root("BY")
        .unwrap()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(path, vec!["Earth", "EU", "DE", "BY"]);

    let children: Vec<&str> = service
        .children_sorted("EU")
        .unwrap()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(children, vec!["DE", "FR"]);
}

#[test]
fn given_w1_fixture_when_loading_then_spec_scenario_holds() {
    let mut service = WorldService::new("World");
    service.load_path(&fixture("w1.xml")).unwrap();
    assert!(service.has_region("G1"));
    let path: Vec<&str> = service
        .path_from_root("G1")
        .unwrap()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(path, vec!["W1", "C1", "G1"]);
}

#[test]
fn given_duplicate_id_file_when_loading_then_previous_world_survives() {
    let mut service = WorldService::new("World");
    service.load_path(&fixture("earth.xml")).unwrap();

    let err = service.load_path(&fixture("duplicate_id.xml")).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Decode(DecodeError::Schema(SchemaViolation::DuplicateId(id))) if id == "X"
    ));

    // The rejected document is not observable, not even partially
    assert_eq!(service.world().name(), "Earth");
    assert!(!service.has_region("X"));
    assert!(service.has_region("BY"));
}

#[test]
fn given_fresh_service_when_rejected_load_then_empty_world_survives() {
    let mut service = WorldService::new("World");
    let err = service.load_path(&fixture("bad_type.xml")).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Decode(DecodeError::Schema(SchemaViolation::UnknownType { .. }))
    ));
    assert_eq!(service.world().name(), "World");
    assert_eq!(service.world().region_count(), 1);
}

#[test]
fn given_malformed_file_when_loading_then_parse_error() {
    let mut service = WorldService::new("World");
    let err = service.load_path(&fixture("malformed.xml")).unwrap_err();
    assert!(matches!(err, LoadError::Decode(DecodeError::Parse(_))));
}

#[test]
fn given_wrong_root_file_when_loading_then_schema_violation() {
    let mut service = WorldService::new("World");
    let err = service.load_path(&fixture("wrong_root.xml")).unwrap_err();
    assert!(matches!(err, LoadError::Decode(DecodeError::Schema(_))));
}

#[test]
fn given_missing_file_when_loading_then_io_error() {
    let mut service = WorldService::new("World");
    let err = service.load_path(Path::new("tests/resources/worlds/nope.xml")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn given_reset_save_load_cycle_then_named_empty_world_returns() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("earth.xml");

    let mut service = WorldService::new("World");
    service.reset("Earth");
    service.save_path(&file).unwrap();

    service.reset("Other");
    service.load_path(&file).unwrap();

    assert_eq!(service.world().name(), "Earth");
    assert_eq!(service.world().region_count(), 1);
    assert!(service.children_sorted("Earth").unwrap().is_empty());
}

#[test]
fn given_blank_reset_name_then_saved_document_reloads() {
    let mut service = WorldService::new("World");
    service.reset("");

    let mut sink = Vec::new();
    service.save_to(&mut sink).unwrap();
    service.load_bytes(&sink).unwrap();
    assert_eq!(service.world().name(), rsworld::domain::World::DEFAULT_NAME);
}

#[test]
fn given_loaded_world_when_saved_and_reloaded_then_equal_region_set() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("copy.xml");

    let mut service = WorldService::new("World");
    service.load_path(&fixture("earth.xml")).unwrap();
    let ids_before: Vec<String> = service.world().iter().map(|r| r.id.clone()).collect();

    service.save_path(&file).unwrap();
    let mut reloaded = WorldService::new("World");
    reloaded.load_path(&file).unwrap();

    let mut ids_after: Vec<String> = reloaded.world().iter().map(|r| r.id.clone()).collect();
    let mut ids_before_sorted = ids_before.clone();
    ids_before_sorted.sort();
    ids_after.sort();
    assert_eq!(ids_after, ids_before_sorted);
}

#[test]
fn given_save_to_sink_then_bytes_match_encode() {
    let mut service = WorldService::new("World");
    service.load_path(&fixture("earth.xml")).unwrap();

    let mut sink = Vec::new();
    service.save_to(&mut sink).unwrap();
    assert_eq!(sink, DocumentCodec::encode(service.world()));
}

#[test]
fn given_save_then_world_is_not_mutated() {
    let mut service = WorldService::new("World");
    service.load_path(&fixture("earth.xml")).unwrap();
    let before = DocumentCodec::encode(service.world());

    let mut sink = Vec::new();
    service.save_to(&mut sink).unwrap();
    assert_eq!(DocumentCodec::encode(service.world()), before);
}
