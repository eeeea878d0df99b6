//! Tests for the XML codec: decode, encode and the round-trip law.

use std::collections::BTreeMap;

use rsworld::codec::{DecodeError, DocumentCodec};
use rsworld::domain::{Region, RegionType, World};
use rsworld::schema::SchemaViolation;

/// Flatten a world into id -> (name, kind, capital, parent id) for
/// structural comparison; child order is deliberately not part of it.
fn snapshot(world: &World) -> BTreeMap<String, (String, RegionType, Option<String>, Option<String>)> {
    world
        .iter()
        .map(|region| {
            let path = world.path_from_root(&region.id).unwrap();
            let parent = path
                .len()
                .checked_sub(2)
                .map(|i| path[i].id.clone());
            (
                region.id.clone(),
                (
                    region.name.clone(),
                    region.kind,
                    region.capital.clone(),
                    parent,
                ),
            )
        })
        .collect()
}

#[test]
fn given_nested_document_when_decoded_then_paths_match() {
    let bytes = br#"<?xml version="1.0" encoding="UTF-8"?>
<world name="W1">
    <region id="C1" name="First State" type="State">
        <region id="G1" name="First County" type="County"/>
    </region>
</world>"#;

    let world = DocumentCodec::decode(bytes).unwrap();
    assert!(world.has_region("G1"));
    let path: Vec<&str> = world
        .path_from_root("G1")
        .unwrap()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(path, vec!["W1", "C1", "G1"]);
}

#[test]
fn given_valid_world_when_round_tripped_then_structurally_equal() {
    let mut world = World::new("Earth");
    world
        .add_region("Earth", Region::new("EU", "Europe", RegionType::Continent))
        .unwrap();
    world
        .add_region(
            "EU",
            Region::new("DE", "Germany", RegionType::Nation).with_capital("Berlin"),
        )
        .unwrap();
    world
        .add_region("DE", Region::new("BY", "Bavaria", RegionType::State))
        .unwrap();
    world
        .add_region("BY", Region::new("M", "Munich", RegionType::County))
        .unwrap();
    world
        .add_region(
            "Earth",
            Region::new("TT", "Trinidad & Tobago", RegionType::Continent)
                .with_capital("Port of <Spain>"),
        )
        .unwrap();

    let decoded = DocumentCodec::decode(&DocumentCodec::encode(&world)).unwrap();
    assert_eq!(decoded.name(), world.name());
    assert_eq!(snapshot(&decoded), snapshot(&world));
}

#[test]
fn given_empty_world_when_round_tripped_then_empty_world_returns() {
    let world = World::new("Earth");
    let decoded = DocumentCodec::decode(&DocumentCodec::encode(&world)).unwrap();
    assert_eq!(decoded.name(), "Earth");
    assert_eq!(decoded.region_count(), 1);
    assert!(decoded.children_sorted("Earth").unwrap().is_empty());
}

#[test]
fn given_encode_then_output_is_a_declared_xml_document() {
    let world = World::new("Earth");
    let bytes = DocumentCodec::encode(&world);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains(r#"name="Earth""#));
}

#[test]
fn given_duplicate_ids_when_decoding_then_schema_violation() {
    let bytes = br#"<world name="Doubles">
    <region id="X" name="First" type="Continent"/>
    <region id="X" name="Second" type="Continent"/>
</world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Schema(SchemaViolation::DuplicateId(id)) if id == "X"
    ));
}

#[test]
fn given_malformed_markup_when_decoding_then_parse_error() {
    let bytes = br#"<world name="Broken"><region id="A" name="Alpha" type="Continent"></world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Parse(_)));
}

#[test]
fn given_unclosed_region_at_end_of_input_then_rejected_not_shrunk() {
    let bytes =
        br#"<?xml version="1.0"?><world name="W"><region id="A" name="Alpha" type="Continent">"#;
    let result = DocumentCodec::decode(bytes);
    assert!(
        matches!(result, Err(DecodeError::Truncated)),
        "a cut-short document must fail instead of loading without its open regions"
    );
}

#[test]
fn given_unclosed_world_at_end_of_input_then_rejected() {
    let bytes = br#"<?xml version="1.0"?><world name="W">"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated));
}

#[test]
fn given_missing_required_attribute_when_decoding_then_schema_violation() {
    let bytes = br#"<world name="W"><region id="A" type="Continent"/></world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Schema(SchemaViolation::MissingAttribute { attribute: "name", .. })
    ));
}

#[test]
fn given_unexpected_element_when_decoding_then_schema_violation() {
    let bytes = br#"<world name="W"><city id="A" name="Alpha"/></world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Schema(SchemaViolation::UnexpectedElement(name)) if name == "city"
    ));
}

#[test]
fn given_unexpected_attribute_when_decoding_then_schema_violation() {
    let bytes = br#"<world name="W"><region id="A" name="Alpha" type="Continent" mayor="Bob"/></world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Schema(SchemaViolation::UnexpectedAttribute { .. })
    ));
}

#[test]
fn given_wrong_root_element_when_decoding_then_schema_violation() {
    let bytes = br#"<universe name="U"><region id="A" name="Alpha" type="Continent"/></universe>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Schema(_)));
}

#[test]
fn given_world_without_name_when_decoding_then_bad_root() {
    let bytes = br#"<world><region id="A" name="Alpha" type="Continent"/></world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Schema(SchemaViolation::BadRoot)));
}

#[test]
fn given_text_content_when_decoding_then_schema_violation() {
    let bytes = br#"<world name="W">hello</world>"#;
    let err = DocumentCodec::decode(bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Schema(_)));
}

#[test]
fn given_decoded_world_then_children_come_back_sorted() {
    let bytes = br#"<world name="W">
    <region id="ZZ" name="Last" type="Continent"/>
    <region id="AA" name="First" type="Continent"/>
</world>"#;
    let world = DocumentCodec::decode(bytes).unwrap();
    let ids: Vec<&str> = world
        .children_sorted("W")
        .unwrap()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["AA", "ZZ"]);
}
