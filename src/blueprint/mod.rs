//! Blueprint library wiring.
//!
//! Raw definitions (`model`) become read-only `Blueprint` entries, which a
//! `BlueprintLibrary` stores in key order. Callers narrow a library with tag
//! patterns (`pattern`) or attribute values and look entries up by key or
//! position.

pub mod identity;
pub mod library;
pub mod model;
pub mod pattern;

pub use identity::{AttributeType, BlueprintKey};
pub use library::BlueprintLibrary;
pub use model::{
    Attribute, AttributeDefinition, Blueprint, BlueprintDefinition, split_tag_list,
};
pub use pattern::WildcardPattern;

pub use model::{load_definitions_from_path, parse_definition_stream, parse_json_records};
