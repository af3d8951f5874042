//! Immutable blueprint library.
//!
//! A blueprint describes a class of entity that can be spawned: a unique key,
//! classification tags, and named attributes with a current value and optional
//! recommended values. `BlueprintLibrary` holds a key-ordered set of them,
//! answers keyed and positional lookups, and produces narrowed libraries via
//! wildcard tag filters and attribute filters. Libraries never change after
//! construction, so they can be shared across threads behind an `Arc`.

pub mod blueprint;
pub mod error;

pub use blueprint::{
    Attribute, AttributeDefinition, AttributeType, Blueprint, BlueprintDefinition, BlueprintKey,
    BlueprintLibrary, WildcardPattern, load_definitions_from_path, parse_definition_stream,
    parse_json_records, split_tag_list,
};
pub use error::LibraryError;

/// Environment variable naming the default definitions file for the CLI.
pub const LIBRARY_PATH_ENV: &str = "BLUEPRINT_LIBRARY_PATH";
