#![allow(dead_code)]

use anyhow::Result;
use blueprint_catalog::{BlueprintDefinition, BlueprintLibrary};
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

/// Definitions shared by the integration suites, deliberately out of key order
/// and with one duplicated key.
pub fn sample_definitions() -> Value {
    json!([
        {
            "id": "walker.x",
            "uid": 3,
            "tags": "walker",
            "attributes": [
                {"id": "speed", "type": "float", "value": "1.4",
                 "recommended_values": ["1.4", "2.8"]}
            ]
        },
        {
            "id": "vehicle.b",
            "uid": 2,
            "tags": "vehicle,bike",
            "attributes": [
                {"id": "wheels", "type": "int", "value": "2"}
            ]
        },
        {
            "id": "vehicle.a",
            "uid": 1,
            "tags": ["vehicle", "car"],
            "attributes": [
                {"id": "color", "type": "rgbcolor", "value": "red",
                 "recommended_values": ["red", "blue"], "is_modifiable": true},
                {"id": "wheels", "type": "int", "value": "4"}
            ]
        },
        {
            "id": "walker.x",
            "uid": 4,
            "tags": "walker,pedestrian",
            "attributes": [
                {"id": "speed", "type": "float", "value": "1.1"}
            ]
        }
    ])
}

pub fn sample_library() -> Result<BlueprintLibrary> {
    let definitions: Vec<BlueprintDefinition> = serde_json::from_value(sample_definitions())?;
    Ok(BlueprintLibrary::from_definitions(definitions))
}

pub fn write_definitions(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn keys(library: &BlueprintLibrary) -> Vec<String> {
    library.keys().map(|key| key.0.clone()).collect()
}
