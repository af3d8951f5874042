//! Raw blueprint records and the read-only entries built from them.
//!
//! `BlueprintDefinition` mirrors what an upstream producer hands over (a JSON
//! document, an RPC reply). `Blueprint` is the queryable entry stored in a
//! `BlueprintLibrary`; it exposes lookups only and is never mutated.

use crate::blueprint::identity::{AttributeType, BlueprintKey};
use crate::blueprint::pattern::WildcardPattern;
use crate::error::LibraryError;
use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// Raw attribute descriptor as delivered upstream.
pub struct AttributeDefinition {
    pub id: String,
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub recommended_values: Vec<String>,
    #[serde(default)]
    pub is_modifiable: bool,
}

#[derive(Clone, Debug, Deserialize)]
/// Raw blueprint descriptor as delivered upstream.
pub struct BlueprintDefinition {
    pub id: String,
    #[serde(default)]
    pub uid: u32,
    /// Accepts `"vehicle,car"` or `["vehicle", "car"]`.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Configurable attribute of a blueprint: current value plus recommendations.
pub struct Attribute {
    id: String,
    #[serde(rename = "type")]
    attribute_type: AttributeType,
    value: String,
    recommended_values: Vec<String>,
    is_modifiable: bool,
}

impl Attribute {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attribute_type(&self) -> &AttributeType {
        &self.attribute_type
    }

    /// Current value, uninterpreted.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Recommended values in producer order; empty when the value is free-form.
    pub fn recommended_values(&self) -> &[String] {
        &self.recommended_values
    }

    pub fn is_modifiable(&self) -> bool {
        self.is_modifiable
    }
}

impl From<AttributeDefinition> for Attribute {
    fn from(definition: AttributeDefinition) -> Self {
        Self {
            id: definition.id,
            attribute_type: definition.attribute_type,
            value: definition.value,
            recommended_values: definition.recommended_values,
            is_modifiable: definition.is_modifiable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One blueprint: key, tags, and attributes keyed by id.
pub struct Blueprint {
    key: BlueprintKey,
    uid: u32,
    tags: Vec<String>,
    attributes: BTreeMap<String, Attribute>,
}

impl Blueprint {
    pub fn key(&self) -> &BlueprintKey {
        &self.key
    }

    /// Key as a plain string.
    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the key or any tag matches `pattern`.
    ///
    /// The empty pattern matches every blueprint. See
    /// [`crate::blueprint::pattern`] for the grammar.
    pub fn match_tags(&self, pattern: &str) -> bool {
        self.matches_pattern(&WildcardPattern::new(pattern))
    }

    pub fn matches_pattern(&self, pattern: &WildcardPattern) -> bool {
        pattern.matches_everything()
            || pattern.matches(self.id())
            || self.tags.iter().any(|tag| pattern.matches(tag))
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attribute by id, or `None` when the blueprint does not declare it.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attribute by id; fails with `AttributeNotFound` when absent.
    pub fn get_attribute(&self, name: &str) -> Result<&Attribute, LibraryError> {
        self.attribute(name)
            .ok_or_else(|| LibraryError::AttributeNotFound {
                name: name.to_string(),
            })
    }

    /// Attributes in ascending id order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl From<BlueprintDefinition> for Blueprint {
    fn from(definition: BlueprintDefinition) -> Self {
        let mut attributes = BTreeMap::new();
        for attribute in definition.attributes {
            let name = attribute.id.clone();
            if attributes.insert(name, Attribute::from(attribute)).is_some() {
                tracing::debug!(
                    blueprint = %definition.id,
                    "duplicate attribute id; later definition wins"
                );
            }
        }
        Self {
            key: BlueprintKey(definition.id),
            uid: definition.uid,
            tags: definition.tags,
            attributes,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match RawTags::deserialize(deserializer)? {
        RawTags::Joined(joined) => split_tag_list(&joined),
        RawTags::List(items) => items
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
    };
    Ok(tags)
}

/// Split a comma-delimited tag string, dropping blank entries.
pub fn split_tag_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse blueprint definitions from a JSON array, a single object, or NDJSON.
pub fn parse_definition_stream(input: &str) -> Result<Vec<BlueprintDefinition>> {
    parse_json_records(input, "blueprint definition")
}

/// Parse records of any deserializable type from a JSON array, a single
/// object, or NDJSON.
///
/// Empty input is an error. NDJSON lines are parsed one by one so the error
/// names the offending line; `label` names the record kind in messages.
pub fn parse_json_records<T>(input: &str, label: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("No {label} records provided");
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => {
            return items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    serde_json::from_value(item)
                        .with_context(|| format!("Unable to parse {label} at index {idx}"))
                })
                .collect();
        }
        Ok(value @ Value::Object(_)) => {
            return serde_json::from_value(value)
                .map(|record| vec![record])
                .with_context(|| format!("Unable to parse {label}"));
        }
        Ok(_) => bail!("Unsupported JSON input; expected object or array of {label} records"),
        Err(_) => {}
    }

    let records = trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line.trim())
                .with_context(|| format!("Unable to parse {label} from line {}", idx + 1))
        })
        .collect::<Result<Vec<T>>>()?;

    if records.is_empty() {
        bail!("No {label} records found in input stream");
    }
    Ok(records)
}

/// Read and parse blueprint definitions from disk without further validation.
pub fn load_definitions_from_path(path: &Path) -> Result<Vec<BlueprintDefinition>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_definition_stream(&data).with_context(|| format!("parsing {}", path.display()))
}
