//! Immutable, key-ordered collection of blueprints.
//!
//! A library is built once from raw definitions and never changes afterwards.
//! Filtering returns a new library holding its own copy of the surviving
//! entries, so derived libraries and their parents are fully independent.
//! Entries are kept in a vector sorted by key: keyed lookups binary-search it
//! and positional lookups index it directly.

use crate::blueprint::identity::BlueprintKey;
use crate::blueprint::model::{Blueprint, BlueprintDefinition};
use crate::blueprint::pattern::WildcardPattern;
use crate::error::LibraryError;
use std::collections::BTreeMap;
use std::ops::Index;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Key-unique blueprint collection, iterated in ascending key order.
pub struct BlueprintLibrary {
    blueprints: Vec<Blueprint>,
}

impl BlueprintLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library with one entry per distinct key.
    ///
    /// Duplicate keys are not an error: a later definition replaces an earlier
    /// one with the same id.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = BlueprintDefinition>,
    {
        definitions.into_iter().map(Blueprint::from).collect()
    }

    /// Blueprints whose key or any tag matches the wildcard `pattern`.
    ///
    /// An empty pattern keeps everything; no match yields an empty library.
    pub fn filter(&self, pattern: &str) -> Self {
        let pattern = WildcardPattern::new(pattern);
        let result = self.retain(|bp| bp.matches_pattern(&pattern));
        tracing::debug!(
            pattern = pattern.as_str(),
            kept = result.len(),
            of = self.len(),
            "filtered blueprint library by tag pattern"
        );
        result
    }

    /// Blueprints whose attribute `name` admits `value`.
    ///
    /// An attribute with recommended values admits exactly those values and its
    /// current value is ignored. An attribute without recommendations admits
    /// only its current value. Blueprints lacking the attribute are dropped.
    pub fn filter_by_attribute(&self, name: &str, value: &str) -> Self {
        let result = self.retain(|bp| match bp.attribute(name) {
            Some(attribute) if attribute.recommended_values().is_empty() => {
                attribute.value() == value
            }
            Some(attribute) => attribute.recommended_values().iter().any(|v| v == value),
            None => false,
        });
        tracing::debug!(
            attribute = name,
            value,
            kept = result.len(),
            of = self.len(),
            "filtered blueprint library by attribute"
        );
        result
    }

    /// Blueprint for `key`, or `None` when absent.
    pub fn find(&self, key: &str) -> Option<&Blueprint> {
        self.position(key).map(|pos| &self.blueprints[pos])
    }

    /// Blueprint for `key`; fails with `BlueprintNotFound` when absent.
    ///
    /// Prefer [`BlueprintLibrary::find`] when absence is an expected outcome.
    pub fn at(&self, key: &str) -> Result<&Blueprint, LibraryError> {
        self.find(key).ok_or_else(|| LibraryError::BlueprintNotFound {
            key: key.to_string(),
        })
    }

    /// Blueprint at `position` in key order; fails with `IndexOutOfRange` when
    /// `position >= len()`.
    pub fn at_index(&self, position: usize) -> Result<&Blueprint, LibraryError> {
        self.blueprints
            .get(position)
            .ok_or(LibraryError::IndexOutOfRange {
                index: position,
                len: self.len(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    /// Iterates blueprints in ascending key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Blueprint> {
        self.blueprints.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BlueprintKey> {
        self.blueprints.iter().map(Blueprint::key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.blueprints
            .binary_search_by(|bp| bp.id().cmp(key))
            .ok()
    }

    // Surviving entries are already sorted and unique, so no re-keying needed.
    fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Blueprint) -> bool,
    {
        Self {
            blueprints: self.blueprints.iter().filter(|bp| keep(*bp)).cloned().collect(),
        }
    }
}

impl FromIterator<Blueprint> for BlueprintLibrary {
    fn from_iter<T: IntoIterator<Item = Blueprint>>(iter: T) -> Self {
        let mut by_key: BTreeMap<BlueprintKey, Blueprint> = BTreeMap::new();
        for blueprint in iter {
            if let Some(replaced) = by_key.insert(blueprint.key().clone(), blueprint) {
                tracing::debug!(
                    key = %replaced.key(),
                    "duplicate blueprint key; later definition wins"
                );
            }
        }
        tracing::trace!(count = by_key.len(), "built blueprint library");
        Self {
            blueprints: by_key.into_values().collect(),
        }
    }
}

impl FromIterator<BlueprintDefinition> for BlueprintLibrary {
    fn from_iter<T: IntoIterator<Item = BlueprintDefinition>>(iter: T) -> Self {
        iter.into_iter().map(Blueprint::from).collect()
    }
}

/// Unchecked positional access; panics like slice indexing. Use
/// [`BlueprintLibrary::at_index`] for the checked form.
impl Index<usize> for BlueprintLibrary {
    type Output = Blueprint;

    fn index(&self, position: usize) -> &Blueprint {
        &self.blueprints[position]
    }
}

impl<'a> IntoIterator for &'a BlueprintLibrary {
    type Item = &'a Blueprint;
    type IntoIter = std::slice::Iter<'a, Blueprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.blueprints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> BlueprintDefinition {
        serde_json::from_value(value).unwrap()
    }

    fn sample_library() -> BlueprintLibrary {
        BlueprintLibrary::from_definitions(vec![
            definition(json!({
                "id": "walker.x",
                "tags": "walker",
                "attributes": [{"id": "speed", "value": "1.4"}]
            })),
            definition(json!({
                "id": "vehicle.b",
                "tags": "vehicle,bike",
                "attributes": [{"id": "wheels", "type": "int", "value": "2"}]
            })),
            definition(json!({
                "id": "vehicle.a",
                "tags": ["vehicle", "car"],
                "attributes": [
                    {"id": "color", "type": "rgbcolor", "value": "red",
                     "recommended_values": ["red", "blue"]},
                    {"id": "wheels", "type": "int", "value": "4"}
                ]
            })),
        ])
    }

    fn ids(library: &BlueprintLibrary) -> Vec<&str> {
        library.iter().map(Blueprint::id).collect()
    }

    #[test]
    fn construction_sorts_by_key() {
        let library = sample_library();
        assert_eq!(library.len(), 3);
        assert_eq!(ids(&library), vec!["vehicle.a", "vehicle.b", "walker.x"]);
        for (pos, bp) in library.iter().enumerate() {
            assert_eq!(library.at_index(pos).unwrap(), bp);
            assert_eq!(&library[pos], bp);
        }
    }

    #[test]
    fn later_duplicate_key_wins() {
        let library = BlueprintLibrary::from_definitions(vec![
            definition(json!({"id": "static.prop", "uid": 1})),
            definition(json!({"id": "other"})),
            definition(json!({"id": "static.prop", "uid": 2})),
        ]);
        assert_eq!(library.len(), 2);
        assert_eq!(library.at("static.prop").unwrap().uid(), 2);
    }

    #[test]
    fn filter_by_pattern_matches_keys_and_tags() {
        let library = sample_library();
        assert_eq!(ids(&library.filter("vehicle.*")), vec!["vehicle.a", "vehicle.b"]);
        assert_eq!(ids(&library.filter("*.b")), vec!["vehicle.b"]);
        assert_eq!(ids(&library.filter("car")), vec!["vehicle.a"]);
        assert_eq!(ids(&library.filter("")).len(), 3);
        assert!(library.filter("sensor.*").is_empty());
        assert_eq!(library.len(), 3, "source library must be untouched");
    }

    #[test]
    fn filter_is_idempotent() {
        let library = sample_library();
        let once = library.filter("vehicle*");
        let twice = once.filter("vehicle*");
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_by_attribute_uses_recommendations_when_present() {
        let library = sample_library();
        // "blue" is only a recommendation; the current value is "red".
        assert_eq!(ids(&library.filter_by_attribute("color", "blue")), vec!["vehicle.a"]);
        assert_eq!(ids(&library.filter_by_attribute("color", "red")), vec!["vehicle.a"]);
        assert!(library.filter_by_attribute("color", "green").is_empty());
    }

    #[test]
    fn current_value_ignored_when_recommendations_exist() {
        let library = BlueprintLibrary::from_definitions(vec![definition(json!({
            "id": "vehicle.c",
            "attributes": [
                {"id": "color", "value": "green", "recommended_values": ["red", "blue"]}
            ]
        }))]);
        assert!(library.filter_by_attribute("color", "green").is_empty());
        assert_eq!(ids(&library.filter_by_attribute("color", "blue")), vec!["vehicle.c"]);
    }

    #[test]
    fn filter_by_attribute_compares_current_value_otherwise() {
        let library = sample_library();
        assert_eq!(ids(&library.filter_by_attribute("wheels", "4")), vec!["vehicle.a"]);
        assert_eq!(ids(&library.filter_by_attribute("wheels", "2")), vec!["vehicle.b"]);
        assert!(library.filter_by_attribute("wheels", "6").is_empty());
        assert!(library.filter_by_attribute("doors", "4").is_empty());
    }

    #[test]
    fn find_and_at_agree() {
        let library = sample_library();
        for key in ["vehicle.a", "vehicle.b", "walker.x"] {
            assert_eq!(library.find(key).map(Blueprint::id), Some(key));
            assert_eq!(library.at(key).unwrap().id(), key);
            assert!(library.contains(key));
        }

        assert!(library.find("nonexistent").is_none());
        let err = library.at("nonexistent").unwrap_err();
        assert_eq!(
            err,
            LibraryError::BlueprintNotFound {
                key: "nonexistent".to_string()
            }
        );
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn at_index_rejects_positions_past_the_end() {
        let library = sample_library();
        assert_eq!(library.at_index(2).unwrap().id(), "walker.x");
        assert_eq!(
            library.at_index(3).unwrap_err(),
            LibraryError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(BlueprintLibrary::new().at_index(0).is_err());
    }

    #[test]
    #[should_panic]
    fn index_operator_panics_out_of_range() {
        let library = sample_library();
        let _ = &library[library.len()];
    }
}
