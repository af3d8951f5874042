use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier for a blueprint (e.g., `vehicle.audi.tt`).
///
/// Keys order lexicographically; the library relies on that ordering for
/// positional access.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintKey(pub String);

impl BlueprintKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlueprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BlueprintKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlueprintKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlueprintKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Declared value type of a blueprint attribute.
///
/// The library never interprets values; the type is carried so consumers can.
/// `Other` keeps records from newer producers loadable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AttributeType {
    Bool,
    Int,
    Float,
    #[default]
    String,
    RgbColor,
    Other(String),
}

impl Serialize for AttributeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl AttributeType {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::Bool => "bool",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::String => "string",
            AttributeType::RgbColor => "rgbcolor",
            AttributeType::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "bool" => AttributeType::Bool,
            "int" => AttributeType::Int,
            "float" => AttributeType::Float,
            "string" => AttributeType::String,
            "rgbcolor" => AttributeType::RgbColor,
            other => AttributeType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
