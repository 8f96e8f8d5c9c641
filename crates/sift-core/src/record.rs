use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::{Result, SiftError};

/// Attribute names the engine understands.
///
/// Incoming attribute maps are loosely shaped (issue trackers, spreadsheets),
/// so names are matched leniently and anything unrecognized is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Component,
    Status,
    Steps,
    Labels,
    Priority,
    Severity,
    /// Requirement ids a test case claims to cover.
    Covers,
    Module,
    Url,
}

impl AttributeKey {
    /// Parse an attribute name, accepting the common tracker spellings.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace(['-', ' '], "_");
        let key = match name.as_str() {
            "component" | "components" => AttributeKey::Component,
            "status" | "state" => AttributeKey::Status,
            "steps" | "steps_to_reproduce" | "repro_steps" => AttributeKey::Steps,
            "labels" | "label" | "tags" => AttributeKey::Labels,
            "priority" => AttributeKey::Priority,
            "severity" => AttributeKey::Severity,
            "covers" | "requirements" | "requirement_ids" | "requirement_id" => {
                AttributeKey::Covers
            }
            "module" | "area" => AttributeKey::Module,
            "url" | "link" => AttributeKey::Url,
            _ => return None,
        };
        Some(key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::Component => "component",
            AttributeKey::Status => "status",
            AttributeKey::Steps => "steps",
            AttributeKey::Labels => "labels",
            AttributeKey::Priority => "priority",
            AttributeKey::Severity => "severity",
            AttributeKey::Covers => "covers",
            AttributeKey::Module => "module",
            AttributeKey::Url => "url",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-valued attributes keyed by [`AttributeKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<AttributeKey, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loosely typed JSON object.
    ///
    /// Scalars are stringified, arrays of scalars are joined with `", "`,
    /// `null` is dropped and unknown keys are ignored. Nested objects or
    /// arrays are rejected.
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self> {
        let mut attrs = Self::new();
        attrs.merge_json_map(map)?;
        Ok(attrs)
    }

    /// Merge known keys from `map`, keeping values already present.
    pub fn merge_json_map(&mut self, map: &Map<String, Value>) -> Result<()> {
        for (name, value) in map {
            let Some(key) = AttributeKey::parse(name) else {
                debug!(attribute = %name, "ignoring unknown attribute");
                continue;
            };
            if self.0.contains_key(&key) {
                continue;
            }
            if let Some(v) = attribute_value(name, value)? {
                self.0.insert(key, v);
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, key: AttributeKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.0.get(&key).map(|s| s.as_str())
    }

    /// The value for `key`, or `None` when missing or blank.
    pub fn non_empty(&self, key: AttributeKey) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

fn attribute_value(name: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Null => {}
                    Value::String(s) => parts.push(s.clone()),
                    Value::Bool(b) => parts.push(b.to_string()),
                    Value::Number(n) => parts.push(n.to_string()),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(SiftError::MalformedAttribute {
                            key: name.to_string(),
                            reason: "nested values are not supported in lists".into(),
                        });
                    }
                }
            }
            Ok(Some(parts.join(", ")))
        }
        Value::Object(_) => Err(SiftError::MalformedAttribute {
            key: name.to_string(),
            reason: "expected a string, number, boolean, or list".into(),
        }),
    }
}

/// A titled, bodied text item: a bug, a requirement, or a test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub body: String,
    pub attributes: Attributes,
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn attr(&self, key: AttributeKey) -> Option<&str> {
        self.attributes.non_empty(key)
    }

    /// True when both title and body are blank.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }

    /// Reject records that carry no text at all.
    pub fn validate(&self) -> Result<()> {
        if self.is_blank() {
            return Err(SiftError::invalid(
                self.label(),
                "title and body are both empty",
            ));
        }
        Ok(())
    }

    /// Id for messages, falling back to a placeholder when blank.
    pub fn label(&self) -> &str {
        if self.id.trim().is_empty() {
            "<unnamed>"
        } else {
            &self.id
        }
    }
}

/// Wire shape accepted for records. Tracker field names (`key`, `summary`,
/// `description`) are accepted alongside the native ones, and known
/// attributes may sit at the top level.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default, alias = "key")]
    id: Option<Value>,
    #[serde(default, alias = "summary")]
    title: Option<String>,
    #[serde(default, alias = "description")]
    body: Option<String>,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawRecord> for Record {
    type Error = SiftError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let id = match raw.id {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(SiftError::invalid(
                    other.to_string(),
                    "record id must be a string or number",
                ));
            }
        };

        let mut attributes = match raw.attributes {
            Some(map) => Attributes::from_json_map(&map)?,
            None => Attributes::new(),
        };
        attributes.merge_json_map(&raw.extra)?;

        Ok(Record {
            id,
            title: raw.title.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            attributes,
        })
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawRecord::deserialize(deserializer)?;
        Record::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Parse either a single record object or an array of records.
pub fn records_from_json(raw: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(SiftError::invalid(
            "<input>",
            format!("expected a record object or an array of records, found {other}"),
        )),
    }
}
