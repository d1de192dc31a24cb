//! Shared types for the Quechua↔Spanish dictionary datasets.
//!
//! The source dictionaries are hand-curated JSON, and several fields change
//! shape from one entry to the next: `categoria_gramatical` is sometimes a
//! single label and sometimes a list, `variantes_dialectales` may be a bare
//! string, a flat list, or a mapping nested country → sub-region → forms.
//! [`FieldValue`] captures those shapes as a tagged variant at the
//! deserialization boundary so downstream code can match on the tag instead of
//! probing JSON types at runtime.
//!
//! [`LexicalRecord`] keeps every field it does not recognise verbatim, in
//! source order, so a record serializes back out unchanged.
//!
//! ```rust
//! use simi_types::{FieldValue, LexicalRecord};
//!
//! let record: LexicalRecord = serde_json::from_str(
//!     r#"{"lema": "Achupalla", "categoria_gramatical": ["s.", "adj."]}"#,
//! ).unwrap();
//! assert_eq!(record.lemma_text(), "Achupalla");
//! assert_eq!(record.categories(), vec!["s.", "adj."]);
//! assert!(matches!(record.category, Some(FieldValue::List(_))));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which language is the lookup key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Quechua → Spanish (`qe`).
    Forward,
    /// Spanish → Quechua (`eq`).
    Reverse,
}

impl Direction {
    /// Parse a direction name, accepting the short dataset tags as well.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "forward" | "qe" | "quechua" => Some(Direction::Forward),
            "reverse" | "eq" | "espanol" | "español" => Some(Direction::Reverse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record field whose JSON shape varies between entries.
///
/// Decoding is total: every non-null JSON value lands in exactly one variant.
/// Mappings keep their source order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<Value>),
    Nested(IndexMap<String, FieldValue>),
    /// Numbers, booleans and nulls nested inside a mapping.
    Other(Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Non-empty string labels carried by a single-or-list field.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(text) if !text.is_empty() => vec![text.as_str()],
            FieldValue::List(items) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Number of individual variant forms under this value.
    ///
    /// A bare string is one form, each renderable item of a list is one form,
    /// and a mapping sums its children.
    pub fn leaf_count(&self) -> usize {
        match self {
            FieldValue::Text(_) => 1,
            FieldValue::List(items) => items.iter().filter_map(scalar_text).count(),
            FieldValue::Nested(children) => children.values().map(FieldValue::leaf_count).sum(),
            FieldValue::Other(_) => 0,
        }
    }
}

/// Render a list item as text; strings, numbers and booleans only.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One dictionary entry as authored in the source dataset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalRecord {
    #[serde(rename = "lema", default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<FieldValue>,
    #[serde(
        rename = "categoria_gramatical",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<FieldValue>,
    #[serde(
        rename = "campo_semantico",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub semantic_field: Option<FieldValue>,
    #[serde(rename = "definicion", default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<FieldValue>,
    #[serde(rename = "sinonimos", default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<FieldValue>,
    #[serde(
        rename = "variantes_dialectales",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dialect_variants: Option<FieldValue>,
    /// Every other key, untouched.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl LexicalRecord {
    /// Headword as authored, or `""` when missing or not a string.
    pub fn lemma_text(&self) -> &str {
        self.lemma
            .as_ref()
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    pub fn categories(&self) -> Vec<&str> {
        self.category
            .as_ref()
            .map(FieldValue::labels)
            .unwrap_or_default()
    }

    pub fn semantic_fields(&self) -> Vec<&str> {
        self.semantic_field
            .as_ref()
            .map(FieldValue::labels)
            .unwrap_or_default()
    }

    pub fn definition_text(&self) -> Option<&str> {
        self.definition.as_ref().and_then(FieldValue::as_text)
    }

    /// Synonym strings; a bare string counts as a single synonym.
    pub fn synonym_list(&self) -> Vec<&str> {
        match &self.synonyms {
            Some(FieldValue::Text(text)) => vec![text.as_str()],
            Some(FieldValue::List(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Raw sequence sizes per direction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub forward: usize,
    pub reverse: usize,
    pub total: usize,
}

impl Counts {
    pub fn new(forward: usize, reverse: usize) -> Self {
        Self {
            forward,
            reverse,
            total: forward + reverse,
        }
    }
}

/// Aggregate figures over both datasets.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub counts: Counts,
    pub category_count: usize,
    pub field_count: usize,
    /// Dialectal-variant forms across every record in both directions.
    pub variant_entries: usize,
    pub synonym_entries: usize,
    pub categories: Vec<String>,
    pub fields: Vec<String>,
}
