use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single displayable unit taken from a credential or a proof request:
/// either a disclosed attribute value or a requested predicate.
///
/// Fields are deliberately loose — any member may be missing — because they
/// are assembled from several upstream shapes (stored credentials, proof
/// request templates, shared proof data) that populate different subsets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    Attribute(Attribute),
    Predicate(Predicate),
}

impl Field {
    /// The raw attribute key, `None` when the source never carried one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Field::Attribute(attr) => attr.name.as_deref(),
            Field::Predicate(pred) => pred.name.as_deref(),
        }
    }

    /// The label as declared by the source, before any overlay override.
    pub fn label(&self) -> Option<&str> {
        match self {
            Field::Attribute(attr) => attr.label.as_deref(),
            Field::Predicate(pred) => pred.label.as_deref(),
        }
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, Field::Predicate(_))
    }
}

/// A plain disclosed attribute.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub has_error: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: Some(name.into()),
            label: None,
            value,
            has_error: false,
        }
    }
}

/// A requested comparison over an attribute (e.g. `age >= 18`) rather than a
/// disclosed value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Predicate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Comparison operator, e.g. `>=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_type: Option<String>,
    /// Comparison threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<Value>,
    /// Explicit disclosed value. Rare: most predicates disclose only the
    /// comparison result, not the underlying datum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfied: Option<bool>,
}
