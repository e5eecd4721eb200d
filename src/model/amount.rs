use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A money value read from a loosely typed row.
///
/// Anything that is not a JSON number (strings, null, objects) reads as zero,
/// so a malformed amount never aborts an aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Value> for Amount {
    fn from(value: Value) -> Self {
        Amount(value.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

/// A related row embedded through a foreign key (`category:categories(name)`).
///
/// Many-to-one embeds arrive as a single object, but some API versions wrap
/// them in a one-element array; both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Embedded<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Embedded::One(item) => Some(item),
            Embedded::Many(items) => items.first(),
        }
    }
}

/// The `name` column of an embedded category, customer or supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Name of an embedded relation; missing, null and empty names all read as absent
pub fn embedded_name(relation: &Option<Embedded<NameRef>>) -> Option<&str> {
    relation
        .as_ref()
        .and_then(Embedded::first)
        .and_then(|r| r.name.as_deref())
        .filter(|name| !name.is_empty())
}
