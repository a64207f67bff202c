use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized WHOIS record: field name to value.
pub type WhoisMap = BTreeMap<String, WhoisValue>;

/// A WHOIS field value after normalization.
///
/// Upstream WHOIS responses mix scalars, repeated fields, and
/// datetime-shaped strings. Everything is flattened to strings before
/// it lands here; repetition is modeled explicitly instead of being an
/// accident of serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhoisValue {
    /// A single stringified value
    Scalar(String),
    /// A repeated field (e.g. name servers, status codes)
    List(Vec<WhoisValue>),
}

impl WhoisValue {
    /// Returns the scalar string, or the first scalar of a list.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(items) => items.first().and_then(Self::as_scalar),
        }
    }

    /// Append a value, promoting a scalar to a list on the second hit.
    /// Duplicate scalar values are dropped.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Scalar(existing) => {
                if *existing != value {
                    let first = std::mem::take(existing);
                    *self = Self::List(vec![Self::Scalar(first), Self::Scalar(value)]);
                }
            }
            Self::List(items) => {
                if !items.iter().any(|v| v.as_scalar() == Some(value.as_str())) {
                    items.push(Self::Scalar(value));
                }
            }
        }
    }
}

impl From<&str> for WhoisValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}
