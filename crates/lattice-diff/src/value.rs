// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property values as they appear on either side of a diff, and the rules for
//! turning one into display text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown when a value is missing or empty.
pub const PLACEHOLDER: &str = "-";

/// Sentinel the server uses for an explicitly null attribute.
pub const NULL_SENTINEL: &str = "NULL";

/// Primitive attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean attribute.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Non-integral number.
    Float(f64),
    /// Text attribute.
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One side of a property change: either a bare attribute value or a
/// reference to a peer object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WireValue")]
pub struct Value {
    /// Peer identifier, for relationship values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Schema kind of the peer (e.g. `IpamIPPrefix`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human label chosen by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    /// Raw attribute payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Scalar>,
}

/// Shapes the server sends for a value: bare scalars or peer objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Scalar(Scalar),
    Peer {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        kind: Option<String>,
        #[serde(default)]
        display_label: Option<String>,
        #[serde(default)]
        raw: Option<Scalar>,
    },
}

impl From<WireValue> for Value {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::Scalar(raw) => Value::scalar(raw),
            WireValue::Peer {
                id,
                kind,
                display_label,
                raw,
            } => Value {
                id,
                kind,
                display_label,
                raw,
            },
        }
    }
}

impl Value {
    /// Bare attribute value.
    pub fn scalar(raw: impl Into<Scalar>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Value with only a display label.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            display_label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Reference to a peer object.
    pub fn peer(id: impl Into<String>, kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind.into()),
            display_label: Some(label.into()),
            raw: None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// Resolve the text a UI shows for one side of a change.
///
/// Booleans render literally, the `"NULL"` sentinel and anything missing or
/// empty render as [`PLACEHOLDER`], otherwise the display label wins over the
/// raw payload.
///
/// Numbers render as-is, `0` included. Only missing or empty values fall back
/// to the placeholder.
pub fn display_value(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    match &value.raw {
        Some(Scalar::Bool(b)) => return b.to_string(),
        Some(Scalar::Text(t)) if t == NULL_SENTINEL => return PLACEHOLDER.to_string(),
        _ => {}
    }
    if let Some(label) = value.display_label.as_deref().filter(|l| !l.is_empty()) {
        return label.to_string();
    }
    match &value.raw {
        Some(Scalar::Text(t)) if t.is_empty() => PLACEHOLDER.to_string(),
        Some(raw) => raw.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Secondary descriptor attached to a displayed value that carries a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KindDescriptor {
    /// Schema kind name.
    pub kind: String,
}

impl fmt::Display for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind: {}", self.kind)
    }
}

/// Descriptor for `value`, only when it carries a non-empty kind.
pub fn kind_descriptor(value: Option<&Value>) -> Option<KindDescriptor> {
    value
        .and_then(|v| v.kind.as_deref())
        .filter(|k| !k.is_empty())
        .map(|kind| KindDescriptor {
            kind: kind.to_string(),
        })
}
