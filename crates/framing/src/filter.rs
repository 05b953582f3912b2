//! Attribute-based feature selection.
//!
//! Requested values arrive as strings (they come from a GUI list or a CLI
//! flag) while the attribute column has a native type, so each requested
//! value is coerced to the column's kind before comparison. The one hard
//! contract here: the filter never returns an empty collection. A filter
//! that matches nothing (or names a missing column) is discarded and the
//! full input is returned with a reported fallback, because a blank map is
//! a worse failure than an unfiltered one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use formats::FeatureCollection;

use crate::diagnostics::{Diagnostics, Warning};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub attribute: String,
    pub values: Vec<String>,
}

/// Native type of an attribute column, inferred from its values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
enum CoercedValue {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub collection: FeatureCollection,
    /// Indices into the input collection of the kept features. Covers the
    /// whole input when the fallback fired, so parallel copies of the same
    /// dataset can be subset consistently.
    pub kept: Vec<usize>,
    pub fell_back: bool,
    pub matched: usize,
}

pub fn apply(
    collection: &FeatureCollection,
    spec: &FilterSpec,
    diagnostics: &mut Diagnostics,
) -> FilterOutcome {
    let kind = column_kind(collection, &spec.attribute);

    let kept: Vec<usize> = match kind {
        None => Vec::new(), // missing column: treated exactly like zero matches
        Some(kind) => {
            let wanted: Vec<CoercedValue> =
                spec.values.iter().map(|v| coerce(v, kind)).collect();
            collection
                .features
                .iter()
                .enumerate()
                .filter(|(_, feature)| {
                    feature
                        .attribute(&spec.attribute)
                        .map(|value| wanted.iter().any(|w| value_matches(value, w)))
                        .unwrap_or(false)
                })
                .map(|(i, _)| i)
                .collect()
        }
    };

    if kept.is_empty() {
        diagnostics.push(Warning::FilterFallback {
            attribute: spec.attribute.clone(),
            requested: spec.values.len(),
        });
        return FilterOutcome {
            collection: collection.clone(),
            kept: (0..collection.len()).collect(),
            fell_back: true,
            matched: 0,
        };
    }

    let features = kept
        .iter()
        .map(|&i| collection.features[i].clone())
        .collect();
    let matched = kept.len();
    FilterOutcome {
        collection: FeatureCollection::new(collection.crs, features),
        kept,
        fell_back: false,
        matched,
    }
}

/// Scans the column's non-null values: all integers → Integer, any other
/// number → Float, anything else → Text. `None` when the column never
/// appears.
fn column_kind(collection: &FeatureCollection, attribute: &str) -> Option<ColumnKind> {
    let mut kind: Option<ColumnKind> = None;
    for feature in &collection.features {
        let value = match feature.attribute(attribute) {
            Some(Value::Null) | None => continue,
            Some(v) => v,
        };
        let this = match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => ColumnKind::Integer,
            Value::Number(_) => ColumnKind::Float,
            _ => ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(ColumnKind::Integer), ColumnKind::Float)
            | (Some(ColumnKind::Float), ColumnKind::Integer) => ColumnKind::Float,
            (Some(k), t) if k == t => k,
            _ => ColumnKind::Text,
        });
    }
    kind
}

/// Integer columns parse through float first so "12.0" matches 12; a value
/// that will not coerce is kept as text rather than dropped.
fn coerce(raw: &str, kind: ColumnKind) -> CoercedValue {
    match kind {
        ColumnKind::Integer => match raw.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => CoercedValue::Int(f as i64),
            _ => CoercedValue::Text(raw.to_string()),
        },
        ColumnKind::Float => match raw.trim().parse::<f64>() {
            Ok(f) => CoercedValue::Float(f),
            Err(_) => CoercedValue::Text(raw.to_string()),
        },
        ColumnKind::Text => CoercedValue::Text(raw.to_string()),
    }
}

fn value_matches(value: &Value, wanted: &CoercedValue) -> bool {
    match wanted {
        CoercedValue::Int(i) => value.as_i64() == Some(*i),
        CoercedValue::Float(f) => value.as_f64() == Some(*f),
        CoercedValue::Text(s) => match value {
            Value::String(v) => v == s,
            Value::Number(n) => n.to_string() == *s,
            Value::Bool(b) => b.to_string() == *s,
            _ => false,
        },
    }
}
