use serde_json::Value;

use formats::FeatureCollection;

/// Default palette for subdivision coloring.
pub const BASE_PALETTE: [&str; 15] = [
    "#E74C3C", // Red
    "#3498DB", // Blue
    "#2ECC71", // Green
    "#F39C12", // Orange
    "#9B59B6", // Purple
    "#1ABC9C", // Turquoise
    "#E67E22", // Carrot
    "#34495E", // Wet Asphalt
    "#F1C40F", // Yellow
    "#E91E63", // Pink
    "#00BCD4", // Cyan
    "#4CAF50", // Light Green
    "#FF9800", // Amber
    "#795548", // Brown
    "#607D8B", // Blue Grey
];

/// Extended palette used when coloring by an explicitly selected attribute,
/// where more distinct values are expected.
pub const ENHANCED_PALETTE: [&str; 20] = [
    "#E74C3C", // Bright Red
    "#3498DB", // Bright Blue
    "#2ECC71", // Bright Green
    "#F39C12", // Bright Orange
    "#9B59B6", // Purple
    "#1ABC9C", // Turquoise
    "#E67E22", // Carrot Orange
    "#34495E", // Dark Blue Grey
    "#F1C40F", // Yellow
    "#E91E63", // Pink
    "#00BCD4", // Cyan
    "#4CAF50", // Light Green
    "#FF9800", // Amber
    "#795548", // Brown
    "#607D8B", // Blue Grey
    "#FF5722", // Deep Orange
    "#673AB7", // Deep Purple
    "#009688", // Teal
    "#8BC34A", // Light Green
    "#FFEB3B", // Bright Yellow
];

/// Deterministic attribute value → color mapping.
///
/// The i-th unique value (first-seen order) gets `palette[i % len]`, so a
/// fixed value order always produces the same legend, and re-filtering to an
/// order-preserving subset keeps each value's color stable. With more values
/// than colors the palette cycles; `cycled()` reports that.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    entries: Vec<(String, &'static str)>,
    cycled: bool,
}

impl ColorAssignment {
    pub fn assign(values: &[String], palette: &'static [&'static str]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, value)| (value.clone(), palette[i % palette.len()]))
            .collect::<Vec<_>>();
        ColorAssignment {
            entries,
            cycled: values.len() > palette.len(),
        }
    }

    /// Colors the unique values of `attribute` across a collection.
    pub fn for_attribute(
        collection: &FeatureCollection,
        attribute: &str,
        palette: &'static [&'static str],
    ) -> Self {
        Self::assign(&unique_attribute_values(collection, attribute), palette)
    }

    pub fn color_of(&self, value: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, c)| *c)
    }

    /// Legend entries in assignment order.
    pub fn entries(&self) -> &[(String, &'static str)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cycled(&self) -> bool {
        self.cycled
    }
}

/// Unique values of `attribute` in first-seen feature order. Null and
/// missing values are skipped; numbers use their canonical decimal form so
/// legend keys stay stable across int/float columns.
pub fn unique_attribute_values(collection: &FeatureCollection, attribute: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for feature in &collection.features {
        let Some(value) = feature.attribute(attribute) else {
            continue;
        };
        let Some(key) = attribute_key(value) else {
            continue;
        };
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

/// Canonical display/legend form of an attribute value.
pub fn attribute_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// `#RRGGBB` → straight-alpha RGBA for renderer fills.
pub fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some([
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        1.0,
    ])
}
