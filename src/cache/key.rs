//! Cache Key Module
//!
//! Deterministic cache-key derivation from a resource identifier and a set
//! of scalar parameters.

use std::collections::BTreeMap;

use serde::Serialize;

// == Param Value ==
/// A scalar parameter value usable in a cache key.
///
/// Keys may only be derived from scalars; nested structures are
/// unrepresentable here on purpose, since silently flattening them would
/// invite key collisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating-point number (must be finite)
    Float(f64),
    /// String value
    Str(String),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

// == Generate Key ==
/// Derives a deterministic cache key from a resource and its parameters.
///
/// Parameters are sorted by name before serialization, so parameter order
/// never affects the result. Duplicate names keep the last occurrence.
/// Distinct parameter sets produce distinct keys because the encoding is
/// canonical JSON of the sorted map.
///
/// # Panics
/// Panics on non-finite floats (`NaN`, infinities). A malformed key input is
/// a programmer error; a loud failure beats a silent key collision.
pub fn generate_key(resource: &str, params: &[(&str, ParamValue)]) -> String {
    if params.is_empty() {
        return resource.to_string();
    }

    for (name, value) in params {
        if let ParamValue::Float(f) = value {
            assert!(
                f.is_finite(),
                "cache-key params must be finite scalars: parameter '{name}' is {f}"
            );
        }
    }

    let sorted: BTreeMap<&str, &ParamValue> =
        params.iter().map(|(name, value)| (*name, value)).collect();
    let encoded = serde_json::to_string(&sorted).expect("scalar params always serialize");

    format!("{resource}?{encoded}")
}
