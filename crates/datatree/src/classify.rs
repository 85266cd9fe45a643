//! Mapping from runtime values to [`TypeTag`]s.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::TypeTag;
use crate::value::Value;

/// Prefix that marks an encoded image string.
pub const IMAGE_PREFIX: &str = "data:image/";

static NUMERIC_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("numeric pattern is valid"));

/// Classify a value. Total: every input maps to exactly one tag.
///
/// # Examples
///
/// ```
/// use datatree::v1::{classify, TypeTag, Value};
///
/// assert_eq!(classify(&Value::from(7)), TypeTag::Integer);
/// assert_eq!(classify(&Value::from(7.5)), TypeTag::Float);
/// assert_eq!(classify(&Value::from("123")), TypeTag::Number);
/// assert_eq!(classify(&Value::from("abc")), TypeTag::String);
/// ```
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Null,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Function(_) => TypeTag::Function,
        Value::Symbol(_) => TypeTag::Symbol,
        Value::BigInt(_) => TypeTag::BigInt,
        Value::Undefined => TypeTag::Undefined,
        Value::Number(n) => classify_number(*n),
        Value::String(s) => classify_string(s),
        Value::Array(_) => TypeTag::Array,
        Value::Date(_) => TypeTag::Date,
        Value::RegExp { .. } => TypeTag::RegExp,
        Value::Error { .. } => TypeTag::Error,
        Value::Object(_) => TypeTag::Object,
        Value::Opaque(_) => TypeTag::Unknown,
    }
}

// NaN and the infinities have no integral remainder, so they land on Float.
fn classify_number(n: f64) -> TypeTag {
    if n % 1.0 == 0.0 {
        TypeTag::Integer
    } else {
        TypeTag::Float
    }
}

fn classify_string(s: &str) -> TypeTag {
    if s.starts_with(IMAGE_PREFIX) {
        TypeTag::Image
    } else if is_numeric_string(s) {
        TypeTag::Number
    } else {
        TypeTag::String
    }
}

/// Digits with an optional fractional part, parsing to a finite number.
pub fn is_numeric_string(s: &str) -> bool {
    NUMERIC_STRING.is_match(s) && s.parse::<f64>().is_ok_and(f64::is_finite)
}
