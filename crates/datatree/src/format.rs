//! Display strings for node values, with a truncation policy.

use chrono::SecondsFormat;

use crate::types::{FormattedValue, TypeTag};
use crate::value::{CIRCULAR_MARKER, Value};

/// Default display length before text is shortened.
pub const DEFAULT_TRUNCATE_AT: usize = 75;

/// Appended to text that was shortened.
pub const ELLIPSIS: &str = "...";

/// Options controlling how node values are rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum length, in characters, before the `truncated` form is produced.
    pub truncate_at: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            truncate_at: DEFAULT_TRUNCATE_AT,
        }
    }
}

/// Result of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub value: String,
    pub truncated: bool,
}

/// Shorten `s` to `limit` characters plus [`ELLIPSIS`] when it is longer.
///
/// Empty input is never shortened.
///
/// ```
/// use datatree::v1::format::truncate;
///
/// let long = truncate(&"x".repeat(100), 75);
/// assert!(long.truncated);
/// assert_eq!(long.value.chars().count(), 78);
///
/// let short = truncate("short", 75);
/// assert!(!short.truncated);
/// assert_eq!(short.value, "short");
/// ```
pub fn truncate(s: &str, limit: usize) -> Truncation {
    if s.is_empty() || s.chars().count() <= limit {
        return Truncation {
            value: s.to_string(),
            truncated: false,
        };
    }

    let mut value: String = s.chars().take(limit).collect();
    value.push_str(ELLIPSIS);
    Truncation {
        value,
        truncated: true,
    }
}

/// Format `value` as a node of type `tag` using default options.
pub fn format_value(value: &Value, tag: TypeTag) -> FormattedValue {
    format_value_with(value, tag, &FormatOptions::default())
}

/// Format `value` as a node of type `tag`.
///
/// Dates, floats, images and the circular marker are never shortened;
/// every other tag gets a `truncated` form once it exceeds
/// [`FormatOptions::truncate_at`].
pub fn format_value_with(value: &Value, tag: TypeTag, options: &FormatOptions) -> FormattedValue {
    match tag {
        TypeTag::Date => FormattedValue::untruncated(match value {
            Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            _ => String::new(),
        }),
        TypeTag::Float => FormattedValue::untruncated(match value.as_f64() {
            Some(n) => to_fixed_2(n),
            None => "Invalid Number".to_string(),
        }),
        TypeTag::Array | TypeTag::Object => shorten(value.to_json().to_string(), options),
        TypeTag::Image => FormattedValue::untruncated(display_string(value)),
        TypeTag::Circular => FormattedValue::untruncated(CIRCULAR_MARKER),
        TypeTag::String
        | TypeTag::Number
        | TypeTag::Integer
        | TypeTag::Boolean
        | TypeTag::Null
        | TypeTag::Undefined
        | TypeTag::Function
        | TypeTag::Symbol
        | TypeTag::BigInt
        | TypeTag::RegExp
        | TypeTag::Error
        | TypeTag::Unknown => shorten(display_string(value), options),
    }
}

fn shorten(raw: String, options: &FormatOptions) -> FormattedValue {
    let t = truncate(&raw, options.truncate_at);
    FormattedValue {
        truncated: t.truncated.then_some(t.value),
        raw,
    }
}

/// Plain string coercion of a value.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) | Value::Opaque(s) | Value::Function(s) => s.clone(),
        Value::BigInt(i) => i.to_string(),
        Value::Symbol(desc) => format!("Symbol({})", desc.as_deref().unwrap_or("")),
        Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        Value::RegExp { source, flags } => format!("/{}/{}", source, flags),
        Value::Error { name, message } if message.is_empty() => name.clone(),
        Value::Error { name, message } => format!("{}: {}", name, message),
        Value::Array(_) | Value::Object(_) => value.to_json().to_string(),
    }
}

/// Shortest round-trip rendering; exponent form outside `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Two fixed decimals; magnitudes of 1e21 and above fall back to
/// [`number_to_string`].
pub fn to_fixed_2(n: f64) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return number_to_string(n);
    }

    // Thirty places expose the exact binary value well past any tie at the
    // third place; ties then round away from zero.
    let exact = format!("{:.30}", n.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac_part.as_bytes();
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.iter().copied().take(2))
        .collect();

    if frac.get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let (whole, cents) = digits.split_at(digits.len() - 2);
    format!(
        "{}{}.{}",
        if n < 0.0 { "-" } else { "" },
        String::from_utf8_lossy(whole),
        String::from_utf8_lossy(cents)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_truncate() {
        let t = truncate(&"x".repeat(100), 75);
        assert!(t.truncated);
        assert_eq!(t.value.len(), 78);
        assert!(t.value.ends_with("..."));

        assert_eq!(
            truncate("short", 75),
            Truncation {
                value: "short".into(),
                truncated: false
            }
        );
        assert!(!truncate("", 0).truncated);
        assert!(!truncate(&"y".repeat(75), 75).truncated);
        assert!(truncate(&"y".repeat(76), 75).truncated);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let t = truncate(&"é".repeat(80), 75);
        assert!(t.truncated);
        assert_eq!(t.value.chars().count(), 78);
    }

    #[test]
    fn test_format_date() {
        let d = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let f = format_value(&Value::Date(d), TypeTag::Date);
        assert_eq!(f.raw, "2024-01-02T03:04:05.000Z");
        assert!(f.truncated.is_none());
        assert_eq!(format_value(&Value::Null, TypeTag::Date).raw, "");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_value(&Value::from(7.5), TypeTag::Float).raw, "7.50");
        assert_eq!(format_value(&Value::from(-0.256), TypeTag::Float).raw, "-0.26");
        assert_eq!(format_value(&Value::from(1.0 / 3.0), TypeTag::Float).raw, "0.33");
        assert_eq!(format_value(&Value::Number(f64::NAN), TypeTag::Float).raw, "NaN");
        assert_eq!(
            format_value(&Value::Number(f64::NEG_INFINITY), TypeTag::Float).raw,
            "-Infinity"
        );
        assert_eq!(
            format_value(&Value::from("abc"), TypeTag::Float).raw,
            "Invalid Number"
        );
    }

    #[test]
    fn test_format_containers_as_json() {
        let value = Value::object([("a", Value::array([1, 2])), ("b", Value::from("x"))]);
        let f = format_value(&value, TypeTag::Object);
        assert_eq!(f.raw, r#"{"a":[1,2],"b":"x"}"#);
        assert!(f.truncated.is_none());

        let long = Value::array((0..40).map(|i| Value::from(i)));
        let f = format_value(&long, TypeTag::Array);
        let truncated = f.truncated.unwrap();
        assert_eq!(truncated.chars().count(), 78);
        assert!(f.raw.starts_with(&truncated[..75]));
    }

    #[test]
    fn test_format_image_is_never_truncated() {
        let data = format!("data:image/png;base64,{}", "A".repeat(500));
        let f = format_value(&Value::from(data.as_str()), TypeTag::Image);
        assert_eq!(f.raw, data);
        assert!(f.truncated.is_none());
    }

    #[test]
    fn test_format_default_coercions() {
        assert_eq!(format_value(&Value::from(7), TypeTag::Integer).raw, "7");
        assert_eq!(format_value(&Value::Bool(true), TypeTag::Boolean).raw, "true");
        assert_eq!(format_value(&Value::Null, TypeTag::Null).raw, "null");
        assert_eq!(format_value(&Value::Undefined, TypeTag::Undefined).raw, "undefined");
        assert_eq!(format_value(&Value::BigInt(-42), TypeTag::BigInt).raw, "-42");
        assert_eq!(
            format_value(&Value::Symbol(Some("tag".into())), TypeTag::Symbol).raw,
            "Symbol(tag)"
        );
        assert_eq!(format_value(&Value::regexp("a+b", "gi"), TypeTag::RegExp).raw, "/a+b/gi");
        assert_eq!(
            format_value(&Value::error("TypeError", "x is undefined"), TypeTag::Error).raw,
            "TypeError: x is undefined"
        );
        assert_eq!(format_value(&Value::error("Error", ""), TypeTag::Error).raw, "Error");
        assert_eq!(format_value(&Value::from("123"), TypeTag::Number).raw, "123");
    }

    #[test]
    fn test_format_long_string_truncates() {
        let long = "word ".repeat(30);
        let f = format_value(&Value::from(long.as_str()), TypeTag::String);
        assert_eq!(f.raw, long);
        assert_eq!(f.truncated.as_deref().map(|s| s.chars().count()), Some(78));
    }

    #[test]
    fn test_format_respects_options() {
        let options = FormatOptions { truncate_at: 3 };
        let f = format_value_with(&Value::from("abcdef"), TypeTag::String, &options);
        assert_eq!(f.truncated.as_deref(), Some("abc..."));
    }

    #[test]
    fn test_format_circular_marker() {
        let f = format_value(&Value::Null, TypeTag::Circular);
        assert_eq!(f.raw, CIRCULAR_MARKER);
        assert!(f.truncated.is_none());
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(7.0), "7");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(123456.789), "123456.789");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_to_fixed_2() {
        assert_eq!(to_fixed_2(-0.0), "0.00");
        assert_eq!(to_fixed_2(2.0), "2.00");
        assert_eq!(to_fixed_2(1e21), "1e+21");
        assert_eq!(to_fixed_2(1.005), "1.00");
        assert_eq!(to_fixed_2(9.999), "10.00");
        assert_eq!(to_fixed_2(-3.14159), "-3.14");
    }

    #[test]
    fn test_to_fixed_2_rounds_ties_away_from_zero() {
        assert_eq!(to_fixed_2(0.125), "0.13");
        assert_eq!(to_fixed_2(-0.125), "-0.13");
        assert_eq!(to_fixed_2(2.375), "2.38");
        assert_eq!(to_fixed_2(0.995), "0.99");
        assert_eq!(to_fixed_2(-0.001), "-0.00");
    }
}
