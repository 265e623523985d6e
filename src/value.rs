//! Contains the `JsonValue` enum, the native Rust value a parse produces.
//!
//! This module also includes the "stringify" logic for writing a
//! `JsonValue` back out as JSON text.
use indexmap::IndexMap;
use std::fmt;

/// An insertion-ordered JSON object.
pub type JsonObject = IndexMap<String, JsonValue>;

/// A native Rust representation of a JSON value.
///
/// Strings hold the raw text found between the quotes in the source, so
/// escape sequences such as `\"` or `\n` are kept as written.
#[derive(Debug, PartialEq, Clone)]
pub enum JsonValue {
    /// Represents a JSON `null`.
    Null,
    /// Represents a JSON `true` or `false`.
    Boolean(bool),
    /// Represents a JSON number.
    Number(f64),
    /// Represents a JSON string, escapes not decoded.
    String(String),
    /// Represents a JSON array (list).
    Array(Vec<JsonValue>),
    /// Represents a JSON object, in source order.
    Object(JsonObject),
}

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Looks up element `index` if this is an array.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        self.as_array().and_then(|a| a.get(index))
    }
}

impl JsonValue {
    /// Serializes the `JsonValue` into a compact, minified JSON string.
    ///
    /// String contents are written between quotes as-is; a parsed value
    /// therefore renders its escapes exactly as they appeared in the source.
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains `f64::NAN` or `f64::INFINITY`.
    pub fn stringify(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();
        Self::write_value(self, &mut output)?;
        Ok(output)
    }

    /// Recursive helper function to write any `JsonValue` to a string buffer.
    fn write_value<W: fmt::Write>(value: &JsonValue, w: &mut W) -> fmt::Result {
        match value {
            JsonValue::Null => w.write_str("null"),
            JsonValue::Boolean(b) => w.write_str(if *b { "true" } else { "false" }),
            JsonValue::Number(n) => Self::write_number(*n, w),
            JsonValue::String(s) => Self::write_string(s, w),
            JsonValue::Array(a) => Self::write_array(a, w),
            JsonValue::Object(o) => Self::write_object(o, w),
        }
    }

    // NaN and infinities have no JSON spelling.
    fn write_number<W: fmt::Write>(n: f64, w: &mut W) -> fmt::Result {
        if !n.is_finite() {
            return Err(fmt::Error);
        }
        write!(w, "{}", n)
    }

    fn write_string<W: fmt::Write>(s: &str, w: &mut W) -> fmt::Result {
        w.write_char('"')?;
        w.write_str(s)?;
        w.write_char('"')
    }

    fn write_array<W: fmt::Write>(arr: &[JsonValue], w: &mut W) -> fmt::Result {
        w.write_char('[')?;
        let mut first = true;
        for val in arr {
            if !first {
                w.write_char(',')?;
            }
            Self::write_value(val, w)?;
            first = false;
        }
        w.write_char(']')
    }

    fn write_object<W: fmt::Write>(obj: &JsonObject, w: &mut W) -> fmt::Result {
        w.write_char('{')?;
        let mut first = true;
        for (key, val) in obj {
            if !first {
                w.write_char(',')?;
            }
            Self::write_string(key, w)?;
            w.write_char(':')?;
            Self::write_value(val, w)?;
            first = false;
        }
        w.write_char('}')
    }

    // --- Pretty-Printing Logic ---
    /// The indentation string to use for pretty-printing (two spaces).
    const INDENT: &'static str = "  ";

    /// Serializes the `JsonValue` into a human-readable, indented JSON string.
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains `f64::NAN` or `f64::INFINITY`.
    pub fn stringify_pretty(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();
        Self::write_value_pretty(self, &mut output, 0)?;
        Ok(output)
    }

    fn write_value_pretty<W: fmt::Write>(
        value: &JsonValue,
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        match value {
            JsonValue::Array(a) => Self::write_array_pretty(a, w, depth),
            JsonValue::Object(o) => Self::write_object_pretty(o, w, depth),
            scalar => Self::write_value(scalar, w),
        }
    }

    fn write_array_pretty<W: fmt::Write>(
        arr: &[JsonValue],
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        if arr.is_empty() {
            return w.write_str("[]");
        }

        let indent = Self::INDENT.repeat(depth + 1);
        w.write_str("[\n")?;
        let mut first = true;
        for val in arr {
            if !first {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_value_pretty(val, w, depth + 1)?;
            first = false;
        }
        write!(w, "\n{}]", Self::INDENT.repeat(depth))
    }

    fn write_object_pretty<W: fmt::Write>(
        obj: &JsonObject,
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        if obj.is_empty() {
            return w.write_str("{}");
        }

        let indent = Self::INDENT.repeat(depth + 1);
        w.write_str("{\n")?;
        let mut first = true;
        for (key, val) in obj {
            if !first {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_string(key, w)?;
            w.write_str(": ")?;
            Self::write_value_pretty(val, w, depth + 1)?;
            first = false;
        }
        write!(w, "\n{}}}", Self::INDENT.repeat(depth))
    }
}

/// Writes compact JSON, like `stringify`.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_value(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: Vec<(&str, JsonValue)>) -> JsonValue {
        JsonValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_accessors() {
        let value = object(vec![
            ("n", JsonValue::Null),
            ("b", JsonValue::Boolean(true)),
            ("x", JsonValue::Number(-0.5)),
            ("s", JsonValue::String("hi".to_string())),
            ("a", JsonValue::Array(vec![JsonValue::Number(1.0)])),
        ]);
        assert!(value.get("n").unwrap().is_null());
        assert_eq!(value.get("b").and_then(JsonValue::as_bool), Some(true));
        assert_eq!(value.get("x").and_then(JsonValue::as_f64), Some(-0.5));
        assert_eq!(value.get("s").and_then(JsonValue::as_str), Some("hi"));
        assert_eq!(
            value.get("a").and_then(|a| a.get_index(0)),
            Some(&JsonValue::Number(1.0))
        );
        assert_eq!(value.get("missing"), None);
        assert_eq!(JsonValue::Null.get("n"), None);
    }

    #[test]
    fn test_stringify_all_types() {
        assert_eq!(JsonValue::Null.stringify().unwrap(), "null");
        assert_eq!(JsonValue::Boolean(false).stringify().unwrap(), "false");
        assert_eq!(JsonValue::Number(123.45).stringify().unwrap(), "123.45");
        assert_eq!(JsonValue::Number(-11111111111.0).stringify().unwrap(), "-11111111111");
        assert_eq!(JsonValue::Array(vec![]).stringify().unwrap(), "[]");
        assert_eq!(JsonValue::Object(JsonObject::new()).stringify().unwrap(), "{}");

        let value = object(vec![
            ("b", JsonValue::Array(vec![JsonValue::Number(1.0), JsonValue::Null])),
            ("a", JsonValue::String("x".to_string())),
        ]);
        // Insertion order, not alphabetical.
        assert_eq!(value.stringify().unwrap(), r#"{"b":[1,null],"a":"x"}"#);
        assert_eq!(value.to_string(), r#"{"b":[1,null],"a":"x"}"#);
    }

    #[test]
    fn test_stringify_writes_strings_verbatim() {
        let s = JsonValue::String(r#"give a quote \"here\""#.to_string());
        assert_eq!(s.stringify().unwrap(), r#""give a quote \"here\"""#);
    }

    #[test]
    fn test_stringify_rejects_non_finite() {
        assert!(JsonValue::Number(f64::NAN).stringify().is_err());
        assert!(JsonValue::Array(vec![JsonValue::Number(f64::INFINITY)])
            .stringify_pretty()
            .is_err());
    }

    #[test]
    fn test_stringify_pretty_print() {
        let value = object(vec![
            ("key", JsonValue::String("value".to_string())),
            (
                "items",
                JsonValue::Array(vec![
                    JsonValue::Number(1.0),
                    object(vec![("sub_key", JsonValue::Number(2.0))]),
                    JsonValue::Array(vec![]),
                ]),
            ),
        ]);
        let expected = r#"{
  "key": "value",
  "items": [
    1,
    {
      "sub_key": 2
    },
    []
  ]
}"#;
        assert_eq!(value.stringify_pretty().unwrap(), expected);
        assert_eq!(JsonValue::Object(JsonObject::new()).stringify_pretty().unwrap(), "{}");
    }
}
