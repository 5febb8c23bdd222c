/// Values and Rows
///
/// Driver-agnostic representation of bound parameters and fetched cells.
/// Each driver converts between its own value type and [`Value`].
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single bound parameter or fetched cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Parses a command-line argument into a parameter.
    ///
    /// `NULL` maps to [`Value::Null`], integers to [`Value::Int`], decimals
    /// (containing a `.`) to [`Value::Float`]; anything else stays text.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "NULL" {
            return Value::Null;
        }
        if let Ok(i) = arg.parse::<i64>() {
            return Value::Int(i);
        }
        if arg.contains('.') {
            if let Ok(f) = arg.parse::<f64>() {
                return Value::Float(f);
            }
        }
        Value::Text(arg.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Interprets the value as a signed integer.
    ///
    /// Text and byte values are parsed, since some drivers report numeric
    /// aggregates as strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            Value::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bytes(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "<BLOB: {} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One fetched row: column name to value, in result column order.
///
/// When a result carries the same column name twice (joins), the later
/// value replaces the earlier one and keeps the earlier position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Sets a column, overwriting an existing column of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_column_order() {
        let row: Row = vec![
            ("id", Value::Int(1)),
            ("name", Value::from("Alice")),
            ("qty", Value::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["id", "name", "qty"]);
        assert_eq!(row.get("name"), Some(&Value::Text("Alice".to_string())));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_duplicate_column_is_last_write_wins() {
        let mut row = Row::new();
        row.insert("id", Value::Int(1));
        row.insert("name", Value::from("left"));
        row.insert("id", Value::Int(2));

        assert_eq!(row.len(), 2);
        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.get("id"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_row_serializes_as_ordered_object() {
        let row: Row = vec![("b", Value::Int(2)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"b":2,"a":"x"}"#);
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(Value::from_arg("NULL"), Value::Null);
        assert_eq!(Value::from_arg("42"), Value::Int(42));
        assert_eq!(Value::from_arg("-7"), Value::Int(-7));
        assert_eq!(Value::from_arg("1.5"), Value::Float(1.5));
        assert_eq!(Value::from_arg("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::from_arg("bob"), Value::Text("bob".to_string()));
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Int(3).as_i64(), Some(3));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Text(" 12 ".to_string()).as_i64(), Some(12));
        assert_eq!(Value::Bytes(b"99".to_vec()).as_i64(), Some(99));
        assert_eq!(Value::Null.as_i64(), None);
        assert_eq!(Value::Float(4.0).as_i64(), Some(4));
        assert_eq!(Value::Float(1e30).as_i64(), None);
        assert_eq!(Value::Float(-1e30).as_i64(), None);
        assert_eq!(Value::Float(f64::NAN).as_i64(), None);
        assert_eq!(Value::Float(2.5).as_i64(), None);
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
