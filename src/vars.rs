//! Variable sets handed to the template engine.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Mapping of variable name to structured value.
///
/// Never mutated once handed to a conversion; [`VariableSet::merge`] builds a
/// new set instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableSet(Map<String, Value>);

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Right-biased shallow merge: keys in `overlay` win.
    pub fn merge(&self, overlay: &VariableSet) -> VariableSet {
        let mut merged = self.0.clone();
        merged.extend(overlay.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        VariableSet(merged)
    }

    /// `Some` only if `value` is an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn from_toml(table: toml::Table) -> Self {
        Self(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Convert a TOML value into the engine's value model.
///
/// Datetimes have no counterpart and become their RFC 3339 string, and so do
/// `inf` and `nan`, which a JSON number cannot hold.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

/// Parse a `key=value` assignment.
///
/// The value is read as a TOML inline value when it parses as one (`3`,
/// `true`, `[1, 2]`, `"quoted"`); anything else, including the non-finite
/// floats `inf` and `nan`, is kept as a literal string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{raw}'"));
    }

    let parsed = toml::from_str::<toml::Table>(&format!("v = {value}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .filter(|v| !matches!(v, toml::Value::Float(f) if !f.is_finite()))
        .map(toml_to_json)
        .unwrap_or_else(|| Value::String(value.to_owned()));

    Ok((key.to_owned(), parsed))
}
