use std::collections::BTreeMap;

use crate::Value;

/// Request parameter mapping, kept sorted by key.
///
/// Absent values may be inserted as [`Value::Null`] (or `None`); they are
/// dropped before the payload is encoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true when `key` is present with a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Drops null entries and turns integral floats into integers.
    pub fn cleaned(self) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, value.normalized()))
                .collect(),
        )
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Params, Value};

    #[test]
    fn builder_replaces_duplicate_keys() {
        let params = Params::new().with("symbol", "ETHUSDT").with("symbol", "BTCUSDT");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("symbol"), Some(&Value::text("BTCUSDT")));
    }

    #[test]
    fn cleaned_drops_nulls_and_fixes_floats() {
        let params = Params::from([
            ("limit", Value::float(50.0)),
            ("cursor", Value::Null),
            ("qty", Value::float(0.5)),
        ])
        .cleaned();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("limit"), Some(&Value::Integer(50)));
        assert_eq!(params.get("qty"), Some(&Value::Float(0.5)));
        assert!(!params.contains("cursor"));
    }

    #[test]
    fn contains_ignores_null_values() {
        let params = Params::new().with("orderId", None::<String>);
        assert!(!params.contains("orderId"));
    }
}
