//! Ordered request parameters.

use crate::error::YobitError;

/// An ordered set of request parameters.
///
/// Insertion order is preserved exactly: the trade API recomputes the
/// signature over the bytes it receives, so the string that is signed and the
/// string that is sent must be produced from the same ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RequestParams::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter.
    ///
    /// An existing key keeps its position and has its value replaced; a new
    /// key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Get the value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters, including empty ones.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`.
    ///
    /// Parameters with an empty value are dropped; the exchange computes its
    /// signature the same way.
    pub fn to_query_string(&self) -> Result<String, YobitError> {
        let present: Vec<(&str, &str)> = self.iter().filter(|(_, v)| !v.is_empty()).collect();
        serde_urlencoded::to_string(&present).map_err(|e| YobitError::InvalidRequest(e.to_string()))
    }
}
