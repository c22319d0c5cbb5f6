//! Per-request context handed to action handlers.
//!
//! - [`Loaded`]: records attached by the load chain, keyed by id parameter
//! - [`Params`]: the matched path parameters in path order

use std::any::Any;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use axum::{
    extract::{rejection::RawPathParamsRejection, FromRequestParts, RawPathParams},
    http::request::Parts,
};

use crate::dispatch::loader::Record;

/// Records loaded for the current request.
///
/// Stored as a request extension by the load chain; extract it in a handler
/// and read records with [`Loaded::get`]. Extraction never fails: a request
/// that ran no loaders yields an empty context.
#[derive(Clone, Default)]
pub struct Loaded {
    records: HashMap<String, Record>,
}

impl Loaded {
    /// The record stored under `key`, if present and of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.records
            .get(key)
            .and_then(|record| record.downcast_ref::<T>())
    }

    /// The type-erased record stored under `key`.
    pub fn record(&self, key: &str) -> Option<Record> {
        self.records.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, record: Record) {
        self.records.insert(key.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Debug for Loaded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.records.keys().collect();
        keys.sort();
        f.debug_struct("Loaded").field("keys", &keys).finish()
    }
}

impl<S> FromRequestParts<S> for Loaded
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Loaded>().cloned().unwrap_or_default())
    }
}

/// Path parameters of the matched route, in path order, under the names
/// they were declared with.
///
/// Nested routes may repeat a parameter name (two ancestors both using
/// `id`); [`Params::get`] returns the innermost value and [`Params::nth`]
/// addresses a position directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// The same values under `names`, position by position. Values beyond
    /// the end of `names` keep their current name.
    pub fn renamed(self, names: &[String]) -> Self {
        Self(
            self.0
                .into_iter()
                .enumerate()
                .map(|(i, (key, value))| match names.get(i) {
                    Some(name) => (name.clone(), value),
                    None => (key, value),
                })
                .collect(),
        )
    }

    /// The innermost value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The value at position `index`.
    pub fn nth(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequestParts<S> for Params
where
    S: Send + Sync,
{
    type Rejection = RawPathParamsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(params) = parts.extensions.get::<Params>() {
            return Ok(params.clone());
        }
        match RawPathParams::from_request_parts(parts, state).await {
            Ok(raw) => Ok(Self(
                raw.iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            )),
            Err(RawPathParamsRejection::MissingPathParams(_)) => Ok(Self::default()),
            Err(rejection) => Err(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_loaded_typed_access() {
        let mut loaded = Loaded::default();
        loaded.insert("forum", Arc::new("Ferrets".to_string()));

        assert_eq!(loaded.get::<String>("forum").map(String::as_str), Some("Ferrets"));
        assert!(loaded.get::<u32>("forum").is_none());
        assert!(loaded.get::<String>("thread").is_none());
        assert!(loaded.contains("forum"));
        assert_eq!(loaded.len(), 1);
        assert_eq!(format!("{:?}", loaded), r#"Loaded { keys: ["forum"] }"#);
    }

    #[test]
    fn test_params_innermost_wins() {
        let params = Params::new(vec![
            ("id".into(), "5".into()),
            ("forum".into(), "12".into()),
            ("id".into(), "50".into()),
        ]);

        assert_eq!(params.get("id"), Some("50"));
        assert_eq!(params.get("forum"), Some("12"));
        assert_eq!(params.nth(0), Some("5"));
        assert_eq!(params.nth(3), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_params_renamed_by_position() {
        let params = Params::new(vec![("p0".into(), "5".into()), ("p1".into(), "7".into())])
            .renamed(&["user".to_string()]);

        assert_eq!(params.get("user"), Some("5"));
        assert_eq!(params.get("p1"), Some("7"));
        assert_eq!(params.get("p0"), None);
    }
}
