// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed parameter collection carrying protocol and format configuration.
//!
//! Parameters are unique by case-sensitive name. Setting an existing name
//! updates its value in place; merging layers one collection over another.
//! Plugins read only the names they recognise and ignore the rest.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::collection::{Collection, CollectionItem};
use crate::error::SplitterError;

/// Well-known parameter names understood by the bundled plugins.
pub mod names {
    /// Source URL handed to the filter.
    pub const URL: &str = "Url";

    pub const HTTP_URL: &str = "HttpUrl";
    pub const HTTP_REFERER: &str = "HttpReferer";
    pub const HTTP_USER_AGENT: &str = "HttpUserAgent";
    pub const HTTP_COOKIE: &str = "HttpCookie";
    pub const HTTP_VERSION: &str = "HttpVersion";
    pub const HTTP_IGNORE_CONTENT_LENGTH: &str = "HttpIgnoreContentLength";
    /// Milliseconds allowed for the first connection attempt.
    pub const HTTP_OPEN_CONNECTION_TIMEOUT: &str = "HttpOpenConnectionTimeout";
    /// Milliseconds to wait between connection attempts.
    pub const HTTP_OPEN_CONNECTION_SLEEP_TIME: &str = "HttpOpenConnectionSleepTime";
    pub const HTTP_TOTAL_REOPEN_CONNECTION_TIMEOUT: &str = "HttpTotalReopenConnectionTimeout";
    pub const HTTP_SERVER_AUTHENTICATE: &str = "HttpServerAuthenticate";
    pub const HTTP_SERVER_USER_NAME: &str = "HttpServerUserName";
    pub const HTTP_SERVER_PASSWORD: &str = "HttpServerPassword";

    /// Base URL that smooth-streaming fragment URLs are resolved against.
    pub const MSHS_BASE_URL: &str = "MshsBaseUrl";
    /// Smooth-streaming client manifest URL.
    pub const MSHS_MANIFEST: &str = "MshsManifest";
}

/// A parameter value: free text or a typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl ParameterValue {
    /// Interpret the value as an integer. Text is parsed after trimming.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(i) => Some(*i),
            ParameterValue::Text(s) => s.trim().parse().ok(),
            ParameterValue::Boolean(_) => None,
        }
    }

    /// Interpret the value as a flag. Integers are true when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Boolean(b) => Some(*b),
            ParameterValue::Integer(i) => Some(*i != 0),
            ParameterValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Text(s) => f.write_str(s),
            ParameterValue::Integer(i) => write!(f, "{i}"),
            ParameterValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        ParameterValue::Integer(i64::from(value))
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

/// A single named configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: ParameterValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }
}

impl CollectionItem for Parameter {
    fn clone_item(&self) -> Option<Self> {
        Some(self.clone())
    }
}

/// Collection of parameters unique by case-sensitive name.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParameterCollection {
    inner: Collection<Parameter>,
}

impl ParameterCollection {
    /// Create a new empty parameter collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, updating in place when the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        let name = name.into();
        let value = value.into();
        match self.inner.position(|p| p.name == name) {
            Some(index) => {
                if let Some(existing) = self.inner.get_mut(index) {
                    existing.value = value;
                }
            }
            None => {
                self.inner.add(Parameter { name, value });
            }
        }
    }

    /// Look up the parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.inner.find(|p| p.name == name).map(|(_, p)| p)
    }

    /// Value of `name`, or `None` when absent.
    pub fn get_value(&self, name: &str) -> Option<&ParameterValue> {
        self.get(name).map(Parameter::value)
    }

    /// Textual value of `name`, or `default` when absent.
    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.get_value(name)
            .map(ToString::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer value of `name`, or `default` when absent or not an integer.
    pub fn get_integer(&self, name: &str, default: i64) -> i64 {
        match self.get_value(name) {
            Some(value) => value.as_integer().unwrap_or_else(|| {
                debug!(parameter = name, %value, "parameter is not an integer, using default");
                default
            }),
            None => default,
        }
    }

    /// Flag value of `name`, or `default` when absent or not a flag.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get_value(name) {
            Some(value) => value.as_bool().unwrap_or_else(|| {
                debug!(parameter = name, %value, "parameter is not a flag, using default");
                default
            }),
            None => default,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`. Returns false when it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.inner.position(|p| p.name == name) {
            Some(index) => self.inner.remove(index),
            None => false,
        }
    }

    /// Layer `other` over this collection.
    ///
    /// With `overwrite` false, names already present keep their value and
    /// only missing names are added.
    pub fn merge(&mut self, other: &ParameterCollection, overwrite: bool) {
        let mut applied = 0usize;
        for parameter in other.iter() {
            if overwrite || !self.contains(&parameter.name) {
                self.set(parameter.name.clone(), parameter.value.clone());
                applied += 1;
            }
        }
        debug!(applied, offered = other.len(), overwrite, "merged parameters");
    }

    /// Check that every name in `required` is present.
    pub fn require(&self, required: &[&str]) -> Result<(), SplitterError> {
        match required.iter().find(|name| !self.contains(name)) {
            Some(name) => Err(SplitterError::MissingParameter {
                name: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Deep copy. Parameters are plain values, so this never fails.
    pub fn try_clone(&self) -> Result<Self, SplitterError> {
        Ok(Self {
            inner: self.inner.try_clone()?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.inner.iter()
    }

    /// Borrow the underlying generic collection.
    pub fn as_collection(&self) -> &Collection<Parameter> {
        &self.inner
    }
}

/// Copies through [`CollectionItem::clone_item`], the same path as
/// [`ParameterCollection::try_clone`]. A parameter never refuses a copy.
impl Clone for ParameterCollection {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.iter().filter_map(CollectionItem::clone_item).collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterCollection
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.set(name, value);
        }
        parameters
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ParameterCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for parameter in self.iter() {
            map.serialize_entry(&parameter.name, &parameter.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mshs_parameters() -> ParameterCollection {
        [
            (names::MSHS_BASE_URL, "http://example/base"),
            (names::MSHS_MANIFEST, "http://example/manifest.ismc"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn set_twice_keeps_single_entry_with_last_value() {
        let mut params = ParameterCollection::new();
        params.set("HttpCookie", "a=1");
        params.set("HttpCookie", "b=2");
        assert_eq!(params.len(), 1);
        assert_eq!(
            params.get_value("HttpCookie"),
            Some(&ParameterValue::Text("b=2".into()))
        );
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut params = ParameterCollection::new();
        params.set("Url", "http://a");
        params.set("url", "http://b");
        assert_eq!(params.len(), 2);
        assert!(!params.contains("URL"));
    }

    #[test]
    fn unknown_name_is_absent_not_an_error() {
        let params = mshs_parameters();
        assert_eq!(
            params.get_value(names::MSHS_MANIFEST),
            Some(&ParameterValue::Text("http://example/manifest.ismc".into()))
        );
        assert!(params.get_value("Unknown").is_none());
        assert_eq!(params.get_string("Unknown", "fallback"), "fallback");
    }

    #[test]
    fn typed_accessors_coerce_text() {
        let mut params = ParameterCollection::new();
        params.set(names::HTTP_OPEN_CONNECTION_TIMEOUT, " 20000 ");
        params.set(names::HTTP_IGNORE_CONTENT_LENGTH, "1");
        params.set(names::HTTP_SERVER_AUTHENTICATE, "TRUE");
        params.set(names::HTTP_VERSION, 11i64);
        params.set(names::HTTP_USER_AGENT, "agent");

        assert_eq!(params.get_integer(names::HTTP_OPEN_CONNECTION_TIMEOUT, 0), 20000);
        assert_eq!(params.get_integer(names::HTTP_VERSION, 0), 11);
        assert_eq!(params.get_integer(names::HTTP_USER_AGENT, 7), 7);
        assert!(params.get_bool(names::HTTP_IGNORE_CONTENT_LENGTH, false));
        assert!(params.get_bool(names::HTTP_SERVER_AUTHENTICATE, false));
        assert!(params.get_bool("Missing", true));
        assert_eq!(params.get_string(names::HTTP_VERSION, ""), "11");
    }

    #[test]
    fn remove_by_name() {
        let mut params = mshs_parameters();
        assert!(params.remove(names::MSHS_BASE_URL));
        assert!(!params.remove(names::MSHS_BASE_URL));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn merge_without_overwrite_keeps_existing_values() {
        let mut defaults: ParameterCollection =
            [("HttpUserAgent", "default-agent"), ("HttpVersion", "1.1")]
                .into_iter()
                .collect();
        let overrides: ParameterCollection =
            [("HttpUserAgent", "custom"), ("HttpCookie", "c=1")]
                .into_iter()
                .collect();

        defaults.merge(&overrides, false);
        assert_eq!(defaults.get_string("HttpUserAgent", ""), "default-agent");
        assert_eq!(defaults.get_string("HttpCookie", ""), "c=1");
        assert_eq!(defaults.len(), 3);

        defaults.merge(&overrides, true);
        assert_eq!(defaults.get_string("HttpUserAgent", ""), "custom");
        assert_eq!(defaults.len(), 3);
    }

    #[test]
    fn require_reports_first_missing_name() {
        let params = mshs_parameters();
        assert!(params.require(&[names::MSHS_BASE_URL, names::MSHS_MANIFEST]).is_ok());
        match params.require(&[names::MSHS_MANIFEST, names::URL]) {
            Err(SplitterError::MissingParameter { name }) => assert_eq!(name, names::URL),
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }

    #[test]
    fn clone_is_deep() {
        let original = mshs_parameters();
        let mut copy = original.try_clone().unwrap();
        copy.set(names::MSHS_MANIFEST, "http://other/manifest");
        assert_eq!(
            original.get_string(names::MSHS_MANIFEST, ""),
            "http://example/manifest.ismc"
        );
        assert_eq!(copy.clone(), copy);
    }

    #[test]
    fn clone_matches_try_clone() {
        let mut params = mshs_parameters();
        params.set(names::HTTP_VERSION, 11i64);
        params.set(names::HTTP_IGNORE_CONTENT_LENGTH, true);

        let cloned = params.clone();
        assert_eq!(cloned, params.try_clone().unwrap());
        let order: Vec<&str> = cloned.iter().map(Parameter::name).collect();
        assert_eq!(
            order,
            vec![names::MSHS_BASE_URL, names::MSHS_MANIFEST, names::HTTP_VERSION, names::HTTP_IGNORE_CONTENT_LENGTH]
        );
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut params = mshs_parameters();
        params.set(names::HTTP_VERSION, 11i64);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"MshsBaseUrl":"http://example/base","MshsManifest":"http://example/manifest.ismc","HttpVersion":11}"#
        );
    }

    #[test]
    fn value_deserializes_untagged() {
        let v: ParameterValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ParameterValue::Boolean(true));
        let v: ParameterValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, ParameterValue::Integer(42));
        let v: ParameterValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(v, ParameterValue::Text("x".into()));
    }

    fn entries() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[a-d]{1,2}", "[a-z]{0,4}"), 0..12)
    }

    proptest! {
        #[test]
        fn merge_respects_overwrite_flag(local in entries(), other in entries()) {
            let base: ParameterCollection = local.into_iter().collect();
            let other: ParameterCollection = other.into_iter().collect();

            let mut kept = base.clone();
            kept.merge(&other, false);
            for p in base.iter() {
                prop_assert_eq!(kept.get_value(p.name()), Some(p.value()));
            }

            let mut adopted = base.clone();
            adopted.merge(&other, true);
            for p in other.iter() {
                prop_assert_eq!(adopted.get_value(p.name()), Some(p.value()));
            }
        }

        #[test]
        fn names_stay_unique(sets in entries()) {
            let params: ParameterCollection = sets.into_iter().collect();
            let mut names: Vec<&str> = params.iter().map(Parameter::name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(names.len(), total);
        }
    }
}
