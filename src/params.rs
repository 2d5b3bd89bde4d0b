//! String parameter bags.
//!
//! Index construction is configured by a flat string-to-string map so
//! that experiment drivers can forward options without knowing every
//! family's knobs. The bag supports required and defaulted lookup,
//! extraction of the keys a composer does not consume itself, and
//! equality modulo a set of keys, which is what lets a driver detect
//! that two successive build requests differ only in query-time
//! tunables and reuse the already-built index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{IndexError, Result};

/// An ordered string-to-string parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use proxima::Params;
    /// let params = Params::new().set("bucketSize", 10).set("strategy", "random");
    /// assert_eq!(params.to_string(), "bucketSize=10,strategy=random");
    /// ```
    pub fn set(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// In-place insert, replacing any previous value for `key`.
    pub fn insert(&mut self, key: &str, value: impl fmt::Display) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the value under `key`, if present.
    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| IndexError::InvalidParameter {
                    name: key.to_string(),
                    value: raw.clone(),
                }),
        }
    }

    /// Parse the value under `key`; error if absent.
    pub fn get_required<T: FromStr>(&self, key: &str) -> Result<T> {
        self.get(key)?
            .ok_or_else(|| IndexError::MissingParameter(key.to_string()))
    }

    /// Parse the value under `key`, falling back to `default`.
    pub fn get_optional<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Boolean lookup accepting `true`/`false`/`1`/`0`.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.entries.get(key).map(String::as_str) {
            None => Ok(default),
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") => Ok(false),
            Some(raw) => Err(IndexError::InvalidParameter {
                name: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// A new bag holding every entry whose key is NOT in `excluded`.
    pub fn extract_except(&self, excluded: &[&str]) -> Params {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !excluded.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Params { entries }
    }

    /// Equality after redacting the `excluded` keys from both bags.
    pub fn equals_ignore_in_list(&self, other: &Params, excluded: &[&str]) -> bool {
        self.extract_except(excluded) == other.extract_except(excluded)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in &self.entries {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Params {
    type Err = IndexError;

    /// Parse the `key=value,key=value` form produced by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self> {
        let mut params = Params::new();
        if s.is_empty() {
            return Ok(params);
        }
        for piece in s.split(',') {
            let (key, value) = piece.split_once('=').ok_or_else(|| {
                IndexError::InvalidParameter {
                    name: "params".to_string(),
                    value: piece.to_string(),
                }
            })?;
            params.insert(key, value);
        }
        Ok(params)
    }
}
