// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The property list of a custom structure, `(key = value, ...)`.

use crate::value::Value;
use kstring::KString;

/// Keeps source order. Built completely before it is handed to a
/// listener, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap {
    entries: Vec<(KString, Value)>,
}

impl PropertyMap {
    pub fn new() -> PropertyMap {
        PropertyMap { entries: Vec::new() }
    }

    /// A repeated key replaces the earlier value, keeping its place.
    pub(crate) fn insert(&mut self, key: KString, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'m> IntoIterator for &'m PropertyMap {
    type Item = (&'m str, &'m Value);
    type IntoIter = Box<dyn Iterator<Item = (&'m str, &'m Value)> + 'm>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl std::fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_str("(")?;
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_fmt(format_args!("{}={}", k, v))?;
            first = false;
        }
        f.write_str(")")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_keeps_place() {
        let mut m = PropertyMap::new();
        m.insert(KString::from_static("a"), Value::Bool(true));
        m.insert(KString::from_static("b"), Value::Bool(true));
        m.insert(KString::from_static("a"), Value::Bool(false));
        assert_eq!(m.len(), 2);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(m.get("a"), Some(&Value::Bool(false)));
        assert!(!m.contains_key("c"));
    }
}
