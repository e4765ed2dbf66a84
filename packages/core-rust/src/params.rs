//! Request parameters decoded from a URL query string.
//!
//! Keys use the bracket convention for comparison operators: the pair
//! `placedStudents[gte]=50` decodes to `placedStudents -> {gte: ["50"]}`.
//! A repeated plain key becomes a list. Mixing plain and bracketed forms on
//! one key folds the plain values into the operator mapping (`eq` for a
//! single value, `in` for a list) so nothing is dropped.

use std::collections::BTreeMap;

/// Keys consumed by dedicated builder operations and never treated as
/// generic field filters.
pub const RESERVED_KEYS: [&str; 7] = [
    "page",
    "sort",
    "limit",
    "fields",
    "search",
    "startDate",
    "endDate",
];

/// The value shape of a single query parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// `key=value`
    Single(String),
    /// `key=a&key=b`
    List(Vec<String>),
    /// `key[op]=value`, keyed by operator token. Values are kept in
    /// arrival order; a token may repeat.
    Operators(BTreeMap<String, Vec<String>>),
}

impl ParamValue {
    /// Returns the first plain text value, or `None` for operator mappings.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Single(s) => Some(s.as_str()),
            ParamValue::List(values) => values.first().map(String::as_str),
            ParamValue::Operators(_) => None,
        }
    }

    fn push_plain(&mut self, value: String) {
        match self {
            ParamValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = ParamValue::List(vec![first, value]);
            }
            ParamValue::List(values) => values.push(value),
            ParamValue::Operators(ops) => ops.entry("eq".to_string()).or_default().push(value),
        }
    }

    fn push_operator(&mut self, op: String, value: String) {
        if let ParamValue::Operators(ops) = self {
            ops.entry(op).or_default().push(value);
            return;
        }
        let mut ops = BTreeMap::new();
        match std::mem::replace(self, ParamValue::List(Vec::new())) {
            ParamValue::Single(s) => {
                ops.insert("eq".to_string(), vec![s]);
            }
            ParamValue::List(values) => {
                ops.insert("in".to_string(), values);
            }
            ParamValue::Operators(_) => {}
        }
        ops.entry(op).or_insert_with(Vec::new).push(value);
        *self = ParamValue::Operators(ops);
    }
}

/// Caller-supplied mapping of filter, sort, and pagination instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    entries: BTreeMap<String, ParamValue>,
}

impl QueryParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from already percent-decoded `(key, value)` pairs,
    /// as produced by a URL query string decoder.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.push(key.as_ref(), value.into());
        }
        params
    }

    /// Chaining form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.push(key, value.into());
        self
    }

    /// Adds one decoded pair, applying the bracket operator convention.
    pub fn push(&mut self, key: &str, value: String) {
        match split_operator(key) {
            Some((field, op)) => match self.entries.get_mut(field) {
                Some(existing) => existing.push_operator(op.to_string(), value),
                None => {
                    let mut ops = BTreeMap::new();
                    ops.insert(op.to_string(), vec![value]);
                    self.entries
                        .insert(field.to_string(), ParamValue::Operators(ops));
                }
            },
            None => match self.entries.get_mut(key) {
                Some(existing) => existing.push_plain(value),
                None => {
                    self.entries
                        .insert(key.to_string(), ParamValue::Single(value));
                }
            },
        }
    }

    /// Replaces the value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns the plain text value of `key`, or `None` if absent or if the
    /// key only carries operators.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ParamValue::as_text)
    }

    /// Returns the text value of `key` if present and not blank.
    #[must_use]
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    /// Parses `key` as a strictly positive integer.
    ///
    /// Absent, non-numeric, zero, and negative values all yield `None` so the
    /// caller falls back to its default rather than to zero.
    #[must_use]
    pub fn positive_int(&self, key: &str) -> Option<u64> {
        self.text(key)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Returns a copy with the given keys removed.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        let mut copy = self.clone();
        for key in keys {
            copy.entries.remove(*key);
        }
        copy
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits `field[op]` into `("field", "op")`. Returns `None` for plain keys
/// and for malformed brackets.
fn split_operator(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let open = inner.find('[')?;
    let (field, op) = (&inner[..open], &inner[open + 1..]);
    if field.is_empty() || op.is_empty() || op.contains(['[', ']']) {
        return None;
    }
    Some((field, op))
}
