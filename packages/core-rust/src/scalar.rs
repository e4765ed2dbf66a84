//! Typed literals used inside filter constraints.
//!
//! Request parameters always arrive as text. Every conversion from raw text
//! into a [`Scalar`] goes through one of the explicit parsers on this type,
//! so an un-coerced string never leaks into comparison logic.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::ValidationError;

/// A literal operand of an equality, set, or range constraint.
///
/// Scalars carry a total order (variant rank first, then value) so that
/// constraint merging is deterministic regardless of call order. Numbers
/// compare with [`f64::total_cmp`].
#[derive(Debug, Clone)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl Scalar {
    /// Interprets raw parameter text: finite numeric text becomes a
    /// [`Scalar::Number`], anything else stays [`Scalar::Text`].
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => Scalar::Text(raw.to_string()),
        }
    }

    /// Parses a numeric parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `raw` is not a finite number.
    pub fn parse_number(field: &str, raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Scalar::Number(n)),
            _ => Err(ValidationError::new(
                field,
                format!("`{raw}` is not a number"),
            )),
        }
    }

    /// Parses a calendar date (`YYYY-MM-DD`, interpreted as midnight UTC)
    /// or a full RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `raw` is neither form.
    pub fn parse_date(field: &str, raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Scalar::Date(Utc.from_utc_datetime(&midnight)));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Scalar::Date(dt.with_timezone(&Utc)))
            .map_err(|_| ValidationError::new(field, format!("`{raw}` is not a calendar date")))
    }

    /// Coerces a boolean parameter by exact match against `"true"`.
    ///
    /// Every other input, including `"TRUE"`, `"1"`, `"yes"` and `"false"`,
    /// yields `false`. Callers rely on this exact coercion; do not widen it.
    #[must_use]
    pub fn parse_bool(raw: &str) -> Self {
        Scalar::Bool(raw == "true")
    }

    /// Whether both scalars are the same variant, so that comparing them
    /// compares values rather than kinds.
    #[must_use]
    pub fn same_kind(&self, other: &Scalar) -> bool {
        self.rank() == other.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            Scalar::Bool(_) => 0,
            Scalar::Number(_) => 1,
            Scalar::Date(_) => 2,
            Scalar::Text(_) => 3,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Number(a), Scalar::Number(b)) => a.total_cmp(b),
            (Scalar::Date(a), Scalar::Date(b)) => a.cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Scalar::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}
