//! Sort order parsed from a comma-separated field list.

/// Field used by the default sort.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single `(field, direction)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Ordered sequence of sort keys. The first key is the primary order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    /// Parses `"-createdAt,name"` into `[(createdAt, desc), (name, asc)]`.
    ///
    /// Blank segments and bare `-` are skipped and a repeated field keeps its
    /// first occurrence. Input with no usable segment yields the default.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();
        for segment in raw.split(',').map(str::trim) {
            let (field, direction) = match segment.strip_prefix('-') {
                Some(rest) => (rest.trim(), SortDirection::Descending),
                None => (segment, SortDirection::Ascending),
            };
            if field.is_empty() || keys.iter().any(|k| k.field == field) {
                continue;
            }
            keys.push(SortKey::new(field, direction));
        }
        if keys.is_empty() {
            Self::default()
        } else {
            Self(keys)
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self(vec![SortKey::new(
            DEFAULT_SORT_FIELD,
            SortDirection::Descending,
        )])
    }
}
