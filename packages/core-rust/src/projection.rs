//! Field projection applied to result documents.

use std::collections::BTreeSet;

use crate::filter::split_list;

/// Internal document version field, hidden from results by default.
pub const VERSION_FIELD: &str = "__version";

/// Fields to include, or fields to exclude. The two modes never mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Include(BTreeSet<String>),
    Exclude(BTreeSet<String>),
}

impl Projection {
    /// Parses a comma-separated include list. Input with no usable field
    /// yields the default projection.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let fields: BTreeSet<String> = split_list(raw).map(str::to_string).collect();
        if fields.is_empty() {
            Self::default()
        } else {
            Projection::Include(fields)
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Exclude(BTreeSet::from([VERSION_FIELD.to_string()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_include_set() {
        let projection = Projection::parse("department, placementPercentage");
        assert_eq!(
            projection,
            Projection::Include(BTreeSet::from([
                "department".to_string(),
                "placementPercentage".to_string(),
            ]))
        );
    }

    #[test]
    fn default_excludes_version_field() {
        assert_eq!(
            Projection::default(),
            Projection::Exclude(BTreeSet::from(["__version".to_string()]))
        );
        assert_eq!(Projection::parse(" , "), Projection::default());
    }
}
