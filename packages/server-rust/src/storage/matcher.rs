//! Evaluation of query specs against JSON documents.
//!
//! Implements the comparison semantics of the in-memory store:
//!
//! - dotted paths resolve into nested objects
//! - a missing or `null` field never satisfies a constraint
//! - an array field satisfies an equality, set, or range atom if any element does
//! - text compares numerically against JSON numbers when it parses as one
//! - dates compare against RFC 3339 strings

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use placement_core::{Bound, Document, FieldPredicate, FilterExpression, Projection, Range, Scalar, SortDirection, SortSpec};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Resolves a dotted field path within a document.
#[must_use]
pub fn resolve<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Compares a stored value with a scalar operand. `None` means the two are
/// not comparable.
#[must_use]
pub fn compare(value: &Value, scalar: &Scalar) -> Option<Ordering> {
    match (value, scalar) {
        (Value::Bool(v), Scalar::Bool(s)) => Some(v.cmp(s)),
        (Value::Bool(v), Scalar::Text(s)) => Some(v.cmp(&s.parse::<bool>().ok()?)),
        (Value::Number(v), Scalar::Number(s)) => v.as_f64()?.partial_cmp(s),
        (Value::Number(v), Scalar::Text(s)) => v.as_f64()?.partial_cmp(&s.trim().parse::<f64>().ok()?),
        (Value::String(v), Scalar::Number(s)) => v.trim().parse::<f64>().ok()?.partial_cmp(s),
        (Value::String(v), Scalar::Text(s)) => Some(v.as_str().cmp(s.as_str())),
        (Value::String(v), Scalar::Date(s)) => {
            let stored = DateTime::parse_from_rfc3339(v).ok()?.with_timezone(&Utc);
            Some(stored.cmp(s))
        }
        _ => None,
    }
}

/// Applies `atom` to the value, or to each element if it is an array.
fn any_element(value: &Value, atom: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(&atom),
        other => atom(other),
    }
}

fn equals(value: &Value, scalar: &Scalar) -> bool {
    compare(value, scalar) == Some(Ordering::Equal)
}

fn within(value: &Value, range: &Range) -> bool {
    let check = |bound: &Bound, accept: fn(Ordering) -> bool| {
        bound
            .values()
            .iter()
            .all(|scalar| compare(value, scalar).is_some_and(accept))
    };
    check(&range.greater_or_equal, Ordering::is_ge)
        && check(&range.greater, Ordering::is_gt)
        && check(&range.less_or_equal, Ordering::is_le)
        && check(&range.less, Ordering::is_lt)
}

fn satisfies(value: &Value, predicate: &FieldPredicate) -> bool {
    if value.is_null() {
        return false;
    }
    let equalities = predicate
        .equals
        .iter()
        .all(|scalar| any_element(value, |v| equals(v, scalar)));
    let membership = predicate.one_of.as_ref().map_or(true, |set| {
        any_element(value, |v| set.iter().any(|scalar| equals(v, scalar)))
    });
    let in_range =
        predicate.range.is_unbounded() || any_element(value, |v| within(v, &predicate.range));
    equalities && membership && in_range
}

/// A filter prepared for repeated evaluation.
pub struct CompiledFilter<'a> {
    filter: &'a FilterExpression,
    search: Option<(Regex, &'a BTreeSet<String>)>,
}

impl<'a> CompiledFilter<'a> {
    /// Prepares `filter`, compiling the search term into a case-insensitive
    /// literal matcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the search pattern exceeds the regex size limit.
    pub fn new(filter: &'a FilterExpression) -> anyhow::Result<Self> {
        let search = match filter.search() {
            Some(clause) => {
                let regex = RegexBuilder::new(&regex::escape(&clause.term))
                    .case_insensitive(true)
                    .build()?;
                Some((regex, &clause.fields))
            }
            None => None,
        };
        Ok(Self { filter, search })
    }

    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        let fields_match = self.filter.fields().all(|(field, predicate)| {
            resolve(document, field).is_some_and(|value| satisfies(value, predicate))
        });
        if !fields_match {
            return false;
        }
        match &self.search {
            Some((regex, fields)) => fields.iter().any(|field| {
                resolve(document, field).is_some_and(|value| {
                    any_element(value, |v| v.as_str().is_some_and(|s| regex.is_match(s)))
                })
            }),
            None => true,
        }
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over optional JSON values used for sorting. Missing and
/// `null` values sort first.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Stable multi-key sort.
pub fn sort_documents(documents: &mut [Document], spec: &SortSpec) {
    documents.sort_by(|a, b| {
        spec.keys()
            .iter()
            .map(|key| {
                let ordering = compare_values(resolve(a, &key.field), resolve(b, &key.field));
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Applies a projection to top-level fields. Include mode always keeps `id`;
/// a dotted include keeps its top-level field.
#[must_use]
pub fn project(mut document: Document, projection: &Projection) -> Document {
    match projection {
        Projection::Include(fields) => {
            let keep: BTreeSet<&str> = fields
                .iter()
                .filter_map(|f| f.split('.').next())
                .chain(std::iter::once("id"))
                .collect();
            document.retain(|key, _| keep.contains(key.as_str()));
            document
        }
        Projection::Exclude(fields) => {
            for field in fields {
                document.remove(field);
            }
            document
        }
    }
}

#[cfg(test)]
mod tests {
    use placement_core::{QueryParameters, RequestQuery, SortKey};
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn filter_for(pairs: &[(&str, &str)]) -> FilterExpression {
        RequestQuery::new(QueryParameters::from_pairs(pairs.iter().copied()))
            .filter()
            .unwrap()
            .search(["department", "topRecruiters"])
            .date_range_default()
            .unwrap()
            .into_spec()
            .filter
    }

    fn matches(pairs: &[(&str, &str)], document: &Document) -> bool {
        let filter = filter_for(pairs);
        CompiledFilter::new(&filter).unwrap().matches(document)
    }

    fn sample() -> Document {
        doc(json!({
            "id": "1",
            "department": "CSE",
            "placedStudents": 90,
            "placementPercentage": 81.82,
            "isPublished": true,
            "topRecruiters": ["Acme Corp", "Globex"],
            "meta": { "campus": "North" },
            "createdAt": "2024-03-10T08:00:00Z",
        }))
    }

    #[test]
    fn equality_on_text_and_number() {
        assert!(matches(&[("department", "CSE")], &sample()));
        assert!(!matches(&[("department", "ECE")], &sample()));
        assert!(matches(&[("placedStudents", "90")], &sample()));
    }

    #[test]
    fn range_bounds() {
        assert!(matches(&[("placedStudents[gte]", "90"), ("placedStudents[lt]", "100")], &sample()));
        assert!(!matches(&[("placedStudents[gt]", "90")], &sample()));
        assert!(matches(&[("placementPercentage[lte]", "81.82")], &sample()));
    }

    #[test]
    fn missing_field_never_matches() {
        assert!(!matches(&[("program", "BTech")], &sample()));
        assert!(!matches(&[("program[gte]", "0")], &sample()));
    }

    #[test]
    fn array_field_matches_any_element() {
        assert!(matches(&[("topRecruiters", "Globex")], &sample()));
        assert!(!matches(&[("topRecruiters", "Initech")], &sample()));
    }

    #[test]
    fn set_constraint_matches_member() {
        assert!(matches(&[("department", "ECE"), ("department", "CSE")], &sample()));
        assert!(!matches(&[("department", "ECE"), ("department", "ME")], &sample()));
    }

    #[test]
    fn dotted_path_resolves_nested_fields() {
        assert!(matches(&[("meta.campus", "North")], &sample()));
    }

    #[test]
    fn search_is_case_insensitive_substring_over_fields() {
        assert!(matches(&[("search", "acme")], &sample()));
        assert!(matches(&[("search", "cs")], &sample()));
        assert!(!matches(&[("search", "initech")], &sample()));
    }

    #[test]
    fn search_term_is_literal() {
        assert!(!matches(&[("search", "C.E")], &sample()));
        assert!(!matches(&[("search", "(")], &sample()));
    }

    #[test]
    fn date_range_compares_timestamps() {
        assert!(matches(&[("startDate", "2024-03-01"), ("endDate", "2024-04-01")], &sample()));
        assert!(!matches(&[("startDate", "2024-03-11")], &sample()));
    }

    #[test]
    fn generic_equality_on_boolean_field() {
        assert!(matches(&[("isPublished", "true")], &sample()));
        assert!(!matches(&[("isPublished", "false")], &sample()));
        assert!(!matches(&[("isPublished", "yes")], &sample()));
    }

    #[test]
    fn date_range_still_applies_next_to_operator_bound() {
        let filter = filter_for(&[("createdAt[gte]", "2023-06-01"), ("startDate", "2024-01-01")]);
        let compiled = CompiledFilter::new(&filter).unwrap();
        let autumn_2023 = doc(json!({ "createdAt": "2023-09-01T00:00:00Z" }));
        let spring_2024 = doc(json!({ "createdAt": "2024-03-01T00:00:00Z" }));
        assert!(!compiled.matches(&autumn_2023));
        assert!(compiled.matches(&spring_2024));
    }

    #[test]
    fn boolean_equality() {
        let published = RequestQuery::new(QueryParameters::new().with("isPublished", "yes"))
            .boolean_filter("isPublished")
            .into_spec()
            .filter;
        assert!(!CompiledFilter::new(&published).unwrap().matches(&sample()));
    }

    #[test]
    fn sort_by_multiple_keys_with_missing_first() {
        let mut docs = vec![
            doc(json!({ "id": "a", "dept": "CSE", "pct": 70 })),
            doc(json!({ "id": "b", "dept": "ECE", "pct": 90 })),
            doc(json!({ "id": "c", "dept": "CSE", "pct": 95 })),
            doc(json!({ "id": "d", "pct": 50 })),
        ];
        sort_documents(&mut docs, &SortSpec::parse("dept,-pct"));
        let ids: Vec<&str> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let mut docs = vec![
            doc(json!({ "id": "old", "createdAt": "2024-01-01T00:00:00Z" })),
            doc(json!({ "id": "new", "createdAt": "2024-06-01T00:00:00Z" })),
        ];
        sort_documents(&mut docs, &SortSpec::default());
        assert_eq!(docs[0]["id"], "new");
        assert_eq!(SortSpec::default().keys()[0], SortKey::new("createdAt", SortDirection::Descending));
    }

    #[test]
    fn include_projection_keeps_id() {
        let projected = project(sample(), &Projection::parse("department,meta.campus"));
        let keys: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(projected.contains_key("id"));
        assert!(projected.contains_key("department"));
        assert!(projected.contains_key("meta"));
    }

    #[test]
    fn default_projection_hides_version() {
        let mut document = sample();
        document.insert("__version".into(), json!(2));
        let projected = project(document, &Projection::default());
        assert!(!projected.contains_key("__version"));
        assert!(projected.contains_key("department"));
    }
}
