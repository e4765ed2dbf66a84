//! Request filter translator.
//!
//! [`RequestQuery`] turns [`QueryParameters`] into a [`QuerySpec`]: a filter,
//! sort order, projection, pagination window, and relation list that a
//! [`DocumentStore`] can execute. It is an immutable builder: every
//! operation consumes the value and returns the updated one, so calls chain
//! in any order and no state is shared between requests.
//!
//! ```
//! use placement_core::{QueryParameters, RequestQuery, SortDirection};
//!
//! let params = QueryParameters::from_pairs([
//!     ("department", "CSE"),
//!     ("placementPercentage[gte]", "80"),
//!     ("sort", "-placementPercentage"),
//!     ("page", "2"),
//! ]);
//!
//! let spec = RequestQuery::new(params)
//!     .filter()?
//!     .sort()
//!     .limit_fields()
//!     .paginate()
//!     .into_spec();
//!
//! assert_eq!(spec.sort.unwrap().keys()[0].direction, SortDirection::Descending);
//! assert_eq!(spec.pagination.unwrap().offset, 10);
//! # Ok::<(), placement_core::ValidationError>(())
//! ```

use tracing::debug;

use crate::error::{QueryError, ValidationError};
use crate::filter::{split_list, FilterExpression, Range, RangeBound};
use crate::pagination::Pagination;
use crate::params::{ParamValue, QueryParameters, RESERVED_KEYS};
use crate::projection::Projection;
use crate::scalar::Scalar;
use crate::sort::{SortSpec, DEFAULT_SORT_FIELD};
use crate::traits::{Document, DocumentStore};

/// Composed query description handed to a [`DocumentStore`].
///
/// `sort` and `pagination` are `None` until the corresponding builder
/// operation runs, in which case the store returns matches in storage order
/// and without a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub filter: FilterExpression,
    pub sort: Option<SortSpec>,
    pub projection: Projection,
    pub pagination: Option<Pagination>,
    /// Relation names to expand, in request order, without duplicates.
    pub populate: Vec<String>,
}

/// One or more relation names accepted by [`RequestQuery::populate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relations(Vec<String>);

impl From<&str> for Relations {
    fn from(name: &str) -> Self {
        Relations(vec![name.to_string()])
    }
}

impl From<String> for Relations {
    fn from(name: String) -> Self {
        Relations(vec![name])
    }
}

impl From<Vec<String>> for Relations {
    fn from(names: Vec<String>) -> Self {
        Relations(names)
    }
}

impl From<Vec<&str>> for Relations {
    fn from(names: Vec<&str>) -> Self {
        Relations(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Relations {
    fn from(names: &[&str]) -> Self {
        Relations(names.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Relations {
    fn from(names: [&str; N]) -> Self {
        Relations(names.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Request-scoped query builder.
#[derive(Debug, Clone)]
pub struct RequestQuery {
    params: QueryParameters,
    /// Caller-specified keys read by dedicated helpers and skipped by
    /// [`filter`](Self::filter), in addition to [`RESERVED_KEYS`].
    reserved: Vec<String>,
    spec: QuerySpec,
}

impl RequestQuery {
    #[must_use]
    pub fn new(params: QueryParameters) -> Self {
        Self {
            params,
            reserved: Vec::new(),
            spec: QuerySpec::default(),
        }
    }

    /// Creates a builder whose [`filter`](Self::filter) also skips `keys`.
    ///
    /// Use this for parameters consumed by [`array_filter`](Self::array_filter),
    /// [`range_filter`](Self::range_filter) or
    /// [`boolean_filter`](Self::boolean_filter) so they are not additionally
    /// read as literal equalities.
    #[must_use]
    pub fn with_reserved_keys(params: QueryParameters, keys: &[&str]) -> Self {
        Self {
            params,
            reserved: keys.iter().map(|k| (*k).to_string()).collect(),
            spec: QuerySpec::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    #[must_use]
    pub fn into_spec(self) -> QuerySpec {
        self.spec
    }

    /// Translates every non-reserved parameter into a field constraint.
    ///
    /// A single value is an equality, a repeated key is a set constraint, and
    /// an operator mapping (`field[gte]=5&field[lte]=10`) is merged into one
    /// range on that field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an operator token other than `gte`,
    /// `gt`, `lte`, `lt`, `eq` or `in`.
    pub fn filter(mut self) -> Result<Self, ValidationError> {
        let mut expr = FilterExpression::new();
        for (field, value) in self.params.without(&RESERVED_KEYS).iter() {
            if self.reserved.iter().any(|k| k == field) {
                continue;
            }
            match value {
                ParamValue::Single(raw) => expr.add_equals(field, Scalar::infer(raw)),
                ParamValue::List(values) => {
                    expr.add_one_of(field, values.iter().map(|raw| Scalar::infer(raw)));
                }
                ParamValue::Operators(ops) => expr.add_operators(field, ops)?,
            }
        }
        self.spec.filter.merge(expr);
        Ok(self)
    }

    /// Parses `sort`; absent input yields `createdAt` descending.
    #[must_use]
    pub fn sort(mut self) -> Self {
        self.spec.sort = Some(match self.params.text("sort") {
            Some(raw) => SortSpec::parse(raw),
            None => SortSpec::default(),
        });
        self
    }

    /// Parses `fields` into an include projection; absent input keeps the
    /// default projection, which hides the internal version field.
    #[must_use]
    pub fn limit_fields(mut self) -> Self {
        self.spec.projection = match self.params.text("fields") {
            Some(raw) => Projection::parse(raw),
            None => Projection::default(),
        };
        self
    }

    /// Resolves `page` and `limit`, falling back to defaults for absent or
    /// non-numeric values.
    #[must_use]
    pub fn paginate(mut self) -> Self {
        self.spec.pagination = Some(Pagination::from_params(&self.params));
        self
    }

    /// Adds a case-insensitive substring match of the `search` term against
    /// any of `fields`. No-op if the term is absent or blank, or if `fields`
    /// is empty.
    #[must_use]
    pub fn search<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(term) = self.params.non_blank("search") {
            let term = term.trim().to_string();
            self.spec.filter.add_search(&term, fields);
        }
        self
    }

    /// Same as [`date_range`](Self::date_range) on `createdAt`.
    ///
    /// # Errors
    ///
    /// See [`date_range`](Self::date_range).
    pub fn date_range_default(self) -> Result<Self, ValidationError> {
        self.date_range(DEFAULT_SORT_FIELD)
    }

    /// Constrains `field` to `[startDate, endDate]`. Either bound may be
    /// omitted; with both absent this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a supplied bound is not a calendar
    /// date or RFC 3339 timestamp.
    pub fn date_range(mut self, field: &str) -> Result<Self, ValidationError> {
        let mut range = Range::default();
        if let Some(raw) = self.params.non_blank("startDate") {
            range.set(RangeBound::GreaterOrEqual, Scalar::parse_date("startDate", raw)?);
        }
        if let Some(raw) = self.params.non_blank("endDate") {
            range.set(RangeBound::LessOrEqual, Scalar::parse_date("endDate", raw)?);
        }
        self.spec.filter.add_range(field, range);
        Ok(self)
    }

    /// Constrains `field` to one of the values in the comma-separated
    /// parameter of the same name. No-op if the parameter is absent.
    #[must_use]
    pub fn array_filter(mut self, field: &str) -> Self {
        let values: Option<Vec<Scalar>> = match self.params.get(field) {
            Some(ParamValue::Single(raw)) => Some(split_list(raw).map(Scalar::infer).collect()),
            Some(ParamValue::List(raws)) => Some(
                raws.iter()
                    .flat_map(|raw| split_list(raw))
                    .map(Scalar::infer)
                    .collect(),
            ),
            Some(ParamValue::Operators(_)) | None => None,
        };
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.spec.filter.add_one_of(field, values);
        }
        self
    }

    /// Numeric range on `field` read from two separately named parameters:
    /// `min_param` becomes the inclusive lower bound and `max_param` the
    /// inclusive upper bound.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a supplied bound is not a number.
    pub fn range_filter(
        mut self,
        field: &str,
        min_param: &str,
        max_param: &str,
    ) -> Result<Self, ValidationError> {
        let mut range = Range::default();
        if let Some(raw) = self.params.non_blank(min_param) {
            range.set(RangeBound::GreaterOrEqual, Scalar::parse_number(min_param, raw)?);
        }
        if let Some(raw) = self.params.non_blank(max_param) {
            range.set(RangeBound::LessOrEqual, Scalar::parse_number(max_param, raw)?);
        }
        self.spec.filter.add_range(field, range);
        Ok(self)
    }

    /// Equality on a boolean field, coerced by exact match: only the literal
    /// `"true"` yields `true`. `"false"`, `"yes"`, `"1"` and `"TRUE"` all
    /// yield `false`. No-op if the parameter is absent.
    #[must_use]
    pub fn boolean_filter(mut self, field: &str) -> Self {
        if let Some(raw) = self.params.text(field) {
            let value = Scalar::parse_bool(raw);
            self.spec.filter.add_equals(field, value);
        }
        self
    }

    /// Requests expansion of one or more named relations.
    #[must_use]
    pub fn populate(mut self, relations: impl Into<Relations>) -> Self {
        for name in relations.into().0 {
            if !self.spec.populate.contains(&name) {
                self.spec.populate.push(name);
            }
        }
        self
    }

    /// Runs the composed query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Upstream`] if the store fails.
    pub async fn execute<S>(&self, store: &S, collection: &str) -> Result<Vec<Document>, QueryError>
    where
        S: DocumentStore + ?Sized,
    {
        debug!(collection, spec = ?self.spec, "executing query");
        let documents = store.find(collection, &self.spec).await?;
        Ok(documents)
    }

    /// Counts matches of the accumulated filter, ignoring sort, projection,
    /// and pagination.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Upstream`] if the store fails.
    pub async fn count<S>(&self, store: &S, collection: &str) -> Result<u64, QueryError>
    where
        S: DocumentStore + ?Sized,
    {
        let total = store.count(collection, &self.spec.filter).await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use proptest::prelude::*;

    use super::*;
    use crate::sort::{SortDirection, SortKey};

    fn params(pairs: &[(&str, &str)]) -> QueryParameters {
        QueryParameters::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn filter_without_reserved_keys_is_equality_per_key() {
        let spec = RequestQuery::new(params(&[("department", "CSE"), ("program", "BTech")]))
            .filter()
            .unwrap()
            .into_spec();

        let dept = spec.filter.get("department").unwrap();
        assert_eq!(dept.equals, BTreeSet::from([Scalar::from("CSE")]));
        let program = spec.filter.get("program").unwrap();
        assert_eq!(program.equals, BTreeSet::from([Scalar::from("BTech")]));
        assert_eq!(spec.filter.fields().count(), 2);
    }

    #[test]
    fn filter_strips_reserved_keys() {
        let spec = RequestQuery::new(params(&[
            ("page", "2"),
            ("limit", "5"),
            ("sort", "name"),
            ("fields", "name"),
            ("search", "x"),
            ("startDate", "2024-01-01"),
            ("endDate", "2024-02-01"),
        ]))
        .filter()
        .unwrap()
        .into_spec();
        assert!(spec.filter.is_empty());
    }

    #[test]
    fn filter_merges_operators_on_one_field() {
        let spec = RequestQuery::new(params(&[("score[gte]", "5"), ("score[lte]", "10")]))
            .filter()
            .unwrap()
            .into_spec();
        let range = &spec.filter.get("score").unwrap().range;
        assert_eq!(range.greater_or_equal.single(), Some(&Scalar::Number(5.0)));
        assert_eq!(range.less_or_equal.single(), Some(&Scalar::Number(10.0)));
        assert_eq!(spec.filter.fields().count(), 1);
    }

    #[test]
    fn filter_repeated_key_is_set_constraint() {
        let spec = RequestQuery::new(params(&[("department", "CSE"), ("department", "ECE")]))
            .filter()
            .unwrap()
            .into_spec();
        let one_of = spec.filter.get("department").unwrap().one_of.clone().unwrap();
        assert_eq!(one_of.len(), 2);
    }

    #[test]
    fn filter_skips_caller_reserved_keys() {
        let p = params(&[("department", "CSE,ECE"), ("minPct", "50"), ("program", "MBA")]);
        let spec = RequestQuery::with_reserved_keys(p, &["department", "minPct"])
            .filter()
            .unwrap()
            .array_filter("department")
            .into_spec();
        let dept = spec.filter.get("department").unwrap();
        assert!(dept.equals.is_empty());
        assert_eq!(dept.one_of.as_ref().unwrap().len(), 2);
        assert!(spec.filter.get("minPct").is_none());
        assert!(spec.filter.get("program").is_some());
    }

    #[test]
    fn filter_rejects_unknown_operator() {
        let err = RequestQuery::new(params(&[("score[near]", "5")]))
            .filter()
            .unwrap_err();
        assert_eq!(err.field, "score");
    }

    #[test]
    fn sort_parses_directions_and_defaults() {
        let spec = RequestQuery::new(params(&[("sort", "-createdAt,name")]))
            .sort()
            .into_spec();
        assert_eq!(
            spec.sort.unwrap().keys(),
            &[
                SortKey::new("createdAt", SortDirection::Descending),
                SortKey::new("name", SortDirection::Ascending),
            ]
        );

        let spec = RequestQuery::new(QueryParameters::new()).sort().into_spec();
        assert_eq!(spec.sort, Some(SortSpec::default()));
    }

    #[test]
    fn limit_fields_include_and_default() {
        let spec = RequestQuery::new(params(&[("fields", "department,placedStudents")]))
            .limit_fields()
            .into_spec();
        assert_eq!(
            spec.projection,
            Projection::Include(BTreeSet::from([
                "department".to_string(),
                "placedStudents".to_string()
            ]))
        );

        let spec = RequestQuery::new(QueryParameters::new())
            .limit_fields()
            .into_spec();
        assert_eq!(spec.projection, Projection::default());
    }

    #[test]
    fn paginate_falls_back_for_invalid_page() {
        let spec = RequestQuery::new(params(&[("page", "abc"), ("limit", "10")]))
            .paginate()
            .into_spec();
        assert_eq!(
            spec.pagination,
            Some(Pagination { page: 1, limit: 10, offset: 0 })
        );
    }

    #[test]
    fn paginate_computes_offset() {
        let spec = RequestQuery::new(params(&[("page", "3"), ("limit", "20")]))
            .paginate()
            .into_spec();
        assert_eq!(spec.pagination.unwrap().offset, 40);
    }

    #[test]
    fn search_builds_disjunction_over_fields() {
        let spec = RequestQuery::new(params(&[("search", " Comp ")]))
            .search(["department", "program"])
            .into_spec();
        let clause = spec.filter.search().unwrap();
        assert_eq!(clause.term, "Comp");
        assert_eq!(
            clause.fields,
            BTreeSet::from(["department".to_string(), "program".to_string()])
        );
    }

    #[test]
    fn search_is_noop_without_term_or_fields() {
        let spec = RequestQuery::new(QueryParameters::new())
            .search(["department"])
            .into_spec();
        assert!(spec.filter.search().is_none());

        let spec = RequestQuery::new(params(&[("search", "cse")]))
            .search(Vec::<String>::new())
            .into_spec();
        assert!(spec.filter.search().is_none());
    }

    #[test]
    fn date_range_builds_bounds() {
        let spec = RequestQuery::new(params(&[("startDate", "2024-01-01"), ("endDate", "2024-06-30")]))
            .date_range_default()
            .unwrap()
            .into_spec();
        let range = &spec.filter.get("createdAt").unwrap().range;
        assert!(matches!(range.greater_or_equal.single(), Some(Scalar::Date(_))));
        assert!(matches!(range.less_or_equal.single(), Some(Scalar::Date(_))));
    }

    #[test]
    fn date_range_keeps_operator_bound_on_same_field() {
        let spec = RequestQuery::new(params(&[("createdAt[gte]", "2023-06-01"), ("startDate", "2024-01-01")]))
            .filter()
            .unwrap()
            .date_range_default()
            .unwrap()
            .into_spec();
        let lower = &spec.filter.get("createdAt").unwrap().range.greater_or_equal;
        assert_eq!(
            lower.values(),
            &[
                Scalar::parse_date("startDate", "2024-01-01").unwrap(),
                Scalar::Text("2023-06-01".into()),
            ]
        );
    }

    #[test]
    fn range_filter_keeps_non_numeric_operator_bound() {
        let spec = RequestQuery::new(params(&[("pct[gte]", "high"), ("minPct", "60")]))
            .filter()
            .unwrap()
            .range_filter("pct", "minPct", "maxPct")
            .unwrap()
            .into_spec();
        let lower = &spec.filter.get("pct").unwrap().range.greater_or_equal;
        assert!(lower.values().contains(&Scalar::Number(60.0)));
        assert!(lower.values().contains(&Scalar::Text("high".into())));
    }

    #[test]
    fn date_range_is_noop_without_bounds() {
        let spec = RequestQuery::new(QueryParameters::new())
            .date_range("updatedAt")
            .unwrap()
            .into_spec();
        assert!(spec.filter.is_empty());
    }

    #[test]
    fn date_range_rejects_invalid_date() {
        let err = RequestQuery::new(params(&[("startDate", "not-a-date")]))
            .date_range_default()
            .unwrap_err();
        assert_eq!(err.field, "startDate");
    }

    #[test]
    fn array_filter_builds_set() {
        let spec = RequestQuery::new(params(&[("department", "CSE,ECE")]))
            .array_filter("department")
            .into_spec();
        let one_of = spec.filter.get("department").unwrap().one_of.clone().unwrap();
        assert_eq!(
            one_of,
            BTreeSet::from([Scalar::from("CSE"), Scalar::from("ECE")])
        );
    }

    #[test]
    fn array_filter_is_noop_when_absent() {
        let spec = RequestQuery::new(QueryParameters::new())
            .array_filter("department")
            .into_spec();
        assert!(spec.filter.is_empty());
    }

    #[test]
    fn range_filter_reads_named_bounds() {
        let spec = RequestQuery::new(params(&[("minPct", "60"), ("maxPct", "90.5")]))
            .range_filter("placementPercentage", "minPct", "maxPct")
            .unwrap()
            .into_spec();
        let range = &spec.filter.get("placementPercentage").unwrap().range;
        assert_eq!(range.greater_or_equal.single(), Some(&Scalar::Number(60.0)));
        assert_eq!(range.less_or_equal.single(), Some(&Scalar::Number(90.5)));
    }

    #[test]
    fn range_filter_rejects_non_numeric_bound() {
        let err = RequestQuery::new(params(&[("maxPct", "lots")]))
            .range_filter("placementPercentage", "minPct", "maxPct")
            .unwrap_err();
        assert_eq!(err.field, "maxPct");
    }

    #[test]
    fn boolean_filter_false_literal() {
        let spec = RequestQuery::new(params(&[("isActive", "false")]))
            .boolean_filter("isActive")
            .into_spec();
        assert_eq!(
            spec.filter.get("isActive").unwrap().equals,
            BTreeSet::from([Scalar::Bool(false)])
        );
    }

    #[test]
    fn boolean_filter_non_true_is_false() {
        let spec = RequestQuery::new(params(&[("isActive", "yes")]))
            .boolean_filter("isActive")
            .into_spec();
        assert_eq!(
            spec.filter.get("isActive").unwrap().equals,
            BTreeSet::from([Scalar::Bool(false)])
        );

        let spec = RequestQuery::new(params(&[("isActive", "true")]))
            .boolean_filter("isActive")
            .into_spec();
        assert_eq!(
            spec.filter.get("isActive").unwrap().equals,
            BTreeSet::from([Scalar::Bool(true)])
        );
    }

    #[test]
    fn populate_accepts_one_or_many_and_dedups() {
        let spec = RequestQuery::new(QueryParameters::new())
            .populate("institution")
            .populate(["recruiters", "institution"])
            .populate(vec!["coordinator".to_string()])
            .into_spec();
        assert_eq!(spec.populate, vec!["institution", "recruiters", "coordinator"]);
    }

    #[test]
    fn filter_then_array_filter_merges_same_field() {
        let p = params(&[("department", "CSE,ECE"), ("placedStudents[gte]", "10")]);
        let a = RequestQuery::new(p.clone())
            .filter()
            .unwrap()
            .array_filter("department")
            .into_spec();
        let b = RequestQuery::new(p)
            .array_filter("department")
            .filter()
            .unwrap()
            .into_spec();
        assert_eq!(a, b);
        let dept = a.filter.get("department").unwrap();
        assert_eq!(dept.equals, BTreeSet::from([Scalar::from("CSE,ECE")]));
        assert_eq!(dept.one_of.as_ref().unwrap().len(), 2);
    }

    // -- Store-backed terminal operations --

    #[derive(Default)]
    struct RecordingStore {
        last_spec: Mutex<Option<QuerySpec>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentStore for RecordingStore {
        async fn find(&self, _collection: &str, spec: &QuerySpec) -> anyhow::Result<Vec<Document>> {
            if self.fail {
                anyhow::bail!("connection lost");
            }
            *self.last_spec.lock().unwrap() = Some(spec.clone());
            Ok(vec![Document::new()])
        }

        async fn count(&self, _collection: &str, filter: &FilterExpression) -> anyhow::Result<u64> {
            if self.fail {
                anyhow::bail!("connection lost");
            }
            Ok(filter.fields().count() as u64)
        }

        async fn insert(&self, _collection: &str, document: Document) -> anyhow::Result<Document> {
            Ok(document)
        }

        async fn get(&self, _collection: &str, _id: &str) -> anyhow::Result<Option<Document>> {
            Ok(None)
        }

        async fn replace(
            &self,
            _collection: &str,
            _id: &str,
            _document: Document,
        ) -> anyhow::Result<Option<Document>> {
            Ok(None)
        }

        async fn delete(&self, _collection: &str, _id: &str) -> anyhow::Result<bool> {
            Ok(false)
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn execute_hands_composed_spec_to_store() {
        let store = RecordingStore::default();
        let query = RequestQuery::new(params(&[("department", "CSE"), ("page", "2")]))
            .filter()
            .unwrap()
            .paginate();

        let docs = query.execute(&store, "placement_stats").await.unwrap();
        assert_eq!(docs.len(), 1);
        let seen = store.last_spec.lock().unwrap().clone().unwrap();
        assert_eq!(&seen, query.spec());
    }

    #[tokio::test]
    async fn count_reuses_filter() {
        let store = RecordingStore::default();
        let query = RequestQuery::new(params(&[("a", "1"), ("b", "2")]))
            .filter()
            .unwrap()
            .sort()
            .paginate();
        assert_eq!(query.count(&store, "c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_is_propagated() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let query = RequestQuery::new(QueryParameters::new());
        let err = query.execute(&store, "c").await.unwrap_err();
        assert!(matches!(err, QueryError::Upstream(_)));
        let err = query.count(&store, "c").await.unwrap_err();
        assert!(matches!(err, QueryError::Upstream(_)));
    }

    // -- Order independence --

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Filter,
        Sort,
        LimitFields,
        Paginate,
        ArrayFilter,
        BooleanFilter,
        Search,
        DateRange,
    }

    const ALL_STEPS: [Step; 8] = [
        Step::Filter,
        Step::Sort,
        Step::LimitFields,
        Step::Paginate,
        Step::ArrayFilter,
        Step::BooleanFilter,
        Step::Search,
        Step::DateRange,
    ];

    fn apply(query: RequestQuery, step: Step) -> RequestQuery {
        match step {
            Step::Filter => query.filter().unwrap(),
            Step::Sort => query.sort(),
            Step::LimitFields => query.limit_fields(),
            Step::Paginate => query.paginate(),
            Step::ArrayFilter => query.array_filter("department"),
            Step::BooleanFilter => query.boolean_filter("isPublished"),
            Step::Search => query.search(["department", "program"]),
            Step::DateRange => query.date_range_default().unwrap(),
        }
    }

    fn sample_params() -> QueryParameters {
        params(&[
            ("department", "CSE,ECE"),
            ("isPublished", "true"),
            ("placedStudents[gte]", "10"),
            ("placedStudents[lt]", "500"),
            ("createdAt[gte]", "2023-06-01"),
            ("sort", "-placementPercentage,department"),
            ("fields", "department,placementPercentage"),
            ("page", "2"),
            ("limit", "5"),
            ("search", "tech"),
            ("startDate", "2024-01-01"),
            ("endDate", "2024-12-31"),
        ])
    }

    proptest! {
        #[test]
        fn builder_order_does_not_change_the_query(
            order in Just(ALL_STEPS.to_vec()).prop_shuffle()
        ) {
            let reference = ALL_STEPS
                .iter()
                .fold(RequestQuery::new(sample_params()), |q, s| apply(q, *s))
                .into_spec();
            let shuffled = order
                .iter()
                .fold(RequestQuery::new(sample_params()), |q, s| apply(q, *s))
                .into_spec();
            prop_assert_eq!(reference, shuffled);
        }
    }
}
