//! Structured filter predicates.
//!
//! A [`FilterExpression`] maps each field to exactly one [`FieldPredicate`].
//! Constraints targeting the same field are merged into that predicate, never
//! overwritten, and every merge rule is commutative so the final expression
//! does not depend on the order in which constraints were added:
//!
//! - equality values accumulate as a set (all must hold)
//! - set constraints intersect
//! - a repeated range bound keeps the tighter value of each scalar kind;
//!   values of different kinds are all kept and must all hold
//! - search fields accumulate as a set

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ValidationError;
use crate::scalar::Scalar;

/// One side of a range constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
}

impl RangeBound {
    /// Maps a comparison token (`gte`, `gt`, `lte`, `lt`) to a bound.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gte" => Some(RangeBound::GreaterOrEqual),
            "gt" => Some(RangeBound::Greater),
            "lte" => Some(RangeBound::LessOrEqual),
            "lt" => Some(RangeBound::Less),
            _ => None,
        }
    }
}

/// Values of one side of a range, all of which must hold.
///
/// Holds at most one value per scalar kind. A new value of a kind already
/// present replaces it only if it is tighter; a value of another kind is
/// added alongside, since a text bound and a date bound cannot be ordered
/// against each other. Values are kept in [`Scalar`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bound(Vec<Scalar>);

impl Bound {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        &self.0
    }

    /// The bound's value when it holds exactly one.
    #[must_use]
    pub fn single(&self) -> Option<&Scalar> {
        match self.0.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }

    fn tighten(&mut self, value: Scalar, pick: fn(Scalar, Scalar) -> Scalar) {
        match self.0.iter().position(|current| current.same_kind(&value)) {
            Some(index) => {
                let current = self.0.remove(index);
                self.0.insert(index, pick(current, value));
            }
            None => {
                let index = self.0.partition_point(|current| *current < value);
                self.0.insert(index, value);
            }
        }
    }
}

/// Range constraint. An all-empty range is unbounded and matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Range {
    pub greater_or_equal: Bound,
    pub greater: Bound,
    pub less_or_equal: Bound,
    pub less: Bound,
}

impl Range {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.greater_or_equal.is_empty()
            && self.greater.is_empty()
            && self.less_or_equal.is_empty()
            && self.less.is_empty()
    }

    /// Adds one bound value, keeping the tighter value per scalar kind.
    pub fn set(&mut self, bound: RangeBound, value: Scalar) {
        match bound {
            RangeBound::GreaterOrEqual => self.greater_or_equal.tighten(value, Scalar::max),
            RangeBound::Greater => self.greater.tighten(value, Scalar::max),
            RangeBound::LessOrEqual => self.less_or_equal.tighten(value, Scalar::min),
            RangeBound::Less => self.less.tighten(value, Scalar::min),
        }
    }

    /// Merges every bound of `other` into `self`.
    pub fn merge(&mut self, other: Range) {
        let bounds = [
            (RangeBound::GreaterOrEqual, other.greater_or_equal),
            (RangeBound::Greater, other.greater),
            (RangeBound::LessOrEqual, other.less_or_equal),
            (RangeBound::Less, other.less),
        ];
        for (bound, values) in bounds {
            for value in values.0 {
                self.set(bound, value);
            }
        }
    }
}

/// All constraints on a single field, combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPredicate {
    /// The field must equal every value in this set.
    pub equals: BTreeSet<Scalar>,
    /// The field must equal one of these values. `None` means unconstrained;
    /// `Some(empty)` matches nothing.
    pub one_of: Option<BTreeSet<Scalar>>,
    pub range: Range,
}

impl FieldPredicate {
    pub fn merge(&mut self, other: FieldPredicate) {
        self.equals.extend(other.equals);
        if let Some(values) = other.one_of {
            self.restrict_to(values);
        }
        self.range.merge(other.range);
    }

    fn restrict_to(&mut self, values: BTreeSet<Scalar>) {
        self.one_of = Some(match self.one_of.take() {
            Some(current) => current.intersection(&values).cloned().collect(),
            None => values,
        });
    }
}

/// Case-insensitive substring match of `term` against any of `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    pub term: String,
    pub fields: BTreeSet<String>,
}

/// Structured predicate derived from request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    fields: BTreeMap<String, FieldPredicate>,
    search: Option<SearchClause>,
}

impl FilterExpression {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.search.is_none()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldPredicate> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldPredicate)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn search(&self) -> Option<&SearchClause> {
        self.search.as_ref()
    }

    fn predicate_mut(&mut self, field: &str) -> &mut FieldPredicate {
        self.fields.entry(field.to_string()).or_default()
    }

    pub fn add_equals(&mut self, field: &str, value: Scalar) {
        self.predicate_mut(field).equals.insert(value);
    }

    pub fn add_one_of(&mut self, field: &str, values: impl IntoIterator<Item = Scalar>) {
        self.predicate_mut(field)
            .restrict_to(values.into_iter().collect());
    }

    pub fn add_bound(&mut self, field: &str, bound: RangeBound, value: Scalar) {
        self.predicate_mut(field).range.set(bound, value);
    }

    pub fn add_range(&mut self, field: &str, range: Range) {
        if !range.is_unbounded() {
            self.predicate_mut(field).range.merge(range);
        }
    }

    /// Adds a search disjunction. Fields accumulate across calls.
    pub fn add_search<I, S>(&mut self, term: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: BTreeSet<String> = fields.into_iter().map(Into::into).collect();
        if term.trim().is_empty() || fields.is_empty() {
            return;
        }
        match &mut self.search {
            Some(clause) if clause.term == term => clause.fields.extend(fields),
            slot => {
                *slot = Some(SearchClause {
                    term: term.to_string(),
                    fields,
                });
            }
        }
    }

    /// Adds the constraints of a `field[op]=value` operator mapping.
    ///
    /// `gte`, `gt`, `lte` and `lt` become range bounds; `eq` becomes an
    /// equality; `in` takes a comma-separated list and becomes a set
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for any other operator token.
    pub fn add_operators(
        &mut self,
        field: &str,
        operators: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), ValidationError> {
        for (token, values) in operators {
            if let Some(bound) = RangeBound::from_token(token) {
                for raw in values {
                    self.add_bound(field, bound, Scalar::infer(raw));
                }
                continue;
            }
            match token.as_str() {
                "eq" => {
                    for raw in values {
                        self.add_equals(field, Scalar::infer(raw));
                    }
                }
                "in" => self.add_one_of(
                    field,
                    values.iter().flat_map(|raw| split_list(raw)).map(Scalar::infer),
                ),
                other => {
                    return Err(ValidationError::new(
                        field,
                        format!("unsupported operator `{other}`"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Merges another expression into this one.
    pub fn merge(&mut self, other: FilterExpression) {
        for (field, predicate) in other.fields {
            self.predicate_mut(&field).merge(predicate);
        }
        if let Some(clause) = other.search {
            self.add_search(&clause.term, clause.fields);
        }
    }
}

/// Splits a comma-separated parameter, trimming and dropping empty segments.
pub(crate) fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
