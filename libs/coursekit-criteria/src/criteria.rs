//! Fluent criteria builder.

use std::fmt;
use std::str::FromStr;

use crate::{SortDir, Value};

/// Comparison operators understood by every repository adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Field value is one of the listed values.
    In,
    /// Case-insensitive substring match.
    Contains,
    /// Field presence; the value is a boolean.
    Exists,
}

impl Operator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::Exists => "exists",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator: {0}")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "in" => Operator::In,
            "contains" => Operator::Contains,
            "exists" => Operator::Exists,
            other => return Err(ParseOperatorError(other.to_owned())),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Criterion {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub dir: SortDir,
}

/// Filters, sort order and pagination for one repository call.
///
/// Building a criteria never fails and never checks field names; unknown
/// fields are reported by the adapter that translates it.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Criteria {
    filters: Vec<Criterion>,
    sorts: Vec<SortSpec>,
    offset: u64,
    limit: u64,
}

impl Default for Criteria {
    fn default() -> Self {
        Self::new()
    }
}

impl Criteria {
    /// Page size used when the caller does not call [`Criteria::take`].
    pub const DEFAULT_LIMIT: u64 = 20;

    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Append a filter. All filters are combined with AND.
    #[doc(alias = "where")]
    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.filters.push(Criterion {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for `filter(field, Operator::Eq, value)`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, Operator::Eq, value)
    }

    pub fn order_by(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.sorts.push(SortSpec {
            field: field.into(),
            dir,
        });
        self
    }

    pub fn skip(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the page size. Zero is raised to one so a page is never empty by
    /// construction.
    pub fn take(mut self, limit: u64) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Append `other`'s filters and sorts. Pagination of `self` is kept.
    pub fn and(mut self, other: Criteria) -> Self {
        self.filters.extend(other.filters);
        self.sorts.extend(other.sorts);
        self
    }

    #[must_use]
    pub fn filters(&self) -> &[Criterion] {
        &self.filters
    }

    #[must_use]
    pub fn sorts(&self) -> &[SortSpec] {
        &self.sorts
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_page_of_twenty() {
        let c = Criteria::new();
        assert!(c.filters().is_empty());
        assert!(c.sorts().is_empty());
        assert_eq!(c.offset(), 0);
        assert_eq!(c.limit(), 20);
    }

    #[test]
    fn builder_appends_in_call_order() {
        let c = Criteria::new()
            .filter("status", Operator::Eq, "PENDING")
            .filter("amount", Operator::Gte, 100_i64)
            .order_by("createdAt", SortDir::Desc)
            .order_by("id", SortDir::Asc)
            .skip(40)
            .take(10);

        assert_eq!(c.filters().len(), 2);
        assert_eq!(c.filters()[0].field, "status");
        assert_eq!(c.filters()[1].op, Operator::Gte);
        assert_eq!(c.sorts()[0].dir, SortDir::Desc);
        assert_eq!(c.sorts()[1].field, "id");
        assert_eq!(c.offset(), 40);
        assert_eq!(c.limit(), 10);
    }

    #[test]
    fn take_zero_is_clamped_to_one() {
        assert_eq!(Criteria::new().take(0).limit(), 1);
    }

    #[test]
    fn and_merges_filters_and_sorts_but_keeps_own_paging() {
        let scope = Criteria::new().eq("domain", "d1").skip(5).take(3);
        let extra = Criteria::new()
            .filter("status", Operator::Neq, "DONE")
            .order_by("title", SortDir::Asc)
            .skip(100)
            .take(100);

        let merged = scope.and(extra);
        assert_eq!(merged.filters().len(), 2);
        assert_eq!(merged.sorts().len(), 1);
        assert_eq!(merged.offset(), 5);
        assert_eq!(merged.limit(), 3);
    }

    #[test]
    fn operator_round_trips_through_its_token() {
        for op in [
            Operator::Eq,
            Operator::Neq,
            Operator::Gt,
            Operator::Gte,
            Operator::Lt,
            Operator::Lte,
            Operator::In,
            Operator::Contains,
            Operator::Exists,
        ] {
            assert_eq!(op.as_str().parse::<Operator>(), Ok(op));
        }
        assert!("like".parse::<Operator>().is_err());
    }
}
