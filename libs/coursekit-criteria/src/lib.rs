#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Backend-neutral query description for CourseKit repositories.
//!
//! A [`Criteria`] is built at the call site, handed by value to exactly one
//! repository call and translated there into the backing store's native query.
//! Nothing in this crate knows about a database; field names are plain strings
//! and are only resolved by the adapter that consumes the criteria.
//!
//! ```
//! use coursekit_criteria::{Criteria, Operator, SortDir};
//!
//! let pending = Criteria::new()
//!     .filter("status", Operator::Eq, "PENDING")
//!     .order_by("createdAt", SortDir::Desc)
//!     .take(10);
//! assert_eq!(pending.limit(), 10);
//! ```

pub mod criteria;
pub mod page;
pub mod value;

pub use criteria::{Criteria, Criterion, Operator, ParseOperatorError, SortSpec};
pub use page::PaginationResult;
pub use value::Value;

// Ordering primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc)
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}
