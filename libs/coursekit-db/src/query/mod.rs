//! Criteria to sea-orm translation.
//!
//! The adapter never builds a `WHERE` clause anywhere else: counting, deleting
//! and fetching all go through [`filter_condition`], so a page's `total` and
//! its `data` always describe the same set.

pub mod field_map;
pub mod ident;
pub mod kind;
pub mod translate;

pub use field_map::{Field, FieldMap};
pub use ident::{id_to_string, new_id, parse_id};
pub use kind::FieldKind;
pub use translate::{Translated, TranslateError, filter_condition, order_keys};

use serde::{Deserialize, Serialize};

/// Upper bound applied to every page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitCfg {
    pub max: u64,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self { max: 1000 }
    }
}

/// Clamp a requested page size into `1..=cfg.max`.
#[must_use]
pub fn clamp_limit(requested: u64, cfg: LimitCfg) -> u64 {
    requested.clamp(1, cfg.max.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_only_narrows() {
        let cfg = LimitCfg { max: 50 };
        assert_eq!(clamp_limit(0, cfg), 1);
        assert_eq!(clamp_limit(20, cfg), 20);
        assert_eq!(clamp_limit(500, cfg), 50);
    }
}
