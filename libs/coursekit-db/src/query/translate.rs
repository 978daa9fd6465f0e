use chrono::{DateTime, Utc};
use coursekit_criteria::{Criteria, Criterion, Operator, SortDir, SortSpec, Value};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{BinOper, Expr, Func, Order, SimpleExpr},
};
use thiserror::Error;

use super::{FieldKind, FieldMap, LimitCfg, clamp_limit, parse_id};

/// Field used to make sorted pages stable when sort keys tie.
const TIEBREAKER: &str = "id";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("type mismatch on {field}: expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        got: &'static str,
    },

    #[error("operator {op} on {field} needs a list value")]
    ExpectedList { field: String, op: Operator },

    #[error("operator {op} is not supported on {kind} field {field}")]
    UnsupportedOp {
        field: String,
        op: Operator,
        kind: FieldKind,
    },
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/* ---------- coercion helpers ---------- */

/// Outcome of coercing a literal against a column kind.
enum Coerced {
    Value(sea_orm::Value),
    /// An identifier string that can never equal a native key.
    Malformed,
}

fn mismatch(field: &str, expected: FieldKind, v: &Value) -> TranslateError {
    TranslateError::TypeMismatch {
        field: field.to_owned(),
        expected,
        got: v.type_name(),
    }
}

fn coerce(field: &str, kind: FieldKind, v: &Value) -> TranslateResult<Coerced> {
    let value: sea_orm::Value = match (kind, v) {
        (FieldKind::String, Value::String(s)) => s.clone().into(),
        (FieldKind::I64, Value::Int(i)) => (*i).into(),
        (FieldKind::F64, Value::Float(f)) => (*f).into(),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::F64, Value::Int(i)) => (*i as f64).into(),
        (FieldKind::Bool, Value::Bool(b)) => (*b).into(),
        (FieldKind::Id, Value::String(s)) => match parse_id(s) {
            Some(id) => id.into(),
            None => return Ok(Coerced::Malformed),
        },
        (FieldKind::DateTimeUtc, Value::DateTime(dt)) => (*dt).into(),
        (FieldKind::DateTimeUtc, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map_err(|_| mismatch(field, kind, v))?
            .with_timezone(&Utc)
            .into(),
        (expected, other) => return Err(mismatch(field, expected, other)),
    };
    Ok(Coerced::Value(value))
}

/* ---------- LIKE helpers ---------- */

pub(crate) fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// `LOWER(col) LIKE LOWER(pattern) ESCAPE '\'`.
///
/// Both sides are lowered by the database so they agree on which letters
/// fold; SQLite's `LOWER` only folds ASCII.
fn contains_ci(col: SimpleExpr, s: &str) -> SimpleExpr {
    let pattern = SimpleExpr::Binary(
        Box::new(Func::lower(Expr::val(format!("%{}%", like_escape(s)))).into()),
        BinOper::Escape,
        Box::new(SimpleExpr::Constant('\\'.into())),
    );
    SimpleExpr::Binary(
        Box::new(Func::lower(col).into()),
        BinOper::Like,
        Box::new(pattern),
    )
}

/* ---------- constant conditions ---------- */

fn never() -> Condition {
    Condition::all().add(Expr::cust("1=0"))
}

fn always() -> Condition {
    Condition::all().add(Expr::cust("1=1"))
}

fn single(expr: SimpleExpr) -> Condition {
    Condition::all().add(expr)
}

/* ---------- Criterion -> Condition ---------- */

fn criterion_condition<E>(c: &Criterion, fmap: &FieldMap<E>) -> TranslateResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let field = fmap
        .get(&c.field)
        .ok_or_else(|| TranslateError::UnknownField(c.field.clone()))?;
    let col = field.col;
    let unsupported = || TranslateError::UnsupportedOp {
        field: c.field.clone(),
        op: c.op,
        kind: field.kind,
    };

    match c.op {
        Operator::Exists => {
            let Value::Bool(present) = c.value else {
                return Err(mismatch(&c.field, FieldKind::Bool, &c.value));
            };
            Ok(single(if present {
                Expr::col(col).is_not_null()
            } else {
                Expr::col(col).is_null()
            }))
        }

        Operator::In => {
            let Value::List(items) = &c.value else {
                return Err(TranslateError::ExpectedList {
                    field: c.field.clone(),
                    op: c.op,
                });
            };
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Coerced::Value(v) = coerce(&c.field, field.kind, item)? {
                    values.push(v);
                }
            }
            if values.is_empty() {
                // IN () matches nothing
                Ok(never())
            } else {
                Ok(single(Expr::col(col).is_in(values)))
            }
        }

        Operator::Contains => match (field.kind, &c.value) {
            (FieldKind::String, Value::String(s)) => {
                Ok(single(contains_ci(Expr::col(col).into(), s)))
            }
            // Native keys are not text; a substring match can never hit.
            (FieldKind::Id, Value::String(_)) => Ok(never()),
            (FieldKind::String | FieldKind::Id, other) => {
                Err(mismatch(&c.field, FieldKind::String, other))
            }
            _ => Err(unsupported()),
        },

        Operator::Eq
        | Operator::Neq
        | Operator::Gt
        | Operator::Gte
        | Operator::Lt
        | Operator::Lte => {
            if c.value.is_null() {
                return match c.op {
                    Operator::Eq => Ok(single(Expr::col(col).is_null())),
                    Operator::Neq => Ok(single(Expr::col(col).is_not_null())),
                    _ => Err(unsupported()),
                };
            }
            let value = match coerce(&c.field, field.kind, &c.value)? {
                Coerced::Value(v) => v,
                Coerced::Malformed if c.op == Operator::Neq => return Ok(always()),
                Coerced::Malformed => return Ok(never()),
            };
            let expr = match c.op {
                Operator::Eq => Expr::col(col).eq(value),
                Operator::Neq => Expr::col(col).ne(value),
                Operator::Gt => Expr::col(col).gt(value),
                Operator::Gte => Expr::col(col).gte(value),
                Operator::Lt => Expr::col(col).lt(value),
                _ => Expr::col(col).lte(value),
            };
            Ok(single(expr))
        }
    }
}

/// Translate a filter list into one AND-ed condition.
///
/// This is the only filter translation in the crate; count, delete and every
/// fetch path call it.
///
/// # Errors
/// Returns `TranslateError` for unknown fields, type mismatches or operators
/// that do not apply to the field's kind.
pub fn filter_condition<E>(filters: &[Criterion], fmap: &FieldMap<E>) -> TranslateResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    filters.iter().try_fold(Condition::all(), |acc, c| {
        Ok(acc.add(criterion_condition(c, fmap)?))
    })
}

/// Resolve sort specs to columns, appending `id asc` when a sort is present
/// and does not already include it.
///
/// # Errors
/// Returns `TranslateError::UnknownField` for an unmapped sort field.
pub fn order_keys<E>(
    sorts: &[SortSpec],
    fmap: &FieldMap<E>,
) -> TranslateResult<Vec<(E::Column, Order)>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut keys = Vec::with_capacity(sorts.len() + 1);
    for s in sorts {
        let field = fmap
            .get(&s.field)
            .ok_or_else(|| TranslateError::UnknownField(s.field.clone()))?;
        let order = match s.dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        };
        keys.push((field.col, order));
    }
    let has_tiebreaker = sorts
        .iter()
        .any(|s| s.field.eq_ignore_ascii_case(TIEBREAKER));
    if !sorts.is_empty()
        && !has_tiebreaker
        && let Some(field) = fmap.get(TIEBREAKER)
    {
        keys.push((field.col, Order::Asc));
    }
    Ok(keys)
}

/// A criteria resolved against one entity's columns.
#[derive(Clone, Debug)]
pub struct Translated<E: EntityTrait> {
    pub condition: Condition,
    pub order: Vec<(E::Column, Order)>,
    pub offset: u64,
    pub limit: u64,
}

impl<E> Translated<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// # Errors
    /// Returns `TranslateError` if a filter or sort cannot be translated.
    pub fn new(criteria: &Criteria, fmap: &FieldMap<E>, limits: LimitCfg) -> TranslateResult<Self> {
        Ok(Self {
            condition: filter_condition(criteria.filters(), fmap)?,
            order: order_keys(criteria.sorts(), fmap)?,
            offset: criteria.offset(),
            limit: clamp_limit(criteria.limit(), limits),
        })
    }

    /// Filtered and ordered select without the page window.
    #[must_use]
    pub fn filtered(&self) -> Select<E> {
        let mut select = E::find().filter(self.condition.clone());
        for (col, order) in &self.order {
            select = select.order_by(*col, order.clone());
        }
        select
    }

    /// Filtered, ordered and windowed select.
    #[must_use]
    pub fn select(&self) -> Select<E> {
        self.filtered().offset(self.offset).limit(self.limit)
    }
}
