//! Staged aggregation over JSON documents.
//!
//! A [`Pipeline`] is a list of stages applied in order to a batch of
//! documents: `match`, `project`, `unwind`, `group`, `union_with`, `lookup`,
//! `sort` and `limit`. Repositories fetch the source rows with a native,
//! tenant-scoped query and run the rest of the pipeline in process, so the
//! same aggregation definition works on every backend.
//!
//! ```
//! use coursekit_criteria::SortDir;
//! use coursekit_db::pipeline::{Accumulator, Pipeline};
//! use serde_json::json;
//!
//! let users = vec![
//!     json!({"tags": ["a", "b"]}),
//!     json!({"tags": ["a"]}),
//! ];
//! let out = Pipeline::new()
//!     .unwind("tags")
//!     .group("tags", [("count", Accumulator::Count)])
//!     .sort([("count", SortDir::Desc)])
//!     .run(users)
//!     .unwrap();
//! assert_eq!(out[0], json!({"_id": "a", "count": 2}));
//! ```

mod eval;

use std::collections::HashMap;

use coursekit_criteria::{Criteria, Criterion, SortDir};
use serde_json::{Map, Value as Json};
use thiserror::Error;

use eval::{compare, get_path, matches, set_path};

/// Key under which `group` stores the grouping value.
pub const GROUP_KEY: &str = "_id";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{stage}: {reason}")]
    InvalidArgument { stage: &'static str, reason: String },
}

/// Computed output field of a `project` stage.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// Copy the value at a dotted path.
    Field(String),
    /// Length of the array at a dotted path; 0 when missing.
    Size(String),
    Literal(Json),
}

/// Per-group reduction of a `group` stage.
#[derive(Clone, Debug, PartialEq)]
pub enum Accumulator {
    Count,
    Sum(String),
    Avg(String),
    /// First non-null value in input order.
    First(String),
    Max(String),
    Min(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    Match(Vec<Criterion>),
    Project(Vec<(String, Projection)>),
    Unwind(String),
    Group {
        key: String,
        accumulators: Vec<(String, Accumulator)>,
    },
    UnionWith(Vec<Json>),
    Lookup {
        from: Vec<Json>,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    Sort(Vec<(String, SortDir)>),
    Limit(usize),
}

#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Keep documents matching every filter of `criteria`. Sorting and
    /// pagination of the criteria are ignored.
    pub fn matching(self, criteria: &Criteria) -> Self {
        self.stage(Stage::Match(criteria.filters().to_vec()))
    }

    pub fn project<I, K>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Projection)>,
        K: Into<String>,
    {
        self.stage(Stage::Project(
            fields.into_iter().map(|(k, p)| (k.into(), p)).collect(),
        ))
    }

    pub fn unwind(self, path: impl Into<String>) -> Self {
        self.stage(Stage::Unwind(path.into()))
    }

    pub fn group<I, K>(self, key: impl Into<String>, accumulators: I) -> Self
    where
        I: IntoIterator<Item = (K, Accumulator)>,
        K: Into<String>,
    {
        self.stage(Stage::Group {
            key: key.into(),
            accumulators: accumulators
                .into_iter()
                .map(|(k, a)| (k.into(), a))
                .collect(),
        })
    }

    /// Append documents from a second source.
    pub fn union_with(self, docs: Vec<Json>) -> Self {
        self.stage(Stage::UnionWith(docs))
    }

    /// Attach, under `as_field`, every document of `from` whose
    /// `foreign_field` equals this document's `local_field`.
    pub fn lookup(
        self,
        from: Vec<Json>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        self.stage(Stage::Lookup {
            from,
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
        })
    }

    pub fn sort<I, K>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = (K, SortDir)>,
        K: Into<String>,
    {
        self.stage(Stage::Sort(
            keys.into_iter().map(|(k, d)| (k.into(), d)).collect(),
        ))
    }

    pub fn limit(self, n: usize) -> Self {
        self.stage(Stage::Limit(n))
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage over `docs`.
    ///
    /// # Errors
    /// Returns `PipelineError` when a stage argument does not fit the data,
    /// e.g. an `in` filter without a list.
    pub fn run(self, docs: Vec<Json>) -> Result<Vec<Json>, PipelineError> {
        self.stages
            .into_iter()
            .try_fold(docs, |docs, stage| apply(stage, docs))
    }
}

fn apply(stage: Stage, docs: Vec<Json>) -> Result<Vec<Json>, PipelineError> {
    Ok(match stage {
        Stage::Match(filters) => {
            let mut kept = Vec::with_capacity(docs.len());
            for doc in docs {
                if all_match(&doc, &filters)? {
                    kept.push(doc);
                }
            }
            kept
        }
        Stage::Project(fields) => docs.iter().map(|doc| project(doc, &fields)).collect(),
        Stage::Unwind(path) => docs.into_iter().flat_map(|doc| unwind(doc, &path)).collect(),
        Stage::Group { key, accumulators } => group(&docs, &key, &accumulators),
        Stage::UnionWith(extra) => {
            let mut docs = docs;
            docs.extend(extra);
            docs
        }
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => docs
            .into_iter()
            .map(|mut doc| {
                let local = get_path(&doc, &local_field).cloned().unwrap_or(Json::Null);
                let joined = from
                    .iter()
                    .filter(|f| {
                        get_path(f, &foreign_field).is_some_and(|v| compare(v, &local).is_eq())
                    })
                    .cloned()
                    .collect();
                set_path(&mut doc, &as_field, Json::Array(joined));
                doc
            })
            .collect(),
        Stage::Sort(keys) => {
            let mut docs = docs;
            docs.sort_by(|a, b| {
                keys.iter()
                    .map(|(path, dir)| {
                        let ord = compare(
                            get_path(a, path).unwrap_or(&Json::Null),
                            get_path(b, path).unwrap_or(&Json::Null),
                        );
                        match dir {
                            SortDir::Asc => ord,
                            SortDir::Desc => ord.reverse(),
                        }
                    })
                    .find(|o| o.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            docs
        }
        Stage::Limit(n) => {
            let mut docs = docs;
            docs.truncate(n);
            docs
        }
    })
}

fn all_match(doc: &Json, filters: &[Criterion]) -> Result<bool, PipelineError> {
    for c in filters {
        if !matches(doc, c)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn project(doc: &Json, fields: &[(String, Projection)]) -> Json {
    let mut out = Json::Object(Map::new());
    for (name, projection) in fields {
        let value = match projection {
            Projection::Field(path) => get_path(doc, path).cloned().unwrap_or(Json::Null),
            Projection::Size(path) => Json::from(
                get_path(doc, path)
                    .and_then(Json::as_array)
                    .map_or(0, Vec::len),
            ),
            Projection::Literal(v) => v.clone(),
        };
        set_path(&mut out, name, value);
    }
    out
}

/// One document per array element; documents without elements are dropped.
fn unwind(doc: Json, path: &str) -> Vec<Json> {
    match get_path(&doc, path) {
        Some(Json::Array(items)) => items
            .clone()
            .into_iter()
            .map(|item| {
                let mut copy = doc.clone();
                set_path(&mut copy, path, item);
                copy
            })
            .collect(),
        Some(Json::Null) | None => Vec::new(),
        Some(_) => vec![doc],
    }
}

/// Running state of one accumulator within one group.
enum Acc {
    Count(i64),
    Sum { int: i64, float: f64, is_float: bool },
    Avg { sum: f64, n: u32 },
    Pick(Option<Json>),
}

impl Acc {
    fn new(a: &Accumulator) -> Self {
        match a {
            Accumulator::Count => Acc::Count(0),
            Accumulator::Sum(_) => Acc::Sum {
                int: 0,
                float: 0.0,
                is_float: false,
            },
            Accumulator::Avg(_) => Acc::Avg { sum: 0.0, n: 0 },
            Accumulator::First(_) | Accumulator::Max(_) | Accumulator::Min(_) => Acc::Pick(None),
        }
    }

    fn feed(&mut self, a: &Accumulator, doc: &Json) {
        let value = |path: &str| get_path(doc, path).filter(|v| !v.is_null());
        match (self, a) {
            (Acc::Count(n), Accumulator::Count) => *n += 1,
            (Acc::Sum { int, float, is_float }, Accumulator::Sum(path)) => {
                let Some(Json::Number(num)) = value(path) else {
                    return;
                };
                if let Some(i) = num.as_i64() {
                    match int.checked_add(i) {
                        Some(total) => *int = total,
                        None => {
                            // past i64; carry on in floating point
                            #[allow(clippy::cast_precision_loss)]
                            let spill = *int as f64 + i as f64;
                            *float += spill;
                            *int = 0;
                            *is_float = true;
                        }
                    }
                } else {
                    *is_float = true;
                    *float += num.as_f64().unwrap_or(0.0);
                }
            }
            (Acc::Avg { sum, n }, Accumulator::Avg(path)) => {
                if let Some(f) = value(path).and_then(Json::as_f64) {
                    *sum += f;
                    *n += 1;
                }
            }
            (Acc::Pick(current), Accumulator::First(path)) => {
                if current.is_none() {
                    *current = value(path).cloned();
                }
            }
            (Acc::Pick(current), Accumulator::Max(path) | Accumulator::Min(path)) => {
                let Some(v) = value(path) else {
                    return;
                };
                let want = if matches!(a, Accumulator::Max(_)) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Less
                };
                if current.as_ref().is_none_or(|c| compare(v, c) == want) {
                    *current = Some(v.clone());
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Json {
        match self {
            Acc::Count(n) => Json::from(n),
            Acc::Sum {
                int,
                float,
                is_float,
            } => {
                if is_float {
                    #[allow(clippy::cast_precision_loss)]
                    let total = float + int as f64;
                    Json::from(total)
                } else {
                    Json::from(int)
                }
            }
            Acc::Avg { sum, n } => {
                if n == 0 {
                    Json::Null
                } else {
                    Json::from(sum / f64::from(n))
                }
            }
            Acc::Pick(v) => v.unwrap_or(Json::Null),
        }
    }
}

/// Groups in order of first appearance so results are deterministic.
fn group(docs: &[Json], key: &str, accumulators: &[(String, Accumulator)]) -> Vec<Json> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Json, Vec<Acc>)> = Vec::new();

    for doc in docs {
        let k = get_path(doc, key).cloned().unwrap_or(Json::Null);
        let slot = *index.entry(k.to_string()).or_insert_with(|| {
            groups.push((k, accumulators.iter().map(|(_, a)| Acc::new(a)).collect()));
            groups.len() - 1
        });
        for ((_, a), acc) in accumulators.iter().zip(groups[slot].1.iter_mut()) {
            acc.feed(a, doc);
        }
    }

    groups
        .into_iter()
        .map(|(k, accs)| {
            let mut out = Map::new();
            out.insert(GROUP_KEY.to_owned(), k);
            for ((name, _), acc) in accumulators.iter().zip(accs) {
                out.insert(name.clone(), acc.finish());
            }
            Json::Object(out)
        })
        .collect()
}
