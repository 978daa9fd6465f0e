#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Persistence plumbing shared by every CourseKit entity.
//!
//! - [`Repository`]: the storage-agnostic CRUD and query contract.
//! - [`SeaOrmRepository`]: its one implementation, parameterised by an
//!   [`EntityMapping`] that binds a sea-orm entity to a domain entity.
//! - [`query`]: criteria translation, including lenient identifier coercion.
//! - [`pipeline`]: staged in-process aggregation for reporting queries.
//! - [`config`] / [`connect()`]: settings and the shared connection pool.
//!
//! ```ignore
//! let cfg = PersistenceConfig::load(Some(Path::new("config/persistence.yaml")))?;
//! let conn = coursekit_db::connect(&cfg.database).await?;
//! let users: SeaOrmRepository<UserMapping> = SeaOrmRepository::new(conn, cfg.limits);
//!
//! let page = users
//!     .find_paginated(Criteria::new().eq("domain", site_id).take(25))
//!     .await?;
//! ```

pub mod adapter;
pub mod bulk;
pub mod config;
pub mod connect;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod query;
pub mod repository;

pub use adapter::SeaOrmRepository;
pub use config::{ConfigError, DatabaseConfig, PersistenceConfig};
pub use connect::connect;
pub use error::{RepoError, RepoResult};
pub use mapping::{DomainEntity, EntityMapping, tenant_ref};
pub use query::{FieldKind, FieldMap, LimitCfg, id_to_string, parse_id};
pub use repository::{Repository, Upserted};

// Re-export the criteria vocabulary so callers need one import.
pub use coursekit_criteria::{Criteria, Criterion, Operator, PaginationResult, SortDir, Value};
