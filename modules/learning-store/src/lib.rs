//! Learning-platform persistence: domain entities, their repositories and
//! the registry that binds each collection to one store.
//!
//! ```ignore
//! let cfg = PersistenceConfig::load(None)?;
//! let conn = coursekit_db::connect(&cfg.database).await?;
//! learning_store::run_migrations(&conn).await?;
//! let registry = Registry::new(&conn, cfg.limits)?.install()?;
//!
//! let tags = registry.users().tag_usage(&site.id).await?;
//! ```

pub mod domain;
pub mod infra;
pub mod registry;

pub use domain::models;
pub use domain::repos::{
    ApiKeyRepository, CommunityRepository, CourseRepository, EnrollmentSummary,
    InvoiceRepository, LessonRepository, MembershipRepository, PaymentPlanRepository,
    SequenceRepository, SiteRepository, TagUsage, UserRepository,
};
pub use infra::storage::migrations::{Migrator, run_migrations};
pub use registry::{Registry, RegistryError};
