//! Process-wide table of bound repositories.
//!
//! Built once from the shared pool, then published with [`Registry::install`].
//! Each collection is bound to exactly one store for the life of the process:
//! there is no rebinding and no way to register a second store under a name
//! that is already taken.
//!
//! Lookups come in two flavours:
//! - typed accessors (`users()`, `courses()`, ...) for code that knows the store;
//! - [`Registry::resolve`] by collection name, downcast to the requested store.

use std::{any::Any, collections::HashMap, sync::Arc, sync::OnceLock};

use coursekit_db::LimitCfg;
use sea_orm::DatabaseConnection;

use crate::infra::storage::{
    ApiKeyStore, CommunityStore, CourseStore, InvoiceStore, LessonStore, MembershipStore,
    PaymentPlanStore, SequenceStore, SiteStore, UserStore,
};

type Shared = Arc<dyn Any + Send + Sync>;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry already installed")]
    AlreadyInstalled,

    #[error("collection already bound: {0}")]
    Duplicate(&'static str),

    #[error("no repository bound for collection: {0}")]
    NotFound(String),

    #[error("repository for collection {0} has a different type")]
    TypeMismatch(String),
}

pub struct Registry {
    sites: Arc<SiteStore>,
    users: Arc<UserStore>,
    courses: Arc<CourseStore>,
    lessons: Arc<LessonStore>,
    memberships: Arc<MembershipStore>,
    communities: Arc<CommunityStore>,
    invoices: Arc<InvoiceStore>,
    sequences: Arc<SequenceStore>,
    payment_plans: Arc<PaymentPlanStore>,
    api_keys: Arc<ApiKeyStore>,
    by_name: HashMap<&'static str, Shared>,
}

impl Registry {
    /// Bind every store to `conn`.
    ///
    /// # Errors
    /// [`RegistryError::Duplicate`] if two stores claim one collection name.
    pub fn new(conn: &DatabaseConnection, limits: LimitCfg) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::new();

        let sites = bind(&mut by_name, SiteStore::new(conn.clone(), limits))?;
        let users = bind(&mut by_name, UserStore::new(conn.clone(), limits))?;
        let courses = bind(&mut by_name, CourseStore::new(conn.clone(), limits))?;
        let lessons = bind(&mut by_name, LessonStore::new(conn.clone(), limits))?;
        let memberships = bind(&mut by_name, MembershipStore::new(conn.clone(), limits))?;
        let communities = bind(&mut by_name, CommunityStore::new(conn.clone(), limits))?;
        let invoices = bind(&mut by_name, InvoiceStore::new(conn.clone(), limits))?;
        let sequences = bind(&mut by_name, SequenceStore::new(conn.clone(), limits))?;
        let payment_plans = bind(&mut by_name, PaymentPlanStore::new(conn.clone(), limits))?;
        let api_keys = bind(&mut by_name, ApiKeyStore::new(conn.clone(), limits))?;

        tracing::info!(entities = by_name.len(), max_limit = limits.max, "registry built");

        Ok(Self {
            sites,
            users,
            courses,
            lessons,
            memberships,
            communities,
            invoices,
            sequences,
            payment_plans,
            api_keys,
            by_name,
        })
    }

    /// Publish this registry for the rest of the process.
    ///
    /// # Errors
    /// [`RegistryError::AlreadyInstalled`] on every call after the first.
    pub fn install(self) -> Result<&'static Registry, RegistryError> {
        GLOBAL
            .set(self)
            .map_err(|_| RegistryError::AlreadyInstalled)?;
        tracing::info!("registry installed");
        GLOBAL.get().ok_or(RegistryError::AlreadyInstalled)
    }

    /// The installed registry, if any.
    #[must_use]
    pub fn global() -> Option<&'static Registry> {
        GLOBAL.get()
    }

    /// Store bound to collection `name`, as its concrete type `R`.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] for an unknown name,
    /// [`RegistryError::TypeMismatch`] when `R` is not the bound store's type.
    pub fn resolve<R>(&self, name: &str) -> Result<Arc<R>, RegistryError>
    where
        R: Send + Sync + 'static,
    {
        let shared = self
            .by_name
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))?;
        Arc::clone(shared)
            .downcast::<R>()
            .map_err(|_| RegistryError::TypeMismatch(name.to_owned()))
    }

    /// Bound collection names, sorted.
    #[must_use]
    pub fn entity_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn sites(&self) -> &Arc<SiteStore> {
        &self.sites
    }

    #[must_use]
    pub fn users(&self) -> &Arc<UserStore> {
        &self.users
    }

    #[must_use]
    pub fn courses(&self) -> &Arc<CourseStore> {
        &self.courses
    }

    #[must_use]
    pub fn lessons(&self) -> &Arc<LessonStore> {
        &self.lessons
    }

    #[must_use]
    pub fn memberships(&self) -> &Arc<MembershipStore> {
        &self.memberships
    }

    #[must_use]
    pub fn communities(&self) -> &Arc<CommunityStore> {
        &self.communities
    }

    #[must_use]
    pub fn invoices(&self) -> &Arc<InvoiceStore> {
        &self.invoices
    }

    #[must_use]
    pub fn sequences(&self) -> &Arc<SequenceStore> {
        &self.sequences
    }

    #[must_use]
    pub fn payment_plans(&self) -> &Arc<PaymentPlanStore> {
        &self.payment_plans
    }

    #[must_use]
    pub fn api_keys(&self) -> &Arc<ApiKeyStore> {
        &self.api_keys
    }
}

fn bind<R>(
    by_name: &mut HashMap<&'static str, Shared>,
    store: R,
) -> Result<Arc<R>, RegistryError>
where
    R: NamedStore + Send + Sync + 'static,
{
    let name = store.name();
    if by_name.contains_key(name) {
        return Err(RegistryError::Duplicate(name));
    }
    let store = Arc::new(store);
    by_name.insert(name, Arc::clone(&store) as Shared);
    Ok(store)
}

/// Collection name of a store, independent of its mapping type.
trait NamedStore {
    fn name(&self) -> &'static str;
}

impl<M> NamedStore for coursekit_db::SeaOrmRepository<M>
where
    M: coursekit_db::EntityMapping,
{
    fn name(&self) -> &'static str {
        M::COLLECTION
    }
}
