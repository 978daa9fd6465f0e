//! Per-entity repository contracts.
//!
//! Each trait extends the generic [`Repository`] with the lookups, upserts,
//! bulk edits and reports that entity needs. Lookups taking a `domain` are
//! scoped to that site; a malformed `domain` is a miss, never an error.

use async_trait::async_trait;
use coursekit_db::{RepoResult, Repository, Upserted};
use serde::{Deserialize, Serialize};

use super::models::{
    ApiKey, Community, Course, Invoice, Lesson, Membership, NewMembership, NewSite, NewUser,
    PaymentPlan, Sequence, Site, User,
};

/// Number of users carrying one tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag: String,
    pub count: u64,
}

/// Enrollment and progress for one course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    pub course_id: String,
    pub title: String,
    pub total_lessons: u64,
    pub enrolled: u64,
    pub lessons_completed: u64,
    /// Mean fraction of the course's lessons completed per enrolled user,
    /// in `0.0..=1.0`. Zero when nobody is enrolled or the course is empty.
    pub average_progress: f64,
}

#[async_trait]
pub trait SiteRepository: Repository<Site> {
    async fn find_by_host(&self, host: &str) -> RepoResult<Option<Site>>;

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Site>>;

    /// Create the site unless one with the same name exists.
    async fn get_or_create_by_name(&self, draft: NewSite) -> RepoResult<Upserted<Site>>;

    /// Add tags to the site's declared set, skipping ones already present.
    async fn add_tags(&self, site_id: &str, tags: &[String]) -> RepoResult<()>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn find_by_user_id(&self, domain: &str, user_id: &str) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, domain: &str, email: &str) -> RepoResult<Option<User>>;

    /// Create the user unless the site already has one with this email.
    async fn find_or_create_by_email(&self, draft: NewUser) -> RepoResult<Upserted<User>>;

    /// Strip `tag` from every user of the site.
    async fn remove_tag_from_all_users(&self, tag: &str, domain: &str) -> RepoResult<()>;

    /// Revoke a drip group from every purchase of `course_id` in the site.
    async fn remove_group_from_purchases(
        &self,
        group_id: &str,
        course_id: &str,
        domain: &str,
    ) -> RepoResult<()>;

    /// Tag usage counts across the site's users, including tags the site
    /// declares that nobody carries. Most used first, then by name.
    async fn tag_usage(&self, domain: &str) -> RepoResult<Vec<TagUsage>>;
}

#[async_trait]
pub trait CourseRepository: Repository<Course> {
    async fn find_by_course_id(&self, domain: &str, course_id: &str) -> RepoResult<Option<Course>>;

    async fn find_by_slug(&self, domain: &str, slug: &str) -> RepoResult<Option<Course>>;

    /// Per-course enrollment and completion figures for the site, courses
    /// without students included. Most enrolled first, then by course id.
    async fn enrollment_progress(&self, domain: &str) -> RepoResult<Vec<EnrollmentSummary>>;
}

#[async_trait]
pub trait LessonRepository: Repository<Lesson> {
    async fn find_by_lesson_id(&self, domain: &str, lesson_id: &str) -> RepoResult<Option<Lesson>>;
}

#[async_trait]
pub trait MembershipRepository: Repository<Membership> {
    async fn find_by_membership_id(
        &self,
        domain: &str,
        membership_id: &str,
    ) -> RepoResult<Option<Membership>>;

    /// The user's membership of one course or community.
    async fn find_for_entity(
        &self,
        domain: &str,
        user_id: &str,
        entity_id: &str,
        entity_type: &str,
    ) -> RepoResult<Option<Membership>>;

    /// Create the membership unless the user already has one for the entity.
    async fn get_or_create(&self, draft: NewMembership) -> RepoResult<Upserted<Membership>>;

    /// Drop a product from the included products of every membership in the
    /// site.
    async fn remove_product_from_memberships(&self, product_id: &str, domain: &str)
    -> RepoResult<()>;
}

#[async_trait]
pub trait CommunityRepository: Repository<Community> {
    async fn find_by_community_id(
        &self,
        domain: &str,
        community_id: &str,
    ) -> RepoResult<Option<Community>>;

    async fn find_by_name(&self, domain: &str, name: &str) -> RepoResult<Option<Community>>;
}

#[async_trait]
pub trait InvoiceRepository: Repository<Invoice> {
    async fn find_by_invoice_id(&self, domain: &str, invoice_id: &str)
    -> RepoResult<Option<Invoice>>;
}

#[async_trait]
pub trait SequenceRepository: Repository<Sequence> {
    async fn find_by_sequence_id(
        &self,
        domain: &str,
        sequence_id: &str,
    ) -> RepoResult<Option<Sequence>>;
}

#[async_trait]
pub trait PaymentPlanRepository: Repository<PaymentPlan> {
    async fn find_by_plan_id(&self, domain: &str, plan_id: &str) -> RepoResult<Option<PaymentPlan>>;
}

#[async_trait]
pub trait ApiKeyRepository: Repository<ApiKey> {
    async fn find_by_key(&self, domain: &str, key: &str) -> RepoResult<Option<ApiKey>>;
}
