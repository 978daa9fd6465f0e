//! Storage adapters: one sea-orm entity, mapping and store per collection.

pub mod entity;
pub mod migrations;

mod json_ops;

mod api_key_repo;
mod community_repo;
mod course_repo;
mod invoice_repo;
mod lesson_repo;
mod membership_repo;
mod payment_plan_repo;
mod sequence_repo;
mod site_repo;
mod user_repo;

pub use api_key_repo::{ApiKeyMapping, ApiKeyStore};
pub use community_repo::{CommunityMapping, CommunityStore};
pub use course_repo::{CourseMapping, CourseStore};
pub use invoice_repo::{InvoiceMapping, InvoiceStore};
pub use lesson_repo::{LessonMapping, LessonStore};
pub use membership_repo::{MembershipMapping, MembershipStore};
pub use payment_plan_repo::{PaymentPlanMapping, PaymentPlanStore};
pub use sequence_repo::{SequenceMapping, SequenceStore};
pub use site_repo::{SiteMapping, SiteStore};
pub use user_repo::{UserMapping, UserStore};
