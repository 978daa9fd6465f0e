//! Domain entities and their creation and update payloads.

mod api_key;
mod community;
mod course;
mod invoice;
mod lesson;
mod membership;
mod payment_plan;
mod sequence;
mod site;
mod user;

pub use api_key::{ApiKey, ApiKeyPatch, NewApiKey};
pub use community::{Community, CommunityPatch, NewCommunity};
pub use course::{Course, CourseGroup, CoursePatch, NewCourse};
pub use invoice::{Invoice, InvoicePatch, NewInvoice};
pub use lesson::{Lesson, LessonPatch, NewLesson};
pub use membership::{Membership, MembershipPatch, NewMembership};
pub use payment_plan::{NewPaymentPlan, PaymentPlan, PaymentPlanPatch};
pub use sequence::{NewSequence, Sequence, SequencePatch};
pub use site::{NewSite, Site, SitePatch};
pub use user::{NewUser, Purchase, User, UserPatch};
