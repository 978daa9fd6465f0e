//! sea-orm models, one table per entity. Identifiers and tenant references
//! are native UUIDs; arrays and sub-documents are JSON columns.

pub mod api_key;
pub mod community;
pub mod course;
pub mod invoice;
pub mod lesson;
pub mod membership;
pub mod payment_plan;
pub mod sequence;
pub mod site;
pub mod user;
