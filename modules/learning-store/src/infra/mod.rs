//! Infrastructure layer: sea-orm storage behind the domain repository traits.

pub mod storage;
