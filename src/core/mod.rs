//! Core domain types

pub mod job;
pub mod media;
pub mod naming;

pub use job::{BatchJob, FailurePolicy};
pub use media::is_supported_image;
pub use naming::{OutputNames, RenamePolicy};
