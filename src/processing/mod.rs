//! Image processing pipeline

pub mod batch;
pub mod image;
pub mod scan;

pub use batch::{run_batch, BatchError, BatchReport, FileOutcome};
pub use scan::scan_images;
