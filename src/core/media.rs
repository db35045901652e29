//! Image file detection

use std::path::Path;
use crate::config::IMAGE_EXTENSIONS;

/// True when the extension is one of the supported image formats (any case).
pub fn is_supported_image(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
		.unwrap_or(false)
}
