//! Image loading and re-encoding

use image::{ImageFormat, ImageResult};
use std::io::Cursor;
use std::path::Path;

/// Decode an image file and re-encode it as PNG.
///
/// Decoding up front rejects corrupt or mislabeled files before any request
/// is sent, and the PNG bytes match the `image/png` data URL.
pub fn load_png(path: &Path) -> ImageResult<Vec<u8>> {
	crate::ui::debug(&format!("Loading image: {}", path.display()));
	let img = image::open(path)?;

	let mut bytes = Cursor::new(Vec::new());
	img.write_to(&mut bytes, ImageFormat::Png)?;
	Ok(bytes.into_inner())
}
