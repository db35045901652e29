//! Output file naming

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::config::CAPTION_EXT;

/// Optional sequential renaming applied uniformly across a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePolicy {
	pub enabled: bool,
	pub prefix: String,
	pub suffix: String,
	pub start_number: u32,
}

impl RenamePolicy {
	pub fn disabled() -> Self {
		Self { start_number: 1, ..Self::default() }
	}

	pub fn sequence(prefix: impl Into<String>, suffix: impl Into<String>, start_number: u32) -> Self {
		Self {
			enabled: true,
			prefix: prefix.into(),
			suffix: suffix.into(),
			start_number,
		}
	}
}

/// File names written to the output directory for one source image.
///
/// Names are kept as `OsString` so a source name that is not valid UTF-8 is
/// reproduced byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
	pub image: OsString,
	pub caption: OsString,
}

impl OutputNames {
	/// Derive names for the file at `index` in the sorted enumeration.
	///
	/// Renamed files are `{prefix}{seq:04}{suffix}` with the original extension,
	/// where `seq = start_number + index`.
	pub fn derive(original: &Path, index: usize, policy: &RenamePolicy) -> Self {
		let filename = original.file_name().map(OsStr::to_os_string).unwrap_or_default();

		if !policy.enabled {
			return Self {
				caption: Path::new(&filename).with_extension(CAPTION_EXT).into_os_string(),
				image: filename,
			};
		}

		let number = u64::from(policy.start_number) + index as u64;
		let base = format!("{}{:04}{}", policy.prefix, number, policy.suffix);
		let mut image = OsString::from(&base);
		if let Some(ext) = original.extension() {
			image.push(".");
			image.push(ext);
		}

		Self {
			image,
			caption: OsString::from(format!("{}.{}", base, CAPTION_EXT)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_original_names_without_rename() {
		let names = OutputNames::derive(Path::new("in/Sunset.Beach.JPG"), 3, &RenamePolicy::disabled());
		assert_eq!(names.image, "Sunset.Beach.JPG");
		assert_eq!(names.caption, "Sunset.Beach.txt");
	}

	#[test]
	fn numbers_from_start_plus_index() {
		let policy = RenamePolicy::sequence("img_", "", 5);
		let names: Vec<_> = ["a.png", "b.jpg", "c.webp"]
			.iter()
			.enumerate()
			.map(|(i, f)| OutputNames::derive(Path::new(f), i, &policy))
			.collect();

		assert_eq!(names[0].image, "img_0005.png");
		assert_eq!(names[1].image, "img_0006.jpg");
		assert_eq!(names[2].image, "img_0007.webp");
		assert_eq!(names[0].caption, "img_0005.txt");
		assert_eq!(names[2].caption, "img_0007.txt");
	}

	#[test]
	fn suffix_goes_before_extension() {
		let policy = RenamePolicy::sequence("cat-", "_v2", 1);
		let names = OutputNames::derive(Path::new("x.PNG"), 0, &policy);
		assert_eq!(names.image, "cat-0001_v2.PNG");
		assert_eq!(names.caption, "cat-0001_v2.txt");
	}

	#[test]
	fn wide_numbers_are_not_truncated() {
		let policy = RenamePolicy::sequence("", "", 9999);
		assert_eq!(OutputNames::derive(Path::new("a.gif"), 0, &policy).image, "9999.gif");
		assert_eq!(OutputNames::derive(Path::new("a.gif"), 1, &policy).image, "10000.gif");
	}

	#[test]
	fn start_number_near_max_does_not_overflow() {
		let policy = RenamePolicy::sequence("", "", u32::MAX);
		let names = OutputNames::derive(Path::new("a.bmp"), 1, &policy);
		assert_eq!(names.image, "4294967296.bmp");
	}

	#[test]
	#[cfg(unix)]
	fn non_utf8_names_are_kept_verbatim() {
		use std::os::unix::ffi::OsStrExt;

		let original = Path::new(OsStr::from_bytes(b"in/caf\xe9.png"));
		let names = OutputNames::derive(original, 0, &RenamePolicy::disabled());
		assert_eq!(names.image.as_bytes(), b"caf\xe9.png");
		assert_eq!(names.caption.as_bytes(), b"caf\xe9.txt");
	}
}
