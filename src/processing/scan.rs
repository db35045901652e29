//! Directory scanning for image files

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::is_supported_image;
use crate::ui;

/// List supported images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not entered. Failing to read `dir` itself is an error;
/// unreadable individual entries are skipped.
pub fn scan_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
	let mut images = Vec::new();

	for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) if e.depth() == 0 => return Err(e.into()),
			Err(e) => {
				ui::debug(&format!("Skipping unreadable entry: {}", e));
				continue;
			}
		};

		let path = entry.path();
		if path.is_file() && is_supported_image(path) {
			images.push(path.to_path_buf());
		} else {
			ui::debug(&format!("Ignored: {}", path.display()));
		}
	}

	Ok(images)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn names(paths: &[PathBuf]) -> Vec<String> {
		paths
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
			.collect()
	}

	#[test]
	fn lists_images_sorted_and_non_recursive() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["b.jpg", "a.PNG", "c.txt", "10.png", "2.png"] {
			fs::write(dir.path().join(name), b"x").unwrap();
		}
		fs::create_dir(dir.path().join("nested")).unwrap();
		fs::write(dir.path().join("nested").join("deep.png"), b"x").unwrap();
		fs::create_dir(dir.path().join("folder.png")).unwrap();

		let found = scan_images(dir.path()).unwrap();
		assert_eq!(names(&found), vec!["10.png", "2.png", "a.PNG", "b.jpg"]);
	}

	#[test]
	fn bare_extension_name_is_not_an_image() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join(".png"), b"x").unwrap();
		fs::write(dir.path().join(".hidden.png"), b"x").unwrap();

		let found = scan_images(dir.path()).unwrap();
		assert_eq!(names(&found), vec![".hidden.png"]);
	}

	#[test]
	fn empty_directory_yields_nothing() {
		let dir = tempfile::tempdir().unwrap();
		assert!(scan_images(dir.path()).unwrap().is_empty());
	}

	#[test]
	fn missing_directory_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(scan_images(&dir.path().join("absent")).is_err());
	}
}
