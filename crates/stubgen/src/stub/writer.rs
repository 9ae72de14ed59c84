// Output writer
//
// Materialises rendered stubs under `<root>/orca_python/registry/`. Each file is
// staged in a temp file beside its target and renamed over it, so a reader
// sees either the previous artifact or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::StubError;
use super::render::RenderedStubs;

/// Package directory, relative to the output root
pub const PACKAGE_PATH: [&str; 2] = ["orca_python", "registry"];

pub const INIT_FILE: &str = "__init__.pyi";
pub const METADATA_FIELDS_FILE: &str = "metadata_fields.pyi";
pub const WINDOW_TYPES_FILE: &str = "window_types.pyi";
pub const ALGORITHMS_FILE: &str = "algorithms.pyi";

#[derive(Debug, Clone)]
pub struct StubWriter {
	root: PathBuf,
}

impl StubWriter {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Directory the artifacts land in
	pub fn package_dir(&self) -> PathBuf {
		PACKAGE_PATH.iter().fold(self.root.clone(), |dir, part| dir.join(part))
	}

	/// Write the package marker and every rendered artifact.
	///
	/// Returns the written paths in write order. Existing directories are
	/// reused and existing files are replaced.
	pub fn write(&self, stubs: &RenderedStubs) -> Result<Vec<PathBuf>, StubError> {
		let dir = self.package_dir();
		fs_err::create_dir_all(&dir).map_err(|e| StubError::fs("create directory", &dir, e))?;

		let artifacts = [
			(INIT_FILE, ""),
			(METADATA_FIELDS_FILE, stubs.metadata_fields.as_str()),
			(WINDOW_TYPES_FILE, stubs.window_types.as_str()),
			(ALGORITHMS_FILE, stubs.algorithms.as_str()),
		];

		let mut written = Vec::with_capacity(artifacts.len());
		for (file, contents) in artifacts {
			let path = dir.join(file);
			write_atomic(&dir, &path, contents)?;
			debug!(target: "stubgen", "Wrote {} ({} bytes)", path.display(), contents.len());
			written.push(path);
		}

		info!(target: "stubgen", "Wrote {} stub files to {}", written.len(), dir.display());
		Ok(written)
	}
}

fn write_atomic(dir: &Path, path: &Path, contents: &str) -> Result<(), StubError> {
	let mut builder = tempfile::Builder::new();
	builder.prefix(".stubgen-").suffix(".tmp");
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		builder.permissions(std::fs::Permissions::from_mode(0o644));
	}

	let mut file = builder
		.tempfile_in(dir)
		.map_err(|e| StubError::fs("create temp file in", dir, e))?;
	file
		.write_all(contents.as_bytes())
		.map_err(|e| StubError::fs("write", file.path(), e))?;
	file
		.as_file()
		.sync_all()
		.map_err(|e| StubError::fs("sync", file.path(), e))?;
	file
		.persist(path)
		.map_err(|e| StubError::fs("replace", path, e.error))?;
	Ok(())
}
