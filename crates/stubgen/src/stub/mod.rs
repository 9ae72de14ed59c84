// Python stub generation
//
// Aggregate, render, then write. Each stage completes before the next starts,
// so an aggregation or render failure never touches the output directory.

mod error;
mod render;
pub mod sanitize;
mod writer;

use std::path::{Path, PathBuf};

use tracing::info;

pub use error::StubError;
pub use render::{RenderedStubs, StubRenderer};
pub use writer::{
	ALGORITHMS_FILE, INIT_FILE, METADATA_FIELDS_FILE, PACKAGE_PATH, StubWriter, WINDOW_TYPES_FILE,
};

use crate::registry::{ConflictPolicy, GenerationModel, Registry};

/// Generate the Python registry stubs for `registry` under `out_dir`
pub fn generate_python_stubs(
	registry: &Registry,
	out_dir: &Path,
	policy: ConflictPolicy,
) -> Result<Vec<PathBuf>, StubError> {
	let model = GenerationModel::aggregate_with(registry, policy)?;
	let stubs = StubRenderer::new()?.render(&model)?;
	let written = StubWriter::new(out_dir).write(&stubs)?;
	info!(
		target: "stubgen",
		"Generated stubs for {} algorithms across {} processors",
		model.algorithms().count(),
		model.processors.len()
	);
	Ok(written)
}
