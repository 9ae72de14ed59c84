mod registry;
mod stubs;

use std::path::PathBuf;

/// Path to a registry fixture under `tests/fixtures/registry`
pub fn fixture(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.join("tests")
		.join("fixtures")
		.join("registry")
		.join(name)
}
