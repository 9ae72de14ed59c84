// Stub generation error types

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur while turning a registry into stub files
#[derive(Error, Debug)]
pub enum StubError {
	#[error(transparent)]
	Registry(#[from] RegistryError),

	/// A bundled template failed to compile. Indicates a bug in the template.
	#[error("failed to compile template '{name}': {source}")]
	Template {
		name: &'static str,
		#[source]
		source: Box<handlebars::TemplateError>,
	},

	/// The model did not satisfy what a template expects. Indicates a bug.
	#[error("failed to render '{artifact}': {source}")]
	Render {
		artifact: &'static str,
		#[source]
		source: Box<handlebars::RenderError>,
	},

	#[error("failed to encode metadata comment: {0}")]
	Metadata(#[from] serde_json::Error),

	#[error("failed to {op} {path}: {source}", path = .path.display())]
	Fs {
		op: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl StubError {
	pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Fs {
			op,
			path: path.into(),
			source,
		}
	}
}
