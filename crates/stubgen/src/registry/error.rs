// Registry error types

use thiserror::Error;

use crate::types::proto::ProtoError;

/// Errors that can occur while fetching or aggregating the registry
#[derive(Error, Debug)]
pub enum RegistryError {
	#[error("failed to parse registry: {0}")]
	ParseError(#[from] serde_json::Error),

	#[error("failed to read registry file: {0}")]
	IoError(#[from] std::io::Error),

	#[error("failed to fetch registry: {0}")]
	FetchError(String),

	#[error("invalid registry response: {0}")]
	InvalidResponse(#[from] ProtoError),

	#[error("invalid registry source URI: {0}")]
	InvalidSource(String),

	#[error(
		"result type not specified for algorithm '{algorithm}' version '{version}' on processor '{processor}' ({runtime})"
	)]
	ResultTypeNotSpecified {
		processor: String,
		runtime: String,
		algorithm: String,
		version: String,
	},

	#[error("metadata field '{name}' is declared with conflicting descriptions")]
	ConflictingMetadataField { name: String },

	#[error("window type '{name}' version '{version}' is declared with conflicting definitions")]
	ConflictingWindowType { name: String, version: String },

	#[error(
		"window type '{name}' version '{version}' renders as '{var_name}', already used by '{existing_name}' version '{existing_version}'"
	)]
	WindowNameCollision {
		var_name: String,
		name: String,
		version: String,
		existing_name: String,
		existing_version: String,
	},
}

impl RegistryError {
	pub fn result_type_not_specified(
		processor: impl Into<String>,
		runtime: impl Into<String>,
		algorithm: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self::ResultTypeNotSpecified {
			processor: processor.into(),
			runtime: runtime.into(),
			algorithm: algorithm.into(),
			version: version.into(),
		}
	}
}
