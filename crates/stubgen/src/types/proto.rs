use thiserror::Error;

use crate::registry::{self, AlgorithmDef, MetadataFieldDef, ProcessorDef, Registry, WindowTypeDef};

#[allow(warnings)]
#[warn(clippy::derive_partial_eq_without_eq)]
pub mod orca {
	pub mod core {
		tonic::include_proto!("orca.core");
	}
}
pub use orca::core::*;

#[derive(Error, Debug)]
pub enum ProtoError {
	#[error("algorithm '{algorithm}' on processor '{processor}' has no window type")]
	MissingWindowType { processor: String, algorithm: String },
}

impl From<ResultType> for registry::ResultType {
	fn from(value: ResultType) -> Self {
		match value {
			ResultType::NotSpecified => Self::NotSpecified,
			ResultType::Struct => Self::Struct,
			ResultType::Value => Self::Value,
			ResultType::Array => Self::Array,
			ResultType::None => Self::None,
		}
	}
}

impl From<WindowType> for WindowTypeDef {
	fn from(value: WindowType) -> Self {
		Self {
			name: value.name,
			version: value.version,
			description: value.description,
			metadata_fields: value
				.metadata_fields
				.into_iter()
				.map(|m| MetadataFieldDef {
					name: m.name,
					description: m.description,
				})
				.collect(),
		}
	}
}

impl TryFrom<InternalState> for Registry {
	type Error = ProtoError;

	fn try_from(state: InternalState) -> Result<Self, Self::Error> {
		let mut processors = Vec::with_capacity(state.processors.len());

		for proc in state.processors {
			let mut supported_algorithms = Vec::with_capacity(proc.supported_algorithms.len());

			for algo in proc.supported_algorithms {
				// Unknown enum values fall back to NOT_SPECIFIED and fail aggregation later
				let result_type = algo.result_type().into();
				let window_type = algo.window_type.ok_or_else(|| ProtoError::MissingWindowType {
					processor: proc.name.clone(),
					algorithm: algo.name.clone(),
				})?;

				supported_algorithms.push(AlgorithmDef {
					name: algo.name,
					version: algo.version,
					description: algo.description,
					window_type: window_type.into(),
					result_type,
				});
			}

			processors.push(ProcessorDef {
				name: proc.name,
				runtime: proc.runtime,
				connection_str: proc.connection_str,
				project_name: Some(proc.project_name).filter(|p| !p.is_empty()),
				supported_algorithms,
			});
		}

		Ok(Registry::with_processors(processors))
	}
}
