// Raw registry types as exposed by the Orca core service
//
// This is the tree the aggregator walks:
// - Processors (in registration order)
// - Algorithms supported by each processor
// - The window type each algorithm consumes, with its metadata fields
//
// The JSON form mirrors the proto3 JSON mapping of `InternalState` so a dump of
// the introspection call can be used as a file source.

use serde::{Deserialize, Serialize};

/// Parsed registry, either from JSON or converted from the gRPC response
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
	/// Registered processors, in the order the core reports them
	#[serde(default)]
	pub processors: Vec<ProcessorDef>,
}

/// A processor registered with the core
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorDef {
	pub name: String,

	/// Runtime tag reported by the processor (e.g. "python")
	#[serde(default)]
	pub runtime: String,

	/// Address the core uses to reach the processor
	#[serde(default)]
	pub connection_str: String,

	/// Project the processor was registered under, if any
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project_name: Option<String>,

	#[serde(default)]
	pub supported_algorithms: Vec<AlgorithmDef>,
}

/// An algorithm supported by a processor
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDef {
	pub name: String,

	pub version: String,

	#[serde(default)]
	pub description: String,

	pub window_type: WindowTypeDef,

	#[serde(default)]
	pub result_type: ResultType,
}

/// Window shape an algorithm is triggered on
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowTypeDef {
	pub name: String,

	pub version: String,

	#[serde(default)]
	pub description: String,

	#[serde(default)]
	pub metadata_fields: Vec<MetadataFieldDef>,
}

/// Named attribute carried by a window
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MetadataFieldDef {
	pub name: String,

	#[serde(default)]
	pub description: String,
}

/// Result type tag attached to an algorithm
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
	/// Sentinel for a processor that never declared its result shape
	#[default]
	NotSpecified,
	Struct,
	Value,
	Array,
	None,
}

impl Registry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a registry from a list of processors
	pub fn with_processors(processors: Vec<ProcessorDef>) -> Self {
		Self { processors }
	}

	/// Total number of algorithms across all processors
	pub fn len(&self) -> usize {
		self
			.processors
			.iter()
			.map(|p| p.supported_algorithms.len())
			.sum()
	}

	/// Check if the registry declares no algorithms
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drop every processor registered under the given project
	pub fn exclude_project(&mut self, project: &str) {
		self
			.processors
			.retain(|p| p.project_name.as_deref() != Some(project));
	}
}

impl ProcessorDef {
	pub fn new(name: impl Into<String>, runtime: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			runtime: runtime.into(),
			connection_str: String::new(),
			project_name: None,
			supported_algorithms: Vec::new(),
		}
	}

	pub fn with_connection_str(mut self, connection_str: impl Into<String>) -> Self {
		self.connection_str = connection_str.into();
		self
	}

	pub fn with_project(mut self, project: impl Into<String>) -> Self {
		self.project_name = Some(project.into());
		self
	}

	pub fn with_algorithm(mut self, algorithm: AlgorithmDef) -> Self {
		self.supported_algorithms.push(algorithm);
		self
	}
}

impl AlgorithmDef {
	pub fn new(
		name: impl Into<String>,
		version: impl Into<String>,
		window_type: WindowTypeDef,
		result_type: ResultType,
	) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			description: String::new(),
			window_type,
			result_type,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}
}

impl WindowTypeDef {
	pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			description: String::new(),
			metadata_fields: Vec::new(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
		self.metadata_fields.push(MetadataFieldDef {
			name: name.into(),
			description: description.into(),
		});
		self
	}
}
