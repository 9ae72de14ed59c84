// Canonical generation model
//
// Output of a single aggregation pass. The renderer only ever reads it, and it
// serialises directly into the template context.

use serde::Serialize;

use super::fingerprint::Identifier;
use super::types::ResultType;

/// Shape of the value an algorithm yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReturnKind {
	#[serde(rename = "StructResult")]
	Struct,
	#[serde(rename = "ValueResult")]
	Value,
	#[serde(rename = "NoneResult")]
	None,
	#[serde(rename = "ArrayResult")]
	Array,
}

impl ReturnKind {
	/// Fixed import order of the result types in generated artifacts
	pub const CANONICAL_ORDER: [ReturnKind; 4] = [
		ReturnKind::Struct,
		ReturnKind::Value,
		ReturnKind::None,
		ReturnKind::Array,
	];

	/// Name of the SDK type this kind is annotated with
	pub fn import_name(&self) -> &'static str {
		match self {
			ReturnKind::Struct => "StructResult",
			ReturnKind::Value => "ValueResult",
			ReturnKind::None => "NoneResult",
			ReturnKind::Array => "ArrayResult",
		}
	}

	/// Map a raw result type tag. `NotSpecified` has no kind.
	pub fn from_result_type(result_type: ResultType) -> Option<Self> {
		match result_type {
			ResultType::NotSpecified => None,
			ResultType::Struct => Some(ReturnKind::Struct),
			ResultType::Value => Some(ReturnKind::Value),
			ResultType::None => Some(ReturnKind::None),
			ResultType::Array => Some(ReturnKind::Array),
		}
	}
}

impl std::fmt::Display for ReturnKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.import_name())
	}
}

/// A named scalar attribute attached to windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataFieldDescriptor {
	pub name: String,
	pub description: String,
}

/// A named, versioned window shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowTypeDescriptor {
	/// `name_version` made safe for use as a variable
	pub var_name: String,
	pub name: String,
	pub version: String,
	pub description: String,
	pub metadata_fields: Vec<MetadataFieldDescriptor>,
}

/// A unit of remote computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmDescriptor {
	pub name: String,
	pub version: String,
	pub description: String,
	pub processor_name: String,
	pub processor_runtime: String,
	/// `var_name` of the window type this algorithm runs on
	pub window_var_name: String,
	pub return_kind: ReturnKind,
	pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorDescriptor {
	pub name: String,
	pub runtime: String,
	pub algorithms: Vec<AlgorithmDescriptor>,
}

/// Root of the model handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GenerationModel {
	pub processors: Vec<ProcessorDescriptor>,
	/// Deduplicated by name, in first-encounter order
	pub metadata_fields: Vec<MetadataFieldDescriptor>,
	/// Deduplicated by name and version, in first-encounter order
	pub window_types: Vec<WindowTypeDescriptor>,
	/// Result kinds used by at least one algorithm, in canonical order
	pub imports: Vec<ReturnKind>,
}

impl GenerationModel {
	/// All algorithms across processors, in registry order
	pub fn algorithms(&self) -> impl Iterator<Item = &AlgorithmDescriptor> {
		self.processors.iter().flat_map(|p| p.algorithms.iter())
	}

	/// Import names in canonical order
	pub fn import_names(&self) -> Vec<&'static str> {
		self.imports.iter().map(ReturnKind::import_name).collect()
	}
}
