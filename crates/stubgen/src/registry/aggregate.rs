// Registry aggregation
//
// Walks the raw registry exactly once and produces the GenerationModel:
// - resolves result types (NOT_SPECIFIED aborts the whole run)
// - deduplicates metadata fields by name and window types by name + version
// - rejects distinct window types that sanitise to the same variable name
// - fingerprints every algorithm
// - collects the result kinds that need importing

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info, warn};

use super::error::RegistryError;
use super::fingerprint::{FingerprintInput, Identifier};
use super::model::{
	AlgorithmDescriptor, GenerationModel, MetadataFieldDescriptor, ProcessorDescriptor, ReturnKind,
	WindowTypeDescriptor,
};
use super::types::{AlgorithmDef, MetadataFieldDef, ProcessorDef, Registry, WindowTypeDef};
use crate::stub::sanitize::sanitise_variable_name;

/// What to do when a metadata field or window type is declared twice with
/// different contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
	/// Keep the first declaration and log the discarded one
	#[default]
	FirstWins,
	/// Fail aggregation
	Reject,
}

/// Scoped accumulator for one aggregation pass
#[derive(Debug, Default)]
struct Aggregator {
	policy: ConflictPolicy,
	metadata_fields: IndexMap<String, MetadataFieldDescriptor>,
	window_types: IndexMap<(String, String), WindowTypeDescriptor>,
	/// Rendered variable name -> (name, version) of the window that owns it
	window_names: HashMap<String, (String, String)>,
	used_kinds: HashSet<ReturnKind>,
}

impl GenerationModel {
	/// Aggregate a raw registry with the default conflict policy
	pub fn aggregate(registry: &Registry) -> Result<Self, RegistryError> {
		Self::aggregate_with(registry, ConflictPolicy::default())
	}

	/// Aggregate a raw registry into a generation model
	///
	/// Fails on the first malformed entry; no partial model is returned.
	pub fn aggregate_with(registry: &Registry, policy: ConflictPolicy) -> Result<Self, RegistryError> {
		let mut aggregator = Aggregator {
			policy,
			..Default::default()
		};

		let processors = registry
			.processors
			.iter()
			.map(|proc| aggregator.processor(proc))
			.collect::<Result<Vec<_>, _>>()?;

		let model = aggregator.finish(processors);
		info!(
			target: "stubgen",
			"Aggregated {} processors, {} window types, {} metadata fields",
			model.processors.len(),
			model.window_types.len(),
			model.metadata_fields.len()
		);
		Ok(model)
	}
}

impl Aggregator {
	fn processor(&mut self, proc: &ProcessorDef) -> Result<ProcessorDescriptor, RegistryError> {
		let algorithms = proc
			.supported_algorithms
			.iter()
			.map(|algo| self.algorithm(proc, algo))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(ProcessorDescriptor {
			name: proc.name.clone(),
			runtime: proc.runtime.clone(),
			algorithms,
		})
	}

	fn algorithm(
		&mut self,
		proc: &ProcessorDef,
		algo: &AlgorithmDef,
	) -> Result<AlgorithmDescriptor, RegistryError> {
		let return_kind = ReturnKind::from_result_type(algo.result_type).ok_or_else(|| {
			RegistryError::result_type_not_specified(&proc.name, &proc.runtime, &algo.name, &algo.version)
		})?;

		let window_var_name = self.window_type(&algo.window_type)?;

		let identifier = Identifier::generate(&FingerprintInput {
			processor_name: &proc.name,
			processor_connection_str: &proc.connection_str,
			window_name: &algo.window_type.name,
			window_version: &algo.window_type.version,
			algorithm_name: &algo.name,
			algorithm_version: &algo.version,
		});
		self.used_kinds.insert(return_kind);

		debug!(target: "stubgen", "Registered algorithm {} as {}", algo.name, identifier);

		Ok(AlgorithmDescriptor {
			name: algo.name.clone(),
			version: algo.version.clone(),
			description: algo.description.clone(),
			processor_name: proc.name.clone(),
			processor_runtime: proc.runtime.clone(),
			window_var_name,
			return_kind,
			identifier,
		})
	}

	/// Register a window type (and its fields) and return its variable name
	fn window_type(&mut self, window: &WindowTypeDef) -> Result<String, RegistryError> {
		let metadata_fields = window
			.metadata_fields
			.iter()
			.map(|field| self.metadata_field(field))
			.collect::<Result<Vec<_>, _>>()?;

		let descriptor = WindowTypeDescriptor {
			var_name: sanitise_variable_name(&format!("{}_{}", window.name, window.version)),
			name: window.name.clone(),
			version: window.version.clone(),
			description: window.description.clone(),
			metadata_fields,
		};

		let key = (window.name.clone(), window.version.clone());
		if let Some((existing_name, existing_version)) = self
			.window_names
			.get(&descriptor.var_name)
			.filter(|owner| **owner != key)
		{
			match self.policy {
				ConflictPolicy::Reject => {
					return Err(RegistryError::WindowNameCollision {
						var_name: descriptor.var_name,
						name: window.name.clone(),
						version: window.version.clone(),
						existing_name: existing_name.clone(),
						existing_version: existing_version.clone(),
					});
				},
				ConflictPolicy::FirstWins => {
					warn!(
						target: "stubgen",
						"Window type {} {} renders as {}, already used by {} {}; keeping the first",
						window.name,
						window.version,
						descriptor.var_name,
						existing_name,
						existing_version
					);
					return Ok(descriptor.var_name);
				},
			}
		}

		match self.window_types.entry(key) {
			Entry::Vacant(entry) => {
				debug!(target: "stubgen", "Registered window type {}", descriptor.var_name);
				self
					.window_names
					.insert(descriptor.var_name.clone(), entry.key().clone());
				Ok(entry.insert(descriptor).var_name.clone())
			},
			Entry::Occupied(entry) => {
				let existing = entry.get();
				if existing != &descriptor {
					match self.policy {
						ConflictPolicy::Reject => {
							return Err(RegistryError::ConflictingWindowType {
								name: window.name.clone(),
								version: window.version.clone(),
							});
						},
						ConflictPolicy::FirstWins => warn!(
							target: "stubgen",
							"Window type {} {} redeclared with a different definition, keeping the first",
							window.name,
							window.version
						),
					}
				}
				Ok(existing.var_name.clone())
			},
		}
	}

	/// Register a metadata field and return the descriptor as declared on this window
	fn metadata_field(&mut self, field: &MetadataFieldDef) -> Result<MetadataFieldDescriptor, RegistryError> {
		let descriptor = MetadataFieldDescriptor {
			name: field.name.clone(),
			description: field.description.clone(),
		};

		match self.metadata_fields.entry(field.name.clone()) {
			Entry::Vacant(entry) => {
				debug!(target: "stubgen", "Registered metadata field {}", field.name);
				entry.insert(descriptor.clone());
			},
			Entry::Occupied(entry) if entry.get().description != field.description => match self.policy {
				ConflictPolicy::Reject => {
					return Err(RegistryError::ConflictingMetadataField {
						name: field.name.clone(),
					});
				},
				ConflictPolicy::FirstWins => warn!(
					target: "stubgen",
					"Metadata field {} redeclared with a different description, keeping the first",
					field.name
				),
			},
			Entry::Occupied(_) => {},
		}

		Ok(descriptor)
	}

	fn finish(self, processors: Vec<ProcessorDescriptor>) -> GenerationModel {
		let imports = ReturnKind::CANONICAL_ORDER
			.into_iter()
			.filter(|kind| self.used_kinds.contains(kind))
			.collect();

		GenerationModel {
			processors,
			metadata_fields: self.metadata_fields.into_values().collect(),
			window_types: self.window_types.into_values().collect(),
			imports,
		}
	}
}
