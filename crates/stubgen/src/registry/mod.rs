// Orca Registry Module
//
// Everything between the core's introspection call and the renderer:
// - Fetching the raw registry from a file dump or the core's gRPC service
// - Aggregating it into a deduplicated, validated generation model
// - Fingerprinting algorithms so same-named registrations stay distinct

mod aggregate;
mod client;
mod error;
mod fingerprint;
mod model;
pub mod types;

pub use aggregate::ConflictPolicy;
pub use client::{ExposeFilter, RegistryClient, RegistrySource};
pub use error::RegistryError;
pub use fingerprint::{FingerprintInput, Identifier};
pub use model::{
	AlgorithmDescriptor, GenerationModel, MetadataFieldDescriptor, ProcessorDescriptor, ReturnKind,
	WindowTypeDescriptor,
};
pub use types::{AlgorithmDef, MetadataFieldDef, ProcessorDef, Registry, ResultType, WindowTypeDef};
