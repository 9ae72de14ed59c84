pub mod config;
pub mod registry;
pub mod stub;
pub mod types;

pub use registry::{ConflictPolicy, ExposeFilter, GenerationModel, Registry, RegistryClient};
pub use stub::{StubError, generate_python_stubs};
