// Registry client for fetching the registry from a file dump or the Orca core

use std::path::{Path, PathBuf};

use tracing::info;

use super::error::RegistryError;
use super::types::Registry;
use crate::types::proto::{self, orca_core_client::OrcaCoreClient};

/// Source for registry data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
	/// Load a JSON dump of the registry from a local file
	File(PathBuf),
	/// Call `OrcaCore/Expose` on a running core
	Grpc { endpoint: String },
}

/// Server-side filter applied to the introspection call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposeFilter {
	/// Drop processors registered under this project
	pub exclude_project: Option<String>,
}

impl ExposeFilter {
	pub fn excluding(project: impl Into<String>) -> Self {
		Self {
			exclude_project: Some(project.into()),
		}
	}
}

/// Client for fetching registry data
#[derive(Debug, Clone)]
pub struct RegistryClient {
	source: RegistrySource,
}

impl RegistryClient {
	/// Create a new registry client
	pub fn new(source: RegistrySource) -> Self {
		Self { source }
	}

	/// Create a registry client from a source URI string
	///
	/// `file://` selects a JSON dump, `http(s)://` a gRPC endpoint, and a bare
	/// `host:port` is treated as a plaintext gRPC endpoint.
	pub fn from_uri(uri: &str) -> Result<Self, RegistryError> {
		let uri = uri.trim();
		let source = if let Some(path) = uri.strip_prefix("file://") {
			if path.is_empty() {
				return Err(RegistryError::InvalidSource("empty file path".into()));
			}
			RegistrySource::File(PathBuf::from(path))
		} else if uri.starts_with("http://") || uri.starts_with("https://") {
			RegistrySource::Grpc {
				endpoint: uri.to_string(),
			}
		} else if is_host_port(uri) {
			RegistrySource::Grpc {
				endpoint: format!("http://{uri}"),
			}
		} else {
			return Err(RegistryError::InvalidSource(format!(
				"unsupported URI scheme: {}",
				uri
			)));
		};

		Ok(Self::new(source))
	}

	/// Get the source configuration
	pub fn source(&self) -> &RegistrySource {
		&self.source
	}

	/// Fetch the registry from the configured source
	pub async fn fetch(&self, filter: &ExposeFilter) -> Result<Registry, RegistryError> {
		match &self.source {
			RegistrySource::File(path) => self.fetch_from_file(path, filter).await,
			RegistrySource::Grpc { endpoint } => self.fetch_from_core(endpoint, filter).await,
		}
	}

	/// Fetch registry from a local file
	async fn fetch_from_file(&self, path: &Path, filter: &ExposeFilter) -> Result<Registry, RegistryError> {
		info!(target: "stubgen", "Loading registry from file: {}", path.display());
		let content = fs_err::tokio::read_to_string(path).await?;
		let mut registry: Registry = serde_json::from_str(&content)?;

		// The core applies this filter itself; a dump has to be filtered here
		if let Some(project) = &filter.exclude_project {
			registry.exclude_project(project);
		}

		info!(target: "stubgen", "Loaded {} algorithms from registry file", registry.len());
		Ok(registry)
	}

	/// Fetch registry from the core's introspection endpoint
	async fn fetch_from_core(&self, endpoint: &str, filter: &ExposeFilter) -> Result<Registry, RegistryError> {
		info!(target: "stubgen", "Fetching registry from Orca core: {}", endpoint);

		let mut client = OrcaCoreClient::connect(endpoint.to_string())
			.await
			.map_err(|e| RegistryError::FetchError(format!("failed to connect to {}: {}", endpoint, e)))?;

		let request = proto::ExposeSettings {
			exclude_project: filter.exclude_project.clone().unwrap_or_default(),
		};
		let state = client
			.expose(request)
			.await
			.map_err(|status| {
				RegistryError::FetchError(format!(
					"Expose call failed: {} ({:?})",
					status.message(),
					status.code()
				))
			})?
			.into_inner();

		let registry = Registry::try_from(state)?;
		info!(target: "stubgen", "Fetched {} algorithms from Orca core", registry.len());
		Ok(registry)
	}
}

fn is_host_port(s: &str) -> bool {
	let Some((host, port)) = s.rsplit_once(':') else {
		return false;
	};
	!host.is_empty() && !host.contains('/') && port.parse::<u16>().is_ok()
}
