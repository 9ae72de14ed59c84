// Integration tests for registry loading and aggregation

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use orca_stubgen::registry::{
	ConflictPolicy, ExposeFilter, GenerationModel, RegistryClient, RegistryError, ResultType,
	ReturnKind,
};
use orca_stubgen::types::proto::orca_core_server::{OrcaCore, OrcaCoreServer};
use orca_stubgen::types::proto::{
	self, Algorithm, ExposeSettings, InternalState, MetadataField, ProcessorRegistration, WindowType,
};
use tokio_stream::wrappers::TcpListenerStream;

use crate::fixture;

/// Test loading a registry dump through a file URI
#[tokio::test]
async fn test_registry_file_loading() -> anyhow::Result<()> {
	let uri = format!("file://{}", fixture("basic.json").display());
	let client = RegistryClient::from_uri(&uri)?;

	let registry = client.fetch(&ExposeFilter::default()).await?;

	assert_eq!(registry.processors.len(), 2);
	assert_eq!(registry.len(), 3);
	assert_eq!(registry.processors[0].project_name.as_deref(), Some("bus-analytics"));
	assert_eq!(registry.processors[1].project_name, None);

	Ok(())
}

/// Test that the project filter drops the project's own processors
#[tokio::test]
async fn test_registry_exclude_project() -> anyhow::Result<()> {
	let uri = format!("file://{}", fixture("basic.json").display());
	let client = RegistryClient::from_uri(&uri)?;

	let registry = client.fetch(&ExposeFilter::excluding("bus-analytics")).await?;

	assert_eq!(registry.processors.len(), 1);
	assert_eq!(registry.processors[0].name, "ml-batch");

	Ok(())
}

/// Test aggregation of the fixture into the generation model
#[tokio::test]
async fn test_aggregate_fixture() -> anyhow::Result<()> {
	let uri = format!("file://{}", fixture("basic.json").display());
	let registry = RegistryClient::from_uri(&uri)?
		.fetch(&ExposeFilter::default())
		.await?;

	let model = GenerationModel::aggregate_with(&registry, ConflictPolicy::Reject)?;

	let windows: Vec<_> = model.window_types.iter().map(|w| w.var_name.as_str()).collect();
	assert_eq!(windows, ["FastWindow_1_0_0", "SlowWindow_0_1_0"]);

	let fields: Vec<_> = model.metadata_fields.iter().map(|m| m.name.as_str()).collect();
	assert_eq!(fields, ["bus_id", "route_id"]);

	assert_eq!(
		model.imports,
		[ReturnKind::Struct, ReturnKind::Value, ReturnKind::Array]
	);
	assert_eq!(model.algorithms().count(), 3);

	let get_batch = model.algorithms().find(|a| a.name == "GetBatch").unwrap();
	assert_eq!(get_batch.window_var_name, "SlowWindow_0_1_0");
	assert_eq!(get_batch.processor_name, "ml-batch");

	Ok(())
}

/// Test that an algorithm without a result type fails the whole run
#[tokio::test]
async fn test_aggregate_not_specified_fixture() -> anyhow::Result<()> {
	let uri = format!("file://{}", fixture("not-specified.json").display());
	let registry = RegistryClient::from_uri(&uri)?
		.fetch(&ExposeFilter::default())
		.await?;

	let err = GenerationModel::aggregate(&registry).unwrap_err();
	assert_matches!(&err, RegistryError::ResultTypeNotSpecified { algorithm, .. } if algorithm == "Foo");

	let message = err.to_string();
	assert!(message.contains("Foo"));
	assert!(message.contains("1.0.0"));
	assert!(message.contains("ml-test"));

	Ok(())
}

/// Test that a malformed dump surfaces as a parse error
#[tokio::test]
async fn test_registry_malformed_file() -> anyhow::Result<()> {
	let temp_file = tempfile::NamedTempFile::with_suffix(".json")?;
	std::fs::write(temp_file.path(), r#"{"processors": [{"runtime": "python"}]}"#)?;

	let uri = format!("file://{}", temp_file.path().display());
	let result = RegistryClient::from_uri(&uri)?
		.fetch(&ExposeFilter::default())
		.await;
	assert_matches!(result, Err(RegistryError::ParseError(_)));

	Ok(())
}

/// In-process core that records every Expose request it receives
#[derive(Clone, Default)]
struct RecordingCore {
	requests: Arc<Mutex<Vec<ExposeSettings>>>,
}

#[tonic::async_trait]
impl OrcaCore for RecordingCore {
	async fn expose(
		&self,
		request: tonic::Request<ExposeSettings>,
	) -> Result<tonic::Response<InternalState>, tonic::Status> {
		self.requests.lock().unwrap().push(request.into_inner());
		Ok(tonic::Response::new(bus_state()))
	}
}

fn bus_state() -> InternalState {
	InternalState {
		processors: vec![ProcessorRegistration {
			name: "ml-test".to_string(),
			runtime: "python".to_string(),
			connection_str: "localhost:5377".to_string(),
			project_name: String::new(),
			supported_algorithms: vec![Algorithm {
				name: "SpeedCheck".to_string(),
				version: "1.1.0".to_string(),
				window_type: Some(WindowType {
					name: "FastWindow".to_string(),
					version: "1.0.0".to_string(),
					description: "A fast window type".to_string(),
					metadata_fields: vec![MetadataField {
						name: "bus_id".to_string(),
						description: "Unique bus ID".to_string(),
					}],
				}),
				result_type: proto::ResultType::Struct as i32,
				description: "Checks speed of buses".to_string(),
			}],
		}],
	}
}

/// Serve `core` on an ephemeral loopback port and return its `host:port`
async fn spawn_core(core: RecordingCore) -> anyhow::Result<String> {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;
	tokio::spawn(
		tonic::transport::Server::builder()
			.add_service(OrcaCoreServer::new(core))
			.serve_with_incoming(TcpListenerStream::new(listener)),
	);
	Ok(addr.to_string())
}

/// Test fetching and converting the registry from a running core
#[tokio::test]
async fn test_fetch_from_core() -> anyhow::Result<()> {
	let core = RecordingCore::default();
	let addr = spawn_core(core.clone()).await?;

	let registry = RegistryClient::from_uri(&addr)?
		.fetch(&ExposeFilter::default())
		.await?;

	assert_eq!(registry.processors.len(), 1);
	let proc = &registry.processors[0];
	assert_eq!(proc.connection_str, "localhost:5377");
	assert_eq!(proc.project_name, None);
	let algo = &proc.supported_algorithms[0];
	assert_eq!(algo.name, "SpeedCheck");
	assert_eq!(algo.result_type, ResultType::Struct);
	assert_eq!(algo.window_type.metadata_fields[0].name, "bus_id");

	// No filter goes over the wire as an empty project name
	let requests = core.requests.lock().unwrap().clone();
	assert_eq!(requests, vec![ExposeSettings {
		exclude_project: String::new()
	}]);

	let model = GenerationModel::aggregate(&registry)?;
	assert_eq!(model.window_types[0].var_name, "FastWindow_1_0_0");

	Ok(())
}

/// Test that the project filter is passed to the core rather than applied locally
#[tokio::test]
async fn test_fetch_from_core_sends_exclude_project() -> anyhow::Result<()> {
	let core = RecordingCore::default();
	let addr = spawn_core(core.clone()).await?;

	let registry = RegistryClient::from_uri(&format!("http://{addr}"))?
		.fetch(&ExposeFilter::excluding("bus-analytics"))
		.await?;
	assert_eq!(registry.processors.len(), 1);

	let requests = core.requests.lock().unwrap().clone();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].exclude_project, "bus-analytics");

	Ok(())
}
