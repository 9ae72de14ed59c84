// Integration tests for end-to-end stub generation

use orca_stubgen::registry::{
	AlgorithmDef, ConflictPolicy, ExposeFilter, ProcessorDef, Registry, RegistryClient, ResultType,
	WindowTypeDef,
};
use orca_stubgen::stub::{
	ALGORITHMS_FILE, INIT_FILE, METADATA_FIELDS_FILE, StubError, StubWriter, WINDOW_TYPES_FILE,
};
use orca_stubgen::generate_python_stubs;

use crate::fixture;

async fn basic_registry() -> anyhow::Result<Registry> {
	let uri = format!("file://{}", fixture("basic.json").display());
	Ok(RegistryClient::from_uri(&uri)?
		.fetch(&ExposeFilter::default())
		.await?)
}

/// Test the full pipeline against the fixture registry
#[tokio::test]
async fn test_generate_python_stubs() -> anyhow::Result<()> {
	let registry = basic_registry().await?;
	let out = tempfile::tempdir()?;

	let written = generate_python_stubs(&registry, out.path(), ConflictPolicy::default())?;
	assert_eq!(written.len(), 4);

	let package = StubWriter::new(out.path()).package_dir();
	assert_eq!(std::fs::read_to_string(package.join(INIT_FILE))?, "");

	let fields = std::fs::read_to_string(package.join(METADATA_FIELDS_FILE))?;
	assert!(fields.contains("bus_id: MetadataField"));
	assert!(fields.contains("route_id: MetadataField"));
	assert_eq!(fields.matches(": MetadataField").count(), 2);

	let windows = std::fs::read_to_string(package.join(WINDOW_TYPES_FILE))?;
	assert!(windows.contains("FastWindow_1_0_0: WindowType"));
	assert!(windows.contains("SlowWindow_0_1_0: WindowType"));
	assert!(windows.contains("    route_id: Route the bus is serving"));

	let algorithms = std::fs::read_to_string(package.join(ALGORITHMS_FILE))?;
	assert!(algorithms.starts_with("# Generated by orca-stubgen"));
	assert!(
		algorithms
			.contains("from orca_python import ExecutionParams, StructResult, ValueResult, ArrayResult\n")
	);
	assert!(algorithms.contains("def speed_check_"));
	assert!(algorithms.contains("def calc_average_"));
	assert!(algorithms.contains("def get_batch_"));
	assert!(algorithms.contains(") -> ArrayResult:"));
	assert!(algorithms.contains("    Window: SlowWindow_0_1_0"));

	Ok(())
}

/// Test that repeated runs give byte-identical output
#[tokio::test]
async fn test_generation_is_deterministic() -> anyhow::Result<()> {
	let registry = basic_registry().await?;
	let first = tempfile::tempdir()?;
	let second = tempfile::tempdir()?;

	let a = generate_python_stubs(&registry, first.path(), ConflictPolicy::default())?;
	let b = generate_python_stubs(&registry, second.path(), ConflictPolicy::default())?;

	for (a, b) in a.iter().zip(&b) {
		assert_eq!(std::fs::read(a)?, std::fs::read(b)?, "{} differs", a.display());
	}

	Ok(())
}

/// Test that generating into an existing output directory succeeds
#[tokio::test]
async fn test_generate_into_existing_directory() -> anyhow::Result<()> {
	let registry = basic_registry().await?;
	let out = tempfile::tempdir()?;

	generate_python_stubs(&registry, out.path(), ConflictPolicy::default())?;
	generate_python_stubs(&registry, out.path(), ConflictPolicy::default())?;

	Ok(())
}

/// Test that a failed aggregation leaves previous output untouched
#[tokio::test]
async fn test_failed_generation_writes_nothing() -> anyhow::Result<()> {
	let out = tempfile::tempdir()?;
	let package = StubWriter::new(out.path()).package_dir();

	let good = basic_registry().await?;
	generate_python_stubs(&good, out.path(), ConflictPolicy::default())?;
	let before = std::fs::read_to_string(package.join(ALGORITHMS_FILE))?;

	let bad = Registry::with_processors(vec![ProcessorDef::new("ml-test", "python").with_algorithm(
		AlgorithmDef::new(
			"Foo",
			"1.0.0",
			WindowTypeDef::new("FastWindow", "1.0.0"),
			ResultType::NotSpecified,
		),
	)]);
	let err = generate_python_stubs(&bad, out.path(), ConflictPolicy::default()).unwrap_err();
	assert!(matches!(err, StubError::Registry(_)));
	assert!(err.to_string().contains("Foo"));

	assert_eq!(std::fs::read_to_string(package.join(ALGORITHMS_FILE))?, before);

	// A fresh root does not even get the package directory
	let fresh = tempfile::tempdir()?;
	assert!(generate_python_stubs(&bad, fresh.path(), ConflictPolicy::default()).is_err());
	assert!(!StubWriter::new(fresh.path()).package_dir().exists());
	assert!(!fresh.path().join("orca_python").exists());

	Ok(())
}

/// Test that the strict policy rejects conflicting window definitions
#[tokio::test]
async fn test_strict_duplicates() -> anyhow::Result<()> {
	let registry = Registry::with_processors(vec![
		ProcessorDef::new("ml-a", "python").with_algorithm(AlgorithmDef::new(
			"A",
			"1",
			WindowTypeDef::new("FastWindow", "1.0.0").with_description("first"),
			ResultType::Value,
		)),
		ProcessorDef::new("ml-b", "python").with_algorithm(AlgorithmDef::new(
			"B",
			"1",
			WindowTypeDef::new("FastWindow", "1.0.0").with_description("second"),
			ResultType::Value,
		)),
	]);
	let out = tempfile::tempdir()?;

	generate_python_stubs(&registry, out.path(), ConflictPolicy::FirstWins)?;
	let windows =
		std::fs::read_to_string(StubWriter::new(out.path()).package_dir().join(WINDOW_TYPES_FILE))?;
	assert!(windows.contains("first"));
	assert!(!windows.contains("second"));

	let strict = tempfile::tempdir()?;
	let result = generate_python_stubs(&registry, strict.path(), ConflictPolicy::Reject);
	assert!(result.is_err());
	assert!(!StubWriter::new(strict.path()).package_dir().exists());

	Ok(())
}
