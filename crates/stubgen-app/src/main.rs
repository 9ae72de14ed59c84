//! Orca stub generator.
//!
//! Fetches the registry from a running Orca core (or a JSON dump of it) and
//! writes Python type stubs for every registered algorithm, window type and
//! metadata field.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use orca_stubgen::config::{self, Sdk};
use orca_stubgen::{ConflictPolicy, ExposeFilter, RegistryClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orca-stubgen")]
#[command(about = "Generate SDK type stubs from the Orca registry")]
struct Args {
	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Sync Orca registry data to a local directory
	Sync(SyncArgs),
	/// Print the version
	Version,
}

#[derive(clap::Args, Debug)]
struct SyncArgs {
	/// Output directory for the generated stubs
	#[arg(long, env = "ORCA_STUB_OUT", value_name = "DIR", default_value = "./")]
	out: PathBuf,

	/// Orca core address (`host:port`, `http://..`) or `file://` registry dump
	#[arg(long, env = "ORCA_CONNECTION_STRING", value_name = "ADDR")]
	conn_str: Option<String>,

	/// SDK to generate stubs for; inferred from the working directory if unset
	#[arg(long, env = "ORCA_SDK", value_name = "NAME")]
	sdk: Option<String>,

	/// Path to orca.json, used to find the project name
	#[arg(long, env = "ORCA_CONFIG", value_name = "PATH")]
	config: Option<PathBuf>,

	/// Project whose algorithms are left out of the stubs
	#[arg(long, env = "ORCA_PROJECT_NAME", value_name = "NAME")]
	project_name: Option<String>,

	/// Fail when a window type or metadata field is declared twice with different contents
	#[arg(long)]
	strict_duplicates: bool,

	/// Give up on the registry fetch after this many seconds
	#[arg(long, value_name = "SECS", default_value_t = 30)]
	timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let default_level = if args.verbose { "debug" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.with_target(false)
		.init();

	match args.command {
		Command::Sync(sync) => run_sync(sync).await,
		Command::Version => {
			println!("orca-stubgen {}", env!("CARGO_PKG_VERSION"));
			Ok(())
		},
	}
}

async fn run_sync(args: SyncArgs) -> anyhow::Result<()> {
	let sdk = match &args.sdk {
		Some(name) => name.parse::<Sdk>()?,
		None => Sdk::infer(&std::env::current_dir()?)?,
	};
	let sdk = sdk.ensure_supported()?;

	let config_path_is_default = args.config.is_none();
	let config_path = args
		.config
		.unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
	let exclude_project =
		config::resolve_project_name(args.project_name.as_deref(), &config_path, config_path_is_default)?;

	let conn_str = args.conn_str.as_deref().unwrap_or(config::DEFAULT_ENDPOINT);
	let client = RegistryClient::from_uri(conn_str)?;
	let filter = ExposeFilter { exclude_project };

	let registry = tokio::time::timeout(Duration::from_secs(args.timeout), client.fetch(&filter))
		.await
		.with_context(|| format!("timed out fetching registry from {conn_str}"))?
		.with_context(|| format!("failed to fetch registry from {conn_str}"))?;

	let policy = if args.strict_duplicates {
		ConflictPolicy::Reject
	} else {
		ConflictPolicy::FirstWins
	};

	info!("Generating {} stubs in {}", sdk, args.out.display());
	let written = orca_stubgen::generate_python_stubs(&registry, &args.out, policy)
		.context("failed to generate stubs")?;
	for path in &written {
		info!("  {}", path.display());
	}
	info!("Registry synced");
	Ok(())
}
