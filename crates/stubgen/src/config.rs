// Local project configuration
//
// `orca.json` is written by `orca init` in a processor project. Stub generation
// only needs the project name from it, to keep a project's own algorithms out
// of its stubs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Core endpoint used when no connection string is given
pub const DEFAULT_ENDPOINT: &str = "localhost:3335";

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "orca.json";

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("config file not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("failed to read {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {}: {source}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid SDK: {0}. Must be one of: python, go, typescript, zig, rust")]
	InvalidSdk(String),

	#[error("stub generation for the {0} SDK is not supported yet")]
	UnsupportedSdk(Sdk),

	#[error("cannot infer SDK language from {}; specify it with --sdk", .0.display())]
	CannotInferSdk(PathBuf),
}

/// Contents of `orca.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
	#[serde(default)]
	pub project_name: String,
	#[serde(default)]
	pub orca_connection_string: String,
	#[serde(default)]
	pub processor_port: u16,
	#[serde(default)]
	pub processor_connection_string: String,
}

impl ProjectConfig {
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = fs_err::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}
}

/// Work out which project's processors to exclude from the stubs.
///
/// An explicit override wins. Otherwise the project name comes from the config
/// file if it exists. A missing config file is only an error when the caller
/// asked for a specific path rather than the default one.
pub fn resolve_project_name(
	project_override: Option<&str>,
	config_path: &Path,
	config_path_is_default: bool,
) -> Result<Option<String>, ConfigError> {
	if let Some(name) = project_override.filter(|n| !n.is_empty()) {
		info!(target: "stubgen", "Excluding algorithms from project '{}'", name);
		return Ok(Some(name.to_string()));
	}

	if !config_path.exists() {
		if config_path_is_default {
			debug!(target: "stubgen", "No {} found, not excluding any project", config_path.display());
			return Ok(None);
		}
		return Err(ConfigError::NotFound(config_path.to_path_buf()));
	}

	let config = ProjectConfig::load(config_path)?;
	if config.project_name.is_empty() {
		return Ok(None);
	}
	info!(
		target: "stubgen",
		"Excluding algorithms from project '{}', as defined in {}",
		config.project_name,
		config_path.display()
	);
	Ok(Some(config.project_name))
}

/// Target SDK language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sdk {
	Python,
	Go,
	TypeScript,
	Zig,
	Rust,
}

impl Sdk {
	/// Files whose presence marks a directory as a Python project
	const PYTHON_MARKERS: [&str; 5] = [
		"pyproject.toml",
		"requirements.txt",
		"setup.py",
		"setup.cfg",
		"Pipfile",
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Sdk::Python => "python",
			Sdk::Go => "go",
			Sdk::TypeScript => "typescript",
			Sdk::Zig => "zig",
			Sdk::Rust => "rust",
		}
	}

	/// Whether stubs can be generated for this SDK
	pub fn is_supported(&self) -> bool {
		matches!(self, Sdk::Python)
	}

	/// Fail unless stubs can be generated for this SDK
	pub fn ensure_supported(self) -> Result<Self, ConfigError> {
		if self.is_supported() {
			Ok(self)
		} else {
			Err(ConfigError::UnsupportedSdk(self))
		}
	}

	/// Detect the SDK from project files in `dir`
	pub fn infer(dir: &Path) -> Result<Self, ConfigError> {
		let marker = Self::PYTHON_MARKERS
			.iter()
			.find(|marker| dir.join(marker).exists())
			.ok_or_else(|| ConfigError::CannotInferSdk(dir.to_path_buf()))?;
		info!(target: "stubgen", "Inferred SDK language as python (found {})", marker);
		Ok(Sdk::Python)
	}
}

impl fmt::Display for Sdk {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Sdk {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"python" => Ok(Sdk::Python),
			"go" => Ok(Sdk::Go),
			"typescript" => Ok(Sdk::TypeScript),
			"zig" => Ok(Sdk::Zig),
			"rust" => Ok(Sdk::Rust),
			other => Err(ConfigError::InvalidSdk(other.to_string())),
		}
	}
}
