// Algorithm fingerprinting
//
// Algorithms with the same display name can be served by different processors,
// so every generated identifier carries a CRC-32 suffix over the full
// (processor, window, algorithm) tuple.

use serde::Serialize;

use crate::stub::sanitize::{sanitise_variable_name, to_snake_case};

/// Inputs that distinguish one algorithm registration from another
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
	pub processor_name: &'a str,
	pub processor_connection_str: &'a str,
	pub window_name: &'a str,
	pub window_version: &'a str,
	pub algorithm_name: &'a str,
	pub algorithm_version: &'a str,
}

impl FingerprintInput<'_> {
	/// CRC-32 (IEEE) over the six fields, concatenated without delimiters
	pub fn checksum(&self) -> u32 {
		let mut hasher = crc32fast::Hasher::new();
		for field in [
			self.processor_name,
			self.processor_connection_str,
			self.window_name,
			self.window_version,
			self.algorithm_name,
			self.algorithm_version,
		] {
			hasher.update(field.as_bytes());
		}
		hasher.finalize()
	}
}

/// Generated, hash-suffixed name of an algorithm
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
	/// Sanitised algorithm name joined with the hash, before case conversion
	pub var_name: String,
	/// Lower-case hex checksum
	pub hash: String,
	/// Snake-cased form used for function declarations
	pub function_name: String,
}

impl Identifier {
	pub fn new(algorithm_name: &str, hash: impl Into<String>) -> Self {
		let hash = hash.into();
		let var_name = format!("{}_{}", sanitise_variable_name(algorithm_name), hash);
		let function_name = to_snake_case(&var_name);
		Self {
			var_name,
			hash,
			function_name,
		}
	}

	pub fn generate(input: &FingerprintInput<'_>) -> Self {
		Self::new(input.algorithm_name, format!("{:x}", input.checksum()))
	}
}

impl std::fmt::Display for Identifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.var_name)
	}
}
