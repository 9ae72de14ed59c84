// This build script generates the Orca core client from protobuf definitions.
// - prost: generates base Rust types from proto
// - tonic: generates the OrcaCore client used to call Expose, and the server
//   trait used to stand up an in-process core in tests

fn main() -> Result<(), anyhow::Error> {
	let proto_files = ["proto/orca.proto"]
		.iter()
		.map(|name| std::env::current_dir().unwrap().join(name))
		.collect::<Vec<_>>();

	let include_dirs = ["proto/"]
		.iter()
		.map(|i| std::env::current_dir().unwrap().join(i))
		.collect::<Vec<_>>();

	let config = {
		let mut c = prost_build::Config::new();
		c.disable_comments(Some("."));
		c
	};

	// Compile protos with protox so no system protoc is needed
	let fds = protox::compile(&proto_files, &include_dirs)?;
	tonic_prost_build::configure()
		.build_server(true)
		.build_client(true)
		.compile_fds_with_config(fds, config)?;

	// Tell cargo to re-run when protos change
	for path in [proto_files, include_dirs].concat() {
		println!("cargo:rerun-if-changed={}", path.to_str().unwrap());
	}

	Ok(())
}
