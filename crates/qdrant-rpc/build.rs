//! Build script for qdrant-rpc.
//!
//! Compiles the protobuf definitions into Rust code using tonic-build.
//! Falls back to a vendored `protoc` when `PROTOC` is not set; the vendored
//! include directory provides `google/protobuf/timestamp.proto`.

use std::path::PathBuf;

const PROTOS: &[&str] = &[
    "../../proto/json_with_int.proto",
    "../../proto/collections.proto",
    "../../proto/points.proto",
    "../../proto/qdrant.proto",
    "../../proto/snapshots_service.proto",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    let includes = [
        PathBuf::from("../../proto"),
        protoc_bin_vendored::include_path()?,
    ];

    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }

    // Server stubs are only used by in-process test servers.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(PROTOS, &includes)?;

    Ok(())
}
