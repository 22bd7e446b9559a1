//! protoc-gen-grpc-kotlin - A protoc plugin for generating Kotlin gRPC bindings
//!
//! This binary reads a CodeGeneratorRequest from stdin and writes a
//! CodeGeneratorResponse to stdout, following the protoc plugin protocol.

use prost::Message;
use prost_types::compiler::CodeGeneratorResponse;
use std::io::{self, Read, Write};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "PROTOC_GEN_GRPC_KOTLIN_LOG";

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("protoc-gen-grpc-kotlin: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the encoded response, so logs go to stderr only
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    // Generation failures are reported to protoc through the response itself
    let response =
        protoc_gen_grpc_kotlin::generate_from_bytes(&buf).unwrap_or_else(|e| {
            tracing::error!(error = %e, "generation failed");
            CodeGeneratorResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        });

    tracing::debug!(files = response.file.len(), "writing response");
    for f in &response.file {
        tracing::debug!(name = f.name.as_deref().unwrap_or("<unnamed>"), "generated file");
    }

    let mut out = Vec::new();
    response.encode(&mut out)?;
    io::stdout().write_all(&out)?;
    io::stdout().flush()?;

    Ok(())
}
