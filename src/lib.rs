//! protoc-gen-grpc-kotlin library
//!
//! This crate provides the code generation logic for turning Protocol Buffer
//! service definitions into Kotlin coroutine bindings layered on grpc-java.

#![deny(warnings)]
#![deny(missing_docs)]

pub mod codegen;
pub mod comments;
pub mod generator;
pub mod naming;
pub mod options;
pub mod types;

use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The descriptors violate an invariant a well-formed compiler front-end guarantees
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A method references a type that is not declared in any provided file
    #[error("Unresolved type: {0}")]
    UnresolvedType(String),

    /// Invalid plugin configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A template failed to load or render
    #[error("Template error: {0}")]
    Template(String),

    /// Failed to decode protobuf message
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Generate Kotlin bindings from a protobuf CodeGeneratorRequest
///
/// This is the main entry point for the code generator.
pub fn generate(request: CodeGeneratorRequest) -> Result<CodeGeneratorResponse, GeneratorError> {
    generator::generate(request)
}

/// Generate Kotlin bindings from raw CodeGeneratorRequest bytes
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    generator::generate_from_bytes(bytes)
}
