//! Request-level generation pipeline
//!
//! Selects the files protoc asked for, builds service contexts against the
//! full descriptor set, and renders the output files.

use crate::codegen::{self, service, templates::KotlinTemplates};
use crate::options::PluginOptions;
use crate::types::TypeResolver;
use crate::GeneratorError;
use prost::Message;
use prost_types::compiler::code_generator_response::Feature;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::FileDescriptorProto;

/// Generate the response for a decoded request
pub fn generate(request: CodeGeneratorRequest) -> Result<CodeGeneratorResponse, GeneratorError> {
    let options = PluginOptions::parse(request.parameter.as_deref())?;
    let resolver = TypeResolver::new(&request.proto_file)?;

    let to_generate = files_to_generate(&request);
    tracing::debug!(
        requested = request.file_to_generate.len(),
        found = to_generate.len(),
        "selected files to generate"
    );

    let services = service::find_services(&to_generate, &resolver)?;
    let templates = KotlinTemplates::load()?;
    let file = codegen::generate_files(&services, &options, &templates)?;

    Ok(CodeGeneratorResponse {
        file,
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    })
}

/// Decode a serialized request and generate its response
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    let request = CodeGeneratorRequest::decode(bytes)
        .map_err(|e| GeneratorError::Decode(format!("CodeGeneratorRequest: {}", e)))?;
    generate(request)
}

/// The requested files, in the order protoc listed them in `proto_file`
fn files_to_generate(request: &CodeGeneratorRequest) -> Vec<&FileDescriptorProto> {
    request
        .proto_file
        .iter()
        .filter(|file| request.file_to_generate.iter().any(|name| name == file.name()))
        .collect()
}
