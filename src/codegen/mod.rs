//! Kotlin code generation for gRPC services
//!
//! This module turns service contexts into the output files protoc writes:
//! one shared adapters file per run, plus an `ImplBase` and a `StubExt`
//! file per service, placed in the directory of the service's JVM package.

pub mod method;
pub mod service;
pub mod templates;

use crate::options::PluginOptions;
use crate::GeneratorError;
use prost_types::compiler::code_generator_response::File;
use service::ServiceContext;
use templates::{Renderer, ADAPTERS_TEMPLATE, IMPL_BASE_TEMPLATE, STUB_EXTENSIONS_TEMPLATE};

/// Fixed location of the shared coroutine adapters
pub const ADAPTERS_FILE_PATH: &str = "io/rouz/grpc/Adapters.kt";

/// Class name suffix of the server base class file
pub const IMPL_BASE_SUFFIX: &str = "ImplBase";

/// Suffix of the client stub extensions file
pub const STUB_SUFFIX: &str = "StubExt";

const KOTLIN_EXTENSION: &str = "kt";

/// An output file decided on but not yet rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Output path relative to protoc's output directory
    pub path: String,
    /// Name of the template producing the contents
    pub template: &'static str,
}

/// Decide the files generated for one service
pub fn plan_service(service: &ServiceContext, options: &PluginOptions) -> Vec<PlannedFile> {
    let mut planned = Vec::with_capacity(2);

    if options.impl_base {
        planned.push(PlannedFile {
            path: service_file_path(service, IMPL_BASE_SUFFIX),
            template: IMPL_BASE_TEMPLATE,
        });
    }
    if options.stubs {
        planned.push(PlannedFile {
            path: service_file_path(service, STUB_SUFFIX),
            template: STUB_EXTENSIONS_TEMPLATE,
        });
    }

    planned
}

/// Render the adapters file followed by every service's files
pub fn generate_files(
    services: &[ServiceContext],
    options: &PluginOptions,
    renderer: &dyn Renderer,
) -> Result<Vec<File>, GeneratorError> {
    let mut files = Vec::with_capacity(1 + services.len() * 2);

    let content = renderer.render(ADAPTERS_TEMPLATE, &tera::Context::new())?;
    files.push(output_file(ADAPTERS_FILE_PATH.to_string(), content));

    for service in services {
        let context = tera::Context::from_serialize(service).map_err(|e| {
            GeneratorError::Template(format!(
                "Failed to build context for {}: {}",
                service.service_name, e
            ))
        })?;

        for planned in plan_service(service, options) {
            tracing::debug!(path = %planned.path, template = planned.template, "rendering");
            let content = renderer.render(planned.template, &context)?;
            files.push(output_file(planned.path, content));
        }
    }

    Ok(files)
}

/// Place `file_name` in the directory for `package_name`
///
/// `com.example` maps to `com/example/<file_name>`; the empty package maps
/// to the output root.
pub fn absolute_file_name(package_name: &str, file_name: &str) -> String {
    let dir = package_name.replace('.', "/");
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", dir, file_name)
    }
}

fn service_file_path(service: &ServiceContext, suffix: &str) -> String {
    let file_name = format!("{}{}.{}", service.service_name, suffix, KOTLIN_EXTENSION);
    absolute_file_name(&service.package_name, &file_name)
}

fn output_file(name: String, content: String) -> File {
    File {
        name: Some(name),
        content: Some(content),
        ..Default::default()
    }
}
