//! Service discovery over `SourceCodeInfo`
//!
//! Services and methods are found by walking a file's source locations
//! rather than its descriptor lists. A location path `[6, s]` names
//! `FileDescriptorProto.service[s]`, and `[6, s, 2, m]` names
//! `service[s].method[m]`. The indices are then used to look up the
//! descriptors, and the same location supplies the attached comment.

use super::method::MethodContext;
use crate::comments::find_comment;
use crate::types::{java_package, TypeResolver};
use crate::GeneratorError;
use prost_types::source_code_info::Location;
use prost_types::{FileDescriptorProto, ServiceDescriptorProto};
use serde::Serialize;

/// Field number of `FileDescriptorProto.service`
pub const SERVICE_FIELD_NUMBER: i32 = 6;

/// Field number of `ServiceDescriptorProto.method`
pub const METHOD_FIELD_NUMBER: i32 = 2;

/// `[service_field, service_index]`
const SERVICE_PATH_LEN: usize = 2;

/// `[service_field, service_index, method_field, method_index]`
const METHOD_PATH_LEN: usize = 4;

/// Everything the templates need to render one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceContext {
    /// Name of the `.proto` file declaring the service
    pub proto_name: String,
    /// JVM package of the generated code
    pub package_name: String,
    /// Service name as declared
    pub service_name: String,
    /// Whether the service carries `option deprecated = true`
    pub deprecated: bool,
    /// Comment attached to the service in the `.proto` source
    pub documentation: Option<String>,
    /// Methods in declaration order
    pub methods: Vec<MethodContext>,
}

impl ServiceContext {
    /// Build the context for `file.service[service_index]`
    fn new(
        file: &FileDescriptorProto,
        service: &ServiceDescriptorProto,
        service_index: i32,
        location: &Location,
        resolver: &TypeResolver,
    ) -> Result<Self, GeneratorError> {
        let locations = source_locations(file);

        let mut methods = Vec::new();
        for method_location in locations.iter().filter(|l| {
            l.path.len() == METHOD_PATH_LEN
                && l.path[0] == SERVICE_FIELD_NUMBER
                && l.path[1] == service_index
                && l.path[2] == METHOD_FIELD_NUMBER
        }) {
            let method_number = descriptor_index(
                method_location.path[METHOD_PATH_LEN - 1],
                service.method.len(),
                &format!("method of service {}", service.name()),
                file.name(),
            )?;
            let documentation = find_comment(locations, &method_location.path);
            methods.push(MethodContext::new(
                &service.method[method_number],
                method_number,
                resolver,
                documentation,
            )?);
        }

        Ok(Self {
            proto_name: file.name().to_string(),
            package_name: java_package(file).to_string(),
            service_name: service.name().to_string(),
            deprecated: service
                .options
                .as_ref()
                .is_some_and(|options| options.deprecated()),
            documentation: find_comment(locations, &location.path).map(str::to_string),
            methods,
        })
    }
}

/// Build a `ServiceContext` for every service located in `files`
///
/// Services come out in file order, then in the order their locations
/// appear, which protoc emits in declaration order.
pub fn find_services(
    files: &[&FileDescriptorProto],
    resolver: &TypeResolver,
) -> Result<Vec<ServiceContext>, GeneratorError> {
    let mut contexts = Vec::new();

    for file in files {
        let locations = source_locations(file);
        let before = contexts.len();

        for location in locations
            .iter()
            .filter(|l| l.path.len() == SERVICE_PATH_LEN && l.path[0] == SERVICE_FIELD_NUMBER)
        {
            let service_index = location.path[SERVICE_PATH_LEN - 1];
            let service_number =
                descriptor_index(service_index, file.service.len(), "service", file.name())?;
            let service = &file.service[service_number];

            let context = ServiceContext::new(file, service, service_index, location, resolver)?;
            tracing::debug!(
                file = file.name(),
                service = %context.service_name,
                methods = context.methods.len(),
                "found service"
            );
            contexts.push(context);
        }

        if contexts.len() == before && !file.service.is_empty() {
            tracing::warn!(
                file = file.name(),
                "file declares services but has no source locations for them"
            );
        }
    }

    Ok(contexts)
}

fn source_locations(file: &FileDescriptorProto) -> &[Location] {
    file.source_code_info
        .as_ref()
        .map(|info| info.location.as_slice())
        .unwrap_or_default()
}

/// Check a location path index against the repeated field it points into
fn descriptor_index(
    raw: i32,
    len: usize,
    kind: &str,
    file_name: &str,
) -> Result<usize, GeneratorError> {
    usize::try_from(raw)
        .ok()
        .filter(|index| *index < len)
        .ok_or_else(|| {
            GeneratorError::MalformedInput(format!(
                "{} index {} out of range in {} ({} declared)",
                kind, raw, file_name, len
            ))
        })
}
