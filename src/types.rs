//! Protobuf to JVM type name resolution
//!
//! Method signatures in the generated Kotlin refer to the message classes
//! protoc's Java generator produces, so every proto type name is mapped to
//! the fully-qualified Java class name following protobuf-java's rules for
//! `java_package`, `java_multiple_files` and `java_outer_classname`.

use crate::GeneratorError;
use prost_reflect::DescriptorPool;
use prost_types::{DescriptorProto, FileDescriptorProto, FileDescriptorSet};
use std::collections::HashMap;

/// Suffix protobuf-java appends to a derived outer class name that collides
/// with a type declared anywhere in the same file
const OUTER_CLASS_SUFFIX: &str = "OuterClass";

/// Maps fully-qualified proto type names (`.pkg.Outer.Inner`) to Java names
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    types: HashMap<String, String>,
}

impl TypeResolver {
    /// Index every message and enum declared across `files`
    ///
    /// `files` must be the complete set protoc sent, dependencies included,
    /// since generated signatures may reference types declared elsewhere.
    pub fn new(files: &[FileDescriptorProto]) -> Result<Self, GeneratorError> {
        let set = FileDescriptorSet {
            file: files.to_vec(),
        };
        let pool = DescriptorPool::from_file_descriptor_set(set)
            .map_err(|e| GeneratorError::MalformedInput(format!("invalid descriptor set: {}", e)))?;

        // file name -> "java.package.OuterClass" prefix
        let mut prefixes: HashMap<String, String> = HashMap::new();
        let mut types = HashMap::new();

        for message in pool.all_messages() {
            let file = message.parent_file();
            let prefix = prefixes
                .entry(file.name().to_string())
                .or_insert_with(|| java_prefix(file.file_descriptor_proto()));
            let relative = relative_name(message.full_name(), message.package_name());
            types.insert(format!(".{}", message.full_name()), join_name(prefix, relative));
        }

        for enum_desc in pool.all_enums() {
            let file = enum_desc.parent_file();
            let prefix = prefixes
                .entry(file.name().to_string())
                .or_insert_with(|| java_prefix(file.file_descriptor_proto()));
            let relative = relative_name(enum_desc.full_name(), enum_desc.package_name());
            types.insert(format!(".{}", enum_desc.full_name()), join_name(prefix, relative));
        }

        tracing::debug!(types = types.len(), "indexed proto types");

        Ok(Self { types })
    }

    /// Resolve a proto type reference such as `.helloworld.HelloRequest`
    pub fn resolve(&self, proto_type: &str) -> Result<String, GeneratorError> {
        self.types
            .get(proto_type)
            .cloned()
            .ok_or_else(|| GeneratorError::UnresolvedType(proto_type.to_string()))
    }
}

/// The JVM package generated code for `file` lives in
///
/// A non-empty `java_package` option wins, then the proto package, then the
/// default (empty) package.
pub fn java_package(file: &FileDescriptorProto) -> &str {
    file.options
        .as_ref()
        .map(|options| options.java_package())
        .filter(|package| !package.is_empty())
        .unwrap_or_else(|| file.package())
}

/// The JVM package protobuf-java puts `file`'s classes in
///
/// Unlike [`java_package`], a `java_package` option that is present but
/// empty selects the default package.
fn type_package(file: &FileDescriptorProto) -> &str {
    file.options
        .as_ref()
        .and_then(|options| options.java_package.as_deref())
        .unwrap_or_else(|| file.package())
}

/// Package plus, unless `java_multiple_files` is set, the outer class name
fn java_prefix(file: &FileDescriptorProto) -> String {
    let multiple_files = file
        .options
        .as_ref()
        .is_some_and(|options| options.java_multiple_files());

    if multiple_files {
        type_package(file).to_string()
    } else {
        join_name(type_package(file), &outer_class_name(file))
    }
}

/// The outer class protoc-gen-java wraps a file's types in
pub fn outer_class_name(file: &FileDescriptorProto) -> String {
    if let Some(name) = file
        .options
        .as_ref()
        .map(|options| options.java_outer_classname())
        .filter(|name| !name.is_empty())
    {
        return name.to_string();
    }

    let file_name = file.name();
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let base = base.strip_suffix(".proto").unwrap_or(base);
    let class_name = underscores_to_camel_case(base);

    let collides = file.enum_type.iter().any(|e| e.name() == class_name)
        || file.service.iter().any(|s| s.name() == class_name)
        || file
            .message_type
            .iter()
            .any(|m| declares_name(m, &class_name));

    if collides {
        format!("{}{}", class_name, OUTER_CLASS_SUFFIX)
    } else {
        class_name
    }
}

/// Whether `message` or any message or enum nested in it is called `name`
fn declares_name(message: &DescriptorProto, name: &str) -> bool {
    message.name() == name
        || message.enum_type.iter().any(|e| e.name() == name)
        || message
            .nested_type
            .iter()
            .any(|nested| declares_name(nested, name))
}

/// protobuf-java's file name to class name conversion
///
/// Non-alphanumeric characters are dropped and capitalize the next letter,
/// as does a digit. The first letter is always capitalized.
fn underscores_to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cap_next = true;

    for c in input.chars() {
        if c.is_ascii_lowercase() {
            out.push(if cap_next { c.to_ascii_uppercase() } else { c });
            cap_next = false;
        } else if c.is_ascii_uppercase() {
            out.push(c);
            cap_next = false;
        } else if c.is_ascii_digit() {
            out.push(c);
            cap_next = true;
        } else {
            cap_next = true;
        }
    }

    out
}

/// Strip the proto package from a full name, leaving `Outer.Inner`
fn relative_name<'a>(full_name: &'a str, package: &str) -> &'a str {
    if package.is_empty() {
        return full_name;
    }
    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
}

/// Dot-join two name parts, skipping an empty one
fn join_name(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}.{}", prefix, name),
    }
}
