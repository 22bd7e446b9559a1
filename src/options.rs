//! Plugin parameter parsing
//!
//! protoc passes everything after `--grpc-kotlin_opt=` (or the part of
//! `--grpc-kotlin_out=` before the colon) as the request's `parameter`
//! string. It is read as comma-separated `key=value` pairs:
//!
//! - `impl_base=<bool>`: emit `<Service>ImplBase.kt` (default `true`)
//! - `stubs=<bool>`: emit `<Service>StubExt.kt` (default `true`)
//!
//! A bare key is shorthand for `key=true`.

use crate::GeneratorError;

/// Options controlling which files are generated per service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginOptions {
    /// Generate the abstract server base class
    pub impl_base: bool,
    /// Generate the client stub extensions
    pub stubs: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            impl_base: true,
            stubs: true,
        }
    }
}

impl PluginOptions {
    /// Parse the request's `parameter` string
    pub fn parse(parameter: Option<&str>) -> Result<Self, GeneratorError> {
        let mut options = Self::default();
        let Some(parameter) = parameter else {
            return Ok(options);
        };

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (part, "true"),
            };

            let flag = parse_bool(key, value)?;
            match key {
                "impl_base" => options.impl_base = flag,
                "stubs" => options.stubs = flag,
                _ => {
                    return Err(GeneratorError::InvalidConfig(format!(
                        "unknown option `{}`",
                        key
                    )))
                }
            }
        }

        Ok(options)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, GeneratorError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(GeneratorError::InvalidConfig(format!(
            "option `{}` expects true or false, got `{}`",
            key, value
        ))),
    }
}
