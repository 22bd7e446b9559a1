//! Per-RPC template context
//!
//! Each method of a service becomes one `MethodContext`, carrying the
//! resolved message types and the call shape that selects which grpc-java
//! `ServerCalls`/`ClientCalls` strategy the generated code wires it through.

use crate::naming::lower_first;
use crate::types::TypeResolver;
use crate::GeneratorError;
use prost_types::MethodDescriptorProto;
use serde::Serialize;

/// Streaming shape of an RPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    /// Single request, single response
    Unary,
    /// Single request, stream of responses
    ServerStreaming,
    /// Stream of requests, single response
    ClientStreaming,
    /// Streams in both directions
    BidiStreaming,
}

impl CallShape {
    /// Classify from the descriptor's `client_streaming`/`server_streaming` flags
    pub fn classify(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => CallShape::Unary,
            (false, true) => CallShape::ServerStreaming,
            (true, false) => CallShape::ClientStreaming,
            (true, true) => CallShape::BidiStreaming,
        }
    }

    /// The grpc-java `ServerCalls`/`ClientCalls` method implementing this shape
    pub fn grpc_calls_method(&self) -> &'static str {
        match self {
            CallShape::Unary => "asyncUnaryCall",
            CallShape::ServerStreaming => "asyncServerStreamingCall",
            CallShape::ClientStreaming => "asyncClientStreamingCall",
            CallShape::BidiStreaming => "asyncBidiStreamingCall",
        }
    }
}

/// Everything the templates need to render one RPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodContext {
    /// Method name with its first letter lowercased (`sayHello`)
    pub method_name: String,
    /// Fully-qualified JVM class of the request message
    pub input_type: String,
    /// Fully-qualified JVM class of the response message
    pub output_type: String,
    /// Whether the method carries `option deprecated = true`
    pub deprecated: bool,
    /// Client sends a stream
    pub is_many_input: bool,
    /// Server sends a stream
    pub is_many_output: bool,
    /// Streaming shape
    pub call_shape: CallShape,
    /// Invocation strategy tag for `call_shape`
    pub grpc_calls_method_name: &'static str,
    /// Zero-based declaration index within the service
    pub method_number: usize,
    /// Comment attached to the method in the `.proto` source
    pub documentation: Option<String>,
}

impl MethodContext {
    /// Build the context for the method declared at `method_number`
    pub fn new(
        method: &MethodDescriptorProto,
        method_number: usize,
        resolver: &TypeResolver,
        documentation: Option<&str>,
    ) -> Result<Self, GeneratorError> {
        let call_shape = CallShape::classify(method.client_streaming(), method.server_streaming());

        Ok(Self {
            method_name: lower_first(method.name()),
            input_type: resolver.resolve(method.input_type())?,
            output_type: resolver.resolve(method.output_type())?,
            deprecated: method
                .options
                .as_ref()
                .is_some_and(|options| options.deprecated()),
            is_many_input: method.client_streaming(),
            is_many_output: method.server_streaming(),
            call_shape,
            grpc_calls_method_name: call_shape.grpc_calls_method(),
            method_number,
            documentation: documentation.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{DescriptorProto, FileDescriptorProto, MethodOptions};

    #[test]
    fn test_classify_is_exhaustive() {
        assert_eq!(CallShape::classify(false, false), CallShape::Unary);
        assert_eq!(CallShape::classify(false, true), CallShape::ServerStreaming);
        assert_eq!(CallShape::classify(true, false), CallShape::ClientStreaming);
        assert_eq!(CallShape::classify(true, true), CallShape::BidiStreaming);
    }

    #[test]
    fn test_grpc_calls_method_names() {
        let names: Vec<_> = [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .map(|(client, server)| CallShape::classify(client, server).grpc_calls_method())
            .collect();
        assert_eq!(
            names,
            [
                "asyncUnaryCall",
                "asyncServerStreamingCall",
                "asyncClientStreamingCall",
                "asyncBidiStreamingCall"
            ]
        );
    }

    #[test]
    fn test_new_from_descriptor() {
        let file = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            package: Some("a".to_string()),
            message_type: vec![
                DescriptorProto {
                    name: Some("Req".to_string()),
                    ..Default::default()
                },
                DescriptorProto {
                    name: Some("Rep".to_string()),
                    ..Default::default()
                },
            ],
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };
        let resolver = TypeResolver::new(&[file]).unwrap();
        let method = MethodDescriptorProto {
            name: Some("GreetServerStream".to_string()),
            input_type: Some(".a.Req".to_string()),
            output_type: Some(".a.Rep".to_string()),
            server_streaming: Some(true),
            options: Some(MethodOptions {
                deprecated: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let ctx = MethodContext::new(&method, 1, &resolver, Some(" Streams greetings\n")).unwrap();
        assert_eq!(ctx.method_name, "greetServerStream");
        assert_eq!(ctx.input_type, "a.A.Req");
        assert_eq!(ctx.output_type, "a.A.Rep");
        assert!(ctx.deprecated);
        assert!(!ctx.is_many_input);
        assert!(ctx.is_many_output);
        assert_eq!(ctx.call_shape, CallShape::ServerStreaming);
        assert_eq!(ctx.grpc_calls_method_name, "asyncServerStreamingCall");
        assert_eq!(ctx.method_number, 1);
        assert_eq!(ctx.documentation.as_deref(), Some(" Streams greetings\n"));
    }
}
