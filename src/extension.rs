//! # Extension Capability Contracts
//!
//! One trait per extension kind, plus the multi-capability registration
//! contract the registry probes when a component is registered.
//!
//! ## Overview
//!
//! A concrete component implements whichever capability traits it supports
//! and advertises them through [`ExtensionComponent`]'s cast methods; the
//! registry registers the component once and indexes it into every matching
//! kind's list. Entity payloads are neutral [`serde_json::Value`]s - wire
//! marshalling beyond the built-in converters belongs to the components
//! themselves, not the engine.

use crate::context::{Annotation, ContextSlot, RequestContext};
use crate::error::Result;
use crate::media_type::MediaType;
use crate::typing::{HandledType, TypeTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The closed set of extension roles, one candidate list per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionKind {
    EntityReader,
    EntityWriter,
    ContextResolver,
    ContextProvider,
    ExceptionMapper,
    ResponseExceptionMapper,
    ParameterHandler,
    RequestFilter,
    ResponseFilter,
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtensionKind::EntityReader => "entity-reader",
            ExtensionKind::EntityWriter => "entity-writer",
            ExtensionKind::ContextResolver => "context-resolver",
            ExtensionKind::ContextProvider => "context-provider",
            ExtensionKind::ExceptionMapper => "exception-mapper",
            ExtensionKind::ResponseExceptionMapper => "response-exception-mapper",
            ExtensionKind::ParameterHandler => "parameter-handler",
            ExtensionKind::RequestFilter => "request-filter",
            ExtensionKind::ResponseFilter => "response-filter",
        };
        f.write_str(label)
    }
}

/// Base contract shared by every extension capability.
///
/// Components wanting request-scoped contextual values expose overlay slots
/// here; the engine injects the current request into each slot before the
/// component is consulted and guarantees a paired cleanup.
pub trait Extension: Send + Sync {
    fn context_slots(&self) -> Vec<Arc<ContextSlot>> {
        Vec::new()
    }
}

/// An outgoing protocol response produced by mappers and filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub media_type: Option<MediaType>,
    pub body: Option<Value>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            media_type: None,
            body: None,
        }
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A typed service-level failure raised by application code, described by
/// the same tag model used for entity types so mapper specificity can walk
/// the fault hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFault {
    kind: TypeTag,
    message: String,
    status_hint: Option<u16>,
}

impl ServiceFault {
    pub fn new(kind: TypeTag, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_hint: None,
        }
    }

    pub fn with_status_hint(mut self, status: u16) -> Self {
        self.status_hint = Some(status);
        self
    }

    pub fn kind(&self) -> &TypeTag {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_hint(&self) -> Option<u16> {
        self.status_hint
    }
}

/// Deserializes request entities of its handled type from wire bytes
pub trait EntityReader: Extension {
    /// The type family this reader claims, discovered once at registration
    fn handled_type(&self) -> HandledType;

    /// Declared input media types; defaults to any
    fn consumes(&self) -> Vec<MediaType> {
        vec![MediaType::wildcard()]
    }

    /// Capability check for one exact request; called after media-type and
    /// type filtering, with context already injected
    fn is_readable(
        &self,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
    ) -> bool {
        let _ = (ty, element, annotations, media_type);
        true
    }

    fn read_entity(&self, ty: &TypeTag, media_type: &MediaType, body: &[u8]) -> Result<Value>;
}

/// Serializes response entities of its handled type to wire bytes
pub trait EntityWriter: Extension {
    fn handled_type(&self) -> HandledType;

    /// Declared output media types; defaults to any
    fn produces(&self) -> Vec<MediaType> {
        vec![MediaType::wildcard()]
    }

    fn is_writeable(
        &self,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
    ) -> bool {
        let _ = (ty, element, annotations, media_type);
        true
    }

    fn write_entity(&self, value: &Value, ty: &TypeTag, media_type: &MediaType) -> Result<Vec<u8>>;
}

/// Supplies auxiliary values (marshalling configuration, schemas, codec
/// settings) to other components, keyed by context type
pub trait ContextResolver: Extension {
    fn context_type(&self) -> HandledType;

    fn produces(&self) -> Vec<MediaType> {
        vec![MediaType::wildcard()]
    }

    fn resolve(&self, requested: &TypeTag) -> Option<Value>;
}

/// Builds a contextual value directly from request metadata
pub trait ContextProvider: Extension {
    fn context_type(&self) -> HandledType;

    fn create_context(&self, ctx: &RequestContext) -> Option<Value>;
}

/// Maps a typed service fault to a protocol response
pub trait ExceptionMapper: Extension {
    /// The fault family handled, most derived declaration wins selection
    fn handled_type(&self) -> HandledType;

    fn to_response(&self, fault: &ServiceFault) -> Response;
}

/// Client-side counterpart: maps an error response back to a typed fault
pub trait ResponseExceptionMapper: Extension {
    fn handled_type(&self) -> HandledType;

    fn from_response(&self, response: &Response) -> Option<ServiceFault>;
}

/// Converts raw string parameters into typed values
pub trait ParameterHandler: Extension {
    fn handled_type(&self) -> HandledType;

    fn parse_parameter(&self, raw: &str) -> Result<Value>;
}

/// Outcome of a request filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Let processing continue to the next filter
    Continue,
    /// Short-circuit with the given response
    Abort(Response),
}

/// Inspects or rewrites an incoming request before dispatch
pub trait RequestFilter: Extension {
    fn filter_request(&self, ctx: &mut RequestContext) -> FilterAction {
        let _ = ctx;
        FilterAction::Continue
    }

    /// Whether this filter renders the service description document. A
    /// local filter answering true suppresses the shared-tier default
    /// description generator.
    fn is_description_generator(&self) -> bool {
        false
    }
}

/// Inspects or rewrites an outgoing response
pub trait ResponseFilter: Extension {
    fn filter_response(&self, ctx: &RequestContext, response: &mut Response) {
        let _ = (ctx, response);
    }
}

/// Multi-capability registration contract.
///
/// `register` probes each cast in turn and indexes the component into every
/// kind whose cast returns `Some`; a component answering `None` across the
/// board is ignored, never rejected, so decoration lists may contain
/// unrelated objects.
pub trait ExtensionComponent: Send + Sync {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        None
    }

    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        None
    }

    fn as_context_resolver(self: Arc<Self>) -> Option<Arc<dyn ContextResolver>> {
        None
    }

    fn as_context_provider(self: Arc<Self>) -> Option<Arc<dyn ContextProvider>> {
        None
    }

    fn as_exception_mapper(self: Arc<Self>) -> Option<Arc<dyn ExceptionMapper>> {
        None
    }

    fn as_response_exception_mapper(self: Arc<Self>) -> Option<Arc<dyn ResponseExceptionMapper>> {
        None
    }

    fn as_parameter_handler(self: Arc<Self>) -> Option<Arc<dyn ParameterHandler>> {
        None
    }

    fn as_request_filter(self: Arc<Self>) -> Option<Arc<dyn RequestFilter>> {
        None
    }

    fn as_response_filter(self: Arc<Self>) -> Option<Arc<dyn ResponseFilter>> {
        None
    }

    /// Component name for identification in logs
    fn component_name(&self) -> &str {
        "unnamed_extension"
    }
}
