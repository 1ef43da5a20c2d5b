//! Shared fixtures for the engine integration tests.
//!
//! Components here identify themselves through their payloads: a test
//! writer emits its own label as the entity bytes, a test mapper embeds its
//! label in the response body. Selection results are asserted by label, not
//! by pointer identity.

// Each integration test crate compiles its own view of this module.
#![allow(dead_code)]

use provider_core::context::ContextSlot;
use provider_core::error::Result;
use provider_core::extension::{
    ContextProvider, ContextResolver, EntityReader, EntityWriter, ExceptionMapper, Extension,
    ExtensionComponent, FilterAction, ParameterHandler, RequestFilter, Response,
    ResponseExceptionMapper, ServiceFault,
};
use provider_core::media_type::MediaType;
use provider_core::typing::{HandledType, TypeTag};
use serde_json::Value;
use std::sync::Arc;

pub struct TestWriter {
    label: String,
    handled: HandledType,
    produces: Vec<MediaType>,
    slot: Option<Arc<ContextSlot>>,
}

impl TestWriter {
    pub fn new(label: &str, handled: HandledType) -> Self {
        Self {
            label: label.to_string(),
            handled,
            produces: vec![MediaType::wildcard()],
            slot: None,
        }
    }

    pub fn producing(mut self, produces: Vec<MediaType>) -> Self {
        self.produces = produces;
        self
    }

    pub fn with_slot(mut self, slot: Arc<ContextSlot>) -> Self {
        self.slot = Some(slot);
        self
    }
}

impl Extension for TestWriter {
    fn context_slots(&self) -> Vec<Arc<ContextSlot>> {
        self.slot.iter().map(Arc::clone).collect()
    }
}

impl EntityWriter for TestWriter {
    fn handled_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn produces(&self) -> Vec<MediaType> {
        self.produces.clone()
    }

    fn write_entity(&self, _value: &Value, _ty: &TypeTag, _media_type: &MediaType) -> Result<Vec<u8>> {
        Ok(self.label.clone().into_bytes())
    }
}

impl ExtensionComponent for TestWriter {
    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

pub struct TestReader {
    label: String,
    handled: HandledType,
    consumes: Vec<MediaType>,
}

impl TestReader {
    pub fn new(label: &str, handled: HandledType) -> Self {
        Self {
            label: label.to_string(),
            handled,
            consumes: vec![MediaType::wildcard()],
        }
    }

    pub fn consuming(mut self, consumes: Vec<MediaType>) -> Self {
        self.consumes = consumes;
        self
    }
}

impl Extension for TestReader {}

impl EntityReader for TestReader {
    fn handled_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn consumes(&self) -> Vec<MediaType> {
        self.consumes.clone()
    }

    fn read_entity(&self, _ty: &TypeTag, _media_type: &MediaType, _body: &[u8]) -> Result<Value> {
        Ok(Value::String(self.label.clone()))
    }
}

impl ExtensionComponent for TestReader {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

pub struct TestMapper {
    label: String,
    handled: HandledType,
}

impl TestMapper {
    pub fn new(label: &str, handled: HandledType) -> Self {
        Self {
            label: label.to_string(),
            handled,
        }
    }
}

impl Extension for TestMapper {}

impl ExceptionMapper for TestMapper {
    fn handled_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn to_response(&self, fault: &ServiceFault) -> Response {
        Response::new(fault.status_hint().unwrap_or(500))
            .with_body(Value::String(self.label.clone()))
    }
}

impl ExtensionComponent for TestMapper {
    fn as_exception_mapper(self: Arc<Self>) -> Option<Arc<dyn ExceptionMapper>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

pub struct TestResolver {
    handled: HandledType,
    value: Option<Value>,
}

impl TestResolver {
    pub fn new(handled: HandledType, value: Option<Value>) -> Self {
        Self { handled, value }
    }
}

impl Extension for TestResolver {}

impl ContextResolver for TestResolver {
    fn context_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn resolve(&self, _requested: &TypeTag) -> Option<Value> {
        self.value.clone()
    }
}

impl ExtensionComponent for TestResolver {
    fn as_context_resolver(self: Arc<Self>) -> Option<Arc<dyn ContextResolver>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "test_resolver"
    }
}

pub struct TestFilter {
    label: String,
    description_generator: bool,
}

impl TestFilter {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            description_generator: false,
        }
    }

    pub fn description_generator(mut self) -> Self {
        self.description_generator = true;
        self
    }
}

impl Extension for TestFilter {}

impl RequestFilter for TestFilter {
    fn filter_request(&self, _ctx: &mut provider_core::RequestContext) -> FilterAction {
        FilterAction::Continue
    }

    fn is_description_generator(&self) -> bool {
        self.description_generator
    }
}

impl ExtensionComponent for TestFilter {
    fn as_request_filter(self: Arc<Self>) -> Option<Arc<dyn RequestFilter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

pub struct TestParamHandler {
    label: String,
    handled: HandledType,
}

impl TestParamHandler {
    pub fn new(label: &str, handled: HandledType) -> Self {
        Self {
            label: label.to_string(),
            handled,
        }
    }
}

impl Extension for TestParamHandler {}

impl ParameterHandler for TestParamHandler {
    fn handled_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn parse_parameter(&self, raw: &str) -> Result<Value> {
        Ok(Value::String(format!("{}:{raw}", self.label)))
    }
}

impl ExtensionComponent for TestParamHandler {
    fn as_parameter_handler(self: Arc<Self>) -> Option<Arc<dyn ParameterHandler>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

pub struct TestContextProvider {
    handled: HandledType,
    property: String,
}

impl TestContextProvider {
    /// Builds its context value from the named request property
    pub fn new(handled: HandledType, property: &str) -> Self {
        Self {
            handled,
            property: property.to_string(),
        }
    }
}

impl Extension for TestContextProvider {}

impl ContextProvider for TestContextProvider {
    fn context_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn create_context(&self, ctx: &provider_core::RequestContext) -> Option<Value> {
        ctx.property(&self.property).cloned()
    }
}

impl ExtensionComponent for TestContextProvider {
    fn as_context_provider(self: Arc<Self>) -> Option<Arc<dyn ContextProvider>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "test_context_provider"
    }
}

pub struct TestResponseMapper {
    label: String,
    handled: HandledType,
}

impl TestResponseMapper {
    pub fn new(label: &str, handled: HandledType) -> Self {
        Self {
            label: label.to_string(),
            handled,
        }
    }
}

impl Extension for TestResponseMapper {}

impl ResponseExceptionMapper for TestResponseMapper {
    fn handled_type(&self) -> HandledType {
        self.handled.clone()
    }

    fn from_response(&self, response: &Response) -> Option<ServiceFault> {
        Some(
            ServiceFault::new(TypeTag::new(self.label.clone()), "remote failure")
                .with_status_hint(response.status),
        )
    }
}

impl ExtensionComponent for TestResponseMapper {
    fn as_response_exception_mapper(self: Arc<Self>) -> Option<Arc<dyn ResponseExceptionMapper>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        &self.label
    }
}

/// Identify a selected writer by the label it writes
pub fn writer_label(writer: &Arc<dyn EntityWriter>) -> String {
    let bytes = writer
        .write_entity(&Value::Null, &TypeTag::new("probe"), &MediaType::wildcard())
        .expect("test writer never fails");
    String::from_utf8(bytes).expect("test writer labels are UTF-8")
}

/// Identify a selected reader by the label it yields
pub fn reader_label(reader: &Arc<dyn EntityReader>) -> String {
    match reader
        .read_entity(&TypeTag::new("probe"), &MediaType::wildcard(), b"")
        .expect("test reader never fails")
    {
        Value::String(label) => label,
        other => panic!("unexpected reader payload: {other}"),
    }
}

/// Identify a selected mapper by the label it embeds
pub fn mapper_label(mapper: &Arc<dyn ExceptionMapper>, fault: &ServiceFault) -> String {
    match mapper.to_response(fault).body {
        Some(Value::String(label)) => label,
        other => panic!("unexpected mapper body: {other:?}"),
    }
}
