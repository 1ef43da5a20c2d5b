//! Default `application/octet-stream` body converter.

use crate::error::{ProviderError, Result};
use crate::extension::{EntityReader, EntityWriter, Extension, ExtensionComponent};
use crate::media_type::MediaType;
use crate::typing::{HandledType, TypeTag};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use std::sync::Arc;

/// Carries opaque binary bodies through the neutral payload model as
/// base64 strings.
#[derive(Debug, Default)]
pub struct BinaryDataProvider;

impl BinaryDataProvider {
    pub fn new() -> Self {
        Self
    }

    fn media_types() -> Vec<MediaType> {
        vec![MediaType::new("application", "octet-stream")]
    }
}

impl Extension for BinaryDataProvider {}

impl EntityReader for BinaryDataProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn consumes(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn read_entity(&self, _ty: &TypeTag, _media_type: &MediaType, body: &[u8]) -> Result<Value> {
        Ok(Value::String(STANDARD.encode(body)))
    }
}

impl EntityWriter for BinaryDataProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn produces(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn write_entity(&self, value: &Value, _ty: &TypeTag, _media_type: &MediaType) -> Result<Vec<u8>> {
        match value {
            Value::String(encoded) => STANDARD.decode(encoded).map_err(|err| {
                ProviderError::conversion(format!("payload is not valid base64: {err}"))
            }),
            other => Err(ProviderError::conversion(format!(
                "binary writer expects a base64 string payload, got {other}"
            ))),
        }
    }
}

impl ExtensionComponent for BinaryDataProvider {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        Some(self)
    }

    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "binary_data_provider"
    }
}
