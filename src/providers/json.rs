//! Default JSON body converter, the workhorse of the default-converter
//! tier.

use crate::error::{ProviderError, Result};
use crate::extension::{EntityReader, EntityWriter, Extension, ExtensionComponent};
use crate::media_type::MediaType;
use crate::typing::{HandledType, TypeTag};
use serde_json::Value;
use std::sync::Arc;

/// Reads and writes `application/json` bodies for any application type
#[derive(Debug, Default)]
pub struct JsonEntityProvider;

impl JsonEntityProvider {
    pub fn new() -> Self {
        Self
    }

    fn media_types() -> Vec<MediaType> {
        vec![MediaType::new("application", "json")]
    }
}

impl Extension for JsonEntityProvider {}

impl EntityReader for JsonEntityProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn consumes(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn read_entity(&self, _ty: &TypeTag, _media_type: &MediaType, body: &[u8]) -> Result<Value> {
        serde_json::from_slice(body)
            .map_err(|err| ProviderError::conversion(format!("invalid JSON body: {err}")))
    }
}

impl EntityWriter for JsonEntityProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn produces(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn write_entity(&self, value: &Value, _ty: &TypeTag, _media_type: &MediaType) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|err| ProviderError::conversion(format!("JSON serialization failed: {err}")))
    }
}

impl ExtensionComponent for JsonEntityProvider {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        Some(self)
    }

    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "json_entity_provider"
    }
}
