//! Default `text/plain` body converter.

use crate::error::{ProviderError, Result};
use crate::extension::{EntityReader, EntityWriter, Extension, ExtensionComponent};
use crate::media_type::MediaType;
use crate::typing::{HandledType, TypeTag};
use serde_json::Value;
use std::sync::Arc;

/// Reads and writes `text/plain` bodies. Incoming text becomes a string
/// value; outgoing strings are written verbatim and other values fall back
/// to their canonical textual form.
#[derive(Debug, Default)]
pub struct PlainTextEntityProvider;

impl PlainTextEntityProvider {
    pub fn new() -> Self {
        Self
    }

    fn media_types() -> Vec<MediaType> {
        vec![MediaType::new("text", "plain")]
    }
}

impl Extension for PlainTextEntityProvider {}

impl EntityReader for PlainTextEntityProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn consumes(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn read_entity(&self, _ty: &TypeTag, _media_type: &MediaType, body: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(body)
            .map_err(|err| ProviderError::conversion(format!("body is not valid UTF-8: {err}")))?;
        Ok(Value::String(text.to_string()))
    }
}

impl EntityWriter for PlainTextEntityProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn produces(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn write_entity(&self, value: &Value, _ty: &TypeTag, _media_type: &MediaType) -> Result<Vec<u8>> {
        let text = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Ok(text.into_bytes())
    }
}

impl ExtensionComponent for PlainTextEntityProvider {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        Some(self)
    }

    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "plain_text_entity_provider"
    }
}
