//! Default `application/x-www-form-urlencoded` body converter.

use crate::error::{ProviderError, Result};
use crate::extension::{EntityReader, EntityWriter, Extension, ExtensionComponent};
use crate::media_type::MediaType;
use crate::typing::{HandledType, TypeTag};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Reads and writes url-encoded form bodies as flat string maps
#[derive(Debug, Default)]
pub struct FormEncodingProvider;

impl FormEncodingProvider {
    pub fn new() -> Self {
        Self
    }

    fn media_types() -> Vec<MediaType> {
        vec![MediaType::new("application", "x-www-form-urlencoded")]
    }
}

impl Extension for FormEncodingProvider {}

impl EntityReader for FormEncodingProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn consumes(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn read_entity(&self, _ty: &TypeTag, _media_type: &MediaType, body: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(body)
            .map_err(|err| ProviderError::conversion(format!("body is not valid UTF-8: {err}")))?;
        let mut fields = Map::new();
        for pair in text.split('&').filter(|pair| !pair.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            fields.insert(
                percent_decode(name)?,
                Value::String(percent_decode(value)?),
            );
        }
        Ok(Value::Object(fields))
    }
}

impl EntityWriter for FormEncodingProvider {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn produces(&self) -> Vec<MediaType> {
        Self::media_types()
    }

    fn write_entity(&self, value: &Value, _ty: &TypeTag, _media_type: &MediaType) -> Result<Vec<u8>> {
        let Value::Object(fields) = value else {
            return Err(ProviderError::conversion(
                "form writer expects an object payload",
            ));
        };
        let mut encoded = String::new();
        for (name, field) in fields {
            if !encoded.is_empty() {
                encoded.push('&');
            }
            encoded.push_str(&percent_encode(name));
            encoded.push('=');
            let text = match field {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            encoded.push_str(&percent_encode(&text));
        }
        Ok(encoded.into_bytes())
    }
}

impl ExtensionComponent for FormEncodingProvider {
    fn as_entity_reader(self: Arc<Self>) -> Option<Arc<dyn EntityReader>> {
        Some(self)
    }

    fn as_entity_writer(self: Arc<Self>) -> Option<Arc<dyn EntityWriter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "form_encoding_provider"
    }
}

fn percent_decode(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'+' => {
                decoded.push(b' ');
                index += 1;
            }
            b'%' => {
                let escape = bytes
                    .get(index + 1..index + 3)
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| {
                        ProviderError::conversion(format!("invalid percent escape in '{raw}'"))
                    })?;
                decoded.push(escape);
                index += 3;
            }
            byte => {
                decoded.push(byte);
                index += 1;
            }
        }
    }
    String::from_utf8(decoded)
        .map_err(|err| ProviderError::conversion(format!("decoded field is not valid UTF-8: {err}")))
}

fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_form_pairs() {
        let provider = FormEncodingProvider::new();
        let value = provider
            .read_entity(
                &TypeTag::new("LoginForm"),
                &MediaType::new("application", "x-www-form-urlencoded"),
                b"user=alice&note=hello+world%21",
            )
            .unwrap();
        assert_eq!(value, json!({"user": "alice", "note": "hello world!"}));
    }

    #[test]
    fn encodes_reserved_characters() {
        let provider = FormEncodingProvider::new();
        let bytes = provider
            .write_entity(
                &json!({"note": "a&b c"}),
                &TypeTag::new("LoginForm"),
                &MediaType::new("application", "x-www-form-urlencoded"),
            )
            .unwrap();
        assert_eq!(bytes, b"note=a%26b+c");
    }

    #[test]
    fn rejects_truncated_escapes() {
        let provider = FormEncodingProvider::new();
        let err = provider
            .read_entity(
                &TypeTag::new("LoginForm"),
                &MediaType::new("application", "x-www-form-urlencoded"),
                b"note=%2",
            )
            .unwrap_err();
        assert!(matches!(err, ProviderError::Conversion { .. }));
    }
}
