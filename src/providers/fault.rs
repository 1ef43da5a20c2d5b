//! Fallback fault-to-response mapper.

use crate::extension::{ExceptionMapper, Extension, ExtensionComponent, Response, ServiceFault};
use crate::media_type::MediaType;
use crate::typing::HandledType;
use serde_json::json;
use std::sync::Arc;

/// Maps any otherwise-unmapped service fault to a JSON error response.
/// Registered untyped on purpose: every typed mapper outranks it in the
/// specificity sort, so it only ever catches the leftovers.
#[derive(Debug, Default)]
pub struct DefaultFaultMapper;

impl DefaultFaultMapper {
    pub fn new() -> Self {
        Self
    }
}

impl Extension for DefaultFaultMapper {}

impl ExceptionMapper for DefaultFaultMapper {
    fn handled_type(&self) -> HandledType {
        HandledType::CatchAll
    }

    fn to_response(&self, fault: &ServiceFault) -> Response {
        Response::new(fault.status_hint().unwrap_or(500))
            .with_media_type(MediaType::new("application", "json"))
            .with_body(json!({
                "error": fault.message(),
                "type": fault.kind().name(),
            }))
    }
}

impl ExtensionComponent for DefaultFaultMapper {
    fn as_exception_mapper(self: Arc<Self>) -> Option<Arc<dyn ExceptionMapper>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "default_fault_mapper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::TypeTag;

    #[test]
    fn maps_unhinted_faults_to_500() {
        let mapper = DefaultFaultMapper::new();
        let response = mapper.to_response(&ServiceFault::new(TypeTag::new("Unexpected"), "boom"));
        assert_eq!(response.status, 500);
        assert_eq!(response.body.unwrap()["error"], "boom");
    }

    #[test]
    fn honors_the_fault_status_hint() {
        let mapper = DefaultFaultMapper::new();
        let fault = ServiceFault::new(TypeTag::new("NotFound"), "missing").with_status_hint(404);
        assert_eq!(mapper.to_response(&fault).status, 404);
    }
}
