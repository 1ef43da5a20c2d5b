//! Default service description filter, the introspection document
//! generator of the shared tier.

use crate::context::RequestContext;
use crate::extension::{Extension, ExtensionComponent, FilterAction, RequestFilter, Response};
use crate::media_type::MediaType;
use serde_json::json;
use std::sync::Arc;

/// Serves the engine's service description document when a request asks for
/// it. A locally registered description generator replaces this one for its
/// whole registry (the shared default is suppressed).
#[derive(Debug, Default)]
pub struct ServiceDescriptionFilter;

impl ServiceDescriptionFilter {
    /// Request property that marks a description request
    pub const DESCRIPTION_REQUEST_PROPERTY: &'static str = "service.description.request";

    pub fn new() -> Self {
        Self
    }
}

impl Extension for ServiceDescriptionFilter {}

impl RequestFilter for ServiceDescriptionFilter {
    fn filter_request(&self, ctx: &mut RequestContext) -> FilterAction {
        if ctx.property(Self::DESCRIPTION_REQUEST_PROPERTY).is_none() {
            return FilterAction::Continue;
        }
        FilterAction::Abort(
            Response::new(200)
                .with_media_type(MediaType::new("application", "json"))
                .with_body(json!({
                    "engine": "provider-core",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
        )
    }

    fn is_description_generator(&self) -> bool {
        true
    }
}

impl ExtensionComponent for ServiceDescriptionFilter {
    fn as_request_filter(self: Arc<Self>) -> Option<Arc<dyn RequestFilter>> {
        Some(self)
    }

    fn component_name(&self) -> &str {
        "service_description_filter"
    }
}
