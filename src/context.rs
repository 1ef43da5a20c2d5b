//! # Request Context & Injection Overlay
//!
//! Per-request metadata handed to candidates during selection, and the
//! thread-keyed overlay cells that let a process-wide singleton candidate
//! observe request-scoped values without cross-request leakage.
//!
//! ## Key Features
//!
//! - **Request metadata**: declared content type, accepted media types, and
//!   a free-form property bag
//! - **Thread-keyed injection**: a [`ContextSlot`] stores one context per
//!   thread, so concurrent requests sharing a singleton candidate never see
//!   each other's values
//! - **Paired cleanup**: every injection is cleared either on mid-selection
//!   rejection or by the end-of-lifecycle sweep

use crate::error::{ProviderError, Result};
use crate::media_type::{self, MediaType};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// A type-level annotation attached to the value being negotiated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub value: Option<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Request/response metadata exposed to candidates during selection.
///
/// The engine treats this as opaque apart from the declared content type and
/// the accepted media types; the property bag carries whatever the
/// surrounding pipeline wants candidates to see (security principal, URI
/// info, correlation ids).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    content_type: Option<MediaType>,
    accept: Vec<MediaType>,
    properties: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, media_type: MediaType) -> Self {
        self.content_type = Some(media_type);
        self
    }

    pub fn with_accept(mut self, accept: Vec<MediaType>) -> Self {
        self.accept = accept;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn content_type(&self) -> Option<&MediaType> {
        self.content_type.as_ref()
    }

    pub fn accept(&self) -> &[MediaType] {
        &self.accept
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// The media type selection should assume when the caller supplies none:
    /// the declared content type if present, otherwise the most specific
    /// accepted type, otherwise `*/*`.
    pub fn preferred_media_type(&self) -> MediaType {
        if let Some(content_type) = &self.content_type {
            return content_type.clone();
        }
        let mut accepted = self.accept.clone();
        media_type::sort_by_specificity(&mut accepted);
        accepted.into_iter().next().unwrap_or_else(MediaType::wildcard)
    }
}

/// A request-scoped overlay cell owned by an extension component.
///
/// Components that want contextual values hold one or more slots and expose
/// them through `Extension::context_slots`; the engine injects the current
/// request's context into the calling thread's cell before the component is
/// consulted and clears it afterwards. Reads only ever see the calling
/// thread's cell.
#[derive(Debug, Default)]
pub struct ContextSlot {
    required_property: Option<String>,
    cells: DashMap<ThreadId, Arc<RequestContext>>,
}

impl ContextSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A slot that refuses injection unless the named property is present
    /// in the request context. Components use this to declare contextual
    /// values they cannot operate without.
    pub fn requiring(property: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            required_property: Some(property.into()),
            cells: DashMap::new(),
        })
    }

    /// The context injected for the calling thread, if any
    pub fn current(&self) -> Option<Arc<RequestContext>> {
        self.cells
            .get(&thread::current().id())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Whether no thread currently holds an injected context
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn inject(&self, ctx: Arc<RequestContext>) -> Result<()> {
        if let Some(required) = &self.required_property {
            if ctx.property(required).is_none() {
                return Err(ProviderError::injection(
                    "context slot",
                    format!("required context property '{required}' is unavailable"),
                ));
            }
        }
        self.cells.insert(thread::current().id(), ctx);
        Ok(())
    }

    pub(crate) fn clear_current(&self) {
        self.cells.remove(&thread::current().id());
    }

    pub(crate) fn clear_all(&self) {
        self.cells.clear();
    }
}
