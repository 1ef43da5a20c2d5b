#![allow(clippy::doc_markdown)] // Allow technical terms like JSON, UTF-8 in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Provider Core Rust
//!
//! Request-scoped extension resolution and content-negotiation engine for
//! embedding in web-service runtimes.
//!
//! ## Overview
//!
//! Incoming and outgoing messages carry a declared application type and a
//! negotiated wire content type. Given a value's type, its generic element
//! type, its annotations, and a media type, this engine selects the single
//! best-matching extension component - entity reader, entity writer,
//! context resolver, exception mapper, parameter handler, or filter - from
//! a dynamically registered, priority-ordered candidate set, with
//! deterministic tie-breaking.
//!
//! ## Architecture
//!
//! Selection layers three filters over each kind's presorted candidate
//! list - media-type compatibility, type assignability, and the
//! per-candidate capability check - then breaks ties most-specific-first.
//! Every local miss falls back to a process-wide shared registry carrying
//! the built-in defaults, so application registrations shadow system
//! defaults without re-registering them.
//!
//! ## Module Organization
//!
//! - [`media_type`] - media type model, compatibility and specificity rules
//! - [`typing`] - capability-tag type model and assignability
//! - [`context`] - request context and the thread-keyed injection overlay
//! - [`extension`] - capability traits and the registration contract
//! - [`registry`] - candidate lists, selection algorithms, two-tier chain
//! - [`providers`] - built-in default candidates
//! - [`config`] - engine configuration
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use provider_core::media_type::MediaType;
//! use provider_core::registry::ExtensionRegistry;
//! use provider_core::typing::TypeTag;
//!
//! let registry = ExtensionRegistry::new();
//!
//! // The default converters answer immediately; user registrations would
//! // shadow them.
//! let writer = registry.select_writer(
//!     &TypeTag::new("Invoice"),
//!     None,
//!     &[],
//!     &MediaType::new("application", "json"),
//!     None,
//! );
//! assert!(writer.is_some());
//! ```
//!
//! ## Concurrency
//!
//! The engine is synchronous and never blocks on I/O; each request thread
//! calls in directly. Candidate lists are lock-guarded and iterated as
//! copy-on-read snapshots, and injected request context is thread-keyed so
//! concurrent requests sharing a singleton candidate never observe each
//! other's values.

pub mod config;
pub mod context;
pub mod error;
pub mod extension;
pub mod logging;
pub mod media_type;
pub mod providers;
pub mod registry;
pub mod typing;

pub use config::EngineConfig;
pub use context::{Annotation, ContextSlot, RequestContext};
pub use error::{ProviderError, Result};
pub use extension::{
    ContextProvider, ContextResolver, EntityReader, EntityWriter, ExceptionMapper, Extension,
    ExtensionComponent, ExtensionKind, FilterAction, ParameterHandler, RequestFilter, Response,
    ResponseExceptionMapper, ResponseFilter, ServiceFault,
};
pub use media_type::MediaType;
pub use registry::{
    install_shared_defaults, shared_registry, CompositeContextResolver, ExtensionRegistry,
    RegistryStats,
};
pub use typing::{HandledType, TypeTag};
