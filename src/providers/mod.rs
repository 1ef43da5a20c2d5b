//! # Built-In Default Candidates
//!
//! The process-wide default extension set: body converters for the common
//! wire formats, the fallback fault-to-response mapper, and the service
//! description filter. The shared tier registers all of them at bootstrap;
//! the JSON and plain-text converters additionally back every registry's
//! default-converter lists.
//!
//! All of these are deliberately permissive about application types - they
//! are the safety net under user registrations, which always shadow them.

pub mod binary;
pub mod description;
pub mod fault;
pub mod form;
pub mod json;
pub mod text;

// Re-export main types for easy access
pub use binary::BinaryDataProvider;
pub use description::ServiceDescriptionFilter;
pub use fault::DefaultFaultMapper;
pub use form::FormEncodingProvider;
pub use json::JsonEntityProvider;
pub use text::PlainTextEntityProvider;
