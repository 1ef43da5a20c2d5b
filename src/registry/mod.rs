//! # Registry Infrastructure
//!
//! Candidate storage, selection, and the two-tier fallback chain.
//!
//! ## Overview
//!
//! Each service instance owns one [`ExtensionRegistry`] holding ordered
//! candidate lists per extension kind. A local registry keeps a reference
//! to the process-wide shared registry and falls back to it whenever local
//! resolution misses; the shared tier carries the built-in defaults and is
//! the root of the chain.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── CandidateEntry        (component + cached capability descriptor)
//! ├── ExtensionRegistry     (kind lists, selection algorithms, lifecycle sweep)
//! └── shared_registry()     (lazy process-wide fallback catalog)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use provider_core::registry::ExtensionRegistry;
//! use provider_core::media_type::MediaType;
//! use provider_core::typing::TypeTag;
//!
//! let registry = ExtensionRegistry::new();
//! let reader = registry.select_reader(
//!     &TypeTag::new("Invoice"),
//!     None,
//!     &[],
//!     &MediaType::new("application", "json"),
//!     None,
//! );
//! assert!(reader.is_some()); // served by the default JSON converter
//! ```

pub mod entry;
pub mod extension_registry;
pub mod shared;

// Re-export main types for easy access
pub use entry::CandidateEntry;
pub use extension_registry::{CompositeContextResolver, ExtensionRegistry, RegistryStats};
pub use shared::{install_shared_defaults, shared_registry};
