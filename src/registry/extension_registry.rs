//! # Extension Registry
//!
//! Ordered candidate lists per extension kind, the selection algorithms
//! over them, and the local-then-shared fallback chain.
//!
//! ## Architecture
//!
//! ```text
//! select_*() -> local user lists -> local default converters -> shared tier
//! ```
//!
//! Reader, writer, and context-resolver lists are re-sorted by media-type
//! specificity at registration time, so iteration order is decided once.
//! Selection itself filters by media-type compatibility and type
//! assignability, injects request context into the survivors, consults the
//! per-candidate capability check, and breaks remaining ties with the
//! most-specific-handled-type-first sort. Every miss falls through to the
//! shared tier; the shared tier is the root of the chain and never
//! delegates further.

use crate::config::EngineConfig;
use crate::context::{Annotation, RequestContext};
use crate::extension::{
    ContextProvider, ContextResolver, EntityReader, EntityWriter, ExceptionMapper, Extension,
    ExtensionComponent, ExtensionKind, ParameterHandler, RequestFilter, ResponseExceptionMapper,
    ResponseFilter,
};
use crate::media_type::{self, MediaType};
use crate::providers::{JsonEntityProvider, PlainTextEntityProvider};
use crate::registry::entry::CandidateEntry;
use crate::registry::shared::shared_registry;
use crate::typing::{HandledType, TypeTag};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::slice;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

type EntryList<T> = RwLock<Vec<Arc<CandidateEntry<T>>>>;

/// Per-kind candidate counts for monitoring and test assertions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub entity_readers: usize,
    pub entity_writers: usize,
    pub context_resolvers: usize,
    pub context_providers: usize,
    pub exception_mappers: usize,
    pub response_exception_mappers: usize,
    pub parameter_handlers: usize,
    pub request_filters: usize,
    pub response_filters: usize,
    pub default_converters: usize,
}

/// Registry of extension candidates for one service instance, with a
/// fallback reference to the process-wide shared tier.
pub struct ExtensionRegistry {
    id: Uuid,
    config: EngineConfig,
    readers: EntryList<dyn EntityReader>,
    writers: EntryList<dyn EntityWriter>,
    default_readers: EntryList<dyn EntityReader>,
    default_writers: EntryList<dyn EntityWriter>,
    context_resolvers: EntryList<dyn ContextResolver>,
    context_providers: EntryList<dyn ContextProvider>,
    exception_mappers: EntryList<dyn ExceptionMapper>,
    response_exception_mappers: EntryList<dyn ResponseExceptionMapper>,
    parameter_handlers: EntryList<dyn ParameterHandler>,
    request_filters: EntryList<dyn RequestFilter>,
    response_filters: EntryList<dyn ResponseFilter>,
    shared: Option<Arc<ExtensionRegistry>>,
}

impl ExtensionRegistry {
    /// Create a local registry linked to the process-wide shared tier
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a local registry with explicit engine configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self::linked_to(shared_registry(), config)
    }

    /// Create a local registry linked to a specific shared tier. Embedding
    /// hosts and tests use this to scope the fallback catalog.
    pub fn linked_to(shared: Arc<ExtensionRegistry>, config: EngineConfig) -> Self {
        Self::build(Some(shared), config)
    }

    /// Create a root registry with no fallback tier; it answers misses with
    /// "not found" instead of delegating. The process-wide shared registry
    /// is built this way.
    pub fn root_with_config(config: EngineConfig) -> Self {
        Self::build(None, config)
    }

    fn build(shared: Option<Arc<ExtensionRegistry>>, config: EngineConfig) -> Self {
        let registry = Self {
            id: Uuid::new_v4(),
            config,
            readers: RwLock::new(Vec::new()),
            writers: RwLock::new(Vec::new()),
            default_readers: RwLock::new(Vec::new()),
            default_writers: RwLock::new(Vec::new()),
            context_resolvers: RwLock::new(Vec::new()),
            context_providers: RwLock::new(Vec::new()),
            exception_mappers: RwLock::new(Vec::new()),
            response_exception_mappers: RwLock::new(Vec::new()),
            parameter_handlers: RwLock::new(Vec::new()),
            request_filters: RwLock::new(Vec::new()),
            response_filters: RwLock::new(Vec::new()),
            shared,
        };
        if registry.config.install_default_converters {
            registry.install_default_converters();
        }
        registry
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Built-in body converters consulted after user registrations and
    /// before the shared tier, so user candidates shadow them without
    /// hiding them.
    fn install_default_converters(&self) {
        let json: Arc<dyn EntityReader> = Arc::new(JsonEntityProvider::new());
        let json_writer: Arc<dyn EntityWriter> = Arc::new(JsonEntityProvider::new());
        let text: Arc<dyn EntityReader> = Arc::new(PlainTextEntityProvider::new());
        let text_writer: Arc<dyn EntityWriter> = Arc::new(PlainTextEntityProvider::new());

        {
            let mut readers = self.default_readers.write();
            readers.push(CandidateEntry::new(
                Arc::clone(&json),
                "json_entity_provider",
                json.handled_type(),
                json.consumes(),
                self.id,
                json.context_slots(),
            ));
            readers.push(CandidateEntry::new(
                Arc::clone(&text),
                "plain_text_entity_provider",
                text.handled_type(),
                text.consumes(),
                self.id,
                text.context_slots(),
            ));
            sort_entries_by_media(&mut readers);
        }
        {
            let mut writers = self.default_writers.write();
            writers.push(CandidateEntry::new(
                Arc::clone(&json_writer),
                "json_entity_provider",
                json_writer.handled_type(),
                json_writer.produces(),
                self.id,
                json_writer.context_slots(),
            ));
            writers.push(CandidateEntry::new(
                Arc::clone(&text_writer),
                "plain_text_entity_provider",
                text_writer.handled_type(),
                text_writer.produces(),
                self.id,
                text_writer.context_slots(),
            ));
            sort_entries_by_media(&mut writers);
        }
    }

    /// Register a component into every kind list whose capability cast it
    /// answers. A component with no recognized capability is ignored, never
    /// an error. Reader, writer, and context-resolver lists are re-sorted
    /// immediately so lookup order is fixed here, not per request.
    pub fn register(&self, component: Arc<dyn ExtensionComponent>) {
        let name = component.component_name().to_string();
        let mut kinds: Vec<ExtensionKind> = Vec::new();

        if let Some(reader) = Arc::clone(&component).as_entity_reader() {
            let entry = CandidateEntry::new(
                Arc::clone(&reader),
                &name,
                reader.handled_type(),
                reader.consumes(),
                self.id,
                reader.context_slots(),
            );
            self.readers.write().push(entry);
            kinds.push(ExtensionKind::EntityReader);
        }
        if let Some(writer) = Arc::clone(&component).as_entity_writer() {
            let entry = CandidateEntry::new(
                Arc::clone(&writer),
                &name,
                writer.handled_type(),
                writer.produces(),
                self.id,
                writer.context_slots(),
            );
            self.writers.write().push(entry);
            kinds.push(ExtensionKind::EntityWriter);
        }
        if let Some(resolver) = Arc::clone(&component).as_context_resolver() {
            let entry = CandidateEntry::new(
                Arc::clone(&resolver),
                &name,
                resolver.context_type(),
                resolver.produces(),
                self.id,
                resolver.context_slots(),
            );
            self.context_resolvers.write().push(entry);
            kinds.push(ExtensionKind::ContextResolver);
        }
        if let Some(provider) = Arc::clone(&component).as_context_provider() {
            let entry = CandidateEntry::new(
                Arc::clone(&provider),
                &name,
                provider.context_type(),
                vec![MediaType::wildcard()],
                self.id,
                provider.context_slots(),
            );
            self.context_providers.write().push(entry);
            kinds.push(ExtensionKind::ContextProvider);
        }
        if let Some(mapper) = Arc::clone(&component).as_exception_mapper() {
            let entry = CandidateEntry::new(
                Arc::clone(&mapper),
                &name,
                mapper.handled_type(),
                vec![MediaType::wildcard()],
                self.id,
                mapper.context_slots(),
            );
            self.exception_mappers.write().push(entry);
            kinds.push(ExtensionKind::ExceptionMapper);
        }
        if let Some(mapper) = Arc::clone(&component).as_response_exception_mapper() {
            let entry = CandidateEntry::new(
                Arc::clone(&mapper),
                &name,
                mapper.handled_type(),
                vec![MediaType::wildcard()],
                self.id,
                mapper.context_slots(),
            );
            self.response_exception_mappers.write().push(entry);
            kinds.push(ExtensionKind::ResponseExceptionMapper);
        }
        if let Some(handler) = Arc::clone(&component).as_parameter_handler() {
            let entry = CandidateEntry::new(
                Arc::clone(&handler),
                &name,
                handler.handled_type(),
                vec![MediaType::wildcard()],
                self.id,
                handler.context_slots(),
            );
            self.parameter_handlers.write().push(entry);
            kinds.push(ExtensionKind::ParameterHandler);
        }
        if let Some(filter) = Arc::clone(&component).as_request_filter() {
            let entry = CandidateEntry::new(
                Arc::clone(&filter),
                &name,
                HandledType::CatchAll,
                vec![MediaType::wildcard()],
                self.id,
                filter.context_slots(),
            );
            self.request_filters.write().push(entry);
            kinds.push(ExtensionKind::RequestFilter);
        }
        if let Some(filter) = Arc::clone(&component).as_response_filter() {
            let entry = CandidateEntry::new(
                Arc::clone(&filter),
                &name,
                HandledType::CatchAll,
                vec![MediaType::wildcard()],
                self.id,
                filter.context_slots(),
            );
            self.response_filters.write().push(entry);
            kinds.push(ExtensionKind::ResponseFilter);
        }

        if kinds.is_empty() {
            debug!(
                component = %name,
                "component exposes no recognized extension capability - ignoring"
            );
            return;
        }

        if kinds.contains(&ExtensionKind::EntityReader) {
            sort_entries_by_media(&mut self.readers.write());
        }
        if kinds.contains(&ExtensionKind::EntityWriter) {
            sort_entries_by_media(&mut self.writers.write());
        }
        if kinds.contains(&ExtensionKind::ContextResolver) {
            sort_entries_by_media(&mut self.context_resolvers.write());
        }

        info!(component = %name, capabilities = kinds.len(), "registered extension component");
    }

    /// Bulk registration; unrelated objects in the list are skipped
    pub fn register_all(&self, components: Vec<Arc<dyn ExtensionComponent>>) {
        for component in components {
            self.register(component);
        }
    }

    /// Empty every kind list, default converters included. Any injected
    /// state still held by the entries is released first.
    pub fn clear(&self) {
        clear_list(&self.readers);
        clear_list(&self.writers);
        clear_list(&self.default_readers);
        clear_list(&self.default_writers);
        clear_list(&self.context_resolvers);
        clear_list(&self.context_providers);
        clear_list(&self.exception_mappers);
        clear_list(&self.response_exception_mappers);
        clear_list(&self.parameter_handlers);
        clear_list(&self.request_filters);
        clear_list(&self.response_filters);
        info!(registry = %self.id, "cleared all extension candidate lists");
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entity_readers: self.readers.read().len(),
            entity_writers: self.writers.read().len(),
            context_resolvers: self.context_resolvers.read().len(),
            context_providers: self.context_providers.read().len(),
            exception_mappers: self.exception_mappers.read().len(),
            response_exception_mappers: self.response_exception_mappers.read().len(),
            parameter_handlers: self.parameter_handlers.read().len(),
            request_filters: self.request_filters.read().len(),
            response_filters: self.response_filters.read().len(),
            default_converters: self.default_readers.read().len() + self.default_writers.read().len(),
        }
    }

    /// Select the entity reader for an incoming body. Tries user
    /// registrations, then the default converters, then the shared tier.
    pub fn select_reader(
        &self,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn EntityReader>> {
        if let Some(reader) = self.choose_reader(&self.readers, ty, element, annotations, media_type, ctx)
        {
            return Some(reader);
        }
        if let Some(reader) =
            self.choose_reader(&self.default_readers, ty, element, annotations, media_type, ctx)
        {
            return Some(reader);
        }
        self.shared
            .as_ref()
            .and_then(|shared| shared.select_reader(ty, element, annotations, media_type, ctx))
    }

    /// Select the entity writer for an outgoing body. Same tiering as
    /// [`select_reader`](Self::select_reader).
    pub fn select_writer(
        &self,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn EntityWriter>> {
        if let Some(writer) = self.choose_writer(&self.writers, ty, element, annotations, media_type, ctx)
        {
            return Some(writer);
        }
        if let Some(writer) =
            self.choose_writer(&self.default_writers, ty, element, annotations, media_type, ctx)
        {
            return Some(writer);
        }
        self.shared
            .as_ref()
            .and_then(|shared| shared.select_writer(ty, element, annotations, media_type, ctx))
    }

    /// Negotiate a writer against an Accept set: requested entries are
    /// tried most-specific / highest-quality first and the first entry that
    /// yields a writer wins. Returns the writer together with the requested
    /// media type it matched.
    pub fn select_writer_for_accept(
        &self,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        accept: &[MediaType],
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<(Arc<dyn EntityWriter>, MediaType)> {
        let mut ordered = accept.to_vec();
        media_type::sort_by_specificity(&mut ordered);
        for requested in ordered {
            if let Some(writer) = self.select_writer(ty, element, annotations, &requested, ctx) {
                return Some((writer, requested));
            }
        }
        None
    }

    /// Select a context resolver for the given context type. Multiple
    /// survivors are folded into a [`CompositeContextResolver`] consulted
    /// most-specific first.
    pub fn select_context_resolver(
        &self,
        context_type: &TypeTag,
        ctx: Option<&Arc<RequestContext>>,
        media_type: Option<&MediaType>,
    ) -> Option<Arc<dyn ContextResolver>> {
        let requested = media_type.cloned().unwrap_or_else(|| {
            ctx.map(|c| c.preferred_media_type())
                .unwrap_or_else(MediaType::wildcard)
        });

        let entries = snapshot(&self.context_resolvers);
        let mut survivors = Vec::new();
        for entry in entries {
            if !entry.handled_type().matches(context_type) {
                continue;
            }
            let compatible = media_type::intersect(
                slice::from_ref(&requested),
                entry.declared_media_types(),
                self.config.strict_parameter_matching,
            );
            if compatible.is_empty() {
                continue;
            }
            if let Some(ctx) = ctx {
                if let Err(err) = entry.inject_context(ctx) {
                    warn!(
                        candidate = entry.name(),
                        error = %err,
                        "context injection failed - skipping resolver for this request"
                    );
                    entry.clear_injected();
                    continue;
                }
            }
            survivors.push(entry);
        }

        match survivors.len() {
            0 => self.shared.as_ref().and_then(|shared| {
                shared.select_context_resolver(context_type, ctx, Some(&requested))
            }),
            1 => Some(Arc::clone(survivors[0].provider())),
            _ => {
                survivors.sort_by(|a, b| {
                    HandledType::compare_specificity(a.handled_type(), b.handled_type())
                });
                let delegates = survivors
                    .iter()
                    .map(|entry| Arc::clone(entry.provider()))
                    .collect();
                Some(Arc::new(CompositeContextResolver::new(delegates)))
            }
        }
    }

    /// Select a context provider for the given context type; first
    /// type-compatible registration wins.
    pub fn select_context_provider(
        &self,
        context_type: &TypeTag,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn ContextProvider>> {
        for entry in snapshot(&self.context_providers) {
            if !entry.handled_type().matches(context_type) {
                continue;
            }
            if let Some(ctx) = ctx {
                if let Err(err) = entry.inject_context(ctx) {
                    warn!(
                        candidate = entry.name(),
                        error = %err,
                        "context injection failed - skipping provider for this request"
                    );
                    entry.clear_injected();
                    continue;
                }
            }
            return Some(Arc::clone(entry.provider()));
        }
        self.shared
            .as_ref()
            .and_then(|shared| shared.select_context_provider(context_type, ctx))
    }

    /// Select the most specific mapper for a fault type. The search always
    /// spans every registered mapper and is independent of media types.
    pub fn select_exception_mapper(
        &self,
        exception_type: &TypeTag,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn ExceptionMapper>> {
        let mut candidates = Vec::new();
        for entry in snapshot(&self.exception_mappers) {
            if !entry.handled_type().matches(exception_type) {
                continue;
            }
            if let Some(ctx) = ctx {
                if let Err(err) = entry.inject_context(ctx) {
                    warn!(
                        candidate = entry.name(),
                        error = %err,
                        "context injection failed - skipping mapper for this request"
                    );
                    entry.clear_injected();
                    continue;
                }
            }
            candidates.push(entry);
        }
        if candidates.is_empty() {
            return self
                .shared
                .as_ref()
                .and_then(|shared| shared.select_exception_mapper(exception_type, ctx));
        }
        candidates.sort_by(|a, b| HandledType::compare_specificity(a.handled_type(), b.handled_type()));
        Some(Arc::clone(candidates[0].provider()))
    }

    /// Client-side counterpart of
    /// [`select_exception_mapper`](Self::select_exception_mapper)
    pub fn select_response_exception_mapper(
        &self,
        error_type: &TypeTag,
    ) -> Option<Arc<dyn ResponseExceptionMapper>> {
        let mut candidates: Vec<_> = snapshot(&self.response_exception_mappers)
            .into_iter()
            .filter(|entry| entry.handled_type().matches(error_type))
            .collect();
        if candidates.is_empty() {
            return self
                .shared
                .as_ref()
                .and_then(|shared| shared.select_response_exception_mapper(error_type));
        }
        candidates.sort_by(|a, b| HandledType::compare_specificity(a.handled_type(), b.handled_type()));
        Some(Arc::clone(candidates[0].provider()))
    }

    /// Select the most specific parameter handler for a parameter type
    pub fn select_parameter_handler(&self, param_type: &TypeTag) -> Option<Arc<dyn ParameterHandler>> {
        let mut candidates: Vec<_> = snapshot(&self.parameter_handlers)
            .into_iter()
            .filter(|entry| entry.handled_type().matches(param_type))
            .collect();
        if candidates.is_empty() {
            return self
                .shared
                .as_ref()
                .and_then(|shared| shared.select_parameter_handler(param_type));
        }
        candidates.sort_by(|a, b| HandledType::compare_specificity(a.handled_type(), b.handled_type()));
        Some(Arc::clone(candidates[0].provider()))
    }

    /// The request filter chain for this registry. An empty local list
    /// yields the shared tier's chain unchanged; local filters are appended
    /// after the shared defaults unless a local description generator is
    /// present, which suppresses the shared defaults entirely.
    pub fn request_filters(&self) -> Vec<Arc<dyn RequestFilter>> {
        let local = snapshot(&self.request_filters);
        let Some(shared) = &self.shared else {
            return local.iter().map(|entry| Arc::clone(entry.provider())).collect();
        };
        if local.is_empty() {
            return shared.request_filters();
        }
        let mut filters = Vec::new();
        let custom_description = local
            .iter()
            .any(|entry| entry.provider().is_description_generator());
        if !custom_description {
            filters.extend(shared.request_filters());
        }
        filters.extend(local.iter().map(|entry| Arc::clone(entry.provider())));
        filters
    }

    /// The response filter chain; local registrations only
    pub fn response_filters(&self) -> Vec<Arc<dyn ResponseFilter>> {
        snapshot(&self.response_filters)
            .iter()
            .map(|entry| Arc::clone(entry.provider()))
            .collect()
    }

    /// End-of-message cleanup: clear the calling thread's injected context
    /// from every candidate in every kind list, default converters
    /// included, then recurse into the shared tier. Idempotent; must run on
    /// the fault path as well as on success.
    pub fn on_request_lifecycle_end(&self) {
        sweep_list(&self.readers);
        sweep_list(&self.writers);
        sweep_list(&self.default_readers);
        sweep_list(&self.default_writers);
        sweep_list(&self.context_resolvers);
        sweep_list(&self.context_providers);
        sweep_list(&self.exception_mappers);
        sweep_list(&self.response_exception_mappers);
        sweep_list(&self.parameter_handlers);
        sweep_list(&self.request_filters);
        sweep_list(&self.response_filters);
        if let Some(shared) = &self.shared {
            shared.on_request_lifecycle_end();
        }
    }

    fn choose_reader(
        &self,
        list: &EntryList<dyn EntityReader>,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn EntityReader>> {
        let entries = snapshot(list);

        // Performance fallback: a lone candidate consulted without request
        // context skips injection and the capability check, but never the
        // media-type or type-compatibility filters.
        if ctx.is_none() && self.config.single_candidate_fast_path && entries.len() == 1 {
            let entry = &entries[0];
            if self.media_compatible(entry.declared_media_types(), media_type)
                && entry.handled_type().matches(ty)
            {
                return Some(Arc::clone(entry.provider()));
            }
            return None;
        }

        let mut candidates = Vec::new();
        for entry in entries {
            let injected = match self.entry_survives_media_and_injection(&entry, media_type, ctx) {
                Some(injected) => injected,
                None => continue,
            };
            let readable = entry
                .provider()
                .is_readable(ty, element, annotations, media_type);
            if !readable || !entry.handled_type().matches(ty) {
                if injected {
                    entry.clear_injected();
                }
                continue;
            }
            candidates.push(entry);
        }
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| HandledType::compare_specificity(a.handled_type(), b.handled_type()));
        Some(Arc::clone(candidates[0].provider()))
    }

    fn choose_writer(
        &self,
        list: &EntryList<dyn EntityWriter>,
        ty: &TypeTag,
        element: Option<&TypeTag>,
        annotations: &[Annotation],
        media_type: &MediaType,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<Arc<dyn EntityWriter>> {
        let entries = snapshot(list);

        if ctx.is_none() && self.config.single_candidate_fast_path && entries.len() == 1 {
            let entry = &entries[0];
            if self.media_compatible(entry.declared_media_types(), media_type)
                && entry.handled_type().matches(ty)
            {
                return Some(Arc::clone(entry.provider()));
            }
            return None;
        }

        let mut candidates = Vec::new();
        for entry in entries {
            let injected = match self.entry_survives_media_and_injection(&entry, media_type, ctx) {
                Some(injected) => injected,
                None => continue,
            };
            let writeable = entry
                .provider()
                .is_writeable(ty, element, annotations, media_type);
            if !writeable || !entry.handled_type().matches(ty) {
                if injected {
                    entry.clear_injected();
                }
                continue;
            }
            candidates.push(entry);
        }
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| HandledType::compare_specificity(a.handled_type(), b.handled_type()));
        Some(Arc::clone(candidates[0].provider()))
    }

    fn media_compatible(&self, declared: &[MediaType], requested: &MediaType) -> bool {
        !media_type::intersect(
            slice::from_ref(requested),
            declared,
            self.config.strict_parameter_matching,
        )
        .is_empty()
    }

    /// Media filter plus context injection for one entry. `None` means the
    /// entry is out of the running; `Some(injected)` reports whether a
    /// paired cleanup is owed on later rejection.
    fn entry_survives_media_and_injection<T: ?Sized>(
        &self,
        entry: &Arc<CandidateEntry<T>>,
        media_type: &MediaType,
        ctx: Option<&Arc<RequestContext>>,
    ) -> Option<bool> {
        if !self.media_compatible(entry.declared_media_types(), media_type) {
            debug!(
                candidate = entry.name(),
                requested = %media_type,
                "declared media types are incompatible - skipping"
            );
            return None;
        }
        match ctx {
            Some(ctx) => match entry.inject_context(ctx) {
                Ok(()) => Some(true),
                Err(err) => {
                    warn!(
                        candidate = entry.name(),
                        error = %err,
                        "context injection failed - skipping candidate for this request"
                    );
                    entry.clear_injected();
                    None
                }
            },
            None => Some(false),
        }
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("id", &self.id)
            .field("shared", &self.shared.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Consults a sorted set of context resolvers until one yields a value
pub struct CompositeContextResolver {
    delegates: Vec<Arc<dyn ContextResolver>>,
}

impl CompositeContextResolver {
    pub(crate) fn new(delegates: Vec<Arc<dyn ContextResolver>>) -> Self {
        Self { delegates }
    }

    pub fn delegates(&self) -> &[Arc<dyn ContextResolver>] {
        &self.delegates
    }
}

impl Extension for CompositeContextResolver {}

impl ContextResolver for CompositeContextResolver {
    fn context_type(&self) -> HandledType {
        self.delegates
            .first()
            .map(|delegate| delegate.context_type())
            .unwrap_or(HandledType::CatchAll)
    }

    fn resolve(&self, requested: &TypeTag) -> Option<Value> {
        self.delegates
            .iter()
            .find_map(|delegate| delegate.resolve(requested))
    }
}

fn snapshot<T: ?Sized>(list: &EntryList<T>) -> Vec<Arc<CandidateEntry<T>>> {
    list.read().clone()
}

fn sort_entries_by_media<T: ?Sized>(entries: &mut Vec<Arc<CandidateEntry<T>>>) {
    entries.sort_by(|a, b| {
        let mut left = a.declared_media_types().to_vec();
        let mut right = b.declared_media_types().to_vec();
        media_type::sort_by_specificity(&mut left);
        media_type::sort_by_specificity(&mut right);
        media_type::compare_sorted_sets(&left, &right)
    });
}

fn sweep_list<T: ?Sized>(list: &EntryList<T>) {
    for entry in list.read().iter() {
        entry.clear_injected();
    }
}

fn clear_list<T: ?Sized>(list: &EntryList<T>) {
    let mut entries = list.write();
    for entry in entries.iter() {
        entry.clear_all_injected();
    }
    entries.clear();
}
