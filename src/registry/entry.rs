//! # Candidate Registration Entry
//!
//! Wraps one registered extension component with the metadata the selection
//! algorithms need: the cached handled-type declaration, the declared media
//! types in declaration order, the owning registry's identity, and the set
//! of overlay handles touched by context injection.

use crate::context::{ContextSlot, RequestContext};
use crate::error::Result;
use crate::media_type::MediaType;
use crate::typing::HandledType;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// One registered candidate of a given extension kind.
///
/// The handled type and declared media types are computed once at
/// registration and never recomputed; the injected-handle set is mutated on
/// every injection and cleared on rejection or by the lifecycle sweep.
pub struct CandidateEntry<T: ?Sized> {
    provider: Arc<T>,
    name: String,
    handled: HandledType,
    declared_media_types: Vec<MediaType>,
    owner: Uuid,
    registered_at: DateTime<Utc>,
    slots: Vec<Arc<ContextSlot>>,
    injected: Mutex<Vec<Weak<ContextSlot>>>,
}

impl<T: ?Sized> CandidateEntry<T> {
    pub(crate) fn new(
        provider: Arc<T>,
        name: impl Into<String>,
        handled: HandledType,
        declared_media_types: Vec<MediaType>,
        owner: Uuid,
        slots: Vec<Arc<ContextSlot>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            name: name.into(),
            handled,
            declared_media_types,
            owner,
            registered_at: Utc::now(),
            slots,
            injected: Mutex::new(Vec::new()),
        })
    }

    pub fn provider(&self) -> &Arc<T> {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handled_type(&self) -> &HandledType {
        &self.handled
    }

    pub fn declared_media_types(&self) -> &[MediaType] {
        &self.declared_media_types
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Populate every overlay slot with the request context for the calling
    /// thread, recording each touched slot for the paired cleanup. A slot
    /// refusing injection aborts; the caller clears partial state via
    /// [`clear_injected`](Self::clear_injected) and skips the candidate for
    /// this request only.
    pub(crate) fn inject_context(&self, ctx: &Arc<RequestContext>) -> Result<()> {
        if self.slots.is_empty() {
            return Ok(());
        }
        let mut injected = self.injected.lock();
        for slot in &self.slots {
            slot.inject(Arc::clone(ctx))?;
            let already_recorded = injected
                .iter()
                .any(|handle| handle.as_ptr() == Arc::as_ptr(slot));
            if !already_recorded {
                injected.push(Arc::downgrade(slot));
            }
        }
        Ok(())
    }

    /// Clear the calling thread's injected values. Handles whose slots are
    /// fully drained (or whose component is gone) are pruned; handles still
    /// carrying other threads' in-flight values are kept so their owners'
    /// sweeps can find them. Safe to call repeatedly.
    pub(crate) fn clear_injected(&self) {
        let mut injected = self.injected.lock();
        injected.retain(|handle| match handle.upgrade() {
            Some(slot) => {
                slot.clear_current();
                !slot.is_empty()
            }
            None => false,
        });
    }

    /// Drop every thread's injected values. Used when the owning registry
    /// is cleared or torn down.
    pub(crate) fn clear_all_injected(&self) {
        let mut injected = self.injected.lock();
        for handle in injected.drain(..) {
            if let Some(slot) = handle.upgrade() {
                slot.clear_all();
            }
        }
    }

    /// Number of live injected handles, exposed for lifecycle tests
    #[cfg(test)]
    pub(crate) fn injected_handle_count(&self) -> usize {
        self.injected.lock().len()
    }
}

impl<T: ?Sized> std::fmt::Debug for CandidateEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateEntry")
            .field("name", &self.name)
            .field("handled", &self.handled)
            .field("declared_media_types", &self.declared_media_types)
            .field("owner", &self.owner)
            .field("registered_at", &self.registered_at)
            .field("slots", &self.slots.len())
            .finish()
    }
}
