//! Owning resource handles
//!
//! [`Owned<R>`] pairs a raw handle with the context that created it and
//! destroys the resource exactly once: on [`Owned::reset`], on replacement,
//! or when the owner goes out of scope. Ownership moves with the value and is
//! never duplicated. `Owned` does not implement `Clone`:
//!
//! ```compile_fail
//! use gfx_handles::prelude::*;
//!
//! let gfx = Gfx::new(&GfxConfig::default()).unwrap();
//! let buffer = Owned::<Buffer>::make(&gfx, &BufferDesc::vertex(16, false));
//! let copy = buffer.clone();
//! ```

use std::fmt;

use crate::gfx::{Gfx, Resource, ResourceState};

/// Single owner of one pooled resource
///
/// Empty owners (built from the sentinel, reset, released or taken from)
/// report the sentinel handle and `Invalid` state, and all operations on
/// them are no-ops.
pub struct Owned<R: Resource> {
    raw: R,
    // Some exactly when `raw` is owned
    gfx: Option<Gfx>,
}

impl<R: Resource> Owned<R> {
    /// Take ownership of `raw`
    ///
    /// The sentinel produces an empty owner. No call is made into the
    /// context; `raw` is assumed to be created already.
    #[must_use]
    pub fn new(gfx: &Gfx, raw: R) -> Self {
        if raw.is_invalid() {
            return Self::default();
        }
        Self {
            raw,
            gfx: Some(gfx.clone()),
        }
    }

    /// Create a resource from `desc` and take ownership of it
    ///
    /// The result may be empty (pool exhausted) or hold a `Failed` resource;
    /// check [`Owned::is_valid`].
    #[must_use]
    pub fn make(gfx: &Gfx, desc: &R::Desc) -> Self {
        let raw: R = gfx.alloc();
        if !raw.is_invalid() {
            gfx.init(raw, desc);
        }
        Self::new(gfx, raw)
    }

    /// Raw handle, or the sentinel when empty
    #[must_use]
    pub const fn get(&self) -> R {
        self.raw
    }

    /// Raw id, or `0` when empty
    #[must_use]
    pub fn id(&self) -> u64 {
        self.raw.id()
    }

    /// Whether this owner holds a resource
    #[must_use]
    pub const fn is_owning(&self) -> bool {
        self.gfx.is_some()
    }

    /// Context the held resource belongs to
    #[must_use]
    pub const fn gfx(&self) -> Option<&Gfx> {
        self.gfx.as_ref()
    }

    /// Live lifecycle state of the held resource
    #[must_use]
    pub fn state(&self) -> ResourceState {
        self.gfx
            .as_ref()
            .map_or(ResourceState::Invalid, |gfx| gfx.query_state(self.raw))
    }

    /// Whether a resource is held and the context reports it `Valid`
    ///
    /// Queried on every call. The context may invalidate resources behind
    /// the owner's back.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_owning() && !self.raw.is_invalid() && self.state() == ResourceState::Valid
    }

    /// Destroy the held resource, leaving the owner empty
    pub fn reset(&mut self) {
        if let Some(gfx) = self.gfx.take() {
            let raw = std::mem::replace(&mut self.raw, R::INVALID);
            gfx.destroy(raw);
        }
    }

    /// Destroy the held resource and take ownership of `raw` instead
    ///
    /// Replacing a handle with itself keeps it alive.
    pub fn replace(&mut self, gfx: &Gfx, raw: R) {
        if raw == self.raw && self.gfx.as_ref().is_some_and(|held| held.ptr_eq(gfx)) {
            return;
        }
        self.reset();
        *self = Self::new(gfx, raw);
    }

    /// Give up ownership without destroying
    ///
    /// The caller becomes responsible for destroying the returned handle.
    #[must_use = "the released handle must be destroyed by the caller"]
    pub fn release(&mut self) -> R {
        self.gfx = None;
        std::mem::replace(&mut self.raw, R::INVALID)
    }

    /// Move ownership into a new owner, leaving this one empty
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<R: Resource> Default for Owned<R> {
    fn default() -> Self {
        Self {
            raw: R::INVALID,
            gfx: None,
        }
    }
}

impl<R: Resource> Drop for Owned<R> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<R: Resource> fmt::Debug for Owned<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("raw", &self.raw)
            .field("owning", &self.is_owning())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GfxConfig;
    use crate::gfx::{ResourceKind, Sampler, SamplerDesc};

    fn gfx() -> Gfx {
        crate::foundation::logging::init_for_tests();
        Gfx::new(&GfxConfig::default()).unwrap()
    }

    #[test]
    fn test_sentinel_owns_nothing() {
        let gfx = gfx();
        let owner = Owned::new(&gfx, Sampler::INVALID);
        assert!(!owner.is_owning());
        assert!(!owner.is_valid());
        assert_eq!(owner.id(), 0);
        assert_eq!(owner.state(), ResourceState::Invalid);
        assert!(owner.gfx().is_none());
    }

    #[test]
    fn test_default_is_empty() {
        let owner = Owned::<Sampler>::default();
        assert_eq!(owner.get(), Sampler::INVALID);
        assert!(!owner.is_valid());
    }

    #[test]
    fn test_new_does_not_touch_the_context() {
        let gfx = gfx();
        let raw: Sampler = gfx.alloc();
        let owner = Owned::new(&gfx, raw);
        // Still only allocated: wrapping does not create anything
        assert_eq!(owner.state(), ResourceState::Alloc);
        assert!(!owner.is_valid());
        drop(owner);
        assert_eq!(gfx.query_state(raw), ResourceState::Invalid);
    }

    #[test]
    fn test_replace_destroys_previous() {
        let gfx = gfx();
        let first = gfx.make(&SamplerDesc::linear());
        let second = gfx.make(&SamplerDesc::nearest());

        let mut owner = Owned::new(&gfx, first);
        owner.replace(&gfx, second);
        assert_eq!(gfx.query_state(first), ResourceState::Invalid);
        assert_eq!(owner.get(), second);
        assert!(owner.is_valid());
        assert_eq!(gfx.stats(ResourceKind::Sampler).destroy_calls, 1);
    }

    #[test]
    fn test_replace_with_held_handle_is_a_no_op() {
        let gfx = gfx();
        let mut owner = Owned::<Sampler>::make(&gfx, &SamplerDesc::linear());
        let raw = owner.get();

        owner.replace(&gfx, raw);
        assert!(owner.is_owning());
        assert!(owner.is_valid());
        assert_eq!(gfx.stats(ResourceKind::Sampler).destroy_calls, 0);

        drop(owner);
        assert_eq!(gfx.query_state(raw), ResourceState::Invalid);
        assert_eq!(gfx.stats(ResourceKind::Sampler).destroy_calls, 1);
    }

    #[test]
    fn test_replace_same_id_from_other_context() {
        let gfx = gfx();
        let other = Gfx::new(&GfxConfig::default()).unwrap();
        let mut owner = Owned::<Sampler>::make(&gfx, &SamplerDesc::linear());
        let foreign = other.make(&SamplerDesc::linear());
        assert_eq!(owner.get(), foreign);

        owner.replace(&other, foreign);
        assert_eq!(gfx.stats(ResourceKind::Sampler).live, 0);
        assert!(owner.gfx().is_some_and(|held| held.ptr_eq(&other)));
        assert!(owner.is_valid());
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let gfx = gfx();
        let mut source = Owned::<Sampler>::make(&gfx, &SamplerDesc::linear());
        let raw = source.get();

        let dest = source.take();
        assert_eq!(source.get(), Sampler::INVALID);
        assert!(!source.is_owning());
        assert_eq!(dest.get(), raw);
        assert!(dest.is_valid());
        assert_eq!(gfx.stats(ResourceKind::Sampler).destroy_calls, 0);
    }

    #[test]
    fn test_debug_output() {
        let owner = Owned::<Sampler>::default();
        assert_eq!(format!("{owner:?}"), "Owned { raw: Sampler { id: 0 }, owning: false }");
    }
}
