//! Graphics context and the generic resource lifecycle
//!
//! [`Gfx`] owns one fixed-capacity pool per [`ResourceKind`] and exposes the
//! free-function surface of a pooled graphics API as generic methods:
//! `make`/`destroy` for one-shot use, and `alloc`/`init`/`uninit`/`dealloc`/
//! `fail` for two-phase creation. None of them return errors; the outcome is
//! observed through [`Gfx::query_state`].
//!
//! The context is single-threaded. It is an `Rc<RefCell<_>>` underneath, so
//! neither `Gfx` nor anything holding one is `Send`.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use log::{debug, error, warn};

use crate::config::{Config, GfxConfig};

use super::desc::{BufferUsage, ViewTarget};
use super::handle::{Buffer, Image, Pipeline, Sampler, Shader, View};
use super::pool::Pool;
use super::resource::{Descriptor, Resource};
use super::state::{ResourceKind, ResourceState};
use super::GfxError;

/// Largest pool a context accepts
pub const MAX_POOL_SIZE: usize = (1 << 16) - 1;

/// Occupancy counters of one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Configured capacity
    pub capacity: usize,
    /// Slots currently reserved (alloc, valid or failed)
    pub live: usize,
    /// Number of `destroy` calls made for this kind, including no-op calls
    pub destroy_calls: u64,
}

/// Every pool of a context
pub struct GfxState {
    pub(crate) buffers: Pool<Buffer>,
    pub(crate) images: Pool<Image>,
    pub(crate) samplers: Pool<Sampler>,
    pub(crate) shaders: Pool<Shader>,
    pub(crate) pipelines: Pool<Pipeline>,
    pub(crate) views: Pool<View>,
}

impl GfxState {
    fn new(config: &GfxConfig) -> Self {
        Self {
            buffers: Pool::new(config.buffer_pool_size),
            images: Pool::new(config.image_pool_size),
            samplers: Pool::new(config.sampler_pool_size),
            shaders: Pool::new(config.shader_pool_size),
            pipelines: Pool::new(config.pipeline_pool_size),
            views: Pool::new(config.view_pool_size),
        }
    }

    fn stats(&self, kind: ResourceKind) -> PoolStats {
        match kind {
            ResourceKind::Buffer => self.buffers.stats(),
            ResourceKind::Image => self.images.stats(),
            ResourceKind::Sampler => self.samplers.stats(),
            ResourceKind::Shader => self.shaders.stats(),
            ResourceKind::Pipeline => self.pipelines.stats(),
            ResourceKind::View => self.views.stats(),
        }
    }
}

impl Drop for GfxState {
    fn drop(&mut self) {
        for kind in ResourceKind::ALL {
            let live = self.stats(kind).live;
            if live > 0 {
                warn!("Shutting down with {live} live {kind} resource(s); releasing them");
            }
        }
    }
}

/// Handle to a graphics context
///
/// Cloning is cheap and every clone refers to the same pools. Owned resource
/// handles keep a clone, so the pools live until the last of them is gone.
#[derive(Clone)]
pub struct Gfx {
    inner: Rc<RefCell<GfxState>>,
}

impl fmt::Debug for Gfx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        let mut s = f.debug_struct("Gfx");
        for kind in ResourceKind::ALL {
            s.field(kind.name(), &state.stats(kind).live);
        }
        s.finish()
    }
}

impl Gfx {
    /// Create a context with the given pool capacities
    ///
    /// # Errors
    /// [`GfxError::InvalidPoolSize`] if a capacity is 0 or above
    /// [`MAX_POOL_SIZE`].
    pub fn new(config: &GfxConfig) -> Result<Self, GfxError> {
        for kind in ResourceKind::ALL {
            let size = config.pool_size(kind);
            if size == 0 || size > MAX_POOL_SIZE {
                return Err(GfxError::InvalidPoolSize { kind, size });
            }
        }
        debug!("Creating graphics context with {config:?}");
        Ok(Self {
            inner: Rc::new(RefCell::new(GfxState::new(config))),
        })
    }

    /// Create a context from a `.toml` or `.ron` config file
    ///
    /// # Errors
    /// Config loading errors and invalid pool sizes.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, GfxError> {
        let config = GfxConfig::load_from_file(path)?;
        Self::new(&config)
    }

    /// Whether `self` and `other` refer to the same context
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Occupancy counters for `kind`
    #[must_use]
    pub fn stats(&self, kind: ResourceKind) -> PoolStats {
        self.inner.borrow().stats(kind)
    }

    /// Reserve a slot without creating a resource
    ///
    /// Returns the sentinel when the pool is full.
    pub fn alloc<R: Resource>(&self) -> R {
        let mut state = self.inner.borrow_mut();
        R::pool_mut(&mut state).alloc().unwrap_or_else(|| {
            warn!("The {} pool is exhausted", R::KIND);
            R::INVALID
        })
    }

    /// Create the resource in a slot returned by [`Gfx::alloc`]
    ///
    /// On validation failure the slot moves to `Failed`.
    pub fn init<R: Resource>(&self, handle: R, desc: &R::Desc) {
        let mut state = self.inner.borrow_mut();
        let current = R::pool(&state).state(handle);
        if current != ResourceState::Alloc {
            error!("Cannot init {} {:?} in state {current}", R::KIND, handle);
            return;
        }

        let desc = desc.with_defaults();
        let created = R::create(&state, &desc);
        let Some(slot) = R::pool_mut(&mut state).slot_mut(handle) else {
            return;
        };
        match created {
            Ok(payload) => {
                slot.payload = Some(payload);
                slot.state = ResourceState::Valid;
                debug!("Created {} {:?}", R::KIND, handle);
            }
            Err(err) => {
                slot.state = ResourceState::Failed;
                error!("Failed to create {} {:?}: {err}", R::KIND, handle);
            }
        }
        slot.desc = Some(desc);
    }

    /// Tear down the resource in a slot but keep the slot reserved
    pub fn uninit<R: Resource>(&self, handle: R) {
        let mut state = self.inner.borrow_mut();
        match R::pool_mut(&mut state).slot_mut(handle) {
            Some(slot) if matches!(slot.state, ResourceState::Valid | ResourceState::Failed) => {
                slot.payload = None;
                slot.desc = None;
                slot.state = ResourceState::Alloc;
            }
            slot => {
                let current = slot.map_or(ResourceState::Invalid, |slot| slot.state);
                error!("Cannot uninit {} {:?} in state {current}", R::KIND, handle);
            }
        }
    }

    /// Return an allocated, uninitialised slot to the pool
    pub fn dealloc<R: Resource>(&self, handle: R) {
        let mut state = self.inner.borrow_mut();
        let pool = R::pool_mut(&mut state);
        let current = pool.state(handle);
        if current == ResourceState::Alloc {
            pool.free(handle);
        } else {
            error!("Cannot dealloc {} {:?} in state {current}", R::KIND, handle);
        }
    }

    /// Mark an allocated slot as failed without creating anything
    pub fn fail<R: Resource>(&self, handle: R) {
        let mut state = self.inner.borrow_mut();
        match R::pool_mut(&mut state).slot_mut(handle) {
            Some(slot) if slot.state == ResourceState::Alloc => slot.state = ResourceState::Failed,
            slot => {
                let current = slot.map_or(ResourceState::Invalid, |slot| slot.state);
                error!("Cannot fail {} {:?} in state {current}", R::KIND, handle);
            }
        }
    }

    /// Allocate and create a resource in one step
    ///
    /// Returns the sentinel when the pool is full. Otherwise the handle is
    /// `Valid` or `Failed`.
    pub fn make<D: Descriptor>(&self, desc: &D) -> D::Handle {
        let handle = self.alloc::<D::Handle>();
        if !handle.is_invalid() {
            self.init(handle, desc);
        }
        handle
    }

    /// Release a resource and its slot
    ///
    /// Sentinel, stale and unknown handles are ignored.
    pub fn destroy<R: Resource>(&self, handle: R) {
        let mut state = self.inner.borrow_mut();
        let pool = R::pool_mut(&mut state);
        pool.record_destroy_call();

        let Some(slot) = pool.slot_mut(handle) else {
            return;
        };
        if matches!(slot.state, ResourceState::Valid | ResourceState::Failed) {
            slot.payload = None;
            slot.desc = None;
            slot.state = ResourceState::Alloc;
        }
        if slot.state == ResourceState::Alloc {
            pool.free(handle);
            debug!("Destroyed {} {:?}", R::KIND, handle);
        }
    }

    /// Lifecycle state of `handle`; `Invalid` for sentinel or stale handles
    #[must_use]
    pub fn query_state<R: Resource>(&self, handle: R) -> ResourceState {
        R::pool(&self.inner.borrow()).state(handle)
    }

    /// Descriptor a resource was initialised with, defaults applied
    ///
    /// Returns `Desc::default()` for handles that were never initialised.
    #[must_use]
    pub fn query_desc<R: Resource>(&self, handle: R) -> R::Desc {
        R::pool(&self.inner.borrow())
            .slot(handle)
            .and_then(|slot| slot.desc.clone())
            .unwrap_or_default()
    }

    /// Copy of `desc` with unset fields replaced by their defaults
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn query_defaults<D: Descriptor>(&self, desc: &D) -> D {
        desc.with_defaults()
    }

    /// Overwrite the start of a dynamic or stream buffer
    ///
    /// Immutable buffers, oversized data and non-valid handles are logged and
    /// ignored.
    pub fn update_buffer(&self, buffer: Buffer, data: &[u8]) {
        let mut state = self.inner.borrow_mut();
        let Some(slot) = state.buffers.slot_mut(buffer) else {
            error!("Cannot update {buffer:?}: invalid handle");
            return;
        };
        let (Some(desc), Some(storage)) = (&slot.desc, &mut slot.payload) else {
            error!("Cannot update {buffer:?} in state {}", slot.state);
            return;
        };
        if desc.usage.contains(BufferUsage::IMMUTABLE) {
            error!("Cannot update immutable {buffer:?}");
            return;
        }
        if data.len() > storage.bytes.len() {
            error!(
                "Update of {} bytes overflows {buffer:?} of {} bytes",
                data.len(),
                storage.bytes.len()
            );
            return;
        }
        storage.bytes[..data.len()].copy_from_slice(data);
    }

    /// Current contents of a valid buffer
    #[must_use]
    pub fn read_buffer(&self, buffer: Buffer) -> Option<Vec<u8>> {
        let state = self.inner.borrow();
        let slot = state.buffers.slot(buffer)?;
        slot.payload.as_ref().map(|storage| storage.bytes.clone())
    }

    /// Resource a valid view refers to
    #[must_use]
    pub fn query_view_target(&self, view: View) -> Option<ViewTarget> {
        let state = self.inner.borrow();
        let slot = state.views.slot(view)?;
        slot.payload.as_ref().map(|object| object.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{BufferDesc, SamplerDesc};

    fn gfx() -> Gfx {
        crate::foundation::logging::init_for_tests();
        Gfx::new(&GfxConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_bad_pool_sizes() {
        let zero = GfxConfig::default().with_pool_size(ResourceKind::Image, 0);
        assert!(matches!(
            Gfx::new(&zero),
            Err(GfxError::InvalidPoolSize { kind: ResourceKind::Image, size: 0 })
        ));

        let huge = GfxConfig::default().with_pool_size(ResourceKind::View, MAX_POOL_SIZE + 1);
        assert!(Gfx::new(&huge).is_err());
    }

    #[test]
    fn test_two_phase_lifecycle() {
        let gfx = gfx();
        let sampler: Sampler = gfx.alloc();
        assert_eq!(gfx.query_state(sampler), ResourceState::Alloc);

        gfx.init(sampler, &SamplerDesc::linear());
        assert_eq!(gfx.query_state(sampler), ResourceState::Valid);

        gfx.uninit(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Alloc);

        gfx.dealloc(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Invalid);
        assert_eq!(gfx.stats(ResourceKind::Sampler).live, 0);
    }

    #[test]
    fn test_fail_only_from_alloc() {
        let gfx = gfx();
        let sampler: Sampler = gfx.alloc();
        gfx.fail(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Failed);

        // Failed slots can be initialised again only after uninit
        gfx.init(sampler, &SamplerDesc::linear());
        assert_eq!(gfx.query_state(sampler), ResourceState::Failed);
        gfx.uninit(sampler);
        gfx.init(sampler, &SamplerDesc::linear());
        assert_eq!(gfx.query_state(sampler), ResourceState::Valid);
        gfx.destroy(sampler);
    }

    #[test]
    fn test_dealloc_requires_alloc_state() {
        let gfx = gfx();
        let sampler = gfx.make(&SamplerDesc::nearest());
        gfx.dealloc(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Valid);
        gfx.destroy(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Invalid);
    }

    #[test]
    fn test_validation_failure_keeps_slot_until_destroy() {
        let gfx = gfx();
        let buffer = gfx.make(&BufferDesc::vertex(64, true));
        assert_eq!(gfx.query_state(buffer), ResourceState::Failed);
        assert_eq!(gfx.stats(ResourceKind::Buffer).live, 1);

        gfx.destroy(buffer);
        assert_eq!(gfx.query_state(buffer), ResourceState::Invalid);
        assert_eq!(gfx.stats(ResourceKind::Buffer).live, 0);
    }

    #[test]
    fn test_destroy_counts_every_call() {
        let gfx = gfx();
        let buffer = gfx.make(&BufferDesc::vertex_with_data(&[0u8; 16]));
        gfx.destroy(buffer);
        gfx.destroy(buffer);
        gfx.destroy(Buffer::INVALID);
        let stats = gfx.stats(ResourceKind::Buffer);
        assert_eq!(stats.destroy_calls, 3);
        assert_eq!(stats.live, 0);
    }

    #[test]
    fn test_pool_exhaustion_yields_sentinel() {
        let config = GfxConfig::default().with_pool_size(ResourceKind::Sampler, 1);
        let gfx = Gfx::new(&config).unwrap();
        let first = gfx.make(&SamplerDesc::linear());
        let second = gfx.make(&SamplerDesc::linear());
        assert!(!first.is_invalid());
        assert!(second.is_invalid());
        assert_eq!(gfx.query_state(second), ResourceState::Invalid);

        gfx.destroy(first);
        assert!(!gfx.make(&SamplerDesc::linear()).is_invalid());
    }

    #[test]
    fn test_query_desc_applies_defaults() {
        let gfx = gfx();
        let sampler = gfx.make(&SamplerDesc::linear());
        let desc = gfx.query_desc(sampler);
        assert_eq!(desc.max_anisotropy, 1);
        assert_eq!(desc.max_lod, f32::MAX);

        gfx.destroy(sampler);
        assert_eq!(gfx.query_desc(sampler), SamplerDesc::default());
    }

    #[test]
    fn test_update_dynamic_buffer() {
        let gfx = gfx();
        let buffer = gfx.make(&BufferDesc::vertex(4, false));
        gfx.update_buffer(buffer, &[1, 2]);
        assert_eq!(gfx.read_buffer(buffer), Some(vec![1, 2, 0, 0]));

        // Too large: ignored
        gfx.update_buffer(buffer, &[9; 8]);
        assert_eq!(gfx.read_buffer(buffer), Some(vec![1, 2, 0, 0]));
        gfx.destroy(buffer);
    }

    #[test]
    fn test_update_immutable_buffer_is_ignored() {
        let gfx = gfx();
        let buffer = gfx.make(&BufferDesc::vertex_with_data(&[5u8; 4]));
        gfx.update_buffer(buffer, &[0; 4]);
        assert_eq!(gfx.read_buffer(buffer), Some(vec![5; 4]));
        gfx.destroy(buffer);
    }

    #[test]
    fn test_clones_share_pools() {
        let gfx = gfx();
        let other = gfx.clone();
        let sampler = gfx.make(&SamplerDesc::nearest());
        assert!(gfx.ptr_eq(&other));
        assert_eq!(other.query_state(sampler), ResourceState::Valid);
        other.destroy(sampler);
        assert_eq!(gfx.query_state(sampler), ResourceState::Invalid);
    }
}
