//! Fixed-capacity slot pools
//!
//! Each resource kind lives in its own `SlotMap`. The map's key versioning
//! gives the generational check: a handle whose slot was freed and reused
//! never resolves again, so stale ids report [`ResourceState::Invalid`].

use slotmap::{KeyData, SlotMap};

use super::context::PoolStats;
use super::resource::Resource;
use super::state::ResourceState;

/// One reserved pool entry
pub struct Slot<R: Resource> {
    pub(crate) state: ResourceState,
    pub(crate) desc: Option<R::Desc>,
    pub(crate) payload: Option<R::Payload>,
}

impl<R: Resource> Slot<R> {
    const fn allocated() -> Self {
        Self {
            state: ResourceState::Alloc,
            desc: None,
            payload: None,
        }
    }
}

/// Storage for every live resource of one kind
pub struct Pool<R: Resource> {
    slots: SlotMap<R::Key, Slot<R>>,
    capacity: usize,
    destroy_calls: u64,
}

impl<R: Resource> Pool<R> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            capacity,
            destroy_calls: 0,
        }
    }

    /// Reserve a slot, or `None` when the pool is full
    pub(crate) fn alloc(&mut self) -> Option<R> {
        if self.slots.len() >= self.capacity {
            return None;
        }
        let key = self.slots.insert(Slot::allocated());
        Some(R::from_key(key))
    }

    pub(crate) fn slot(&self, handle: R) -> Option<&Slot<R>> {
        self.slots.get(Self::issued_key(handle)?)
    }

    pub(crate) fn slot_mut(&mut self, handle: R) -> Option<&mut Slot<R>> {
        self.slots.get_mut(Self::issued_key(handle)?)
    }

    /// Key for an id this pool could have handed out
    ///
    /// Key decoding forces the version's low bit on, so an id with an even
    /// version would otherwise alias a live slot.
    fn issued_key(handle: R) -> Option<R::Key> {
        let id = handle.id();
        if handle.is_invalid() || KeyData::from_ffi(id).as_ffi() != id {
            return None;
        }
        Some(handle.key())
    }

    pub(crate) fn state(&self, handle: R) -> ResourceState {
        self.slot(handle)
            .map_or(ResourceState::Invalid, |slot| slot.state)
    }

    /// Descriptor of a resource in the `Valid` state, or the state it is in
    pub(crate) fn valid_desc(&self, handle: R) -> Result<&R::Desc, ResourceState> {
        match self.slot(handle) {
            Some(Slot {
                state: ResourceState::Valid,
                desc: Some(desc),
                ..
            }) => Ok(desc),
            Some(slot) => Err(slot.state),
            None => Err(ResourceState::Invalid),
        }
    }

    /// Release a slot back to the pool
    pub(crate) fn free(&mut self, handle: R) -> bool {
        Self::issued_key(handle).is_some_and(|key| self.slots.remove(key).is_some())
    }

    pub(crate) fn record_destroy_call(&mut self) {
        self.destroy_calls += 1;
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            live: self.slots.len(),
            destroy_calls: self.destroy_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::Sampler;

    #[test]
    fn test_alloc_until_full() {
        let mut pool = Pool::<Sampler>::new(2);
        let a = pool.alloc().unwrap();
        let b = pool.alloc().unwrap();
        assert_ne!(a, b);
        assert!(pool.alloc().is_none());
        assert_eq!(pool.stats().live, 2);
    }

    #[test]
    fn test_ids_are_never_zero() {
        let mut pool = Pool::<Sampler>::new(4);
        for _ in 0..4 {
            assert!(!pool.alloc().unwrap().is_invalid());
        }
    }

    #[test]
    fn test_freed_slot_does_not_resolve_stale_handle() {
        let mut pool = Pool::<Sampler>::new(1);
        let first = pool.alloc().unwrap();
        assert!(pool.free(first));

        let second = pool.alloc().unwrap();
        assert_ne!(first, second);
        assert_eq!(pool.state(first), ResourceState::Invalid);
        assert_eq!(pool.state(second), ResourceState::Alloc);
        assert!(!pool.free(first));
    }

    #[test]
    fn test_sentinel_never_resolves() {
        let pool = Pool::<Sampler>::new(1);
        assert!(pool.slot(Sampler::INVALID).is_none());
        assert_eq!(pool.valid_desc(Sampler::INVALID).unwrap_err(), ResourceState::Invalid);
    }

    #[test]
    fn test_unissued_ids_never_resolve() {
        let mut pool = Pool::<Sampler>::new(4);
        let live = pool.alloc().unwrap();

        // Same slot index, version bits cleared or flipped
        let index = live.id() & 0xffff_ffff;
        for forged in [index, index | (2 << 32)] {
            let forged = Sampler::from_id(forged);
            assert_ne!(forged, live);
            assert_eq!(pool.state(forged), ResourceState::Invalid);
            assert!(pool.slot(forged).is_none());
            assert!(!pool.free(forged));
        }
        assert_eq!(pool.state(live), ResourceState::Alloc);
    }
}
