//! Buffer descriptors

use bitflags::bitflags;
use bytemuck::Pod;

use crate::gfx::handle::Buffer;
use crate::gfx::resource::Descriptor;
use crate::gfx::validate::ValidationError;

bitflags! {
    /// Binding and update behaviour of a buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Bindable as vertex input
        const VERTEX_BUFFER = 1 << 0;
        /// Bindable as index input
        const INDEX_BUFFER = 1 << 1;
        /// Bindable through a storage buffer view
        const STORAGE_BUFFER = 1 << 2;
        /// Contents fixed at creation
        const IMMUTABLE = 1 << 3;
        /// Updated occasionally
        const DYNAMIC_UPDATE = 1 << 4;
        /// Updated every frame
        const STREAM_UPDATE = 1 << 5;
    }
}

impl BufferUsage {
    /// Bits that say how the buffer is bound
    pub const BINDINGS: Self = Self::VERTEX_BUFFER
        .union(Self::INDEX_BUFFER)
        .union(Self::STORAGE_BUFFER);

    /// Bits that say how the buffer is updated
    pub const UPDATE_MODES: Self = Self::IMMUTABLE
        .union(Self::DYNAMIC_UPDATE)
        .union(Self::STREAM_UPDATE);
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Creation parameters for a [`Buffer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes; `0` means "size of `data`"
    pub size: usize,
    /// Binding and update flags
    pub usage: BufferUsage,
    /// Initial contents, immutable buffers only
    pub data: Option<Vec<u8>>,
    /// Debug label
    pub label: Option<String>,
}

impl BufferDesc {
    /// Empty descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex buffer of `size` bytes. Non-immutable buffers use dynamic updates
    #[must_use]
    pub fn vertex(size: usize, immutable: bool) -> Self {
        Self::new().size(size).vertex_buffer(true).update_mode(immutable)
    }

    /// Index buffer of `size` bytes. Non-immutable buffers use dynamic updates
    #[must_use]
    pub fn index(size: usize, immutable: bool) -> Self {
        Self::new().size(size).index_buffer(true).update_mode(immutable)
    }

    /// Immutable vertex buffer holding `data`
    #[must_use]
    pub fn vertex_with_data<T: Pod>(data: &[T]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        Self::new()
            .size(bytes.len())
            .vertex_buffer(true)
            .immutable(true)
            .data(bytes)
    }

    /// Immutable index buffer holding `data`
    #[must_use]
    pub fn index_with_data<T: Pod>(data: &[T]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        Self::new()
            .size(bytes.len())
            .index_buffer(true)
            .immutable(true)
            .data(bytes)
    }

    fn update_mode(self, immutable: bool) -> Self {
        if immutable {
            self.immutable(true)
        } else {
            self.dynamic_update(true)
        }
    }

    /// Set the size in bytes
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Replace all usage flags
    #[must_use]
    pub fn usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Toggle [`BufferUsage::VERTEX_BUFFER`]
    #[must_use]
    pub fn vertex_buffer(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::VERTEX_BUFFER, enabled);
        self
    }

    /// Toggle [`BufferUsage::INDEX_BUFFER`]
    #[must_use]
    pub fn index_buffer(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::INDEX_BUFFER, enabled);
        self
    }

    /// Toggle [`BufferUsage::STORAGE_BUFFER`]
    #[must_use]
    pub fn storage_buffer(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::STORAGE_BUFFER, enabled);
        self
    }

    /// Toggle [`BufferUsage::IMMUTABLE`]
    #[must_use]
    pub fn immutable(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::IMMUTABLE, enabled);
        self
    }

    /// Toggle [`BufferUsage::DYNAMIC_UPDATE`]
    #[must_use]
    pub fn dynamic_update(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::DYNAMIC_UPDATE, enabled);
        self
    }

    /// Toggle [`BufferUsage::STREAM_UPDATE`]
    #[must_use]
    pub fn stream_update(mut self, enabled: bool) -> Self {
        self.usage.set(BufferUsage::STREAM_UPDATE, enabled);
        self
    }

    /// Set the initial contents
    #[must_use]
    pub fn data(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.data = Some(bytes.into());
        self
    }

    /// Set the debug label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::BufferSizeZero);
        }
        let modes = self.usage & BufferUsage::UPDATE_MODES;
        if modes.bits().count_ones() != 1 {
            return Err(ValidationError::BufferUpdateMode(modes));
        }
        if !self.usage.intersects(BufferUsage::BINDINGS) {
            return Err(ValidationError::BufferNoBinding);
        }

        match (&self.data, self.usage.contains(BufferUsage::IMMUTABLE)) {
            (None, true) => Err(ValidationError::ImmutableBufferWithoutData),
            (Some(_), false) => Err(ValidationError::MutableWithData),
            (Some(data), true) if data.len() > self.size => Err(ValidationError::BufferDataTooLarge {
                data: data.len(),
                size: self.size,
            }),
            _ => Ok(()),
        }
    }
}

impl Descriptor for BufferDesc {
    type Handle = Buffer;

    fn with_defaults(&self) -> Self {
        let mut desc = self.clone();
        if desc.size == 0 {
            desc.size = desc.data.as_ref().map_or(0, Vec::len);
        }
        if !desc.usage.intersects(BufferUsage::BINDINGS) {
            desc.usage |= BufferUsage::VERTEX_BUFFER;
        }
        if !desc.usage.intersects(BufferUsage::UPDATE_MODES) {
            desc.usage |= BufferUsage::IMMUTABLE;
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let desc = BufferDesc::new().size(16).size(32).vertex_buffer(true).vertex_buffer(false);
        assert_eq!(desc.size, 32);
        assert!(!desc.usage.contains(BufferUsage::VERTEX_BUFFER));
    }

    #[test]
    fn test_vertex_with_data_casts_bytes() {
        let desc = BufferDesc::vertex_with_data(&[1.0f32, 2.0, 3.0]);
        assert_eq!(desc.size, 12);
        assert_eq!(desc.data.as_ref().map(Vec::len), Some(12));
        assert!(desc.usage.contains(BufferUsage::VERTEX_BUFFER | BufferUsage::IMMUTABLE));
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_mutable_convenience_uses_dynamic_updates() {
        let desc = BufferDesc::index(64, false);
        assert!(desc.usage.contains(BufferUsage::INDEX_BUFFER | BufferUsage::DYNAMIC_UPDATE));
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_size_and_usage() {
        let desc = BufferDesc::new().data(vec![0u8; 24]).with_defaults();
        assert_eq!(desc.size, 24);
        assert_eq!(desc.usage, BufferUsage::VERTEX_BUFFER | BufferUsage::IMMUTABLE);
    }

    #[test]
    fn test_defaults_keep_explicit_fields() {
        let desc = BufferDesc::new()
            .size(8)
            .storage_buffer(true)
            .stream_update(true)
            .with_defaults();
        assert_eq!(desc.size, 8);
        assert_eq!(desc.usage, BufferUsage::STORAGE_BUFFER | BufferUsage::STREAM_UPDATE);
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(
            BufferDesc::new().with_defaults().validate(),
            Err(ValidationError::BufferSizeZero)
        );
        assert_eq!(
            BufferDesc::vertex(16, true).validate(),
            Err(ValidationError::ImmutableBufferWithoutData)
        );
        assert_eq!(
            BufferDesc::vertex(16, false).data(vec![0; 4]).validate(),
            Err(ValidationError::MutableWithData)
        );
        assert_eq!(
            BufferDesc::vertex(2, true).data(vec![0; 4]).validate(),
            Err(ValidationError::BufferDataTooLarge { data: 4, size: 2 })
        );
        assert_eq!(
            BufferDesc::new().size(4).immutable(true).data(vec![0; 4]).validate(),
            Err(ValidationError::BufferNoBinding)
        );
        assert!(matches!(
            BufferDesc::vertex(16, false).stream_update(true).validate(),
            Err(ValidationError::BufferUpdateMode(_))
        ));
    }
}
