//! Resource trait table
//!
//! [`Resource`] maps each handle type to its descriptor, its pool inside the
//! context and the function that turns a validated descriptor into a backend
//! object. [`Descriptor`] maps the other way, so `gfx.make(&desc)` can infer
//! the handle type. The generic operations on [`Gfx`](crate::Gfx) dispatch
//! statically through these impls.

use std::fmt::Debug;
use std::hash::Hash;

use slotmap::{Key, KeyData};

use super::backend::{BufferStorage, ImageStorage, PipelineObject, SamplerObject, ShaderModule, ViewObject};
use super::context::GfxState;
use super::desc::{BufferDesc, ImageDesc, PipelineDesc, SamplerDesc, ShaderDesc, ViewDesc};
use super::handle::{
    Buffer, BufferKey, Image, ImageKey, Pipeline, PipelineKey, Sampler, SamplerKey, Shader, ShaderKey, View,
    ViewKey,
};
use super::pool::Pool;
use super::state::ResourceKind;
use super::validate::ValidationError;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Buffer {}
    impl Sealed for super::Image {}
    impl Sealed for super::Sampler {}
    impl Sealed for super::Shader {}
    impl Sealed for super::Pipeline {}
    impl Sealed for super::View {}
}

/// A handle type the context knows how to create, query and destroy
///
/// Implemented for the six handle types only.
pub trait Resource: sealed::Sealed + Copy + Eq + Hash + Debug + 'static {
    /// Kind tag used for stats and log output
    const KIND: ResourceKind;

    /// Sentinel handle for this kind
    const INVALID: Self;

    /// Descriptor consumed by `make`/`init`
    type Desc: Descriptor<Handle = Self>;

    #[doc(hidden)]
    type Key: Key;

    #[doc(hidden)]
    type Payload;

    /// Raw id, `0` for the sentinel
    fn id(self) -> u64;

    /// Wrap a raw id
    fn from_id(id: u64) -> Self;

    /// Whether this is the sentinel handle
    fn is_invalid(self) -> bool {
        self.id() == 0
    }

    #[doc(hidden)]
    fn key(self) -> Self::Key {
        KeyData::from_ffi(self.id()).into()
    }

    #[doc(hidden)]
    fn from_key(key: Self::Key) -> Self {
        Self::from_id(key.data().as_ffi())
    }

    #[doc(hidden)]
    fn pool(state: &GfxState) -> &Pool<Self>;

    #[doc(hidden)]
    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self>;

    /// Validate a defaulted descriptor and build the backend object
    #[doc(hidden)]
    fn create(state: &GfxState, desc: &Self::Desc) -> Result<Self::Payload, ValidationError>;
}

/// A descriptor record that creates one kind of resource
pub trait Descriptor: Clone + Default + Debug {
    /// Handle type produced from this descriptor
    type Handle: Resource<Desc = Self>;

    /// Copy of `self` with unset fields replaced by their defaults
    #[must_use]
    fn with_defaults(&self) -> Self;
}

impl Resource for Buffer {
    const KIND: ResourceKind = ResourceKind::Buffer;
    const INVALID: Self = Self::INVALID;
    type Desc = BufferDesc;
    type Key = BufferKey;
    type Payload = BufferStorage;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.buffers
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.buffers
    }

    fn create(_state: &GfxState, desc: &BufferDesc) -> Result<BufferStorage, ValidationError> {
        desc.validate()?;
        Ok(BufferStorage::new(desc))
    }
}

impl Resource for Image {
    const KIND: ResourceKind = ResourceKind::Image;
    const INVALID: Self = Self::INVALID;
    type Desc = ImageDesc;
    type Key = ImageKey;
    type Payload = ImageStorage;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.images
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.images
    }

    fn create(_state: &GfxState, desc: &ImageDesc) -> Result<ImageStorage, ValidationError> {
        desc.validate()?;
        Ok(ImageStorage::new(desc))
    }
}

impl Resource for Sampler {
    const KIND: ResourceKind = ResourceKind::Sampler;
    const INVALID: Self = Self::INVALID;
    type Desc = SamplerDesc;
    type Key = SamplerKey;
    type Payload = SamplerObject;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.samplers
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.samplers
    }

    fn create(_state: &GfxState, desc: &SamplerDesc) -> Result<SamplerObject, ValidationError> {
        desc.validate()?;
        Ok(SamplerObject::new(desc))
    }
}

impl Resource for Shader {
    const KIND: ResourceKind = ResourceKind::Shader;
    const INVALID: Self = Self::INVALID;
    type Desc = ShaderDesc;
    type Key = ShaderKey;
    type Payload = ShaderModule;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.shaders
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.shaders
    }

    fn create(_state: &GfxState, desc: &ShaderDesc) -> Result<ShaderModule, ValidationError> {
        desc.validate()?;
        Ok(ShaderModule::new(desc))
    }
}

impl Resource for Pipeline {
    const KIND: ResourceKind = ResourceKind::Pipeline;
    const INVALID: Self = Self::INVALID;
    type Desc = PipelineDesc;
    type Key = PipelineKey;
    type Payload = PipelineObject;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.pipelines
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.pipelines
    }

    fn create(state: &GfxState, desc: &PipelineDesc) -> Result<PipelineObject, ValidationError> {
        desc.validate(state)?;
        Ok(PipelineObject::new(desc))
    }
}

impl Resource for View {
    const KIND: ResourceKind = ResourceKind::View;
    const INVALID: Self = Self::INVALID;
    type Desc = ViewDesc;
    type Key = ViewKey;
    type Payload = ViewObject;

    fn id(self) -> u64 {
        Self::id(self)
    }

    fn from_id(id: u64) -> Self {
        Self::from_id(id)
    }

    fn pool(state: &GfxState) -> &Pool<Self> {
        &state.views
    }

    fn pool_mut(state: &mut GfxState) -> &mut Pool<Self> {
        &mut state.views
    }

    fn create(state: &GfxState, desc: &ViewDesc) -> Result<ViewObject, ValidationError> {
        let target = desc.validate(state)?;
        Ok(ViewObject { target })
    }
}
