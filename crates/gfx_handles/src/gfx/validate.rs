//! Descriptor validation errors
//!
//! Validation failures are never returned to the caller of `make`/`init`.
//! They are logged and the slot moves to [`ResourceState::Failed`].

use thiserror::Error;

use super::desc::{BufferUsage, PixelFormat, ShaderStage};
use super::state::{ResourceKind, ResourceState};

/// Why a descriptor was rejected
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("buffer size must be greater than zero")]
    BufferSizeZero,

    #[error("buffer must use exactly one update mode, found {0:?}")]
    BufferUpdateMode(BufferUsage),

    #[error("buffer has no binding usage (vertex, index or storage)")]
    BufferNoBinding,

    #[error("immutable buffer requires initial data")]
    ImmutableBufferWithoutData,

    #[error("initial data ({data} bytes) exceeds buffer size ({size} bytes)")]
    BufferDataTooLarge { data: usize, size: usize },

    #[error("only immutable resources may carry initial data")]
    MutableWithData,

    #[error("image extent {width}x{height}x{slices} must be non-zero")]
    ImageExtentZero { width: u32, height: u32, slices: u32 },

    #[error("cube images need 6 slices, found {0}")]
    CubeImageSlices(u32),

    #[error("image of {width}x{height} supports at most {max} mipmaps, requested {requested}")]
    ImageMipmapCount { width: u32, height: u32, requested: u32, max: u32 },

    #[error("image must use exactly one update mode")]
    ImageUpdateMode,

    #[error("multisampled images must be render targets")]
    MultisampleWithoutRenderTarget,

    #[error("immutable image needs {expected} bytes of data, found {found}")]
    ImageDataSize { expected: usize, found: usize },

    #[error("render target images must be immutable and carry no data")]
    RenderTargetUsage,

    #[error("depth format {0:?} requires a render target usage")]
    DepthFormatWithoutRenderTarget(PixelFormat),

    #[error("sampler max_anisotropy must be at least 1, found {0}")]
    SamplerAnisotropy(u32),

    #[error("sampler min_lod ({min}) exceeds max_lod ({max})")]
    SamplerLodRange { min: f32, max: f32 },

    #[error("{0} shader stage has no source")]
    ShaderStageEmpty(ShaderStage),

    #[error("{kind} dependency (id {id}) is not valid (state {state})")]
    DependencyNotValid { kind: ResourceKind, id: u64, state: ResourceState },

    #[error("pipeline color_count {count} exceeds the maximum of {max}")]
    PipelineColorCount { count: u32, max: u32 },

    #[error("view must target exactly one resource, found {0}")]
    ViewTargetCount(usize),

    #[error("storage buffer view requires a buffer with storage usage")]
    ViewBufferNotStorage,

    #[error("storage buffer view offset {offset} out of range for buffer of {size} bytes")]
    ViewBufferOffset { offset: usize, size: usize },

    #[error("attachment view requires a render target image")]
    ViewImageNotRenderTarget,

    #[error("attachment view format {format:?} does not match a {expected} attachment")]
    ViewAttachmentFormat { format: PixelFormat, expected: &'static str },

    #[error("view mip level {level} out of range for image with {mipmaps} mipmaps")]
    ViewMipLevel { level: u32, mipmaps: u32 },

    #[error("view slice {slice} out of range for image with {slices} slices")]
    ViewSlice { slice: u32, slices: u32 },
}
