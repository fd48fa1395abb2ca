//! Descriptor records and their chainable builders
//!
//! Descriptors are plain data. Setters overwrite a field and return the
//! descriptor, so the last write wins. All checking happens when the
//! descriptor is handed to a context.

mod buffer;
mod image;
mod pipeline;
mod sampler;
mod shader;
mod view;

pub use buffer::{BufferDesc, BufferUsage};
pub use image::{ImageDesc, ImageType, ImageUsage, PixelFormat};
pub use pipeline::{CullMode, IndexType, PipelineDesc, PrimitiveType, MAX_COLOR_ATTACHMENTS};
pub use sampler::{Filter, SamplerDesc, Wrap};
pub use shader::{ShaderDesc, ShaderStage, ShaderStageDesc};
pub use view::{BufferViewDesc, ImageViewDesc, TextureViewDesc, ViewDesc, ViewTarget};
