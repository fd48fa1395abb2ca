//! Headless backend objects
//!
//! Stand-ins for the native objects a GPU backend would create. They keep
//! just enough state to answer queries and to make creation observable.

use super::desc::{BufferDesc, ImageDesc, SamplerDesc, ShaderDesc, PipelineDesc, ViewTarget};
use super::handle::Shader;

/// CPU copy of a buffer's contents
pub struct BufferStorage {
    pub(crate) bytes: Vec<u8>,
}

impl BufferStorage {
    pub(crate) fn new(desc: &BufferDesc) -> Self {
        let mut bytes = vec![0; desc.size];
        if let Some(data) = &desc.data {
            bytes[..data.len()].copy_from_slice(data);
        }
        Self { bytes }
    }
}

/// Image contents; render targets keep no CPU copy
pub struct ImageStorage {
    #[allow(dead_code)]
    pub(crate) byte_len: usize,
    #[allow(dead_code)]
    pub(crate) data: Option<Vec<u8>>,
}

impl ImageStorage {
    pub(crate) fn new(desc: &ImageDesc) -> Self {
        Self {
            byte_len: desc.byte_len(),
            data: desc.data.clone(),
        }
    }
}

/// Sampler object
pub struct SamplerObject {
    #[allow(dead_code)]
    pub(crate) anisotropic: bool,
}

impl SamplerObject {
    pub(crate) const fn new(desc: &SamplerDesc) -> Self {
        Self {
            anisotropic: desc.max_anisotropy > 1,
        }
    }
}

/// Compiled shader module
pub struct ShaderModule {
    #[allow(dead_code)]
    pub(crate) vertex_entry: String,
    #[allow(dead_code)]
    pub(crate) fragment_entry: String,
}

impl ShaderModule {
    pub(crate) fn new(desc: &ShaderDesc) -> Self {
        Self {
            vertex_entry: desc.vertex.entry.clone(),
            fragment_entry: desc.fragment.entry.clone(),
        }
    }
}

/// Pipeline state object
pub struct PipelineObject {
    #[allow(dead_code)]
    pub(crate) shader: Shader,
}

impl PipelineObject {
    pub(crate) const fn new(desc: &PipelineDesc) -> Self {
        Self { shader: desc.shader }
    }
}

/// View object
pub struct ViewObject {
    pub(crate) target: ViewTarget,
}
