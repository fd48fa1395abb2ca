//! Pipeline descriptors

use crate::gfx::context::GfxState;
use crate::gfx::handle::{Pipeline, Shader};
use crate::gfx::resource::Descriptor;
use crate::gfx::state::ResourceKind;
use crate::gfx::validate::ValidationError;

/// Maximum number of colour attachments a pipeline can write
pub const MAX_COLOR_ATTACHMENTS: u32 = 4;

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Independent lines
    Lines,
    /// Line strip
    LineStrip,
    /// Points
    Points,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexType {
    /// Non-indexed drawing
    #[default]
    None,
    /// 16-bit indices
    Uint16,
    /// 32-bit indices
    Uint32,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling
    #[default]
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Creation parameters for a [`Pipeline`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDesc {
    /// Shader the pipeline runs; must be valid at creation
    pub shader: Shader,
    /// Primitive assembly
    pub primitive_type: PrimitiveType,
    /// Index element type
    pub index_type: IndexType,
    /// Face culling
    pub cull_mode: CullMode,
    /// Number of colour attachments written; `0` means 1
    pub color_count: u32,
    /// MSAA sample count; `0` means 1
    pub sample_count: u32,
    /// Debug label
    pub label: Option<String>,
}

impl PipelineDesc {
    /// Descriptor running `shader`
    #[must_use]
    pub fn new(shader: Shader) -> Self {
        Self {
            shader,
            ..Self::default()
        }
    }

    /// Set the shader
    #[must_use]
    pub fn shader(mut self, shader: Shader) -> Self {
        self.shader = shader;
        self
    }

    /// Set the primitive type
    #[must_use]
    pub fn primitive_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.primitive_type = primitive_type;
        self
    }

    /// Set the index type
    #[must_use]
    pub fn index_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Set the cull mode
    #[must_use]
    pub fn cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Set the colour attachment count
    #[must_use]
    pub fn color_count(mut self, count: u32) -> Self {
        self.color_count = count;
        self
    }

    /// Set the MSAA sample count
    #[must_use]
    pub fn sample_count(mut self, samples: u32) -> Self {
        self.sample_count = samples;
        self
    }

    /// Set the debug label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self, state: &GfxState) -> Result<(), ValidationError> {
        state
            .shaders
            .valid_desc(self.shader)
            .map_err(|shader_state| ValidationError::DependencyNotValid {
                kind: ResourceKind::Shader,
                id: self.shader.id(),
                state: shader_state,
            })?;
        if self.color_count > MAX_COLOR_ATTACHMENTS {
            return Err(ValidationError::PipelineColorCount {
                count: self.color_count,
                max: MAX_COLOR_ATTACHMENTS,
            });
        }
        Ok(())
    }
}

impl Descriptor for PipelineDesc {
    type Handle = Pipeline;

    fn with_defaults(&self) -> Self {
        let mut desc = self.clone();
        if desc.color_count == 0 {
            desc.color_count = 1;
        }
        if desc.sample_count == 0 {
            desc.sample_count = 1;
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let desc = PipelineDesc::new(Shader::INVALID).with_defaults();
        assert_eq!(desc.color_count, 1);
        assert_eq!(desc.sample_count, 1);
        assert_eq!(desc.primitive_type, PrimitiveType::Triangles);
        assert_eq!(desc.index_type, IndexType::None);
        assert_eq!(desc.cull_mode, CullMode::None);
    }

    #[test]
    fn test_builders_chain() {
        let desc = PipelineDesc::new(Shader::INVALID)
            .primitive_type(PrimitiveType::Lines)
            .index_type(IndexType::Uint16)
            .cull_mode(CullMode::Back)
            .label("lines");
        assert_eq!(desc.primitive_type, PrimitiveType::Lines);
        assert_eq!(desc.index_type, IndexType::Uint16);
        assert_eq!(desc.cull_mode, CullMode::Back);
        assert_eq!(desc.label.as_deref(), Some("lines"));
    }
}
