//! Shader descriptors

use std::fmt;

use crate::gfx::handle::Shader;
use crate::gfx::resource::Descriptor;
use crate::gfx::validate::ValidationError;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Source and entry point of one stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderStageDesc {
    /// Shader source text
    pub source: String,
    /// Entry point; empty means `main`
    pub entry: String,
}

/// Creation parameters for a [`Shader`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderDesc {
    /// Vertex stage
    pub vertex: ShaderStageDesc,
    /// Fragment stage
    pub fragment: ShaderStageDesc,
    /// Debug label
    pub label: Option<String>,
}

impl ShaderDesc {
    /// Empty descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor with both stage sources set
    #[must_use]
    pub fn from_sources(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new().vertex_source(vertex).fragment_source(fragment)
    }

    /// Set the vertex stage source
    #[must_use]
    pub fn vertex_source(mut self, source: impl Into<String>) -> Self {
        self.vertex.source = source.into();
        self
    }

    /// Set the vertex stage entry point
    #[must_use]
    pub fn vertex_entry(mut self, entry: impl Into<String>) -> Self {
        self.vertex.entry = entry.into();
        self
    }

    /// Set the fragment stage source
    #[must_use]
    pub fn fragment_source(mut self, source: impl Into<String>) -> Self {
        self.fragment.source = source.into();
        self
    }

    /// Set the fragment stage entry point
    #[must_use]
    pub fn fragment_entry(mut self, entry: impl Into<String>) -> Self {
        self.fragment.entry = entry.into();
        self
    }

    /// Set the debug label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.vertex.source.trim().is_empty() {
            return Err(ValidationError::ShaderStageEmpty(ShaderStage::Vertex));
        }
        if self.fragment.source.trim().is_empty() {
            return Err(ValidationError::ShaderStageEmpty(ShaderStage::Fragment));
        }
        Ok(())
    }
}

impl Descriptor for ShaderDesc {
    type Handle = Shader;

    fn with_defaults(&self) -> Self {
        let mut desc = self.clone();
        for stage in [&mut desc.vertex, &mut desc.fragment] {
            if stage.entry.is_empty() {
                stage.entry = "main".to_owned();
            }
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_defaults_to_main() {
        let desc = ShaderDesc::from_sources("vs", "fs").fragment_entry("fs_main").with_defaults();
        assert_eq!(desc.vertex.entry, "main");
        assert_eq!(desc.fragment.entry, "fs_main");
    }

    #[test]
    fn test_missing_stage_source() {
        assert_eq!(
            ShaderDesc::new().fragment_source("fs").validate(),
            Err(ValidationError::ShaderStageEmpty(ShaderStage::Vertex))
        );
        assert_eq!(
            ShaderDesc::new().vertex_source("vs").fragment_source("  ").validate(),
            Err(ValidationError::ShaderStageEmpty(ShaderStage::Fragment))
        );
    }
}
