//! Resource kinds and lifecycle states

use std::fmt;

/// The closed set of resource categories a context manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Vertex, index or storage buffer
    Buffer,
    /// Texture or render target
    Image,
    /// Texture sampling state
    Sampler,
    /// Vertex + fragment shader pair
    Shader,
    /// Render pipeline state
    Pipeline,
    /// Binding view onto a buffer or image
    View,
}

impl ResourceKind {
    /// Every kind, in pool order
    pub const ALL: [Self; 6] = [
        Self::Buffer,
        Self::Image,
        Self::Sampler,
        Self::Shader,
        Self::Pipeline,
        Self::View,
    ];

    /// Lowercase name used in log output
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Image => "image",
            Self::Sampler => "sampler",
            Self::Shader => "shader",
            Self::Pipeline => "pipeline",
            Self::View => "view",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle stage of a pool slot
///
/// ```text
///   alloc        init ok
/// ───────▶ Alloc ───────▶ Valid
///            │  ▲  init err / fail
///            │  └──────── Failed
///   dealloc  ▼     uninit (Valid|Failed → Alloc)
///         (freed: queries report Invalid)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceState {
    /// Slot is unused
    #[default]
    Initial,
    /// Slot is reserved but no resource has been created in it
    Alloc,
    /// Resource was created successfully
    Valid,
    /// Resource creation failed; the slot stays reserved until destroyed
    Failed,
    /// Handle is the sentinel, stale, or was never issued by this context
    Invalid,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Alloc => "alloc",
            Self::Valid => "valid",
            Self::Failed => "failed",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}
