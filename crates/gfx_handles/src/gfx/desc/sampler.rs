//! Sampler descriptors

use crate::gfx::handle::Sampler;
use crate::gfx::resource::Descriptor;
use crate::gfx::validate::ValidationError;

/// Texel filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Nearest texel
    #[default]
    Nearest,
    /// Linear blend of neighbours
    Linear,
}

/// Addressing mode outside `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrap {
    /// Tile
    #[default]
    Repeat,
    /// Clamp to the edge texel
    ClampToEdge,
    /// Clamp to the border colour
    ClampToBorder,
    /// Tile with every other repetition mirrored
    MirroredRepeat,
}

/// Creation parameters for a [`Sampler`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerDesc {
    /// Minification filter
    pub min_filter: Filter,
    /// Magnification filter
    pub mag_filter: Filter,
    /// Filter between mip levels
    pub mipmap_filter: Filter,
    /// Horizontal addressing
    pub wrap_u: Wrap,
    /// Vertical addressing
    pub wrap_v: Wrap,
    /// Depth addressing
    pub wrap_w: Wrap,
    /// Lowest mip level used
    pub min_lod: f32,
    /// Highest mip level used; `0.0` means unclamped
    pub max_lod: f32,
    /// Anisotropic filtering level; `0` means 1
    pub max_anisotropy: u32,
    /// Debug label
    pub label: Option<String>,
}

impl SamplerDesc {
    /// Empty descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Linear min/mag filtering
    #[must_use]
    pub fn linear() -> Self {
        Self::new().min_filter(Filter::Linear).mag_filter(Filter::Linear)
    }

    /// Nearest min/mag filtering
    #[must_use]
    pub fn nearest() -> Self {
        Self::new().min_filter(Filter::Nearest).mag_filter(Filter::Nearest)
    }

    /// Linear filtering, clamped to the edge in u and v
    #[must_use]
    pub fn linear_clamp() -> Self {
        Self::linear().wrap_u(Wrap::ClampToEdge).wrap_v(Wrap::ClampToEdge)
    }

    /// Set the minification filter
    #[must_use]
    pub fn min_filter(mut self, filter: Filter) -> Self {
        self.min_filter = filter;
        self
    }

    /// Set the magnification filter
    #[must_use]
    pub fn mag_filter(mut self, filter: Filter) -> Self {
        self.mag_filter = filter;
        self
    }

    /// Set the mip filter
    #[must_use]
    pub fn mipmap_filter(mut self, filter: Filter) -> Self {
        self.mipmap_filter = filter;
        self
    }

    /// Set horizontal addressing
    #[must_use]
    pub fn wrap_u(mut self, wrap: Wrap) -> Self {
        self.wrap_u = wrap;
        self
    }

    /// Set vertical addressing
    #[must_use]
    pub fn wrap_v(mut self, wrap: Wrap) -> Self {
        self.wrap_v = wrap;
        self
    }

    /// Set depth addressing
    #[must_use]
    pub fn wrap_w(mut self, wrap: Wrap) -> Self {
        self.wrap_w = wrap;
        self
    }

    /// Set the mip level range
    #[must_use]
    pub fn lod_range(mut self, min: f32, max: f32) -> Self {
        self.min_lod = min;
        self.max_lod = max;
        self
    }

    /// Set the anisotropic filtering level
    #[must_use]
    pub fn max_anisotropy(mut self, level: u32) -> Self {
        self.max_anisotropy = level;
        self
    }

    /// Set the debug label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.max_anisotropy < 1 {
            return Err(ValidationError::SamplerAnisotropy(self.max_anisotropy));
        }
        if self.min_lod > self.max_lod {
            return Err(ValidationError::SamplerLodRange {
                min: self.min_lod,
                max: self.max_lod,
            });
        }
        Ok(())
    }
}

impl Descriptor for SamplerDesc {
    type Handle = Sampler;

    fn with_defaults(&self) -> Self {
        let mut desc = self.clone();
        if desc.max_lod == 0.0 {
            desc.max_lod = f32::MAX;
        }
        if desc.max_anisotropy == 0 {
            desc.max_anisotropy = 1;
        }
        desc
    }
}
