//! Image descriptors

use bitflags::bitflags;

use crate::gfx::handle::Image;
use crate::gfx::resource::Descriptor;
use crate::gfx::validate::ValidationError;

/// Dimensionality of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    /// Single 2D surface
    #[default]
    TwoD,
    /// Six 2D faces
    Cube,
    /// Volume texture
    ThreeD,
    /// Layered 2D texture
    Array,
}

/// Texel layout of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit single channel
    R8,
    /// 8-bit two channel
    Rg8,
    /// 8-bit RGBA
    Rgba8,
    /// 8-bit BGRA
    Bgra8,
    /// 16-bit float RGBA
    Rgba16F,
    /// 32-bit float RGBA
    Rgba32F,
    /// 32-bit depth
    Depth,
    /// 24-bit depth + 8-bit stencil
    DepthStencil,
}

impl PixelFormat {
    /// Bytes used by one texel
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R8 => 1,
            Self::Rg8 => 2,
            Self::Rgba8 | Self::Bgra8 | Self::Depth | Self::DepthStencil => 4,
            Self::Rgba16F => 8,
            Self::Rgba32F => 16,
        }
    }

    /// Whether this is a depth or depth-stencil format
    #[must_use]
    pub const fn is_depth(self) -> bool {
        matches!(self, Self::Depth | Self::DepthStencil)
    }
}

bitflags! {
    /// Update behaviour and attachment use of an image
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        /// Contents fixed at creation
        const IMMUTABLE = 1 << 0;
        /// Updated occasionally
        const DYNAMIC_UPDATE = 1 << 1;
        /// Updated every frame
        const STREAM_UPDATE = 1 << 2;
        /// Usable as a colour or depth-stencil attachment
        const RENDER_TARGET = 1 << 3;
    }
}

impl ImageUsage {
    /// Bits that say how the image is updated
    pub const UPDATE_MODES: Self = Self::IMMUTABLE
        .union(Self::DYNAMIC_UPDATE)
        .union(Self::STREAM_UPDATE);
}

impl Default for ImageUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Creation parameters for an [`Image`]
///
/// Zero counts and an unset pixel format are replaced by defaults before
/// validation, see [`Descriptor::with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDesc {
    /// Dimensionality
    pub image_type: ImageType,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Depth or layer count; cube images always use 6
    pub num_slices: u32,
    /// Mip chain length
    pub num_mipmaps: u32,
    /// Texel format
    pub pixel_format: Option<PixelFormat>,
    /// MSAA sample count
    pub sample_count: u32,
    /// Update and attachment flags
    pub usage: ImageUsage,
    /// Initial contents of every mip level, tightly packed
    pub data: Option<Vec<u8>>,
    /// Debug label
    pub label: Option<String>,
}

impl ImageDesc {
    /// Empty descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable 2D texture; the caller still supplies `data`
    #[must_use]
    pub fn texture_2d(width: u32, height: u32, format: PixelFormat) -> Self {
        Self::new()
            .image_type(ImageType::TwoD)
            .width(width)
            .height(height)
            .pixel_format(format)
    }

    /// 2D colour render target
    #[must_use]
    pub fn render_target(width: u32, height: u32, format: PixelFormat, samples: u32) -> Self {
        Self::texture_2d(width, height, format)
            .sample_count(samples)
            .render_target_usage(true)
    }

    /// 2D depth-stencil render target
    #[must_use]
    pub fn depth_stencil(width: u32, height: u32, format: PixelFormat, samples: u32) -> Self {
        Self::render_target(width, height, format, samples)
    }

    /// Set the dimensionality
    #[must_use]
    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    /// Set the width in texels
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the height in texels
    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the depth or layer count
    #[must_use]
    pub fn num_slices(mut self, num_slices: u32) -> Self {
        self.num_slices = num_slices;
        self
    }

    /// Set the mip chain length
    #[must_use]
    pub fn num_mipmaps(mut self, num_mipmaps: u32) -> Self {
        self.num_mipmaps = num_mipmaps;
        self
    }

    /// Set the texel format
    #[must_use]
    pub fn pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = Some(format);
        self
    }

    /// Set the MSAA sample count
    #[must_use]
    pub fn sample_count(mut self, samples: u32) -> Self {
        self.sample_count = samples;
        self
    }

    /// Toggle [`ImageUsage::RENDER_TARGET`]
    #[must_use]
    pub fn render_target_usage(mut self, enabled: bool) -> Self {
        self.usage.set(ImageUsage::RENDER_TARGET, enabled);
        self
    }

    /// Toggle [`ImageUsage::IMMUTABLE`]
    #[must_use]
    pub fn immutable(mut self, enabled: bool) -> Self {
        self.usage.set(ImageUsage::IMMUTABLE, enabled);
        self
    }

    /// Toggle [`ImageUsage::DYNAMIC_UPDATE`]
    #[must_use]
    pub fn dynamic_update(mut self, enabled: bool) -> Self {
        self.usage.set(ImageUsage::DYNAMIC_UPDATE, enabled);
        self
    }

    /// Toggle [`ImageUsage::STREAM_UPDATE`]
    #[must_use]
    pub fn stream_update(mut self, enabled: bool) -> Self {
        self.usage.set(ImageUsage::STREAM_UPDATE, enabled);
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

    /// Whether the image can back an attachment view
    #[must_use]
    pub fn is_render_target(&self) -> bool {
        self.usage.contains(ImageUsage::RENDER_TARGET)
    }

    /// Bytes needed for the full mip chain of every slice
    #[must_use]
    pub fn byte_len(&self) -> usize {
        let bpp = self.pixel_format.unwrap_or(PixelFormat::Rgba8).bytes_per_pixel();
        let slices = self.num_slices.max(1) as usize;
        let levels = self.num_mipmaps.max(1);
        let level_len = |level: u32| {
            let w = self.width.checked_shr(level).unwrap_or(0).max(1) as usize;
            let h = self.height.checked_shr(level).unwrap_or(0).max(1) as usize;
            w.saturating_mul(h).saturating_mul(slices).saturating_mul(bpp)
        };

        // Every level past u32::BITS is 1x1
        let shifted = levels.min(u32::BITS);
        let tail = (levels - shifted) as usize;
        (0..shifted)
            .map(level_len)
            .fold(0usize, usize::saturating_add)
            .saturating_add(tail.saturating_mul(level_len(u32::BITS)))
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 || self.num_slices == 0 {
            return Err(ValidationError::ImageExtentZero {
                width: self.width,
                height: self.height,
                slices: self.num_slices,
            });
        }
        if self.image_type == ImageType::Cube && self.num_slices != 6 {
            return Err(ValidationError::CubeImageSlices(self.num_slices));
        }
        let max_mipmaps = u32::BITS - self.width.max(self.height).leading_zeros();
        if self.num_mipmaps == 0 || self.num_mipmaps > max_mipmaps {
            return Err(ValidationError::ImageMipmapCount {
                width: self.width,
                height: self.height,
                requested: self.num_mipmaps,
                max: max_mipmaps,
            });
        }
        if (self.usage & ImageUsage::UPDATE_MODES).bits().count_ones() != 1 {
            return Err(ValidationError::ImageUpdateMode);
        }

        let format = self.pixel_format.unwrap_or(PixelFormat::Rgba8);
        let immutable = self.usage.contains(ImageUsage::IMMUTABLE);
        if self.is_render_target() {
            if !immutable || self.data.is_some() {
                return Err(ValidationError::RenderTargetUsage);
            }
            return Ok(());
        }
        if self.sample_count > 1 {
            return Err(ValidationError::MultisampleWithoutRenderTarget);
        }
        if format.is_depth() {
            return Err(ValidationError::DepthFormatWithoutRenderTarget(format));
        }

        match (&self.data, immutable) {
            (Some(_), false) => Err(ValidationError::MutableWithData),
            (None, true) => Err(ValidationError::ImageDataSize {
                expected: self.byte_len(),
                found: 0,
            }),
            (Some(data), true) if data.len() != self.byte_len() => Err(ValidationError::ImageDataSize {
                expected: self.byte_len(),
                found: data.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl Descriptor for ImageDesc {
    type Handle = Image;

    fn with_defaults(&self) -> Self {
        let mut desc = self.clone();
        if desc.image_type == ImageType::Cube && desc.num_slices == 0 {
            desc.num_slices = 6;
        }
        if desc.num_slices == 0 {
            desc.num_slices = 1;
        }
        if desc.num_mipmaps == 0 {
            desc.num_mipmaps = 1;
        }
        if desc.sample_count == 0 {
            desc.sample_count = 1;
        }
        if desc.pixel_format.is_none() {
            desc.pixel_format = Some(PixelFormat::Rgba8);
        }
        if !desc.usage.intersects(ImageUsage::UPDATE_MODES) {
            desc.usage |= ImageUsage::IMMUTABLE;
        }
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_needs_exact_data() {
        let desc = ImageDesc::texture_2d(4, 4, PixelFormat::Rgba8).with_defaults();
        assert_eq!(
            desc.validate(),
            Err(ValidationError::ImageDataSize { expected: 64, found: 0 })
        );
        assert!(desc.clone().data(vec![0; 64]).validate().is_ok());
        assert!(desc.data(vec![0; 63]).validate().is_err());
    }

    #[test]
    fn test_byte_len_covers_mip_chain() {
        let desc = ImageDesc::texture_2d(4, 2, PixelFormat::R8).num_mipmaps(3);
        // 4x2 + 2x1 + 1x1
        assert_eq!(desc.byte_len(), 11);
    }

    #[test]
    fn test_byte_len_with_oversized_mip_count() {
        let desc = ImageDesc::texture_2d(4, 4, PixelFormat::Rgba8).num_mipmaps(40);
        // 4x4 + 2x2 + 38 levels of 1x1
        assert_eq!(desc.byte_len(), (16 + 4 + 38) * 4);
        assert!(desc.with_defaults().validate().is_err());

        let huge = ImageDesc::texture_2d(1, 1, PixelFormat::R8).num_mipmaps(u32::MAX);
        assert_eq!(huge.byte_len(), u32::MAX as usize);
    }

    #[test]
    fn test_render_target_defaults() {
        let desc = ImageDesc::render_target(320, 240, PixelFormat::Rgba8, 4).with_defaults();
        assert_eq!(desc.num_slices, 1);
        assert_eq!(desc.num_mipmaps, 1);
        assert!(desc.usage.contains(ImageUsage::IMMUTABLE | ImageUsage::RENDER_TARGET));
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_depth_stencil_requires_render_target() {
        let depth = ImageDesc::depth_stencil(64, 64, PixelFormat::DepthStencil, 1).with_defaults();
        assert!(depth.validate().is_ok());

        let sampled = ImageDesc::texture_2d(64, 64, PixelFormat::Depth).with_defaults();
        assert_eq!(
            sampled.validate(),
            Err(ValidationError::DepthFormatWithoutRenderTarget(PixelFormat::Depth))
        );
    }

    #[test]
    fn test_multisample_without_render_target() {
        let desc = ImageDesc::texture_2d(8, 8, PixelFormat::Rgba8)
            .sample_count(4)
            .data(vec![0; 256])
            .with_defaults();
        assert_eq!(desc.validate(), Err(ValidationError::MultisampleWithoutRenderTarget));
    }

    #[test]
    fn test_cube_defaults_to_six_slices() {
        let desc = ImageDesc::new().image_type(ImageType::Cube).width(2).height(2).with_defaults();
        assert_eq!(desc.num_slices, 6);

        let bad = ImageDesc::new()
            .image_type(ImageType::Cube)
            .width(2)
            .height(2)
            .num_slices(4)
            .with_defaults();
        assert_eq!(bad.validate(), Err(ValidationError::CubeImageSlices(4)));
    }

    #[test]
    fn test_mipmap_upper_bound() {
        let desc = ImageDesc::render_target(8, 8, PixelFormat::Rgba8, 1)
            .num_mipmaps(5)
            .with_defaults();
        assert!(matches!(
            desc.validate(),
            Err(ValidationError::ImageMipmapCount { max: 4, .. })
        ));
    }

    #[test]
    fn test_dynamic_image_rejects_data() {
        let desc = ImageDesc::texture_2d(2, 2, PixelFormat::Rgba8)
            .dynamic_update(true)
            .data(vec![0; 16])
            .with_defaults();
        assert_eq!(desc.validate(), Err(ValidationError::MutableWithData));
    }
}
