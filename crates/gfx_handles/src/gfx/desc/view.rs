//! View descriptors
//!
//! A view binds exactly one existing buffer or image. The referenced
//! resource must be valid when the view is created.

use crate::gfx::context::GfxState;
use crate::gfx::handle::{Buffer, Image, View};
use crate::gfx::resource::Descriptor;
use crate::gfx::state::ResourceKind;
use crate::gfx::validate::ValidationError;

use super::buffer::{BufferDesc, BufferUsage};
use super::image::ImageDesc;

/// Storage-buffer view parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferViewDesc {
    /// Viewed buffer
    pub buffer: Buffer,
    /// Byte offset into the buffer
    pub offset: usize,
}

/// Attachment view parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageViewDesc {
    /// Viewed image
    pub image: Image,
    /// Mip level rendered to
    pub mip_level: u32,
    /// Slice rendered to
    pub slice: u32,
}

/// Sampled texture view parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureViewDesc {
    /// Viewed image
    pub image: Image,
    /// First mip level visible through the view
    pub base_mip_level: u32,
}

/// The one resource a created view refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// Sampled texture
    Texture(TextureViewDesc),
    /// Shader storage buffer
    StorageBuffer(BufferViewDesc),
    /// Colour attachment
    ColorAttachment(ImageViewDesc),
    /// Depth-stencil attachment
    DepthStencilAttachment(ImageViewDesc),
}

/// Creation parameters for a [`View`]
///
/// Exactly one of the sub-descriptors must name a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewDesc {
    /// Sampled texture view
    pub texture: TextureViewDesc,
    /// Storage buffer view
    pub storage_buffer: BufferViewDesc,
    /// Colour attachment view
    pub color_attachment: ImageViewDesc,
    /// Depth-stencil attachment view
    pub depth_stencil_attachment: ImageViewDesc,
    /// Debug label
    pub label: Option<String>,
}

impl ViewDesc {
    /// Empty descriptor
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sampled view of `image`
    #[must_use]
    pub fn texture(image: Image) -> Self {
        Self {
            texture: TextureViewDesc { image, base_mip_level: 0 },
            ..Self::default()
        }
    }

    /// Storage view of `buffer` starting at `offset`
    #[must_use]
    pub fn storage_buffer(buffer: Buffer, offset: usize) -> Self {
        Self {
            storage_buffer: BufferViewDesc { buffer, offset },
            ..Self::default()
        }
    }

    /// Colour attachment view of mip 0, slice 0 of `image`
    #[must_use]
    pub fn color_attachment(image: Image) -> Self {
        Self {
            color_attachment: ImageViewDesc { image, ..ImageViewDesc::default() },
            ..Self::default()
        }
    }

    /// Depth-stencil attachment view of mip 0, slice 0 of `image`
    #[must_use]
    pub fn depth_stencil_attachment(image: Image) -> Self {
        Self {
            depth_stencil_attachment: ImageViewDesc { image, ..ImageViewDesc::default() },
            ..Self::default()
        }
    }

    /// Set the mip level of whichever image view is in use
    #[must_use]
    pub fn mip_level(mut self, level: u32) -> Self {
        self.texture.base_mip_level = level;
        self.color_attachment.mip_level = level;
        self.depth_stencil_attachment.mip_level = level;
        self
    }

    /// Set the slice of an attachment view
    #[must_use]
    pub fn slice(mut self, slice: u32) -> Self {
        self.color_attachment.slice = slice;
        self.depth_stencil_attachment.slice = slice;
        self
    }

    /// Set the debug label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The sub-descriptor in use, if exactly one names a resource
    ///
    /// # Errors
    /// [`ValidationError::ViewTargetCount`] when none or several are set.
    pub fn target(&self) -> Result<ViewTarget, ValidationError> {
        let mut targets = Vec::with_capacity(1);
        if !self.texture.image.is_invalid() {
            targets.push(ViewTarget::Texture(self.texture));
        }
        if !self.storage_buffer.buffer.is_invalid() {
            targets.push(ViewTarget::StorageBuffer(self.storage_buffer));
        }
        if !self.color_attachment.image.is_invalid() {
            targets.push(ViewTarget::ColorAttachment(self.color_attachment));
        }
        if !self.depth_stencil_attachment.image.is_invalid() {
            targets.push(ViewTarget::DepthStencilAttachment(self.depth_stencil_attachment));
        }

        match targets.as_slice() {
            [target] => Ok(*target),
            _ => Err(ValidationError::ViewTargetCount(targets.len())),
        }
    }

    pub(crate) fn validate(&self, state: &GfxState) -> Result<ViewTarget, ValidationError> {
        let target = self.target()?;
        match target {
            ViewTarget::Texture(texture) => {
                let image = valid_image(state, texture.image)?;
                check_mip_level(image, texture.base_mip_level)?;
            }
            ViewTarget::StorageBuffer(view) => {
                let buffer = valid_buffer(state, view.buffer)?;
                if !buffer.usage.contains(BufferUsage::STORAGE_BUFFER) {
                    return Err(ValidationError::ViewBufferNotStorage);
                }
                if view.offset >= buffer.size {
                    return Err(ValidationError::ViewBufferOffset {
                        offset: view.offset,
                        size: buffer.size,
                    });
                }
            }
            ViewTarget::ColorAttachment(view) => check_attachment(state, view, false)?,
            ViewTarget::DepthStencilAttachment(view) => check_attachment(state, view, true)?,
        }
        Ok(target)
    }
}

fn valid_buffer(state: &GfxState, buffer: Buffer) -> Result<&BufferDesc, ValidationError> {
    state
        .buffers
        .valid_desc(buffer)
        .map_err(|buffer_state| ValidationError::DependencyNotValid {
            kind: ResourceKind::Buffer,
            id: buffer.id(),
            state: buffer_state,
        })
}

fn valid_image(state: &GfxState, image: Image) -> Result<&ImageDesc, ValidationError> {
    state
        .images
        .valid_desc(image)
        .map_err(|image_state| ValidationError::DependencyNotValid {
            kind: ResourceKind::Image,
            id: image.id(),
            state: image_state,
        })
}

fn check_mip_level(image: &ImageDesc, level: u32) -> Result<(), ValidationError> {
    if level >= image.num_mipmaps {
        return Err(ValidationError::ViewMipLevel {
            level,
            mipmaps: image.num_mipmaps,
        });
    }
    Ok(())
}

fn check_attachment(state: &GfxState, view: ImageViewDesc, depth: bool) -> Result<(), ValidationError> {
    let image = valid_image(state, view.image)?;
    if !image.is_render_target() {
        return Err(ValidationError::ViewImageNotRenderTarget);
    }
    if let Some(format) = image.pixel_format {
        if format.is_depth() != depth {
            return Err(ValidationError::ViewAttachmentFormat {
                format,
                expected: if depth { "depth-stencil" } else { "color" },
            });
        }
    }
    check_mip_level(image, view.mip_level)?;
    if view.slice >= image.num_slices {
        return Err(ValidationError::ViewSlice {
            slice: view.slice,
            slices: image.num_slices,
        });
    }
    Ok(())
}

impl Descriptor for ViewDesc {
    type Handle = View;

    fn with_defaults(&self) -> Self {
        self.clone()
    }
}
