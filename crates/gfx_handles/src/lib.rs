//! # GFX Handles
//!
//! Owning handles for a pooled graphics resource API.
//!
//! ## Features
//!
//! - **Pooled Resources**: Buffers, images, samplers, shaders, pipelines and views
//!   live in fixed-size pools and are addressed by small `Copy` handles
//! - **Two-Phase Lifecycle**: `alloc`/`init`/`uninit`/`dealloc`/`fail` next to
//!   one-shot `make`/`destroy`
//! - **RAII Ownership**: [`Owned<R>`] destroys its resource exactly once
//! - **Headless Backend**: Descriptor validation without a GPU, for tools and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use gfx_handles::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gfx = Gfx::new(&GfxConfig::default())?;
//!
//!     {
//!         let vertices = Owned::<Buffer>::make(&gfx, &BufferDesc::vertex_with_data(&[0u8; 256]));
//!         assert!(vertices.is_valid());
//!         assert_eq!(gfx.stats(ResourceKind::Buffer).live, 1);
//!     }
//!
//!     // Dropping the owner destroyed the buffer
//!     assert_eq!(gfx.stats(ResourceKind::Buffer).live, 0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod foundation;
pub mod gfx;

mod owned;

pub use config::{Config, ConfigError, GfxConfig};
pub use gfx::{Gfx, GfxError};
pub use owned::Owned;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, GfxConfig},
        gfx::{
            Buffer, BufferDesc, BufferUsage, Descriptor, Gfx, GfxError, Image, ImageDesc,
            ImageUsage, PixelFormat, Pipeline, PipelineDesc, PoolStats, Resource, ResourceKind,
            ResourceState, Sampler, SamplerDesc, Shader, ShaderDesc, View, ViewDesc,
        },
        Owned,
    };
}
