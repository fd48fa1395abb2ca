//! Pooled graphics resource API
//!
//! A headless model of a handle-based graphics library: resources live in
//! fixed-size pools inside a [`Gfx`] context and are addressed by small
//! `Copy` handles. The context never hands out references into its pools.
//!
//! - [`Buffer`], [`Image`], ...: raw handle newtypes, id `0` is the sentinel
//! - [`Resource`] / [`Descriptor`]: the per-kind trait table
//! - [`Gfx`]: create, destroy and query operations
//! - [`ResourceState`]: what a query reports for a handle

mod backend;
mod context;
pub mod desc;
mod handle;
mod pool;
mod resource;
mod state;
mod validate;

pub use context::{Gfx, PoolStats, MAX_POOL_SIZE};
pub use desc::*;
pub use handle::{Buffer, Image, Pipeline, Sampler, Shader, View};
pub use resource::{Descriptor, Resource};
pub use state::{ResourceKind, ResourceState};
pub use validate::ValidationError;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while setting up a context
///
/// Resource operations themselves never fail with an error; see
/// [`Gfx::query_state`].
#[derive(Debug, Error)]
pub enum GfxError {
    /// A pool capacity is outside `1..=MAX_POOL_SIZE`
    #[error("invalid {kind} pool size {size} (expected 1..=65535)")]
    InvalidPoolSize {
        /// Pool that was misconfigured
        kind: ResourceKind,
        /// Requested capacity
        size: usize,
    },

    /// Loading the context configuration failed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
