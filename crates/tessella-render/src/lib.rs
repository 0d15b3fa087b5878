//! Tessella Render - GPU buffer plumbing
//!
//! This crate provides the surface the bucket pipeline produces into:
//! - [`GraphicsContext`] - shared wgpu device/queue implementing
//!   [`RenderContext`]
//! - Vertex/index buffer wrappers with attribute layout descriptors
//! - The image-atlas position table pattern binders read from
//! - [`UniformStore`] - staging for per-draw uniform values
//!
//! The draw-call layer itself is out of scope; everything here stops at
//! GPU-resident buffers plus the metadata a draw call needs to bind them.

mod atlas;
mod attribute;
mod buffer;
mod context;
mod context_impl;
mod uniform;

pub use atlas::*;
pub use attribute::*;
pub use buffer::*;
pub use context::*;
pub use uniform::*;

pub use tessella_test_utils::{GpuBuffer, RenderContext};

// Re-export wgpu so downstream crates share one version.
pub use wgpu;
