//! Test utilities for tessella.
//!
//! Provides the GPU abstraction the bucket pipeline uploads through:
//!
//! - [`RenderContext`] - trait abstracting GPU buffer operations
//! - `MockRenderContext` - recording mock implementation (requires the
//!   `mock` feature)
//! - [`GpuBuffer`] - opaque buffer handle that can be real or mock
//!
//! The trait takes `&self` and returns owned wrapper types, so it is
//! object-safe and no lifetime parameters propagate through the codebase.
//! Mock implementations use interior mutability to record calls, which is
//! how tests assert lifecycle properties such as "upload creates exactly
//! one buffer".

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
