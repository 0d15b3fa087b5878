//! Trait abstracting GPU buffer operations.
//!
//! The bucket pipeline creates and fills buffers exclusively through this
//! trait, so tests can substitute a `MockRenderContext` that records calls
//! instead of touching a real device.

use crate::gpu_types::GpuBuffer;
use wgpu::BufferDescriptor;

/// Abstraction over GPU buffer creation and writes.
///
/// Methods take `&self` and return owned wrapper types:
/// - multiple components can share the same context (via `Arc`)
/// - mock implementations use interior mutability to record calls
/// - the trait stays object-safe (`dyn RenderContext`)
pub trait RenderContext: Send + Sync {
    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data into a buffer.
    ///
    /// For real buffers this maps to `queue.write_buffer()`; for mock
    /// buffers it records the operation for test verification.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);
}
