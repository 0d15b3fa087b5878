//! GPU resource wrappers that can be real or mock.

use wgpu;

/// Wrapper around a GPU buffer that can be real or mock.
///
/// Hides whether it contains a real `wgpu::Buffer` or a mock handle.
/// Owned by the holder; cloning is cheap (the real buffer is reference
/// counted internally by wgpu). Dropping the last clone releases the GPU
/// allocation.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    /// Create from a real WGPU buffer.
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    /// Create a mock buffer (for testing).
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Get the underlying `wgpu::Buffer` (if real).
    ///
    /// # Panics
    /// Panics if this is a mock buffer; test code should never call this.
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer,
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Buffer from mock buffer - this is a test-only buffer")
            }
        }
    }

    /// Check if this is a mock (useful in tests).
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    /// Get the mock ID (for test assertions).
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Size in bytes of the mock allocation.
    #[cfg(feature = "mock")]
    pub fn mock_size(&self) -> Option<u64> {
        match &self.inner {
            GpuBufferInner::Mock { size, .. } => Some(*size),
            _ => None,
        }
    }
}
