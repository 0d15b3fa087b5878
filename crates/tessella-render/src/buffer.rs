//! Vertex and index buffer wrappers.
//!
//! A bucket's CPU-side arrays are materialized into these exactly once
//! when the tile becomes renderable. The wrappers pair the GPU handle with
//! the layout metadata the draw layer needs, and release the handle on
//! `destroy()` or drop.

use crate::VertexAttribute;
use std::borrow::Cow;
use tessella_test_utils::{GpuBuffer, RenderContext};

// wgpu rejects copies that are not 4-byte aligned; u16 index data can end
// on a 2-byte boundary, so both the buffer size and the written slice are
// padded up.
fn pad_to_copy_alignment(data: &[u8]) -> Cow<'_, [u8]> {
    let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
    if data.len() % align == 0 {
        Cow::Borrowed(data)
    } else {
        let mut padded = data.to_vec();
        padded.resize(data.len().div_ceil(align) * align, 0);
        Cow::Owned(padded)
    }
}

/// A GPU vertex buffer plus the attribute layout of its records.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: Option<GpuBuffer>,
    attributes: Vec<VertexAttribute>,
    byte_len: usize,
}

impl VertexBuffer {
    /// Create the buffer and write `data` into it once.
    pub fn new(
        ctx: &dyn RenderContext,
        data: &[u8],
        attributes: Vec<VertexAttribute>,
        label: Option<&str>,
    ) -> Self {
        let padded = pad_to_copy_alignment(data);
        let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: padded.len() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if !padded.is_empty() {
            ctx.write_buffer(&buffer, 0, &padded);
        }
        Self {
            buffer: Some(buffer),
            attributes,
            byte_len: data.len(),
        }
    }

    pub fn handle(&self) -> Option<&GpuBuffer> {
        self.buffer.as_ref()
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Release the GPU allocation. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.buffer = None;
    }
}

/// A GPU index buffer.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: Option<GpuBuffer>,
    byte_len: usize,
}

impl IndexBuffer {
    /// Create the buffer and write `data` into it once.
    pub fn new(ctx: &dyn RenderContext, data: &[u8], label: Option<&str>) -> Self {
        let padded = pad_to_copy_alignment(data);
        let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: padded.len() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if !padded.is_empty() {
            ctx.write_buffer(&buffer, 0, &padded);
        }
        Self {
            buffer: Some(buffer),
            byte_len: data.len(),
        }
    }

    pub fn handle(&self) -> Option<&GpuBuffer> {
        self.buffer.as_ref()
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Release the GPU allocation. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.buffer = None;
    }
}
