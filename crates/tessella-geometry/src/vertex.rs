//! Vertex and index arrays for fill buckets.
//!
//! These are the CPU-side, append-only arrays a bucket accumulates while
//! features stream in; `upload()` materializes them into GPU buffers once.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use tessella_render::VertexAttribute;

/// Layout vertex for fill geometry: tile-local position only.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct FillLayoutVertex {
    pub position: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<FillLayoutVertex>(), 8);

impl FillLayoutVertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    /// Attribute layout descriptor for the draw layer.
    pub fn layout_attributes() -> Vec<VertexAttribute> {
        vec![VertexAttribute::float32("a_pos", 2)]
    }
}

/// Append-only array of fill layout vertices.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FillLayoutVertexArray {
    data: Vec<FillLayoutVertex>,
}

impl FillLayoutVertexArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vertex: FillLayoutVertex) {
        self.data.push(vertex);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[FillLayoutVertex] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Triangle index tuples. Values are relative to the owning segment's
/// `vertex_offset`, which is what keeps them within 16 bits.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TriangleIndexArray {
    data: Vec<[u16; 3]>,
}

impl TriangleIndexArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, a: u16, b: u16, c: u16) {
        self.data.push([a, b, c]);
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[[u16; 3]] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Line segment index pairs, segment-relative like [`TriangleIndexArray`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LineIndexArray {
    data: Vec<[u16; 2]>,
}

impl LineIndexArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, a: u16, b: u16) {
        self.data.push([a, b]);
    }

    /// Number of line segments.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[[u16; 2]] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Growable paint attribute array with a fixed number of `f32` components
/// per vertex record.
///
/// One of these backs each non-constant binder; records are replicated
/// per vertex so the array stays index-aligned with the geometry vertex
/// array of the same bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintVertexArray {
    components: usize,
    data: Vec<f32>,
}

impl PaintVertexArray {
    pub fn new(components: usize) -> Self {
        Self {
            components,
            data: Vec::new(),
        }
    }

    pub fn components(&self) -> usize {
        self.components
    }

    /// Number of vertex records currently stored.
    pub fn len(&self) -> usize {
        self.data.len() / self.components
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `count` copies of one vertex record.
    pub fn push_repeated(&mut self, record: &[f32], count: usize) {
        debug_assert_eq!(record.len(), self.components);
        self.data.reserve(count * self.components);
        for _ in 0..count {
            self.data.extend_from_slice(record);
        }
    }

    /// Append `count` zeroed vertex records.
    pub fn push_zeroed(&mut self, count: usize) {
        self.data.resize(self.data.len() + count * self.components, 0.0);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
