//! Draw-call segment batching.
//!
//! Indexed draw calls address vertices with 16-bit indices, so a bucket's
//! vertex stream is split into segments that each stay below that ceiling.
//! Index values stored for a segment are relative to its `vertex_offset`.

use serde::{Deserialize, Serialize};

/// Maximum number of vertices addressable within one segment.
pub const MAX_VERTEX_ARRAY_LENGTH: usize = 1 << 16;

/// One contiguous sub-range of a vertex/index array pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub vertex_offset: usize,
    pub vertex_length: usize,
    pub primitive_offset: usize,
    pub primitive_length: usize,
}

/// Splits a growing vertex stream into draw-call sized segments.
///
/// Mutated only by appending a new segment or growing the current (last)
/// one; earlier segments are immutable once a new one opens.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SegmentVector {
    segments: Vec<Segment>,
}

impl SegmentVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a segment that can accept `num_vertices` more vertices.
    ///
    /// Reuses the current segment when it has room, otherwise opens a new
    /// one starting at the current array lengths. This only reserves
    /// addressing space: the caller writes the data, expresses indices
    /// relative to the returned segment's `vertex_offset`, and grows
    /// `vertex_length`/`primitive_length` by what it actually wrote.
    pub fn prepare_segment(
        &mut self,
        num_vertices: usize,
        vertex_array_len: usize,
        index_array_len: usize,
    ) -> &mut Segment {
        if num_vertices > MAX_VERTEX_ARRAY_LENGTH {
            tracing::warn!(
                num_vertices,
                "single feature exceeds the segment vertex ceiling; its indices will wrap"
            );
        }

        let needs_new = match self.segments.last() {
            Some(segment) => segment.vertex_length + num_vertices > MAX_VERTEX_ARRAY_LENGTH,
            None => true,
        };
        if needs_new {
            self.segments.push(Segment {
                vertex_offset: vertex_array_len,
                vertex_length: 0,
                primitive_offset: index_array_len,
                primitive_length: 0,
            });
        }

        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// The segment most recently returned by [`prepare_segment`].
    ///
    /// [`prepare_segment`]: SegmentVector::prepare_segment
    pub fn current_mut(&mut self) -> Option<&mut Segment> {
        self.segments.last_mut()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total vertices across all segments.
    pub fn total_vertices(&self) -> usize {
        self.segments.iter().map(|s| s.vertex_length).sum()
    }
}
