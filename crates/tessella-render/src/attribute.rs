//! Vertex attribute layout descriptors.
//!
//! Buffers cross the boundary to the draw-call layer together with one of
//! these descriptors per attribute, so shader variant selection and vertex
//! state setup happen without inspecting the buffer contents.

use serde::{Deserialize, Serialize};

/// Scalar type of one vertex attribute component.
///
/// Paint data is float-only in this pipeline; the enum keeps the
/// descriptor contract explicit for the draw layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    Float32,
}

impl ComponentType {
    pub fn byte_size(self) -> usize {
        match self {
            ComponentType::Float32 => 4,
        }
    }
}

/// Layout of one attribute within a vertex buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// Shader-side attribute name, e.g. `a_color`.
    pub name: String,
    pub component_type: ComponentType,
    pub components: u8,
    /// Byte offset within one vertex record.
    pub offset: u8,
}

impl VertexAttribute {
    /// A float attribute at offset zero.
    pub fn float32(name: impl Into<String>, components: u8) -> Self {
        Self {
            name: name.into(),
            component_type: ComponentType::Float32,
            components,
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u8) -> Self {
        self.offset = offset;
        self
    }

    /// Byte size of this attribute within a vertex record.
    pub fn byte_size(&self) -> usize {
        self.component_type.byte_size() * self.components as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size() {
        let attr = VertexAttribute::float32("a_color", 2);
        assert_eq!(attr.byte_size(), 8);
        assert_eq!(attr.offset, 0);
    }

    #[test]
    fn test_with_offset() {
        let attr = VertexAttribute::float32("a_pattern_mid", 4).with_offset(16);
        assert_eq!(attr.offset, 16);
    }
}
