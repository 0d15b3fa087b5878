//! Errors produced while building tile buffers.

/// Failure while tessellating one feature.
///
/// Both variants indicate malformed upstream geometry; the bucket build
/// aborts for the offending feature rather than emitting corrupt indices.
#[derive(Debug, thiserror::Error)]
pub enum TessellationError {
    #[error("triangulation produced {count} indices, not a multiple of 3")]
    IndexCount { count: usize },

    #[error("triangulation failed: {0}")]
    Triangulator(String),
}

/// Result type alias for tessellation operations.
pub type TessellationResult<T> = Result<T, TessellationError>;
