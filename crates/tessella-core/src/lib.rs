//! Tessella Core - style values, colors, and expression interfaces
//!
//! This crate provides:
//! - Tile feature data (geometry, properties)
//! - Style values and the opaque expression evaluation interface
//! - Color packing for per-vertex paint attributes
//! - Zoom interpolation helpers for composite styling

mod color;
mod expression;
mod feature;
pub mod logging;

pub use color::*;
pub use expression::*;
pub use feature::*;
