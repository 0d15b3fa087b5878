//! Tessella Geometry - tile tessellation and data-driven paint binding
//!
//! This crate turns decoded vector-tile polygon features into GPU-ready
//! triangle and outline buffers, and packs per-feature paint attribute
//! data alongside them:
//!
//! - Ring classification (outer boundaries vs. holes)
//! - Segment batching under the 16-bit index ceiling
//! - Fill bucket tessellation via an external ear-clipping triangulator
//! - Paint binders: per style property, decide uniform vs. per-vertex
//!   buffer and own the packing
//! - Program configurations: the active binder set per style layer plus
//!   the cache key that selects a compatible shader variant
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tessella_core::{Feature, GeometryType};
//! use tessella_geometry::{FillBucket, StyleLayer};
//!
//! let layer = StyleLayer::new("water");
//! let mut bucket = FillBucket::new(std::slice::from_ref(&layer), 5.0);
//!
//! let triangle = Feature::new(
//!     GeometryType::Polygon,
//!     vec![vec![
//!         Vec2::new(0.0, 0.0),
//!         Vec2::new(0.0, 10.0),
//!         Vec2::new(10.0, 10.0),
//!     ]],
//! );
//! bucket.populate(std::slice::from_ref(&layer), &[triangle]);
//! bucket.add_features(Default::default()).unwrap();
//! assert!(!bucket.is_empty());
//! ```

mod binder;
mod bucket;
mod classify;
mod error;
mod layer;
mod program;
mod segment;
mod vertex;

pub use binder::*;
pub use bucket::*;
pub use classify::*;
pub use error::*;
pub use layer::*;
pub use program::*;
pub use segment::*;
pub use vertex::*;
