//! Image atlas position table.
//!
//! Atlas packing happens in a separate pass that must complete before
//! pattern binders populate their paint arrays; this module only defines
//! the lookup table that pass produces.

use serde::{Deserialize, Serialize};

/// Placement of one image within the icon atlas texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    /// Top-left corner in atlas texture coordinates.
    pub tl: [f32; 2],
    /// Bottom-right corner in atlas texture coordinates.
    pub br: [f32; 2],
    pub pixel_ratio: f32,
}

impl ImagePosition {
    pub fn new(tl: [f32; 2], br: [f32; 2], pixel_ratio: f32) -> Self {
        Self {
            tl,
            br,
            pixel_ratio,
        }
    }

    /// The rectangle as `[tl.x, tl.y, br.x, br.y]`, the shape pattern
    /// uniforms and paint attributes use.
    pub fn to_vec4(self) -> [f32; 4] {
        [self.tl[0], self.tl[1], self.br[0], self.br[1]]
    }
}

/// Image name to atlas placement, populated externally before pattern
/// binders are asked to populate.
pub type ImagePositions = ahash::HashMap<String, ImagePosition>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_vec4() {
        let pos = ImagePosition::new([1.0, 2.0], [17.0, 18.0], 1.0);
        assert_eq!(pos.to_vec4(), [1.0, 2.0, 17.0, 18.0]);
    }
}
