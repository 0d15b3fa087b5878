use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// Colors are stored in linear RGBA order and can be constructed from floats
/// or `u8` values:
///
/// ```
/// use tessella_core::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let semi_transparent = Color::rgba(1.0, 1.0, 1.0, 0.5);
/// let from_bytes = Color::from_rgba_u8(128, 64, 32, 255);
/// ```
///
/// The struct is `#[repr(C)]` and implements `bytemuck::Pod`, so it can be
/// used directly in GPU uniform/vertex buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity (alpha = 1.0).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Convert to an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Pack two 0–255 channel values into a single float.
///
/// The packed value is `256 * a + b` after flooring and clamping both
/// inputs, which is exactly representable in an `f32`, so the shader can
/// recover both channels with a division and a modulo.
pub fn pack_uint8_pair(a: f32, b: f32) -> f32 {
    let a = a.floor().clamp(0.0, 255.0);
    let b = b.floor().clamp(0.0, 255.0);
    256.0 * a + b
}

/// Inverse of [`pack_uint8_pair`]. Mirrors the shader-side decode and is
/// used to validate the quantization error of the packing.
pub fn unpack_uint8_pair(packed: f32) -> (f32, f32) {
    let a = (packed / 256.0).floor();
    (a, packed - 256.0 * a)
}

/// Pack a color into two floats, two 8-bit channels per float, halving the
/// attribute bandwidth compared to four raw floats.
pub fn pack_color(color: Color) -> [f32; 2] {
    [
        pack_uint8_pair(255.0 * color.r, 255.0 * color.g),
        pack_uint8_pair(255.0 * color.b, 255.0 * color.a),
    ]
}
