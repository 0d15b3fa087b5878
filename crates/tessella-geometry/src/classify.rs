//! Ring classification for polygon features.
//!
//! Tile polygon geometry arrives as a flat list of rings. Winding order
//! tells outer boundaries from holes: under the tile coordinate
//! convention, outer rings have positive signed area and holes negative.

use glam::Vec2;

/// A polygon ring: an implicitly closed sequence of points.
pub type Ring = Vec<Vec2>;

/// Ring-count limit for a single triangulation call, documented by the
/// ear-clipping triangulator.
pub const EARCUT_MAX_RINGS: usize = 500;

/// Shoelace signed area of a ring.
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % ring.len()];
        sum += (p2.x - p1.x) * (p1.y + p2.y);
    }
    sum / 2.0
}

/// Group flat rings into polygons.
///
/// Each returned polygon is an outer ring followed by its holes. A ring
/// with positive area opens a new polygon; negative or zero area rings
/// are holes of the most recently opened polygon. Empty rings are
/// dropped. A polygon that reaches `max_rings` rings is emitted early so
/// no single triangulation call ever sees more than `max_rings` rings,
/// trading some nesting correctness for input-size safety.
pub fn classify_rings(geometry: &[Ring], max_rings: usize) -> Vec<Vec<&Ring>> {
    let mut polygons: Vec<Vec<&Ring>> = Vec::new();
    let mut polygon: Vec<&Ring> = Vec::new();

    for ring in geometry {
        if ring.is_empty() {
            continue;
        }

        let is_outer = signed_area(ring) > 0.0;
        // A leading hole still opens a group, so no ring is lost to
        // malformed input.
        if is_outer && !polygon.is_empty() {
            polygons.push(std::mem::take(&mut polygon));
        }
        polygon.push(ring);

        if max_rings > 0 && polygon.len() >= max_rings {
            polygons.push(std::mem::take(&mut polygon));
        }
    }

    if !polygon.is_empty() {
        polygons.push(polygon);
    }
    polygons
}
