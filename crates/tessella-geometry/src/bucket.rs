//! Fill bucket: tessellated polygon geometry plus paint attribute data
//! for one tile's worth of features.
//!
//! A bucket is built on a tile worker in two phases. `populate` filters
//! the raw features and reports which pattern images the tile needs;
//! once the atlas has those images, `add_features` tessellates the held
//! features and packs their paint attributes. `upload` then moves the
//! finished arrays to the GPU exactly once.

use serde::{Deserialize, Serialize};
use tessella_core::{EvaluationContext, Feature, GeometryType};
use tessella_render::{ImagePositions, IndexBuffer, RenderContext, VertexBuffer};
use tracing::debug;

use crate::classify::{classify_rings, EARCUT_MAX_RINGS};
use crate::error::{TessellationError, TessellationResult};
use crate::layer::StyleLayer;
use crate::program::ProgramConfigurationSet;
use crate::segment::SegmentVector;
use crate::vertex::{
    FillLayoutVertex, FillLayoutVertexArray, LineIndexArray, TriangleIndexArray,
};

/// Names of the atlas images a tile's features reference.
pub type IconDependencies = ahash::HashSet<String>;

/// Tessellated fill geometry for one tile and the layers that share it.
#[derive(Debug, Serialize, Deserialize)]
pub struct FillBucket {
    pub zoom: f64,
    pub layer_ids: Vec<String>,
    layout_vertex_array: FillLayoutVertexArray,
    triangle_index_array: TriangleIndexArray,
    line_index_array: LineIndexArray,
    triangle_segments: SegmentVector,
    line_segments: SegmentVector,
    program_configurations: ProgramConfigurationSet,
    pending_features: Vec<Feature>,
    image_positions: ImagePositions,
    #[serde(skip)]
    layout_vertex_buffer: Option<VertexBuffer>,
    #[serde(skip)]
    triangle_index_buffer: Option<IndexBuffer>,
    #[serde(skip)]
    line_index_buffer: Option<IndexBuffer>,
}

impl FillBucket {
    pub fn new(layers: &[StyleLayer], zoom: f64) -> Self {
        Self {
            zoom,
            layer_ids: layers.iter().map(|l| l.id.clone()).collect(),
            layout_vertex_array: FillLayoutVertexArray::new(),
            triangle_index_array: TriangleIndexArray::new(),
            line_index_array: LineIndexArray::new(),
            triangle_segments: SegmentVector::new(),
            line_segments: SegmentVector::new(),
            program_configurations: ProgramConfigurationSet::new(layers, zoom, |_| true),
            pending_features: Vec::new(),
            image_positions: ImagePositions::default(),
            layout_vertex_buffer: None,
            triangle_index_buffer: None,
            line_index_buffer: None,
        }
    }

    /// Filter `features` through the first layer and hold the survivors
    /// for [`add_features`]. Returns the atlas images the held features
    /// will need, so the caller can fetch them before tessellating.
    ///
    /// [`add_features`]: FillBucket::add_features
    pub fn populate(&mut self, layers: &[StyleLayer], features: &[Feature]) -> IconDependencies {
        let ctx = EvaluationContext::at_zoom(self.zoom);
        for feature in features {
            if feature.geometry_type != GeometryType::Polygon {
                continue;
            }
            let accepted = match layers.first() {
                Some(layer) => layer.filter_feature(&ctx, feature),
                None => true,
            };
            if accepted {
                self.pending_features.push(feature.clone());
            }
        }

        let mut dependencies = IconDependencies::default();
        for layer in layers {
            for (_, property) in layer.paint_properties() {
                if !property.is_pattern {
                    continue;
                }
                if property.is_data_driven() {
                    for feature in &self.pending_features {
                        for zoom in [self.zoom - 1.0, self.zoom, self.zoom + 1.0] {
                            let value = property
                                .expression
                                .evaluate(&EvaluationContext::at_zoom(zoom), feature);
                            if let Some(refs) = value.as_image() {
                                dependencies.insert(refs.mid.clone());
                            }
                        }
                    }
                } else {
                    let value = property.expression.evaluate(&ctx, &Feature::empty());
                    if let Some(refs) = value.as_image() {
                        dependencies.insert(refs.min.clone());
                        dependencies.insert(refs.mid.clone());
                        dependencies.insert(refs.max.clone());
                    }
                }
            }
        }
        dependencies
    }

    /// Tessellate the features held by [`populate`], resolving pattern
    /// images against `image_positions`.
    ///
    /// [`populate`]: FillBucket::populate
    pub fn add_features(&mut self, image_positions: ImagePositions) -> TessellationResult<()> {
        self.image_positions = image_positions;
        let features = std::mem::take(&mut self.pending_features);
        for feature in &features {
            self.add_feature(feature)?;
        }
        debug!(
            vertices = self.layout_vertex_array.len(),
            triangles = self.triangle_index_array.len(),
            segments = self.triangle_segments.len(),
            "tessellated fill features"
        );
        Ok(())
    }

    fn add_feature(&mut self, feature: &Feature) -> TessellationResult<()> {
        let polygons = classify_rings(&feature.geometry, EARCUT_MAX_RINGS);
        for polygon in polygons {
            let num_vertices: usize = polygon.iter().map(|ring| ring.len()).sum();
            if num_vertices == 0 {
                continue;
            }

            let triangle_base = self
                .triangle_segments
                .prepare_segment(
                    num_vertices,
                    self.layout_vertex_array.len(),
                    self.triangle_index_array.len(),
                )
                .vertex_length;

            let mut flattened: Vec<f64> = Vec::with_capacity(num_vertices * 2);
            let mut hole_indices: Vec<usize> = Vec::new();

            for ring in polygon {
                // Every ring after the first is a hole in this polygon.
                if !flattened.is_empty() {
                    hole_indices.push(flattened.len() / 2);
                }

                let line_base = self
                    .line_segments
                    .prepare_segment(
                        ring.len(),
                        self.layout_vertex_array.len(),
                        self.line_index_array.len(),
                    )
                    .vertex_length;

                // Close the ring first, then connect consecutive points.
                self.line_index_array
                    .push((line_base + ring.len() - 1) as u16, line_base as u16);
                self.layout_vertex_array
                    .push(FillLayoutVertex::new(ring[0].x, ring[0].y));
                flattened.push(ring[0].x as f64);
                flattened.push(ring[0].y as f64);

                for i in 1..ring.len() {
                    self.line_index_array
                        .push((line_base + i - 1) as u16, (line_base + i) as u16);
                    self.layout_vertex_array
                        .push(FillLayoutVertex::new(ring[i].x, ring[i].y));
                    flattened.push(ring[i].x as f64);
                    flattened.push(ring[i].y as f64);
                }

                if let Some(segment) = self.line_segments.current_mut() {
                    segment.vertex_length += ring.len();
                    segment.primitive_length += ring.len();
                }
            }

            let indices = earcutr::earcut(&flattened, &hole_indices, 2)
                .map_err(|e| TessellationError::Triangulator(format!("{e:?}")))?;
            if indices.len() % 3 != 0 {
                return Err(TessellationError::IndexCount {
                    count: indices.len(),
                });
            }
            for triangle in indices.chunks_exact(3) {
                self.triangle_index_array.push(
                    (triangle_base + triangle[0]) as u16,
                    (triangle_base + triangle[1]) as u16,
                    (triangle_base + triangle[2]) as u16,
                );
            }
            if let Some(segment) = self.triangle_segments.current_mut() {
                segment.vertex_length += num_vertices;
                segment.primitive_length += indices.len() / 3;
            }
        }

        self.program_configurations.populate_paint_arrays(
            self.layout_vertex_array.len(),
            feature,
            Some(&self.image_positions),
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.layout_vertex_array.is_empty()
    }

    /// Create the GPU buffers on first call; later calls only forward to
    /// binders that have not uploaded yet.
    pub fn upload(&mut self, ctx: &dyn RenderContext) {
        if self.layout_vertex_buffer.is_none() {
            self.layout_vertex_buffer = Some(VertexBuffer::new(
                ctx,
                self.layout_vertex_array.as_bytes(),
                FillLayoutVertex::layout_attributes(),
                Some("tessella.Fill.LayoutVertexBuffer"),
            ));
            self.triangle_index_buffer = Some(IndexBuffer::new(
                ctx,
                self.triangle_index_array.as_bytes(),
                Some("tessella.Fill.TriangleIndexBuffer"),
            ));
            self.line_index_buffer = Some(IndexBuffer::new(
                ctx,
                self.line_index_array.as_bytes(),
                Some("tessella.Fill.LineIndexBuffer"),
            ));
        }
        self.program_configurations.upload(ctx);
    }

    /// Drop the GPU buffers. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.layout_vertex_buffer = None;
        self.triangle_index_buffer = None;
        self.line_index_buffer = None;
        self.program_configurations.destroy();
    }

    /// Re-attach expression closures after deserializing, since those do
    /// not cross a transfer boundary.
    pub fn rebind_expressions(&mut self, layers: &[StyleLayer]) {
        self.program_configurations.rebind_expressions(layers);
    }

    pub fn layout_vertex_array(&self) -> &FillLayoutVertexArray {
        &self.layout_vertex_array
    }

    pub fn triangle_index_array(&self) -> &TriangleIndexArray {
        &self.triangle_index_array
    }

    pub fn line_index_array(&self) -> &LineIndexArray {
        &self.line_index_array
    }

    pub fn triangle_segments(&self) -> &SegmentVector {
        &self.triangle_segments
    }

    pub fn line_segments(&self) -> &SegmentVector {
        &self.line_segments
    }

    pub fn program_configurations(&self) -> &ProgramConfigurationSet {
        &self.program_configurations
    }

    pub fn layout_vertex_buffer(&self) -> Option<&VertexBuffer> {
        self.layout_vertex_buffer.as_ref()
    }

    pub fn triangle_index_buffer(&self) -> Option<&IndexBuffer> {
        self.triangle_index_buffer.as_ref()
    }

    pub fn line_index_buffer(&self) -> Option<&IndexBuffer> {
        self.line_index_buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{PaintProperty, PropertyType};
    use glam::Vec2;
    use tessella_core::{ImageRefs, PropertyExpression, PropertyValue, StyleValue};

    fn ring(points: &[(f32, f32)]) -> Vec<Vec2> {
        points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    fn triangle_feature() -> Feature {
        Feature::new(
            GeometryType::Polygon,
            vec![ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)])],
        )
    }

    fn square_with_hole() -> Feature {
        Feature::new(
            GeometryType::Polygon,
            vec![
                ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]),
                ring(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]),
            ],
        )
    }

    fn build(layer: &StyleLayer, features: &[Feature]) -> FillBucket {
        let layers = std::slice::from_ref(layer);
        let mut bucket = FillBucket::new(layers, 5.0);
        bucket.populate(layers, features);
        bucket.add_features(ImagePositions::default()).unwrap();
        bucket
    }

    #[test]
    fn test_single_triangle() {
        let layer = StyleLayer::new("fill");
        let bucket = build(&layer, &[triangle_feature()]);

        assert!(!bucket.is_empty());
        assert_eq!(bucket.layout_vertex_array().len(), 3);
        assert_eq!(bucket.triangle_index_array().len(), 1);
        assert_eq!(
            bucket.line_index_array().as_slice(),
            &[[2, 0], [0, 1], [1, 2]]
        );

        let segments = bucket.triangle_segments().segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].vertex_length, 3);
        assert_eq!(segments[0].primitive_length, 1);

        let line_segments = bucket.line_segments().segments();
        assert_eq!(line_segments.len(), 1);
        assert_eq!(line_segments[0].vertex_length, 3);
        assert_eq!(line_segments[0].primitive_length, 3);
    }

    #[test]
    fn test_square_with_hole() {
        let layer = StyleLayer::new("fill");
        let bucket = build(&layer, &[square_with_hole()]);

        assert_eq!(bucket.layout_vertex_array().len(), 8);
        // n + 2h - 2 triangles for a hole-punched polygon.
        assert_eq!(bucket.triangle_index_array().len(), 8);
        for triangle in bucket.triangle_index_array().as_slice() {
            assert!(triangle.iter().all(|&i| i < 8));
        }
        assert_eq!(bucket.line_index_array().len(), 8);
    }

    #[test]
    fn test_two_outer_rings_become_two_polygons() {
        let layer = StyleLayer::new("fill");
        let feature = Feature::new(
            GeometryType::Polygon,
            vec![
                ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
                ring(&[(20.0, 0.0), (20.0, 10.0), (30.0, 10.0)]),
            ],
        );
        let bucket = build(&layer, &[feature]);
        assert_eq!(bucket.layout_vertex_array().len(), 6);
        assert_eq!(bucket.triangle_index_array().len(), 2);
        assert_eq!(bucket.triangle_segments().total_vertices(), 6);
    }

    #[test]
    fn test_non_polygon_features_are_skipped() {
        let layer = StyleLayer::new("fill");
        let line = Feature::new(
            GeometryType::Line,
            vec![ring(&[(0.0, 0.0), (5.0, 5.0)])],
        );
        let bucket = build(&layer, &[line]);
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_layer_filter_drops_features() {
        let layer = StyleLayer::new("fill")
            .with_filter(|_, feature| feature.property("keep").is_some());
        let kept = triangle_feature().with_property("keep", PropertyValue::Bool(true));
        let bucket = build(&layer, &[triangle_feature(), kept]);
        assert_eq!(bucket.layout_vertex_array().len(), 3);
    }

    #[test]
    fn test_paint_arrays_track_layout_vertices() {
        let layer = StyleLayer::new("fill").with_paint_property(
            "fill-extrusion-height",
            PaintProperty::new(
                PropertyExpression::source(|_, feature| {
                    StyleValue::Number(feature.number_property("height").unwrap_or(0.0) as f32)
                }),
                PropertyType::Number,
            ),
        );
        let a = triangle_feature().with_property("height", PropertyValue::Number(4.0));
        let b = square_with_hole().with_property("height", PropertyValue::Number(9.0));
        let bucket = build(&layer, &[a, b]);

        let array = bucket
            .program_configurations()
            .get("fill")
            .unwrap()
            .binder("fill-extrusion-height")
            .unwrap()
            .paint_vertex_array()
            .unwrap();
        assert_eq!(array.len(), bucket.layout_vertex_array().len());
        assert_eq!(&array.as_slice()[..3], &[4.0, 4.0, 4.0]);
        assert!(array.as_slice()[3..].iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_populate_reports_pattern_dependencies() {
        let layer = StyleLayer::new("fill").with_paint_property(
            "fill-pattern",
            PaintProperty::pattern(PropertyExpression::constant(StyleValue::Image(
                ImageRefs::same("hatch"),
            ))),
        );
        let layers = std::slice::from_ref(&layer);
        let mut bucket = FillBucket::new(layers, 5.0);
        let deps = bucket.populate(layers, &[triangle_feature()]);
        assert!(deps.contains("hatch"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_populate_reports_data_driven_pattern_dependencies() {
        let layer = StyleLayer::new("fill").with_paint_property(
            "fill-pattern",
            PaintProperty::pattern(PropertyExpression::source(|_, feature| {
                let name = match feature.property("kind") {
                    Some(PropertyValue::String(s)) => s.clone(),
                    _ => "default".to_string(),
                };
                StyleValue::Image(ImageRefs::same(name))
            })),
        );
        let layers = std::slice::from_ref(&layer);
        let mut bucket = FillBucket::new(layers, 5.0);
        let feature =
            triangle_feature().with_property("kind", PropertyValue::String("dots".into()));
        let deps = bucket.populate(layers, &[feature, triangle_feature()]);
        assert!(deps.contains("dots"));
        assert!(deps.contains("default"));
    }

    #[test]
    fn test_add_features_consumes_pending() {
        let layer = StyleLayer::new("fill");
        let layers = std::slice::from_ref(&layer);
        let mut bucket = FillBucket::new(layers, 5.0);
        bucket.populate(layers, &[triangle_feature()]);
        bucket.add_features(ImagePositions::default()).unwrap();
        assert_eq!(bucket.layout_vertex_array().len(), 3);

        // A second call has nothing left to tessellate.
        bucket.add_features(ImagePositions::default()).unwrap();
        assert_eq!(bucket.layout_vertex_array().len(), 3);
    }

    #[test]
    fn test_serde_round_trip_and_rebind() {
        let layer = StyleLayer::new("fill").with_paint_property(
            "fill-extrusion-height",
            PaintProperty::new(
                PropertyExpression::source(|_, feature| {
                    StyleValue::Number(feature.number_property("height").unwrap_or(0.0) as f32)
                }),
                PropertyType::Number,
            ),
        );
        let feature = triangle_feature().with_property("height", PropertyValue::Number(7.0));
        let bucket = build(&layer, &[feature]);

        let json = serde_json::to_string(&bucket).unwrap();
        let mut restored: FillBucket = serde_json::from_str(&json).unwrap();
        restored.rebind_expressions(std::slice::from_ref(&layer));

        assert_eq!(restored.layout_vertex_array().len(), 3);
        assert_eq!(restored.triangle_index_array().len(), 1);
        let config = restored.program_configurations().get("fill").unwrap();
        assert_eq!(config.cache_key(), "source:fill-extrusion-height");
        let array = config
            .binder("fill-extrusion-height")
            .unwrap()
            .paint_vertex_array()
            .unwrap();
        assert_eq!(array.as_slice(), &[7.0, 7.0, 7.0]);
    }

    mod gpu {
        use super::*;
        use tessella_test_utils::MockRenderContext;

        #[test]
        fn test_upload_is_idempotent() {
            let layer = StyleLayer::new("fill").with_paint_property(
                "fill-extrusion-height",
                PaintProperty::new(
                    PropertyExpression::source(|_, _| StyleValue::Number(1.0)),
                    PropertyType::Number,
                ),
            );
            let mut bucket = build(&layer, &[triangle_feature()]);

            let ctx = MockRenderContext::new();
            bucket.upload(&ctx);
            // Layout vertex, triangle index, line index, one paint buffer.
            assert_eq!(ctx.count_buffer_creates(), 4);
            bucket.upload(&ctx);
            assert_eq!(ctx.count_buffer_creates(), 4);

            assert!(bucket.layout_vertex_buffer().is_some());
            assert!(bucket.triangle_index_buffer().is_some());
            assert!(bucket.line_index_buffer().is_some());
        }

        #[test]
        fn test_destroy_then_upload_recreates() {
            let layer = StyleLayer::new("fill");
            let mut bucket = build(&layer, &[triangle_feature()]);

            let ctx = MockRenderContext::new();
            bucket.upload(&ctx);
            let first = ctx.count_buffer_creates();
            bucket.destroy();
            bucket.destroy();
            assert!(bucket.layout_vertex_buffer().is_none());

            bucket.upload(&ctx);
            assert_eq!(ctx.count_buffer_creates(), first * 2);
        }
    }
}
