//! Paint property binders.
//!
//! A binder is one paint property's bridge between style evaluation and the
//! GPU: constant properties become uniform values, data-driven ones become
//! per-vertex paint attributes replicated across the feature's vertices.
//! The binder strategy is chosen once from the property's expression kind
//! and pattern-ness and never changes over the bucket's lifetime.

use serde::{Deserialize, Serialize};
use tessella_core::{
    interpolation_factor, CrossfadeParameters, EvaluationContext, ExpressionKind,
    PropertyExpression, StyleValue,
};
use tessella_core::Feature;
use tessella_core::pack_color;
use tessella_render::{
    ImagePosition, ImagePositions, RenderContext, UniformStore, VertexAttribute, VertexBuffer,
};
use tracing::warn;

use crate::layer::PropertyType;
use crate::vertex::PaintVertexArray;

/// Running statistics over the values a data-driven binder has seen.
/// The maximum feeds queries like "largest extrusion height in this tile".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinderStatistics {
    pub max: f32,
}

impl Default for BinderStatistics {
    fn default() -> Self {
        Self { max: f32::NEG_INFINITY }
    }
}

impl BinderStatistics {
    fn observe(&mut self, value: f32) {
        if value > self.max {
            self.max = value;
        }
    }
}

/// Binding strategy identifiers, used in program cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinderKind {
    Constant,
    PatternConstant,
    Source,
    Composite,
    PatternComposite,
}

impl BinderKind {
    pub fn cache_token(self) -> &'static str {
        match self {
            BinderKind::Constant => "constant",
            BinderKind::PatternConstant => "pattern-constant",
            BinderKind::Source => "source",
            BinderKind::Composite => "composite",
            BinderKind::PatternComposite => "pattern-composite",
        }
    }
}

/// A constant, non-pattern property: bound as a single uniform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantBinder {
    pub value: StyleValue,
    pub uniform_name: String,
}

/// A constant pattern property: the image triple is fixed for the bucket
/// and the atlas rectangles are bound as tile-specific uniforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConstantBinder {
    pub uniform_name: String,
}

/// A source expression: one evaluation per feature, replicated per vertex.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceExpressionBinder {
    #[serde(skip)]
    expression: Option<PropertyExpression>,
    pub attribute_name: String,
    pub value_type: PropertyType,
    pub statistics: BinderStatistics,
    paint_vertex_array: PaintVertexArray,
    paint_vertex_attributes: Vec<VertexAttribute>,
    #[serde(skip)]
    paint_vertex_buffer: Option<VertexBuffer>,
}

/// A composite expression: evaluated at the covering integer zoom and the
/// next one so the shader can interpolate between them.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompositeExpressionBinder {
    #[serde(skip)]
    expression: Option<PropertyExpression>,
    pub attribute_name: String,
    pub value_type: PropertyType,
    pub use_integer_zoom: bool,
    pub zoom: f64,
    pub statistics: BinderStatistics,
    paint_vertex_array: PaintVertexArray,
    paint_vertex_attributes: Vec<VertexAttribute>,
    #[serde(skip)]
    paint_vertex_buffer: Option<VertexBuffer>,
}

/// A data-driven pattern: three atlas rectangles per vertex, for the image
/// the expression picks one zoom below, at, and one above the tile zoom.
#[derive(Debug, Serialize, Deserialize)]
pub struct PatternCompositeBinder {
    #[serde(skip)]
    expression: Option<PropertyExpression>,
    pub zoom: f64,
    pub statistics: BinderStatistics,
    paint_vertex_array: PaintVertexArray,
    paint_vertex_attributes: Vec<VertexAttribute>,
    #[serde(skip)]
    paint_vertex_buffer: Option<VertexBuffer>,
}

fn paint_components(value_type: PropertyType, per_zoom: bool) -> usize {
    let base = match value_type {
        PropertyType::Number => 1,
        PropertyType::Color => 2,
        PropertyType::Image => 4,
    };
    if per_zoom { base * 2 } else { base }
}

impl SourceExpressionBinder {
    fn new(expression: PropertyExpression, property: &str, value_type: PropertyType) -> Self {
        let attribute_name = paint_attribute_name(property);
        let components = paint_components(value_type, false);
        let attributes = vec![VertexAttribute::float32(
            format!("a_{attribute_name}"),
            components as u8,
        )];
        Self {
            expression: Some(expression),
            attribute_name,
            value_type,
            statistics: BinderStatistics::default(),
            paint_vertex_array: PaintVertexArray::new(components),
            paint_vertex_attributes: attributes,
            paint_vertex_buffer: None,
        }
    }
}

impl CompositeExpressionBinder {
    fn new(
        expression: PropertyExpression,
        property: &str,
        value_type: PropertyType,
        use_integer_zoom: bool,
        zoom: f64,
    ) -> Self {
        let attribute_name = paint_attribute_name(property);
        let components = paint_components(value_type, true);
        let attributes = vec![VertexAttribute::float32(
            format!("a_{attribute_name}"),
            components as u8,
        )];
        Self {
            expression: Some(expression),
            attribute_name,
            value_type,
            use_integer_zoom,
            zoom,
            statistics: BinderStatistics::default(),
            paint_vertex_array: PaintVertexArray::new(components),
            paint_vertex_attributes: attributes,
            paint_vertex_buffer: None,
        }
    }
}

impl PatternCompositeBinder {
    fn new(expression: PropertyExpression, zoom: f64) -> Self {
        // Three vec4 atlas rectangles, interleaved in one buffer.
        let attributes = vec![
            VertexAttribute::float32("a_pattern_min", 4),
            VertexAttribute::float32("a_pattern_mid", 4).with_offset(16),
            VertexAttribute::float32("a_pattern_max", 4).with_offset(32),
        ];
        Self {
            expression: Some(expression),
            zoom,
            statistics: BinderStatistics::default(),
            paint_vertex_array: PaintVertexArray::new(12),
            paint_vertex_attributes: attributes,
            paint_vertex_buffer: None,
        }
    }
}

/// One paint property's binder.
#[derive(Debug, Serialize, Deserialize)]
pub enum Binder {
    Constant(ConstantBinder),
    PatternConstant(PatternConstantBinder),
    Source(SourceExpressionBinder),
    Composite(CompositeExpressionBinder),
    PatternComposite(PatternCompositeBinder),
}

/// Derive the shader-facing attribute name from a style property name,
/// e.g. `fill-extrusion-height` becomes `extrusion_height`.
pub fn paint_attribute_name(property: &str) -> String {
    let stripped = match property.split_once('-') {
        Some((_, rest)) => rest,
        None => property,
    };
    stripped.replace('-', "_")
}

impl Binder {
    /// Select the binder strategy for a property.
    pub fn create(
        property: &str,
        expression: PropertyExpression,
        value_type: PropertyType,
        is_pattern: bool,
        use_integer_zoom: bool,
        zoom: f64,
    ) -> Self {
        match (expression.kind(), is_pattern) {
            (ExpressionKind::Constant, false) => {
                let value =
                    expression.evaluate(&EvaluationContext::at_zoom(zoom), &Feature::empty());
                Binder::Constant(ConstantBinder {
                    value,
                    uniform_name: paint_attribute_name(property),
                })
            }
            (ExpressionKind::Constant, true) => Binder::PatternConstant(PatternConstantBinder {
                uniform_name: paint_attribute_name(property),
            }),
            (_, true) => Binder::PatternComposite(PatternCompositeBinder::new(expression, zoom)),
            (ExpressionKind::Source, false) => {
                Binder::Source(SourceExpressionBinder::new(expression, property, value_type))
            }
            (ExpressionKind::Composite, false) => Binder::Composite(
                CompositeExpressionBinder::new(expression, property, value_type, use_integer_zoom, zoom),
            ),
        }
    }

    pub fn kind(&self) -> BinderKind {
        match self {
            Binder::Constant(_) => BinderKind::Constant,
            Binder::PatternConstant(_) => BinderKind::PatternConstant,
            Binder::Source(_) => BinderKind::Source,
            Binder::Composite(_) => BinderKind::Composite,
            Binder::PatternComposite(_) => BinderKind::PatternComposite,
        }
    }

    pub fn is_data_driven(&self) -> bool {
        matches!(
            self,
            Binder::Source(_) | Binder::Composite(_) | Binder::PatternComposite(_)
        )
    }

    /// Shader defines this binder contributes. Constant binders get a
    /// `HAS_UNIFORM_u_<name>` define so the shader reads the uniform
    /// instead of a vertex attribute.
    pub fn defines(&self) -> Vec<String> {
        match self {
            Binder::Constant(b) => vec![format!("HAS_UNIFORM_u_{}", b.uniform_name)],
            Binder::PatternConstant(b) => vec![format!("HAS_UNIFORM_u_{}", b.uniform_name)],
            _ => Vec::new(),
        }
    }

    pub fn statistics(&self) -> Option<BinderStatistics> {
        match self {
            Binder::Source(b) => Some(b.statistics),
            Binder::Composite(b) => Some(b.statistics),
            Binder::PatternComposite(b) => Some(b.statistics),
            _ => None,
        }
    }

    /// Extend the paint array to `new_length` vertex records by evaluating
    /// the expression once for `feature` and replicating the result.
    pub fn populate_paint_array(
        &mut self,
        new_length: usize,
        feature: &Feature,
        image_positions: Option<&ImagePositions>,
    ) {
        match self {
            Binder::Constant(_) | Binder::PatternConstant(_) => {}
            Binder::Source(b) => {
                let count = new_length.saturating_sub(b.paint_vertex_array.len());
                if count == 0 {
                    return;
                }
                let Some(expression) = &b.expression else {
                    warn!(attribute = %b.attribute_name, "source binder has no expression attached");
                    b.paint_vertex_array.push_zeroed(count);
                    return;
                };
                let value = expression.evaluate(&EvaluationContext::default(), feature);
                let mut record = [0.0f32; 2];
                let components =
                    pack_value(&value, b.value_type, &mut record, &mut b.statistics);
                match components {
                    Some(n) => b.paint_vertex_array.push_repeated(&record[..n], count),
                    None => {
                        warn!(attribute = %b.attribute_name, "expression produced a value of the wrong type");
                        b.paint_vertex_array.push_zeroed(count);
                    }
                }
            }
            Binder::Composite(b) => {
                let count = new_length.saturating_sub(b.paint_vertex_array.len());
                if count == 0 {
                    return;
                }
                let Some(expression) = &b.expression else {
                    warn!(attribute = %b.attribute_name, "composite binder has no expression attached");
                    b.paint_vertex_array.push_zeroed(count);
                    return;
                };
                let lower = expression.evaluate(&EvaluationContext::at_zoom(b.zoom), feature);
                let upper =
                    expression.evaluate(&EvaluationContext::at_zoom(b.zoom + 1.0), feature);
                let mut lower_half = [0.0f32; 2];
                let mut upper_half = [0.0f32; 2];
                let a = pack_value(&lower, b.value_type, &mut lower_half, &mut b.statistics);
                let c = pack_value(&upper, b.value_type, &mut upper_half, &mut b.statistics);
                match (a, c) {
                    (Some(n), Some(m)) if n == m => {
                        let mut record = [0.0f32; 4];
                        record[..n].copy_from_slice(&lower_half[..n]);
                        record[n..n + m].copy_from_slice(&upper_half[..m]);
                        b.paint_vertex_array.push_repeated(&record[..n + m], count);
                    }
                    _ => {
                        warn!(attribute = %b.attribute_name, "expression produced a value of the wrong type");
                        b.paint_vertex_array.push_zeroed(count);
                    }
                }
            }
            Binder::PatternComposite(b) => {
                let count = new_length.saturating_sub(b.paint_vertex_array.len());
                if count == 0 {
                    return;
                }
                let Some(expression) = &b.expression else {
                    warn!("pattern binder has no expression attached");
                    b.paint_vertex_array.push_zeroed(count);
                    return;
                };
                let Some(positions) = image_positions else {
                    warn!("pattern binder populated without atlas positions");
                    b.paint_vertex_array.push_zeroed(count);
                    return;
                };
                let mut record = [0.0f32; 12];
                let mut ok = true;
                for (slot, zoom) in [b.zoom - 1.0, b.zoom, b.zoom + 1.0].into_iter().enumerate() {
                    let value = expression.evaluate(&EvaluationContext::at_zoom(zoom), feature);
                    let Some(refs) = value.as_image() else {
                        warn!("pattern expression produced a non-image value");
                        ok = false;
                        break;
                    };
                    let Some(position) = positions.get(&refs.mid) else {
                        warn!(image = %refs.mid, "pattern image missing from atlas");
                        ok = false;
                        break;
                    };
                    record[slot * 4..slot * 4 + 4].copy_from_slice(&position.to_vec4());
                }
                if ok {
                    b.paint_vertex_array.push_repeated(&record, count);
                } else {
                    b.paint_vertex_array.push_zeroed(count);
                }
            }
        }
    }

    /// Upload the paint vertex array, creating the buffer on first call and
    /// leaving it untouched afterwards.
    pub fn upload(&mut self, ctx: &dyn RenderContext) {
        let (array, attributes, buffer, label) = match self {
            Binder::Source(b) => (
                &b.paint_vertex_array,
                &b.paint_vertex_attributes,
                &mut b.paint_vertex_buffer,
                "tessella.Paint.SourceVertexBuffer",
            ),
            Binder::Composite(b) => (
                &b.paint_vertex_array,
                &b.paint_vertex_attributes,
                &mut b.paint_vertex_buffer,
                "tessella.Paint.CompositeVertexBuffer",
            ),
            Binder::PatternComposite(b) => (
                &b.paint_vertex_array,
                &b.paint_vertex_attributes,
                &mut b.paint_vertex_buffer,
                "tessella.Paint.PatternVertexBuffer",
            ),
            _ => return,
        };
        if buffer.is_none() {
            *buffer = Some(VertexBuffer::new(
                ctx,
                array.as_bytes(),
                attributes.clone(),
                Some(label),
            ));
        }
    }

    pub fn destroy(&mut self) {
        match self {
            Binder::Source(b) => b.paint_vertex_buffer = None,
            Binder::Composite(b) => b.paint_vertex_buffer = None,
            Binder::PatternComposite(b) => b.paint_vertex_buffer = None,
            _ => {}
        }
    }

    pub fn paint_vertex_buffer(&self) -> Option<&VertexBuffer> {
        match self {
            Binder::Source(b) => b.paint_vertex_buffer.as_ref(),
            Binder::Composite(b) => b.paint_vertex_buffer.as_ref(),
            Binder::PatternComposite(b) => b.paint_vertex_buffer.as_ref(),
            _ => None,
        }
    }

    pub fn paint_vertex_array(&self) -> Option<&PaintVertexArray> {
        match self {
            Binder::Source(b) => Some(&b.paint_vertex_array),
            Binder::Composite(b) => Some(&b.paint_vertex_array),
            Binder::PatternComposite(b) => Some(&b.paint_vertex_array),
            _ => None,
        }
    }

    /// Per-draw uniforms: the literal value for constants, a sentinel for
    /// source attributes, and the zoom interpolation factor for composites.
    pub fn set_uniforms(&self, store: &mut UniformStore, current_zoom: f64) {
        match self {
            Binder::Constant(b) => match &b.value {
                StyleValue::Number(n) => store.set_float(format!("u_{}", b.uniform_name), *n),
                StyleValue::Color(c) => store.set_vec4(format!("u_{}", b.uniform_name), c.to_array()),
                StyleValue::Image(_) => {}
            },
            Binder::Source(b) => {
                store.set_float(format!("a_{}_t", b.attribute_name), 0.0);
            }
            Binder::Composite(b) => {
                let zoom = if b.use_integer_zoom {
                    current_zoom.floor()
                } else {
                    current_zoom
                };
                let t = interpolation_factor(zoom, b.zoom, b.zoom + 1.0);
                store.set_float(format!("a_{}_t", b.attribute_name), t);
            }
            Binder::PatternConstant(_) | Binder::PatternComposite(_) => {}
        }
    }

    /// Tile-specific pattern uniforms. Non-pattern binders bind nothing
    /// here.
    #[allow(clippy::too_many_arguments)]
    pub fn set_tile_specific_uniforms(
        &self,
        store: &mut UniformStore,
        image_refs: Option<&tessella_core::ImageRefs>,
        positions: &ImagePositions,
        crossfade: CrossfadeParameters,
        tile_ratio: f32,
        pixel_ratio: f32,
        texture_size: [f32; 2],
    ) {
        let is_pattern = matches!(
            self,
            Binder::PatternConstant(_) | Binder::PatternComposite(_)
        );
        if !is_pattern {
            return;
        }
        let lookup = |name: &str| -> ImagePosition {
            match positions.get(name) {
                Some(position) => *position,
                None => {
                    warn!(image = %name, "pattern image missing from atlas");
                    ImagePosition::new([0.0, 0.0], [0.0, 0.0], pixel_ratio)
                }
            }
        };
        let (min, mid, max) = match image_refs {
            Some(refs) => (lookup(&refs.min), lookup(&refs.mid), lookup(&refs.max)),
            None => {
                let zero = ImagePosition::new([0.0, 0.0], [0.0, 0.0], pixel_ratio);
                (zero, zero, zero)
            }
        };
        store.set_vec4("u_pattern_min", min.to_vec4());
        store.set_vec4("u_pattern_mid", mid.to_vec4());
        store.set_vec4("u_pattern_max", max.to_vec4());
        store.set_float("u_fade", crossfade.t);
        store.set_vec4(
            "u_scale",
            [mid.pixel_ratio, tile_ratio, crossfade.from_scale, crossfade.to_scale],
        );
        store.set_int("u_zoomin", (crossfade.from_scale == 2.0) as i32);
        store.set_vec2("u_texsize", texture_size);
    }

    /// Re-attach the evaluation function after a transfer boundary.
    pub fn rebind_expression(&mut self, expression: PropertyExpression) {
        match self {
            Binder::Source(b) => b.expression = Some(expression),
            Binder::Composite(b) => b.expression = Some(expression),
            Binder::PatternComposite(b) => b.expression = Some(expression),
            _ => {}
        }
    }
}

/// Pack a style value into paint components: numbers as themselves, colors
/// as two packed float pairs. Returns the component count, or `None` on a
/// type mismatch.
fn pack_value(
    value: &StyleValue,
    value_type: PropertyType,
    out: &mut [f32; 2],
    statistics: &mut BinderStatistics,
) -> Option<usize> {
    match (value, value_type) {
        (StyleValue::Number(n), PropertyType::Number) => {
            statistics.observe(*n);
            out[0] = *n;
            Some(1)
        }
        (StyleValue::Color(c), PropertyType::Color) => {
            let packed = pack_color(*c);
            out.copy_from_slice(&packed);
            Some(2)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_core::{unpack_uint8_pair, Color};

    fn number_feature(value: f64) -> Feature {
        Feature::empty().with_property(
            "height",
            tessella_core::PropertyValue::Number(value),
        )
    }

    fn height_expr() -> PropertyExpression {
        PropertyExpression::source(|_, feature| {
            StyleValue::Number(feature.number_property("height").unwrap_or(0.0) as f32)
        })
    }

    #[test]
    fn test_attribute_name_from_property() {
        assert_eq!(paint_attribute_name("fill-color"), "color");
        assert_eq!(paint_attribute_name("fill-extrusion-height"), "extrusion_height");
        assert_eq!(paint_attribute_name("opacity"), "opacity");
    }

    #[test]
    fn test_constant_binder_uniforms_and_defines() {
        let binder = Binder::create(
            "fill-opacity",
            PropertyExpression::constant(StyleValue::Number(0.5)),
            PropertyType::Number,
            false,
            false,
            5.0,
        );
        assert_eq!(binder.kind(), BinderKind::Constant);
        assert!(!binder.is_data_driven());
        assert_eq!(binder.defines(), vec!["HAS_UNIFORM_u_opacity".to_string()]);

        let mut store = UniformStore::new();
        binder.set_uniforms(&mut store, 5.0);
        assert_eq!(
            store.get("u_opacity"),
            Some(&tessella_render::UniformValue::Float(0.5))
        );
    }

    #[test]
    fn test_source_binder_replicates_per_vertex() {
        let mut binder = Binder::create(
            "fill-extrusion-height",
            height_expr(),
            PropertyType::Number,
            false,
            false,
            5.0,
        );
        binder.populate_paint_array(4, &number_feature(12.0), None);
        binder.populate_paint_array(7, &number_feature(3.0), None);

        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.len(), 7);
        assert_eq!(&array.as_slice()[..4], &[12.0, 12.0, 12.0, 12.0]);
        assert_eq!(&array.as_slice()[4..], &[3.0, 3.0, 3.0]);
        assert_eq!(binder.statistics().unwrap().max, 12.0);
    }

    #[test]
    fn test_source_color_binder_packs_two_floats() {
        let mut binder = Binder::create(
            "fill-color",
            PropertyExpression::source(|_, _| {
                StyleValue::Color(Color::from_rgba_u8(255, 0, 128, 255))
            }),
            PropertyType::Color,
            false,
            false,
            0.0,
        );
        binder.populate_paint_array(1, &Feature::empty(), None);
        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.components(), 2);
        let (r, g) = unpack_uint8_pair(array.as_slice()[0]);
        assert!((r - 255.0).abs() < 1.0);
        assert!(g.abs() < 1.0);
    }

    #[test]
    fn test_composite_binder_evaluates_both_zooms() {
        let mut binder = Binder::create(
            "fill-extrusion-height",
            PropertyExpression::composite(|ctx, _| {
                StyleValue::Number(ctx.zoom.unwrap_or(0.0) as f32 * 10.0)
            }),
            PropertyType::Number,
            false,
            false,
            5.0,
        );
        binder.populate_paint_array(2, &Feature::empty(), None);
        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.components(), 2);
        assert_eq!(&array.as_slice()[..2], &[50.0, 60.0]);

        let mut store = UniformStore::new();
        binder.set_uniforms(&mut store, 5.5);
        assert_eq!(
            store.get("a_extrusion_height_t"),
            Some(&tessella_render::UniformValue::Float(0.5))
        );
    }

    #[test]
    fn test_composite_integer_zoom_floors_factor() {
        let binder = Binder::create(
            "fill-opacity",
            PropertyExpression::composite(|_, _| StyleValue::Number(1.0)),
            PropertyType::Number,
            false,
            true,
            5.0,
        );
        let mut store = UniformStore::new();
        binder.set_uniforms(&mut store, 5.9);
        assert_eq!(
            store.get("a_opacity_t"),
            Some(&tessella_render::UniformValue::Float(0.0))
        );
    }

    #[test]
    fn test_pattern_composite_packs_atlas_rects() {
        let mut positions = ImagePositions::default();
        positions.insert("dots".into(), ImagePosition::new([1.0, 2.0], [3.0, 4.0], 1.0));

        let mut binder = Binder::create(
            "fill-pattern",
            PropertyExpression::source(|_, _| {
                StyleValue::Image(tessella_core::ImageRefs::same("dots"))
            }),
            PropertyType::Image,
            true,
            false,
            5.0,
        );
        assert_eq!(binder.kind(), BinderKind::PatternComposite);
        binder.populate_paint_array(1, &Feature::empty(), Some(&positions));

        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.components(), 12);
        assert_eq!(&array.as_slice()[..4], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(&array.as_slice()[4..8], &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_pattern_missing_image_zero_fills() {
        let positions = ImagePositions::default();
        let mut binder = Binder::create(
            "fill-pattern",
            PropertyExpression::source(|_, _| {
                StyleValue::Image(tessella_core::ImageRefs::same("missing"))
            }),
            PropertyType::Image,
            true,
            false,
            5.0,
        );
        binder.populate_paint_array(2, &Feature::empty(), Some(&positions));
        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.len(), 2);
        assert!(array.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_type_mismatch_zero_fills() {
        let mut binder = Binder::create(
            "fill-color",
            PropertyExpression::source(|_, _| StyleValue::Number(7.0)),
            PropertyType::Color,
            false,
            false,
            0.0,
        );
        binder.populate_paint_array(3, &Feature::empty(), None);
        let array = binder.paint_vertex_array().unwrap();
        assert_eq!(array.len(), 3);
        assert!(array.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pattern_tile_uniforms() {
        let mut positions = ImagePositions::default();
        positions.insert("dots".into(), ImagePosition::new([0.0, 0.0], [8.0, 8.0], 2.0));

        let binder = Binder::create(
            "fill-pattern",
            PropertyExpression::constant(StyleValue::Image(
                tessella_core::ImageRefs::same("dots"),
            )),
            PropertyType::Image,
            true,
            false,
            5.0,
        );
        assert_eq!(binder.kind(), BinderKind::PatternConstant);

        let refs = tessella_core::ImageRefs::same("dots");
        let mut store = UniformStore::new();
        binder.set_tile_specific_uniforms(
            &mut store,
            Some(&refs),
            &positions,
            CrossfadeParameters { t: 0.25, from_scale: 2.0, to_scale: 1.0 },
            1.0,
            1.0,
            [512.0, 512.0],
        );
        assert_eq!(
            store.get("u_fade"),
            Some(&tessella_render::UniformValue::Float(0.25))
        );
        assert_eq!(
            store.get("u_zoomin"),
            Some(&tessella_render::UniformValue::Int(1))
        );
        assert_eq!(
            store.get("u_scale"),
            Some(&tessella_render::UniformValue::Vec4([2.0, 1.0, 2.0, 1.0]))
        );
    }

    #[test]
    fn test_upload_creates_buffer_once() {
        use tessella_test_utils::MockRenderContext;

        let mut binder = Binder::create(
            "fill-extrusion-height",
            height_expr(),
            PropertyType::Number,
            false,
            false,
            5.0,
        );
        binder.populate_paint_array(3, &number_feature(1.0), None);

        let ctx = MockRenderContext::new();
        binder.upload(&ctx);
        binder.upload(&ctx);
        assert_eq!(ctx.count_buffer_creates(), 1);
        assert!(binder.paint_vertex_buffer().is_some());

        binder.destroy();
        assert!(binder.paint_vertex_buffer().is_none());
        binder.destroy();
    }
}
