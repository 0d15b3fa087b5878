//! Style layers: the paint property declarations that drive attribute
//! binding for a bucket.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tessella_core::{EvaluationContext, PropertyExpression};
use tessella_core::Feature;

/// Value type a paint property evaluates to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Number,
    Color,
    Image,
}

/// A single paint property declaration on a layer.
pub struct PaintProperty {
    pub expression: PropertyExpression,
    pub value_type: PropertyType,
    /// Pattern properties resolve through the image atlas.
    pub is_pattern: bool,
    /// Composite interpolation snaps to integer zoom levels.
    pub use_integer_zoom: bool,
    /// Whether the property declaration admits data-driven binding at
    /// all. Non-capable properties never get a binder; they are handled
    /// entirely outside the attribute pipeline.
    pub data_capable: bool,
}

impl PaintProperty {
    pub fn new(expression: PropertyExpression, value_type: PropertyType) -> Self {
        Self {
            expression,
            value_type,
            is_pattern: false,
            use_integer_zoom: false,
            data_capable: true,
        }
    }

    pub fn pattern(expression: PropertyExpression) -> Self {
        Self {
            expression,
            value_type: PropertyType::Image,
            is_pattern: true,
            use_integer_zoom: false,
            data_capable: true,
        }
    }

    pub fn with_integer_zoom(mut self) -> Self {
        self.use_integer_zoom = true;
        self
    }

    pub fn not_data_capable(mut self) -> Self {
        self.data_capable = false;
        self
    }

    /// Whether the property varies per feature.
    pub fn is_data_driven(&self) -> bool {
        !matches!(
            self.expression.kind(),
            tessella_core::ExpressionKind::Constant
        )
    }
}

impl fmt::Debug for PaintProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintProperty")
            .field("kind", &self.expression.kind())
            .field("value_type", &self.value_type)
            .field("is_pattern", &self.is_pattern)
            .field("use_integer_zoom", &self.use_integer_zoom)
            .field("data_capable", &self.data_capable)
            .finish()
    }
}

type FilterFn = dyn Fn(&EvaluationContext, &Feature) -> bool + Send + Sync;

/// A style layer: an id, its paint properties, and an optional feature
/// filter. This is the slice of a full style document that tessellation
/// needs; parsing style JSON happens upstream.
#[derive(Clone)]
pub struct StyleLayer {
    pub id: String,
    paint: ahash::HashMap<String, Arc<PaintProperty>>,
    filter: Option<Arc<FilterFn>>,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            paint: ahash::HashMap::default(),
            filter: None,
        }
    }

    pub fn with_paint_property(mut self, name: impl Into<String>, property: PaintProperty) -> Self {
        self.paint.insert(name.into(), Arc::new(property));
        self
    }

    pub fn with_filter(
        mut self,
        filter: impl Fn(&EvaluationContext, &Feature) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn paint_property(&self, name: &str) -> Option<&PaintProperty> {
        self.paint.get(name).map(Arc::as_ref)
    }

    /// Iterate paint properties in unspecified order.
    pub fn paint_properties(&self) -> impl Iterator<Item = (&str, &PaintProperty)> {
        self.paint.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Evaluate the layer filter against a feature. Layers without a
    /// filter accept everything.
    pub fn filter_feature(&self, ctx: &EvaluationContext, feature: &Feature) -> bool {
        match &self.filter {
            Some(filter) => filter(ctx, feature),
            None => true,
        }
    }
}

impl fmt::Debug for StyleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleLayer")
            .field("id", &self.id)
            .field("paint", &self.paint)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_core::StyleValue;

    #[test]
    fn test_filter_defaults_to_accept() {
        let layer = StyleLayer::new("fill");
        let feature = Feature::empty();
        assert!(layer.filter_feature(&EvaluationContext::default(), &feature));
    }

    #[test]
    fn test_filter_rejects() {
        let layer = StyleLayer::new("fill")
            .with_filter(|_, feature| feature.property("keep").is_some());
        let feature = Feature::empty();
        assert!(!layer.filter_feature(&EvaluationContext::default(), &feature));
    }

    #[test]
    fn test_data_driven_detection() {
        let constant =
            PaintProperty::new(PropertyExpression::constant(StyleValue::Number(1.0)), PropertyType::Number);
        assert!(!constant.is_data_driven());

        let source = PaintProperty::new(
            PropertyExpression::source(|_, feature| {
                StyleValue::Number(feature.number_property("height").unwrap_or(0.0) as f32)
            }),
            PropertyType::Number,
        );
        assert!(source.is_data_driven());
    }
}
