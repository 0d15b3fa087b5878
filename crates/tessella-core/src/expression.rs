//! Opaque style-expression interface.
//!
//! Expression parsing and evaluation live outside this system; the pipeline
//! only needs to know a property's declared [`ExpressionKind`] and to call
//! its evaluation function with a zoom context and a feature.

use crate::{Color, Feature};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Declared kind of a style property's expression.
///
/// The kind decides the binding strategy once per property per layer at
/// bucket-construction time; it never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Same value for every feature and zoom.
    Constant,
    /// Varies by feature data, not by zoom.
    Source,
    /// Varies by both feature data and zoom.
    Composite,
}

/// Image-reference triple produced by pattern expressions: the images to
/// show below, at, and above the current integer zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRefs {
    pub min: String,
    pub mid: String,
    pub max: String,
}

impl ImageRefs {
    /// The common case of a pattern that does not crossfade between images.
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            min: name.clone(),
            mid: name.clone(),
            max: name,
        }
    }
}

/// An evaluated style property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Number(f32),
    Color(Color),
    Image(ImageRefs),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            StyleValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageRefs> {
        match self {
            StyleValue::Image(refs) => Some(refs),
            _ => None,
        }
    }
}

/// Globals available to an expression evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationContext {
    pub zoom: Option<f64>,
}

impl EvaluationContext {
    pub fn at_zoom(zoom: f64) -> Self {
        Self { zoom: Some(zoom) }
    }
}

type EvalFn = Arc<dyn Fn(&EvaluationContext, &Feature) -> StyleValue + Send + Sync>;

/// A style property's expression: its declared kind plus an opaque
/// evaluation function supplied by the style layer.
///
/// The function is layer-owned state and is not transferable; after a
/// bucket crosses an execution boundary the expressions are re-attached
/// from the layer on the receiving side.
#[derive(Clone)]
pub struct PropertyExpression {
    kind: ExpressionKind,
    eval: EvalFn,
}

impl PropertyExpression {
    /// A constant expression evaluating to `value` everywhere.
    pub fn constant(value: StyleValue) -> Self {
        Self {
            kind: ExpressionKind::Constant,
            eval: Arc::new(move |_, _| value.clone()),
        }
    }

    /// A data-driven expression that ignores zoom.
    pub fn source(
        eval: impl Fn(&EvaluationContext, &Feature) -> StyleValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ExpressionKind::Source,
            eval: Arc::new(eval),
        }
    }

    /// A data-driven expression that also varies across zoom.
    pub fn composite(
        eval: impl Fn(&EvaluationContext, &Feature) -> StyleValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ExpressionKind::Composite,
            eval: Arc::new(eval),
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        self.kind
    }

    /// Evaluate the expression for one feature.
    pub fn evaluate(&self, context: &EvaluationContext, feature: &Feature) -> StyleValue {
        (self.eval)(context, feature)
    }
}

impl fmt::Debug for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyExpression")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Linear interpolation factor of `current_zoom` between two integer zoom
/// stops, clamped to `[0, 1]`. The shader uses this to blend the min/max
/// samples a composite binder packed per vertex.
pub fn interpolation_factor(current_zoom: f64, lower: f64, upper: f64) -> f32 {
    if upper <= lower {
        return 0.0;
    }
    ((current_zoom - lower) / (upper - lower)).clamp(0.0, 1.0) as f32
}

/// Crossfade state between pattern images at adjacent zoom scales,
/// computed by the style layer per frame and bound as tile-specific
/// uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossfadeParameters {
    /// Blend factor between the two images, in `[0, 1]`.
    pub t: f32,
    pub from_scale: f32,
    pub to_scale: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_factor_midpoint() {
        assert_eq!(interpolation_factor(5.5, 5.0, 6.0), 0.5);
    }

    #[test]
    fn test_interpolation_factor_clamps() {
        assert_eq!(interpolation_factor(4.0, 5.0, 6.0), 0.0);
        assert_eq!(interpolation_factor(9.0, 5.0, 6.0), 1.0);
        assert_eq!(interpolation_factor(5.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_constant_expression() {
        let expr = PropertyExpression::constant(StyleValue::Number(3.0));
        assert_eq!(expr.kind(), ExpressionKind::Constant);
        let value = expr.evaluate(&EvaluationContext::default(), &Feature::empty());
        assert_eq!(value.as_number(), Some(3.0));
    }

    #[test]
    fn test_composite_expression_sees_zoom() {
        let expr = PropertyExpression::composite(|ctx, _| {
            StyleValue::Number(ctx.zoom.unwrap_or(0.0) as f32 * 2.0)
        });
        let value = expr.evaluate(&EvaluationContext::at_zoom(3.0), &Feature::empty());
        assert_eq!(value.as_number(), Some(6.0));
    }
}
