//! Program configurations: the per-layer collection of binders.
//!
//! A configuration is built once per layer per bucket and owns one binder
//! per data-driven paint property (constant properties get uniform-only
//! binders). Its cache key identifies the shader-program variant the
//! binder set requires, so layers with identical binding shapes share
//! compiled programs.

use serde::{Deserialize, Serialize};
use tessella_core::{CrossfadeParameters, Feature, ImageRefs};
use tessella_render::{ImagePositions, RenderContext, UniformStore, VertexBuffer};

use crate::binder::Binder;
use crate::layer::StyleLayer;

/// Binders for one style layer, keyed by paint property name.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgramConfiguration {
    binders: ahash::HashMap<String, Binder>,
    cache_key: String,
}

impl ProgramConfiguration {
    /// Build binders for every paint property of `layer` that passes
    /// `filter` and admits data-driven binding. Properties declared
    /// `not_data_capable` never get a binder or a cache-key token.
    pub fn create_dynamic(
        layer: &StyleLayer,
        zoom: f64,
        filter: impl Fn(&str) -> bool,
    ) -> Self {
        let mut binders = ahash::HashMap::default();
        for (name, property) in layer.paint_properties() {
            if !filter(name) || !property.data_capable {
                continue;
            }
            let binder = Binder::create(
                name,
                property.expression.clone(),
                property.value_type,
                property.is_pattern,
                property.use_integer_zoom,
                zoom,
            );
            binders.insert(name.to_string(), binder);
        }

        let mut tokens: Vec<String> = binders
            .iter()
            .map(|(name, binder)| format!("{}:{}", binder.kind().cache_token(), name))
            .collect();
        tokens.sort_unstable();
        let cache_key = tokens.join(";");

        Self { binders, cache_key }
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn binder(&self, property: &str) -> Option<&Binder> {
        self.binders.get(property)
    }

    /// Extend every data-driven paint array to `new_length` records for
    /// `feature`. Called once per feature, after its layout vertices are
    /// in place.
    pub fn populate_paint_arrays(
        &mut self,
        new_length: usize,
        feature: &Feature,
        image_positions: Option<&ImagePositions>,
    ) {
        for binder in self.binders.values_mut() {
            binder.populate_paint_array(new_length, feature, image_positions);
        }
    }

    /// Shader defines for this binder set, sorted for determinism.
    pub fn defines(&self) -> Vec<String> {
        let mut defines: Vec<String> =
            self.binders.values().flat_map(|b| b.defines()).collect();
        defines.sort_unstable();
        defines
    }

    pub fn set_uniforms(&self, store: &mut UniformStore, current_zoom: f64) {
        for binder in self.binders.values() {
            binder.set_uniforms(store, current_zoom);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_tile_specific_uniforms(
        &self,
        store: &mut UniformStore,
        image_refs: Option<&ImageRefs>,
        positions: &ImagePositions,
        crossfade: CrossfadeParameters,
        tile_ratio: f32,
        pixel_ratio: f32,
        texture_size: [f32; 2],
    ) {
        for binder in self.binders.values() {
            binder.set_tile_specific_uniforms(
                store,
                image_refs,
                positions,
                crossfade,
                tile_ratio,
                pixel_ratio,
                texture_size,
            );
        }
    }

    pub fn upload(&mut self, ctx: &dyn RenderContext) {
        for binder in self.binders.values_mut() {
            binder.upload(ctx);
        }
    }

    pub fn destroy(&mut self) {
        for binder in self.binders.values_mut() {
            binder.destroy();
        }
    }

    /// Paint vertex buffers of the data-driven binders, in unspecified
    /// order, for binding alongside the layout vertex buffer.
    pub fn paint_vertex_buffers(&self) -> Vec<&VertexBuffer> {
        self.binders
            .values()
            .filter_map(|b| b.paint_vertex_buffer())
            .collect()
    }

    /// Re-attach evaluation functions from `layer` after a transfer
    /// boundary.
    pub fn rebind_expressions(&mut self, layer: &StyleLayer) {
        for (name, binder) in self.binders.iter_mut() {
            if let Some(property) = layer.paint_property(name) {
                binder.rebind_expression(property.expression.clone());
            }
        }
    }
}

/// Program configurations for every layer sharing a bucket, keyed by
/// layer id.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgramConfigurationSet {
    configurations: ahash::HashMap<String, ProgramConfiguration>,
}

impl ProgramConfigurationSet {
    pub fn new(layers: &[StyleLayer], zoom: f64, filter: impl Fn(&str) -> bool) -> Self {
        let mut configurations = ahash::HashMap::default();
        for layer in layers {
            configurations.insert(
                layer.id.clone(),
                ProgramConfiguration::create_dynamic(layer, zoom, &filter),
            );
        }
        Self { configurations }
    }

    pub fn get(&self, layer_id: &str) -> Option<&ProgramConfiguration> {
        self.configurations.get(layer_id)
    }

    pub fn populate_paint_arrays(
        &mut self,
        new_length: usize,
        feature: &Feature,
        image_positions: Option<&ImagePositions>,
    ) {
        for configuration in self.configurations.values_mut() {
            configuration.populate_paint_arrays(new_length, feature, image_positions);
        }
    }

    pub fn upload(&mut self, ctx: &dyn RenderContext) {
        for configuration in self.configurations.values_mut() {
            configuration.upload(ctx);
        }
    }

    pub fn destroy(&mut self) {
        for configuration in self.configurations.values_mut() {
            configuration.destroy();
        }
    }

    pub fn rebind_expressions(&mut self, layers: &[StyleLayer]) {
        for layer in layers {
            if let Some(configuration) = self.configurations.get_mut(&layer.id) {
                configuration.rebind_expressions(layer);
            }
        }
    }
}
