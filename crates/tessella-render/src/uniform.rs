//! Per-draw uniform staging.
//!
//! Binders stage uniform values here by name; the draw-call layer flushes
//! the store into whatever uniform mechanism the active program uses.
//! Keeping this as plain data is what lets the binding logic run on tile
//! workers with no GPU access.

use ahash::HashMap;

/// One staged uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

/// Named uniform values for one draw.
#[derive(Debug, Default)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: UniformValue) {
        self.values.insert(name.into(), value);
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    pub fn set_vec2(&mut self, name: impl Into<String>, value: [f32; 2]) {
        self.set(name, UniformValue::Vec2(value));
    }

    pub fn set_vec4(&mut self, name: impl Into<String>, value: [f32; 4]) {
        self.set(name, UniformValue::Vec4(value));
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UniformValue)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
