//! Owned registry of default adapters and named custom eases.
//!
//! One registry lives inside each [`crate::Engine`]; there is no process-wide
//! state. `purge` restores the builtin set.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::adapters::{Adapter, RotateMode};
use crate::ease::{Ease, EaseCurve, EaseFn, EaseSpec};
use crate::value::ValueKind;

#[derive(Default)]
pub struct AdapterRegistry {
    defaults: HashMap<ValueKind, Adapter>,
    functions: HashMap<String, EaseFn>,
    curves: HashMap<String, Arc<EaseCurve>>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("defaults", &self.defaults)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("curves", &self.curves.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AdapterRegistry {
    /// Create a registry with the builtin adapter per value kind.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_builtin_adapters();
        registry
    }

    fn register_builtin_adapters(&mut self) {
        use ValueKind as K;
        self.defaults.insert(K::Float, Adapter::Float);
        self.defaults.insert(K::Int, Adapter::Int);
        self.defaults.insert(K::Vec2, Adapter::Vector { axis: None });
        self.defaults.insert(K::Vec3, Adapter::Vector { axis: None });
        self.defaults.insert(K::Vec4, Adapter::Vector { axis: None });
        self.defaults.insert(K::Color, Adapter::Color { alpha_only: false });
        self.defaults.insert(
            K::Quat,
            Adapter::Rotation {
                mode: RotateMode::Fast,
            },
        );
        self.defaults.insert(K::Rect, Adapter::Rect);
        self.defaults.insert(K::Text, Adapter::Text);
    }

    /// Adapter used when a tween is created without naming one.
    pub fn default_adapter(&self, kind: ValueKind) -> Option<&Adapter> {
        self.defaults.get(&kind)
    }

    /// Override the default adapter for a kind. Returns false when the
    /// adapter cannot drive that kind.
    pub fn set_default_adapter(&mut self, kind: ValueKind, adapter: Adapter) -> bool {
        if !adapter.supports(kind) {
            log::debug!("adapter '{}' cannot drive {kind:?}", adapter.name());
            return false;
        }
        self.defaults.insert(kind, adapter);
        true
    }

    pub fn register_function(&mut self, name: impl Into<String>, f: EaseFn) {
        self.functions.insert(name.into(), f);
    }

    pub fn register_curve(&mut self, name: impl Into<String>, curve: EaseCurve) {
        self.curves.insert(name.into(), Arc::new(curve));
    }

    /// Named eases, custom ones first, then builtins by name. Unknown names
    /// resolve to the `OutQuad` fallback.
    pub fn resolve_ease(&self, name: &str) -> EaseSpec {
        if let Some(f) = self.functions.get(name) {
            return EaseSpec::shared_function(f.clone());
        }
        if let Some(curve) = self.curves.get(name) {
            return EaseSpec::shared_curve(curve.clone());
        }
        EaseSpec::new(Ease::from(name))
    }

    /// Names of all registered custom eases.
    pub fn list_custom(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .functions
            .keys()
            .chain(self.curves.keys())
            .map(|k| k.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Drop every custom registration and restore the builtin adapters.
    pub fn purge(&mut self) {
        self.functions.clear();
        self.curves.clear();
        self.defaults.clear();
        self.register_builtin_adapters();
    }
}
