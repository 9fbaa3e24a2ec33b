//! Variable layering.
//!
//! Variables reach a file from up to eight places. Each place is a
//! [`VarLayer`]; a [`VarLayerStack`] applies them in priority order and keeps
//! track of which layer supplied each key.

use std::fmt;

use crate::manifest::{Component, ComponentOverride, FileSpec, VarMap};
use crate::resolve::overrides::find_file_override;

/// Where a layer of variables came from, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VarSource {
    /// Defaults declared in the component's `var_schema`.
    SchemaDefaults,
    /// Consumer manifest `vars`.
    Global,
    /// Selected variant `defaults`.
    Variant,
    /// Bundle `vars`.
    Bundle,
    /// Component `vars`.
    Component,
    /// Consumer component override `vars`.
    ComponentOverride,
    /// Provider file `vars`.
    File,
    /// Consumer file override `vars`.
    FileOverride,
}

impl VarSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarSource::SchemaDefaults => "schema defaults",
            VarSource::Global => "global",
            VarSource::Variant => "variant",
            VarSource::Bundle => "bundle",
            VarSource::Component => "component",
            VarSource::ComponentOverride => "component override",
            VarSource::File => "file",
            VarSource::FileOverride => "file override",
        }
    }
}

impl fmt::Display for VarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layer of variables.
///
/// # Example
///
/// ```
/// use tsync::resolve::{VarLayer, VarSource};
///
/// let mut layer = VarLayer::new(VarSource::Bundle);
/// layer.set("python_version", "3.12");
///
/// assert!(layer.contains("python_version"));
/// assert_eq!(layer.source, VarSource::Bundle);
/// ```
#[derive(Debug, Clone)]
pub struct VarLayer {
    pub vars: VarMap,
    pub source: VarSource,
}

impl VarLayer {
    pub fn new(source: VarSource) -> Self {
        Self {
            vars: VarMap::new(),
            source,
        }
    }

    /// Create a layer holding a copy of `vars`.
    pub fn from_map(source: VarSource, vars: &VarMap) -> Self {
        Self {
            vars: vars.clone(),
            source,
        }
    }

    /// Add a variable to this layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Ordered variable layers.
///
/// The first layer pushed has lowest priority, the last has highest.
/// Overlaying is shallow: a map-valued variable in a higher layer replaces
/// the whole value below it.
///
/// # Example
///
/// ```
/// use tsync::resolve::{VarLayer, VarLayerStack, VarSource};
///
/// let mut stack = VarLayerStack::new();
///
/// let mut bundle = VarLayer::new(VarSource::Bundle);
/// bundle.set("port", 8000);
/// bundle.set("name", "svc");
/// stack.push(bundle);
///
/// let mut file = VarLayer::new(VarSource::File);
/// file.set("port", 9000);
/// stack.push(file);
///
/// assert_eq!(stack.get("port"), Some(&serde_json::json!(9000)));
/// assert_eq!(stack.source_of("name"), Some(VarSource::Bundle));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VarLayerStack {
    layers: Vec<VarLayer>,
}

impl VarLayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer above every existing one.
    pub fn push(&mut self, layer: VarLayer) {
        self.layers.push(layer);
    }

    /// Add a layer built from a map, if there is one.
    pub fn push_map(&mut self, source: VarSource, vars: Option<&VarMap>) {
        if let Some(vars) = vars {
            self.push(VarLayer::from_map(source, vars));
        }
    }

    /// Value from the highest layer that defines `key`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.layers.iter().rev().find_map(|layer| layer.vars.get(key))
    }

    /// Which layer supplied the resolved value of `key`.
    pub fn source_of(&self, key: &str) -> Option<VarSource> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.contains(key))
            .map(|layer| layer.source)
    }

    /// Flatten the stack into the effective variables.
    pub fn resolve(&self) -> VarMap {
        self.layers.iter().fold(VarMap::new(), |resolved, layer| {
            resolved
                .into_iter()
                .chain(layer.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
                .collect()
        })
    }

    pub fn layers(&self) -> &[VarLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Variables shared by every component of one sync request.
#[derive(Debug, Clone, Copy)]
pub struct RequestVars<'a> {
    /// Consumer manifest `vars`.
    pub global: &'a VarMap,
    /// Selected variant `defaults`, if a known variant was requested.
    pub variant: Option<&'a VarMap>,
    /// Bundle `vars`.
    pub bundle: &'a VarMap,
}

/// Stack for a component, before any file layers.
///
/// This is the set the component's `var_schema` is checked against.
pub fn component_stack(
    request: RequestVars<'_>,
    component: &Component,
    component_override: Option<&ComponentOverride>,
) -> VarLayerStack {
    let mut stack = VarLayerStack::new();

    let defaults = component.schema_defaults();
    if !defaults.is_empty() {
        stack.push(VarLayer::from_map(VarSource::SchemaDefaults, &defaults));
    }

    stack.push_map(VarSource::Global, Some(request.global));
    stack.push_map(VarSource::Variant, request.variant);
    stack.push_map(VarSource::Bundle, Some(request.bundle));
    stack.push_map(VarSource::Component, Some(&component.vars));
    stack.push_map(
        VarSource::ComponentOverride,
        component_override.and_then(|o| o.vars.as_ref()),
    );
    stack
}

/// Full stack for one file.
pub fn file_stack(
    request: RequestVars<'_>,
    component: &Component,
    file: &FileSpec,
    component_override: Option<&ComponentOverride>,
) -> VarLayerStack {
    let mut stack = component_stack(request, component, component_override);
    stack.push_map(VarSource::File, Some(&file.vars));
    stack.push_map(
        VarSource::FileOverride,
        find_file_override(component_override, &file.source).and_then(|o| o.vars.as_ref()),
    );
    stack
}

/// Effective variables for one file.
pub fn resolve_variables(
    request: RequestVars<'_>,
    component: &Component,
    file: &FileSpec,
    component_override: Option<&ComponentOverride>,
) -> VarMap {
    file_stack(request, component, file, component_override).resolve()
}
