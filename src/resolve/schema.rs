//! Component variable contract checks.

use crate::error::{MissingVariable, Result, TsyncError};
use crate::manifest::{Component, VarMap};

/// Check that every required schema variable is bound in `available`.
///
/// All missing variables are reported in one error, sorted by name rather
/// than declaration order. A variable bound to `null` counts as provided.
pub fn validate_component_schema(component: &Component, available: &VarMap) -> Result<()> {
    let missing: Vec<MissingVariable> = component
        .var_schema
        .iter()
        .filter(|(name, def)| def.required && !available.contains_key(name.as_str()))
        .map(|(name, def)| MissingVariable {
            name: name.clone(),
            description: def.description.clone(),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TsyncError::MissingRequiredVariables {
            component: component.id.clone(),
            missing,
        })
    }
}
