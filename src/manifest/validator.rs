//! Manifest validation rules.
//!
//! This module validates both manifests for correctness:
//! - Required schema variables must not declare a default
//! - Merge-only fields require `policy: merge`
//! - Component ids are unique within a bundle, file sources within a component
//! - Include and exclude tags of an override must not overlap
//! - A skipped file override cannot also carry a destination or vars
//!
//! Duplicate overrides, overrides naming nothing in the catalog, and skipped
//! component overrides with other settings are warnings: the first match
//! still wins and the run continues.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::consumer::{ComponentOverride, ConsumerManifest};
use super::provider::{Component, MergePriority, Policy, ProviderCatalog};
use crate::error::{Result, TsyncError};

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Aborts loading.
    Error,
    /// Logged; processing continues.
    Warning,
}

/// Validation finding with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
    /// Bundle name if the finding is bundle-specific
    pub bundle: Option<String>,
    /// Component id if the finding is component-specific
    pub component: Option<String>,
}

impl ValidationError {
    fn error(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            severity: Severity::Error,
            bundle: None,
            component: None,
        }
    }

    fn warning(rule: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, message)
        }
    }

    fn in_bundle(mut self, bundle: &str) -> Self {
        self.bundle = Some(bundle.to_string());
        self
    }

    fn in_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

/// Validate a provider catalog and return every finding.
pub fn validate_catalog(catalog: &ProviderCatalog) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    for (bundle_name, bundle) in &catalog.bundles {
        let mut seen_ids = HashSet::new();
        for component in &bundle.components {
            if !seen_ids.insert(component.id.as_str()) {
                findings.push(
                    ValidationError::error(
                        "duplicate-component-id",
                        format!(
                            "Bundle '{}' declares component '{}' more than once",
                            bundle_name, component.id
                        ),
                    )
                    .in_bundle(bundle_name),
                );
            }

            findings.extend(
                validate_component(component)
                    .into_iter()
                    .map(|f| f.in_bundle(bundle_name).in_component(&component.id)),
            );
        }
    }

    findings
}

fn validate_component(component: &Component) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    for (name, definition) in &component.var_schema {
        if definition.required && definition.default.is_some() {
            findings.push(ValidationError::error(
                "required-with-default",
                format!(
                    "Variable '{}' in component '{}' is required and also declares a default; \
                     set required: false or remove the default",
                    name, component.id
                ),
            ));
        }
    }

    let mut seen_sources = HashSet::new();
    for file in &component.files {
        if !seen_sources.insert(file.source.as_str()) {
            findings.push(ValidationError::error(
                "duplicate-file-source",
                format!(
                    "Component '{}' lists source '{}' more than once",
                    component.id, file.source
                ),
            ));
        }

        if file.policy != Policy::Merge {
            if file.merge_as.is_some() {
                findings.push(ValidationError::error(
                    "merge-field-without-merge",
                    format!(
                        "File '{}' sets 'merge_as' but its policy is '{}'",
                        file.source, file.policy
                    ),
                ));
            }
            if file.merge_priority != MergePriority::Toolkit {
                findings.push(ValidationError::error(
                    "merge-field-without-merge",
                    format!(
                        "File '{}' sets 'merge_priority' but its policy is '{}'",
                        file.source, file.policy
                    ),
                ));
            }
        }
    }

    findings
}

/// Validate a consumer manifest on its own and return every finding.
pub fn validate_manifest(manifest: &ConsumerManifest) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    for request in &manifest.sync {
        let mut seen_ids = HashSet::new();
        for component in &request.overrides {
            if !seen_ids.insert(component.id.as_str()) {
                findings.push(
                    ValidationError::warning(
                        "duplicate-override",
                        format!(
                            "Bundle '{}' has more than one override for component '{}'; \
                             only the first is used",
                            request.bundle, component.id
                        ),
                    )
                    .in_bundle(&request.bundle),
                );
            }

            findings.extend(
                validate_override(component)
                    .into_iter()
                    .map(|f| f.in_bundle(&request.bundle).in_component(&component.id)),
            );
        }
    }

    findings
}

fn validate_override(component: &ComponentOverride) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    if component.skip && component.has_settings() {
        findings.push(ValidationError::warning(
            "skip-ignores-settings",
            format!(
                "Component '{}' is skipped; its destination_root, tags, vars and files are ignored",
                component.id
            ),
        ));
    }

    if let (Some(include), Some(exclude)) = (&component.include_tags, &component.exclude_tags) {
        let overlap: BTreeSet<&String> = include.intersection(exclude).collect();
        if !overlap.is_empty() {
            let tags: Vec<&str> = overlap.iter().map(|t| t.as_str()).collect();
            findings.push(ValidationError::error(
                "conflicting-tags",
                format!(
                    "Component '{}' lists tags in both include_tags and exclude_tags: {}",
                    component.id,
                    tags.join(", ")
                ),
            ));
        }
    }

    let mut seen_sources = HashSet::new();
    for file in component.file_overrides() {
        if !seen_sources.insert(file.source.as_str()) {
            findings.push(ValidationError::warning(
                "duplicate-override",
                format!(
                    "Component '{}' has more than one override for file '{}'; \
                     only the first is used",
                    component.id, file.source
                ),
            ));
        }

        if file.skip && file.destination.is_some() {
            findings.push(ValidationError::error(
                "skip-with-destination",
                format!(
                    "File '{}' is skipped but also sets a destination",
                    file.source
                ),
            ));
        }
        if file.skip && file.vars.is_some() {
            findings.push(ValidationError::error(
                "skip-with-vars",
                format!("File '{}' is skipped but also sets vars", file.source),
            ));
        }
    }

    findings
}

/// Cross-check a consumer manifest against the catalog it targets.
///
/// Only produces warnings; unknown bundles and variants are reported by the
/// sync engine when it reaches them.
pub fn validate_against_catalog(
    manifest: &ConsumerManifest,
    catalog: &ProviderCatalog,
) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    for request in &manifest.sync {
        let Some(bundle) = catalog.bundle(&request.bundle) else {
            continue;
        };

        for component_override in &request.overrides {
            let Some(component) = bundle.component(&component_override.id) else {
                findings.push(
                    ValidationError::warning(
                        "unknown-component",
                        format!(
                            "Override targets component '{}' which bundle '{}' does not declare",
                            component_override.id, request.bundle
                        ),
                    )
                    .in_bundle(&request.bundle),
                );
                continue;
            };

            for file_override in component_override.file_overrides() {
                if component.file(&file_override.source).is_none() {
                    findings.push(
                        ValidationError::warning(
                            "unknown-file",
                            format!(
                                "Override targets file '{}' which component '{}' does not declare",
                                file_override.source, component.id
                            ),
                        )
                        .in_bundle(&request.bundle)
                        .in_component(&component.id),
                    );
                }
            }
        }
    }

    findings
}

/// Fail with every error finding at once, otherwise hand back the warnings.
pub fn into_result(findings: Vec<ValidationError>) -> Result<Vec<ValidationError>> {
    let (errors, warnings): (Vec<_>, Vec<_>) = findings.into_iter().partition(|f| f.is_error());

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(TsyncError::Configuration {
            errors: errors.iter().map(|e| e.to_string()).collect(),
        })
    }
}
