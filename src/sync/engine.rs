//! The sync orchestrator.
//!
//! Walks requests, components and files in declaration order and hands each
//! eligible file to its policy handler.
//!
//! # Processing Order
//!
//! For every request:
//! 1. Resolve the bundle (unknown: warn, skip the request)
//! 2. Resolve the variant (unknown: warn, use no variant defaults)
//! 3. For every component: honour a component skip, then check its
//!    `var_schema` against the cascaded variables (missing: abort the run)
//! 4. For every file: file skip, tag filter, variables, destination,
//!    containment, dispatch

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::report::{Diagnostic, FileOutcome, SyncReport};
use crate::error::Result;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::manifest::validator::{self, ValidationError};
use crate::manifest::{Component, ConsumerManifest, ProviderCatalog, SyncRequest};
use crate::policy::{PolicyDispatcher, ResolutionContext};
use crate::resolve::{
    build_destination, component_stack, find_component_override, is_file_skipped,
    resolve_variables, should_include, validate_component_schema, RequestVars,
};

/// Options for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Resolve every decision but write nothing.
    pub dry_run: bool,
}

/// Reconciles a catalog checkout with a consumer project.
pub struct SyncEngine {
    fs: Box<dyn FileSystem>,
    dispatcher: PolicyDispatcher,
    options: SyncOptions,
}

impl SyncEngine {
    /// Engine using `fs` and the default policy handlers.
    pub fn new(fs: Box<dyn FileSystem>) -> Self {
        Self {
            fs,
            dispatcher: PolicyDispatcher::default(),
            options: SyncOptions::default(),
        }
    }

    /// Replace the policy dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: PolicyDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// Run every request of `manifest` against `catalog`.
    ///
    /// `catalog_root` is the checkout the catalog's `source` paths are
    /// relative to; `project_root` is where destinations land.
    ///
    /// # Errors
    ///
    /// Aborts on the first fatal error: invalid manifests, missing required
    /// variables, a path escaping its root, or a failed read, render, merge
    /// or write. Files already written stay written.
    pub fn run(
        &self,
        catalog: &ProviderCatalog,
        catalog_root: &Path,
        manifest: &ConsumerManifest,
        project_root: &Path,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.options.dry_run);

        for warning in validate(catalog, manifest)? {
            report.record(from_validation(warning));
        }

        let mut run = Run {
            engine: self,
            catalog_root,
            project_root,
            manifest,
            destinations: HashMap::new(),
            report,
        };

        for request in &manifest.sync {
            run.request(catalog, request)?;
        }

        info!(
            "Sync finished: {} file(s) processed, {} written{}",
            run.report.files.len(),
            run.report.written(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );
        Ok(run.report)
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(Box::new(LocalFileSystem::new()))
    }
}

/// Run every structural and cross-manifest check.
///
/// Fails with all errors at once; returns the warnings otherwise.
pub fn validate(
    catalog: &ProviderCatalog,
    manifest: &ConsumerManifest,
) -> Result<Vec<ValidationError>> {
    let mut findings = validator::validate_catalog(catalog);
    findings.extend(validator::validate_manifest(manifest));
    findings.extend(validator::validate_against_catalog(manifest, catalog));
    validator::into_result(findings)
}

fn from_validation(finding: ValidationError) -> Diagnostic {
    let mut diagnostic = Diagnostic::warning(finding.to_string());
    diagnostic.bundle = finding.bundle;
    diagnostic.component = finding.component;
    diagnostic
}

/// State carried across one run.
struct Run<'a> {
    engine: &'a SyncEngine,
    catalog_root: &'a Path,
    project_root: &'a Path,
    manifest: &'a ConsumerManifest,
    /// Destination -> source that claimed it first.
    destinations: HashMap<PathBuf, String>,
    report: SyncReport,
}

impl Run<'_> {
    fn request(&mut self, catalog: &ProviderCatalog, request: &SyncRequest) -> Result<()> {
        let Some(bundle) = catalog.bundle(&request.bundle) else {
            self.report.record(
                Diagnostic::warning(format!(
                    "Bundle '{}' not found in catalog, skipping",
                    request.bundle
                ))
                .in_bundle(&request.bundle),
            );
            return Ok(());
        };

        info!("Processing bundle '{}'", request.bundle);

        let variant = match request.variant.as_deref() {
            Some(name) => match bundle.variant(name) {
                Some(variant) => {
                    debug!("Using variant '{}'", name);
                    Some(&variant.defaults)
                }
                None => {
                    self.report.record(
                        Diagnostic::warning(format!(
                            "Variant '{}' not found in bundle '{}', ignoring it",
                            name, request.bundle
                        ))
                        .in_bundle(&request.bundle),
                    );
                    None
                }
            },
            None => None,
        };

        let manifest = self.manifest;
        let vars = RequestVars {
            global: &manifest.vars,
            variant,
            bundle: &bundle.vars,
        };

        for component in &bundle.components {
            self.component(request, component, vars)?;
        }
        Ok(())
    }

    fn component(
        &mut self,
        request: &SyncRequest,
        component: &Component,
        vars: RequestVars<'_>,
    ) -> Result<()> {
        let component_override = find_component_override(&request.overrides, &component.id);

        if component_override.is_some_and(|o| o.skip) {
            self.report.record(
                Diagnostic::info(format!("Skipping component '{}'", component.id))
                    .in_bundle(&request.bundle)
                    .in_component(&component.id),
            );
            return Ok(());
        }

        let available = component_stack(vars, component, component_override).resolve();
        validate_component_schema(component, &available)?;

        debug!("Processing component '{}'", component.id);

        for file in &component.files {
            let at_file = |diagnostic: Diagnostic| {
                diagnostic
                    .in_bundle(&request.bundle)
                    .in_component(&component.id)
                    .for_source(&file.source)
            };

            if is_file_skipped(component_override, &file.source) {
                self.report.record(at_file(Diagnostic::info(format!(
                    "Skipping file '{}'",
                    file.source
                ))));
                continue;
            }

            if !should_include(file, component_override) {
                self.report.record(at_file(Diagnostic::info(format!(
                    "File '{}' filtered out by tags",
                    file.source
                ))));
                continue;
            }

            let file_vars = resolve_variables(vars, component, file, component_override);
            let destination = build_destination(self.project_root, file, component_override);
            let source_path = self.catalog_root.join(&file.source);

            let fs = self.engine.fs.as_ref();
            fs.ensure_contained(&destination, self.project_root)?;
            fs.ensure_contained(&source_path, self.catalog_root)?;

            if let Some(previous) = self
                .destinations
                .insert(destination.clone(), file.source.clone())
            {
                self.report.record(at_file(Diagnostic::warning(format!(
                    "Destination '{}' is written by both '{}' and '{}'; the later one is applied last",
                    destination.display(),
                    previous,
                    file.source
                ))));
            }

            let ctx = ResolutionContext {
                destination_exists: fs.exists(&destination),
                source_path,
                destination_path: destination,
                file,
                vars: file_vars,
            };

            let action = if self.engine.options.dry_run {
                self.engine.dispatcher.preview(&ctx, fs)?
            } else {
                self.engine.dispatcher.dispatch(&ctx, fs)?
            };

            let Some(action) = action else {
                self.report.record(at_file(Diagnostic::warning(format!(
                    "No handler for policy '{}', skipping '{}'",
                    file.policy, file.source
                ))));
                continue;
            };

            self.report.files.push(FileOutcome {
                bundle: request.bundle.clone(),
                component: component.id.clone(),
                source: file.source.clone(),
                destination: ctx.destination_path,
                policy: file.policy,
                action,
                vars: ctx.vars,
            });
        }

        Ok(())
    }
}
