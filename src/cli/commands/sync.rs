//! The `tsync sync` command.

use std::path::{Path, PathBuf};

use crate::cli::args::SyncArgs;
use crate::error::Result;
use crate::repository::CatalogRepository;
use crate::sync::{DiagnosticLevel, FileOutcome, SyncEngine, SyncOptions, SyncReport};
use crate::ui::{TsyncTheme, UserInterface};

use super::dispatcher::{load_workspace, Command, CommandResult};

/// The sync command implementation.
pub struct SyncCommand<'a> {
    project_root: PathBuf,
    repository: &'a dyn CatalogRepository,
    args: SyncArgs,
}

impl<'a> SyncCommand<'a> {
    /// Create a new sync command.
    pub fn new(project_root: &Path, repository: &'a dyn CatalogRepository, args: SyncArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repository,
            args,
        }
    }

    /// Get the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &SyncArgs {
        &self.args
    }

    fn show_report(&self, report: &SyncReport, ui: &mut dyn UserInterface) {
        let theme = TsyncTheme::detect();

        for diagnostic in &report.diagnostics {
            match diagnostic.level {
                DiagnosticLevel::Warning => ui.warning(&diagnostic.message),
                DiagnosticLevel::Info => ui.detail(&diagnostic.message),
            }
        }

        for file in &report.files {
            let line = format!(
                "{} {} -> {}",
                file.action,
                file.source,
                self.display_destination(file)
            );
            if file.action.writes() {
                ui.success(&line);
            } else {
                ui.message(&theme.format_skipped(&line));
            }
            for (key, value) in &file.vars {
                ui.detail(&format!("    {} = {}", key, value));
            }
        }

        let untouched = report.files.len() - report.written();
        if report.dry_run {
            ui.message(&format!(
                "\nDry run: {} file(s) would be written, {} left as-is",
                report.written(),
                untouched
            ));
        } else {
            ui.message(&format!(
                "\n{} file(s) written, {} left as-is",
                report.written(),
                untouched
            ));
        }
    }

    fn display_destination(&self, file: &FileOutcome) -> String {
        file.destination
            .strip_prefix(&self.project_root)
            .unwrap_or(&file.destination)
            .display()
            .to_string()
    }
}

impl Command for SyncCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = match load_workspace(&self.project_root, self.repository, ui)? {
            Ok(workspace) => workspace,
            Err(result) => return Ok(result),
        };

        if !self.args.json {
            ui.show_header(&format!(
                "Syncing {} @ {}",
                workspace.manifest.provider.url, workspace.manifest.provider.version
            ));
        }

        let engine = SyncEngine::default().with_options(SyncOptions {
            dry_run: self.args.dry_run,
        });
        let report = workspace.sync(&engine)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{}", json);
        } else {
            self.show_report(&report, ui);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LocalRepository;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        toolkit: PathBuf,
        project: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let toolkit = temp.path().join("toolkit");
        let project = temp.path().join("project");
        fs::create_dir_all(toolkit.join("files")).unwrap();
        fs::create_dir_all(&project).unwrap();

        fs::write(
            toolkit.join(".toolkit.yml"),
            r#"
version: "1.0"
bundles:
  web:
    vars: { name: web }
    components:
      - id: base
        files:
          - { source: files/README.md, destination: README.md, policy: template }
          - { source: files/LICENSE, destination: LICENSE, policy: init }
"#,
        )
        .unwrap();
        fs::write(toolkit.join("files/README.md"), "# {{ name }}\n").unwrap();
        fs::write(toolkit.join("files/LICENSE"), "MIT\n").unwrap();
        fs::write(
            project.join(".project.toolkit.yml"),
            r#"
provider: { url: "https://example.com/toolkit.git", version: main }
sync:
  - bundle: web
"#,
        )
        .unwrap();

        Fixture {
            _temp: temp,
            toolkit,
            project,
        }
    }

    #[test]
    fn sync_writes_and_reports() {
        let fx = fixture();
        let repo = LocalRepository::new(&fx.toolkit);
        let cmd = SyncCommand::new(&fx.project, &repo, SyncArgs::default());
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(fs::read_to_string(fx.project.join("README.md")).unwrap(), "# web\n");
        assert!(ui.successes().iter().any(|s| s == "render files/README.md -> README.md"));
        assert!(ui.details().iter().any(|d| d.contains("name = \"web\"")));
        assert!(ui.has_output("2 file(s) written"));
    }

    #[test]
    fn dry_run_leaves_project_untouched() {
        let fx = fixture();
        let repo = LocalRepository::new(&fx.toolkit);
        let args = SyncArgs {
            dry_run: true,
            json: false,
        };
        let mut ui = MockUI::new();

        SyncCommand::new(&fx.project, &repo, args)
            .execute(&mut ui)
            .unwrap();

        assert!(!fx.project.join("README.md").exists());
        assert!(ui.has_output("Dry run: 2 file(s) would be written"));
    }

    #[test]
    fn existing_init_file_is_shown_as_skipped() {
        let fx = fixture();
        fs::write(fx.project.join("LICENSE"), "Apache\n").unwrap();
        let repo = LocalRepository::new(&fx.toolkit);
        let mut ui = MockUI::new();

        SyncCommand::new(&fx.project, &repo, SyncArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.messages().iter().any(|m| m == "○ preserve files/LICENSE -> LICENSE"));
        assert_eq!(fs::read_to_string(fx.project.join("LICENSE")).unwrap(), "Apache\n");
    }

    #[test]
    fn missing_manifest_fails_with_two() {
        let fx = fixture();
        fs::remove_file(fx.project.join(".project.toolkit.yml")).unwrap();
        let repo = LocalRepository::new(&fx.toolkit);
        let mut ui = MockUI::new();

        let result = SyncCommand::new(&fx.project, &repo, SyncArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 2);
    }
}
