// Pack Installation - copy templates, record the install, refresh AGENTS.md

use crate::agents_md::{self, BlockStatus};
use crate::config::AGENTS_FILE;
use crate::error::{PromptkitError, Result};
use crate::packs::materialize::{self, FileStatus};
use crate::packs::pack::{Pack, PackStore};
use crate::packs::registry::{FileRecord, InstalledPack, Provenance, Registry};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a single installation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallReport {
    pub pack: String,
    pub version: String,
    pub files: Vec<FileRecord>,
    pub agents_md: BlockStatus,
}

/// Manager for pack installation operations
pub struct PackInstaller {
    store: PackStore,
}

impl PackInstaller {
    pub fn new(packs_dir: &Path) -> Self {
        Self {
            store: PackStore::new(packs_dir),
        }
    }

    pub fn store(&self) -> &PackStore {
        &self.store
    }

    /// Install `pack_name` into `repo_root`.
    ///
    /// Files already written stay on disk if a later step fails; the registry
    /// and AGENTS.md are only touched once every file has been materialized.
    pub fn install(
        &self,
        repo_root: &Path,
        pack_name: &str,
        overwrite: bool,
    ) -> Result<InstallReport> {
        let pack = self.store.resolve(pack_name)?;
        let mut registry = Registry::load(repo_root);

        tracing::info!(pack = %pack.name, version = %pack.version, "installing");

        let files = self.materialize_files(&pack, repo_root, overwrite)?;
        let snippet = pack.read_snippet()?;

        registry.upsert(InstalledPack {
            name: pack.name.clone(),
            version: pack.version.clone(),
            source: Provenance::Builtin,
            installed_at: Utc::now(),
            agents_snippet: snippet,
            files: files.clone(),
        });
        registry.save(repo_root)?;

        let agents_md =
            agents_md::upsert_block(&repo_root.join(AGENTS_FILE), &registry.snippets())?;

        Ok(InstallReport {
            pack: pack.name,
            version: pack.version,
            files,
            agents_md,
        })
    }

    /// Installed packs for a repository
    pub fn list_installed(&self, repo_root: &Path) -> Vec<InstalledPack> {
        Registry::load(repo_root).list().to_vec()
    }

    /// Copy every declared file, in manifest order
    fn materialize_files(
        &self,
        pack: &Pack,
        repo_root: &Path,
        overwrite: bool,
    ) -> Result<Vec<FileRecord>> {
        let mut records = Vec::with_capacity(pack.files.len());

        for file in &pack.files {
            let source = pack.source_path(file);
            let content =
                std::fs::read_to_string(&source).map_err(|e| PromptkitError::FileRead {
                    path: source,
                    source: e,
                })?;

            let status: FileStatus =
                materialize::write_file(&repo_root.join(&file.target), &content, overwrite)?;
            tracing::debug!(file = %file.target, %status, "materialized");

            records.push(FileRecord {
                target: file.target.clone(),
                status,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents_md::{END_MARKER, HEADING, START_MARKER};
    use tempfile::TempDir;

    fn write_pack(packs_dir: &Path, name: &str, snippet: &str) {
        let pack_dir = packs_dir.join(name);
        std::fs::create_dir_all(pack_dir.join("templates")).unwrap();
        let lower = name.to_lowercase();
        std::fs::write(
            pack_dir.join("pack.json"),
            format!(
                r#"{{
  "name": "{name}",
  "version": "1.0.0",
  "description": "Pack {name}",
  "files": [{{ "source": "templates/{lower}.md", "target": "docs/{lower}.md" }}],
  "agents_entry": "AGENTS.snippet.md"
}}"#
            ),
        )
        .unwrap();
        std::fs::write(
            pack_dir.join(format!("templates/{lower}.md")),
            format!("# Template {name}\n"),
        )
        .unwrap();
        std::fs::write(pack_dir.join("AGENTS.snippet.md"), format!("{snippet}\n\n")).unwrap();
    }

    struct Fixture {
        packs: TempDir,
        repo: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let packs = TempDir::new().unwrap();
            write_pack(packs.path(), "A", "Pack A instructions");
            write_pack(packs.path(), "B", "Pack B instructions");
            Self {
                packs,
                repo: TempDir::new().unwrap(),
            }
        }

        fn installer(&self) -> PackInstaller {
            PackInstaller::new(self.packs.path())
        }

        fn agents_md(&self) -> String {
            std::fs::read_to_string(self.repo.path().join("AGENTS.md")).unwrap()
        }
    }

    #[test]
    fn test_install_into_empty_repository() {
        let fx = Fixture::new();
        let report = fx.installer().install(fx.repo.path(), "A", false).unwrap();

        assert_eq!(report.pack, "A");
        assert_eq!(report.version, "1.0.0");
        assert_eq!(
            report.files,
            vec![FileRecord {
                target: "docs/a.md".into(),
                status: FileStatus::Created,
            }]
        );
        assert_eq!(report.agents_md, BlockStatus::Created);

        assert_eq!(
            std::fs::read_to_string(fx.repo.path().join("docs/a.md")).unwrap(),
            "# Template A\n"
        );

        let registry = Registry::load(fx.repo.path());
        assert_eq!(registry.packs.len(), 1);
        let record = &registry.packs[0];
        assert_eq!(record.name, "A");
        assert_eq!(record.version, "1.0.0");
        assert_eq!(record.source, Provenance::Builtin);
        assert_eq!(record.agents_snippet, "Pack A instructions\n");
        assert_eq!(record.files, report.files);

        let doc = fx.agents_md();
        assert_eq!(
            doc,
            format!("{START_MARKER}\n{HEADING}\n\nPack A instructions\n{END_MARKER}\n")
        );
    }

    #[test]
    fn test_second_pack_keeps_both_snippets() {
        let fx = Fixture::new();
        let installer = fx.installer();
        installer.install(fx.repo.path(), "A", false).unwrap();
        let report = installer.install(fx.repo.path(), "B", false).unwrap();

        assert_eq!(report.agents_md, BlockStatus::Updated);
        let doc = fx.agents_md();
        let a = doc.find("Pack A instructions").unwrap();
        let b = doc.find("Pack B instructions").unwrap();
        assert!(a < b);
        assert_eq!(doc.matches(START_MARKER).count(), 1);
    }

    #[test]
    fn test_reinstall_without_overwrite() {
        let fx = Fixture::new();
        let installer = fx.installer();
        installer.install(fx.repo.path(), "A", false).unwrap();
        std::fs::write(fx.repo.path().join("docs/a.md"), "local edits").unwrap();

        let report = installer.install(fx.repo.path(), "A", false).unwrap();
        assert_eq!(report.files[0].status, FileStatus::Unchanged);
        assert_eq!(
            std::fs::read_to_string(fx.repo.path().join("docs/a.md")).unwrap(),
            "local edits"
        );

        let registry = Registry::load(fx.repo.path());
        assert_eq!(registry.packs.len(), 1);
        assert_eq!(registry.packs[0].files[0].status, FileStatus::Unchanged);
        assert_eq!(fx.agents_md().matches("Pack A instructions").count(), 1);
    }

    #[test]
    fn test_reinstall_with_overwrite() {
        let fx = Fixture::new();
        let installer = fx.installer();
        installer.install(fx.repo.path(), "A", false).unwrap();
        std::fs::write(fx.repo.path().join("docs/a.md"), "local edits").unwrap();

        let report = installer.install(fx.repo.path(), "A", true).unwrap();
        assert_eq!(report.files[0].status, FileStatus::Overwritten);
        assert_eq!(
            std::fs::read_to_string(fx.repo.path().join("docs/a.md")).unwrap(),
            "# Template A\n"
        );
    }

    #[test]
    fn test_reinstall_moves_record_to_end() {
        let fx = Fixture::new();
        let installer = fx.installer();
        installer.install(fx.repo.path(), "A", false).unwrap();
        installer.install(fx.repo.path(), "B", false).unwrap();
        installer.install(fx.repo.path(), "A", false).unwrap();

        let names: Vec<String> = installer
            .list_installed(fx.repo.path())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);

        let doc = fx.agents_md();
        let b = doc.find("Pack B instructions").unwrap();
        let a = doc.find("Pack A instructions").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_existing_agents_md_content_preserved() {
        let fx = Fixture::new();
        std::fs::write(fx.repo.path().join("AGENTS.md"), "# House rules\n\nBe kind.\n").unwrap();

        let report = fx.installer().install(fx.repo.path(), "A", false).unwrap();
        assert_eq!(report.agents_md, BlockStatus::Updated);

        let doc = fx.agents_md();
        assert!(doc.starts_with("# House rules\n\nBe kind.\n\n<!-- promptkit:start -->"));
    }

    #[test]
    fn test_missing_pack_changes_nothing() {
        let fx = Fixture::new();
        let err = fx.installer().install(fx.repo.path(), "nope", false).unwrap_err();

        assert!(matches!(err, PromptkitError::PackNotFound(_)));
        assert!(!fx.repo.path().join("AGENTS.md").exists());
        assert!(!Registry::path(fx.repo.path()).exists());
    }

    #[test]
    fn test_corrupt_registry_is_replaced_on_install() {
        let fx = Fixture::new();
        let path = Registry::path(fx.repo.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "garbage").unwrap();

        fx.installer().install(fx.repo.path(), "A", false).unwrap();
        let registry = Registry::try_load(fx.repo.path()).unwrap();
        assert_eq!(registry.packs.len(), 1);
    }

    #[test]
    fn test_failed_file_write_leaves_registry_untouched() {
        let fx = Fixture::new();
        // `docs` as a regular file blocks creation of docs/a.md
        std::fs::write(fx.repo.path().join("docs"), "").unwrap();

        let err = fx.installer().install(fx.repo.path(), "A", false).unwrap_err();
        assert!(matches!(err, PromptkitError::FileWrite { .. }));
        assert!(!Registry::path(fx.repo.path()).exists());
        assert!(!fx.repo.path().join("AGENTS.md").exists());
    }

    /// Pack "multi" with two templates: docs/first.md then blocked/second.md
    fn write_two_file_pack(packs_dir: &Path) -> std::path::PathBuf {
        let pack_dir = packs_dir.join("multi");
        std::fs::create_dir_all(pack_dir.join("templates")).unwrap();
        std::fs::write(
            pack_dir.join("pack.json"),
            r#"{
  "name": "multi",
  "version": "1.0.0",
  "description": "Two files",
  "files": [
    { "source": "templates/first.md", "target": "docs/first.md" },
    { "source": "templates/second.md", "target": "blocked/second.md" }
  ],
  "agents_entry": "AGENTS.snippet.md"
}"#,
        )
        .unwrap();
        std::fs::write(pack_dir.join("templates/first.md"), "first\n").unwrap();
        std::fs::write(pack_dir.join("templates/second.md"), "second\n").unwrap();
        std::fs::write(pack_dir.join("AGENTS.snippet.md"), "Multi instructions\n").unwrap();
        pack_dir
    }

    #[test]
    fn test_partial_failure_keeps_earlier_files() {
        let fx = Fixture::new();
        write_two_file_pack(fx.packs.path());
        // `blocked` as a regular file stops the second template from being written
        std::fs::write(fx.repo.path().join("blocked"), "").unwrap();

        let err = fx.installer().install(fx.repo.path(), "multi", false).unwrap_err();
        assert!(matches!(err, PromptkitError::FileWrite { .. }));

        assert_eq!(
            std::fs::read_to_string(fx.repo.path().join("docs/first.md")).unwrap(),
            "first\n"
        );
        assert!(!Registry::path(fx.repo.path()).exists());
        assert!(!fx.repo.path().join("AGENTS.md").exists());
    }

    #[test]
    fn test_missing_template_source_fails_before_registry() {
        let fx = Fixture::new();
        let pack_dir = write_two_file_pack(fx.packs.path());
        std::fs::remove_file(pack_dir.join("templates/second.md")).unwrap();

        let err = fx.installer().install(fx.repo.path(), "multi", false).unwrap_err();
        assert!(matches!(err, PromptkitError::FileRead { .. }));
        assert!(err.to_string().starts_with("Failed to read"));

        assert!(fx.repo.path().join("docs/first.md").exists());
        assert!(!Registry::path(fx.repo.path()).exists());
        assert!(!fx.repo.path().join("AGENTS.md").exists());
    }

    #[test]
    fn test_missing_snippet_fails_before_registry() {
        let fx = Fixture::new();
        let pack_dir = write_two_file_pack(fx.packs.path());
        std::fs::remove_file(pack_dir.join("AGENTS.snippet.md")).unwrap();

        let err = fx.installer().install(fx.repo.path(), "multi", false).unwrap_err();
        assert!(matches!(err, PromptkitError::FileRead { .. }));
        assert!(!Registry::path(fx.repo.path()).exists());
        assert!(!fx.repo.path().join("AGENTS.md").exists());
    }

    #[test]
    fn test_snippet_with_marker_leaves_registry_untouched() {
        let fx = Fixture::new();
        let pack_dir = write_two_file_pack(fx.packs.path());
        std::fs::write(
            pack_dir.join("AGENTS.snippet.md"),
            "<!-- promptkit:end -->\nsurprise\n",
        )
        .unwrap();

        let err = fx.installer().install(fx.repo.path(), "multi", false).unwrap_err();
        assert!(matches!(err, PromptkitError::InvalidManifest { .. }));
        assert!(!Registry::path(fx.repo.path()).exists());
    }

    #[test]
    fn test_builtin_execplan_pack() {
        let repo = TempDir::new().unwrap();
        let installer = PackInstaller::new(&crate::config::builtin_packs_dir());

        let report = installer.install(repo.path(), "execplan", false).unwrap();
        assert_eq!(report.files[0].target, ".agent/PLANS.md");
        assert!(repo.path().join(".agent/PLANS.md").exists());
        assert!(std::fs::read_to_string(repo.path().join("AGENTS.md"))
            .unwrap()
            .contains("## ExecPlans"));
    }
}
