//! Locating the Profile and PermissionSet inputs in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use permerge_types::{Document, DocumentKind};
use tracing::debug;
use walkdir::WalkDir;

/// A parsed input file.
#[derive(Debug)]
pub struct Input {
    pub path: PathBuf,
    pub document: Document,
}

impl Input {
    /// Read and parse `path`; fails if it is not a `kind` document.
    pub fn load(path: &Path, kind: DocumentKind) -> anyhow::Result<Self> {
        let document = read_document(path)?;
        document
            .expect_kind(kind)
            .with_context(|| format!("{} is not a {kind}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Permission documents found directly inside one directory, by kind.
#[derive(Debug, Default)]
pub struct Discovered {
    pub profiles: Vec<Input>,
    pub permission_sets: Vec<Input>,
}

impl Discovered {
    /// Scan `dir` (not recursively) for `*.xml` files, in file name order.
    ///
    /// Files that cannot be read or parsed, or whose root is neither kind, are
    /// skipped. Paths in `exclude` are never considered.
    pub fn scan(dir: &Path, exclude: &[PathBuf]) -> anyhow::Result<Self> {
        let mut found = Self::default();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_xml_extension(path) {
                continue;
            }
            if exclude.iter().any(|e| same_file(e, path)) {
                debug!(path = %path.display(), "excluded from discovery");
                continue;
            }
            let document = match read_document(path) {
                Ok(document) => document,
                Err(err) => {
                    debug!(path = %path.display(), error = %format!("{err:#}"), "skipping file");
                    continue;
                }
            };
            debug!(path = %path.display(), kind = %document.kind, "discovered");
            let input = Input {
                path: path.to_path_buf(),
                document,
            };
            match input.document.kind {
                DocumentKind::Profile => found.profiles.push(input),
                DocumentKind::PermissionSet => found.permission_sets.push(input),
            }
        }
        Ok(found)
    }

    /// The single document of `kind`, or an error naming how many were found.
    pub fn take_one(&mut self, kind: DocumentKind) -> anyhow::Result<Input> {
        let inputs = match kind {
            DocumentKind::Profile => &mut self.profiles,
            DocumentKind::PermissionSet => &mut self.permission_sets,
        };
        if inputs.len() != 1 {
            bail!(
                "expected exactly one {kind} XML, found {}; \
                 place exactly ONE Profile and ONE PermissionSet XML in the folder",
                inputs.len()
            );
        }
        Ok(inputs.remove(0))
    }
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    permerge_xml::parse_document(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Profile xmlns="http://soap.sforce.com/2006/04/metadata"><custom>false</custom></Profile>"#;
    const PERMISSION_SET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PermissionSet xmlns="http://soap.sforce.com/2006/04/metadata"><label>Sales</label></PermissionSet>"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn finds_one_of_each() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Admin.profile-meta.xml", PROFILE);
        write(dir.path(), "Sales.permissionset-meta.XML", PERMISSION_SET);
        write(dir.path(), "notes.txt", PROFILE);

        let mut found = Discovered::scan(dir.path(), &[]).unwrap();
        assert_eq!(
            found.take_one(DocumentKind::Profile).unwrap().file_name(),
            "Admin.profile-meta.xml"
        );
        assert_eq!(
            found.take_one(DocumentKind::PermissionSet).unwrap().file_name(),
            "Sales.permissionset-meta.XML"
        );
    }

    #[test]
    fn skips_unparseable_and_foreign_xml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.xml", "<Profile><unclosed></Profile>");
        write(dir.path(), "b.xml", "<CustomObject/>");
        write(dir.path(), "c.xml", PROFILE);

        let found = Discovered::scan(dir.path(), &[]).unwrap();
        assert_eq!(found.profiles.len(), 1);
        assert!(found.permission_sets.is_empty());
    }

    #[test]
    fn does_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "p.xml", PROFILE);

        let found = Discovered::scan(dir.path(), &[]).unwrap();
        assert!(found.profiles.is_empty());
    }

    #[test]
    fn wrong_count_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "p1.xml", PROFILE);
        write(dir.path(), "p2.xml", PROFILE);

        let mut found = Discovered::scan(dir.path(), &[]).unwrap();
        let err = found.take_one(DocumentKind::Profile).unwrap_err();
        assert!(err.to_string().contains("found 2"));
        let err = found.take_one(DocumentKind::PermissionSet).unwrap_err();
        assert!(err.to_string().contains("found 0"));
    }

    #[test]
    fn excluded_paths_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Sales.xml", PERMISSION_SET);
        let merged = write(dir.path(), "Merged.permissionset-meta.xml", PERMISSION_SET);

        let mut found = Discovered::scan(dir.path(), &[merged]).unwrap();
        let pset = found.take_one(DocumentKind::PermissionSet).unwrap();
        assert_eq!(pset.file_name(), "Sales.xml");
    }

    #[test]
    fn load_checks_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "p.xml", PROFILE);
        assert!(Input::load(&path, DocumentKind::Profile).is_ok());
        assert!(Input::load(&path, DocumentKind::PermissionSet).is_err());
    }
}
