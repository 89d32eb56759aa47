//! Finds Ruby classes and modules already declared in a project.
//!
//! Nesting is inferred from indentation: a declaration is nested inside the
//! closest preceding declaration with a smaller indent.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hamlet_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Directories scanned for declarations, relative to the project root.
pub const SCANNED_DIRS: [&str; 2] = ["app", "lib"];

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:class|module)\s+((?:::)?[A-Z]\w*(?:::[A-Z]\w*)*)")
        .expect("valid regex")
});

/// Fully qualified constant name -> files declaring it
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    declarations: BTreeMap<String, Vec<PathBuf>>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every `.rb` file under `app/` and `lib/`.
    pub fn scan(project_root: &Path) -> Result<Self> {
        let mut index = Self::new();
        for dir in SCANNED_DIRS {
            let dir = project_root.join(dir);
            if dir.is_dir() {
                index.scan_dir(project_root, &dir)?;
            }
        }
        debug!(declarations = index.declarations.len(), "indexed project classes");
        Ok(index)
    }

    fn scan_dir(&mut self, project_root: &Path, dir: &Path) -> Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.scan_dir(project_root, &path)?;
            } else if path.extension().is_some_and(|ext| ext == "rb") {
                // Non-UTF-8 sources are indexed lossily.
                let bytes = fs::read(&path)?;
                let relative = path.strip_prefix(project_root).unwrap_or(&path);
                self.index_source(relative, &String::from_utf8_lossy(&bytes));
            }
        }
        Ok(())
    }

    /// Records the declarations in one Ruby source file.
    pub fn index_source(&mut self, path: &Path, source: &str) {
        let mut scopes: Vec<(usize, String)> = Vec::new();

        for line in source.lines() {
            let Some(captures) = DECLARATION.captures(line) else {
                continue;
            };
            let indent = captures[1].len();
            let name = &captures[2];

            while scopes.last().is_some_and(|(scope_indent, _)| *scope_indent >= indent) {
                scopes.pop();
            }

            let qualified = match (name.strip_prefix("::"), scopes.last()) {
                (Some(absolute), _) => absolute.to_string(),
                (None, Some((_, parent))) => format!("{}::{}", parent, name),
                (None, None) => name.to_string(),
            };

            let paths = self.declarations.entry(qualified.clone()).or_default();
            if !paths.iter().any(|existing| existing == path) {
                paths.push(path.to_path_buf());
            }
            scopes.push((indent, qualified));
        }
    }

    /// Files declaring `class_name`.
    pub fn find(&self, class_name: &str) -> &[PathBuf] {
        self.declarations
            .get(class_name.trim_start_matches("::"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, class_name: &str) -> bool {
        !self.find(class_name).is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }
}
