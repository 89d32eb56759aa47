use hamlet_core::{CollisionPolicy, HamletError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened to a single destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Create,
    Exists,
    Identical,
    Force,
    Skip,
    Remove,
    RemoveDir,
    NotEmpty,
    Missing,
    Route,
}

impl FileAction {
    pub fn label(&self) -> &'static str {
        match self {
            FileAction::Create => "create",
            FileAction::Exists => "exists",
            FileAction::Identical => "identical",
            FileAction::Force => "force",
            FileAction::Skip => "skip",
            FileAction::Remove => "rm",
            FileAction::RemoveDir => "rmdir",
            FileAction::NotEmpty => "notempty",
            FileAction::Missing => "missing",
            FileAction::Route => "route",
        }
    }
}

/// Writes files below a project root, reporting each action Rails-style
pub struct CodeWriter {
    root: PathBuf,
    pretend: bool,
    quiet: bool,
}

impl CodeWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pretend: false,
            quiet: false,
        }
    }

    /// Report actions without touching the disk.
    pub fn pretend(mut self, pretend: bool) -> Self {
        self.pretend = pretend;
        self
    }

    /// Suppress status lines on stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_pretend(&self) -> bool {
        self.pretend
    }

    pub fn status(&self, action: FileAction, subject: &str) {
        debug!(action = action.label(), subject, pretend = self.pretend, "file action");
        if !self.quiet {
            println!("{:>12}  {}", action.label(), subject);
        }
    }

    pub fn exists(&self, relative: &Path) -> bool {
        self.root.join(relative).exists()
    }

    pub fn read(&self, relative: &Path) -> Result<Option<String>> {
        let path = self.root.join(relative);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    pub fn create_dir(&self, relative: &Path) -> Result<FileAction> {
        let path = self.root.join(relative);
        let action = if path.is_dir() {
            FileAction::Exists
        } else {
            if !self.pretend {
                fs::create_dir_all(&path)?;
            }
            FileAction::Create
        };
        self.status(action, &display(relative));
        Ok(action)
    }

    /// Writes `content`, deferring to `policy` when a different file is present.
    pub fn write_file(
        &self,
        relative: &Path,
        content: &str,
        policy: CollisionPolicy,
    ) -> Result<FileAction> {
        let path = self.root.join(relative);

        let action = if path.exists() {
            let existing = fs::read_to_string(&path)?;
            if existing == content {
                FileAction::Identical
            } else {
                match policy {
                    CollisionPolicy::Overwrite => FileAction::Force,
                    CollisionPolicy::Skip => FileAction::Skip,
                    CollisionPolicy::FailOnConflict => {
                        return Err(HamletError::FileConflict {
                            path: relative.to_path_buf(),
                        });
                    }
                }
            }
        } else {
            FileAction::Create
        };

        if matches!(action, FileAction::Create | FileAction::Force) && !self.pretend {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }

        self.status(action, &display(relative));
        Ok(action)
    }

    /// Replaces the content of an existing file without collision checks.
    pub fn update_file(&self, relative: &Path, content: &str) -> Result<()> {
        if !self.pretend {
            fs::write(self.root.join(relative), content)?;
        }
        Ok(())
    }

    pub fn remove_file(&self, relative: &Path) -> Result<FileAction> {
        let path = self.root.join(relative);
        let action = if path.is_file() {
            if !self.pretend {
                fs::remove_file(&path)?;
            }
            FileAction::Remove
        } else {
            FileAction::Missing
        };
        self.status(action, &display(relative));
        Ok(action)
    }

    pub fn remove_dir_if_empty(&self, relative: &Path) -> Result<FileAction> {
        let path = self.root.join(relative);
        let action = if !path.is_dir() {
            FileAction::Missing
        } else if fs::read_dir(&path)?.next().is_some() {
            FileAction::NotEmpty
        } else {
            if !self.pretend {
                fs::remove_dir(&path)?;
            }
            FileAction::RemoveDir
        };
        self.status(action, &display(relative));
        Ok(action)
    }
}

fn display(relative: &Path) -> String {
    relative.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer(temp_dir: &TempDir) -> CodeWriter {
        CodeWriter::new(temp_dir.path()).quiet(true)
    }

    #[test]
    fn test_create_then_identical() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir);
        let path = Path::new("app/models/widget.rb");

        assert_eq!(writer.write_file(path, "class Widget\nend\n", CollisionPolicy::FailOnConflict).unwrap(), FileAction::Create);
        assert_eq!(writer.write_file(path, "class Widget\nend\n", CollisionPolicy::FailOnConflict).unwrap(), FileAction::Identical);
        assert_eq!(fs::read_to_string(temp_dir.path().join(path)).unwrap(), "class Widget\nend\n");
    }

    #[test]
    fn test_collision_policies() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir);
        let path = Path::new("app/views/layouts/application.html.haml");
        writer.write_file(path, "original", CollisionPolicy::Skip).unwrap();

        assert_eq!(writer.write_file(path, "new", CollisionPolicy::Skip).unwrap(), FileAction::Skip);
        assert_eq!(writer.read(path).unwrap().as_deref(), Some("original"));

        assert!(matches!(
            writer.write_file(path, "new", CollisionPolicy::FailOnConflict),
            Err(HamletError::FileConflict { .. })
        ));
        assert_eq!(writer.read(path).unwrap().as_deref(), Some("original"));

        assert_eq!(writer.write_file(path, "new", CollisionPolicy::Overwrite).unwrap(), FileAction::Force);
        assert_eq!(writer.read(path).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_pretend_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir).pretend(true);

        assert_eq!(writer.create_dir(Path::new("app/models")).unwrap(), FileAction::Create);
        assert_eq!(writer.write_file(Path::new("app/models/widget.rb"), "x", CollisionPolicy::Overwrite).unwrap(), FileAction::Create);
        assert!(!temp_dir.path().join("app").exists());
    }

    #[test]
    fn test_remove_file_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir);
        writer.write_file(Path::new("app/views/widgets/index.html.haml"), "x", CollisionPolicy::Overwrite).unwrap();
        writer.write_file(Path::new("app/views/keep.txt"), "x", CollisionPolicy::Overwrite).unwrap();

        assert_eq!(writer.remove_file(Path::new("app/views/widgets/index.html.haml")).unwrap(), FileAction::Remove);
        assert_eq!(writer.remove_file(Path::new("app/views/widgets/index.html.haml")).unwrap(), FileAction::Missing);
        assert_eq!(writer.remove_dir_if_empty(Path::new("app/views/widgets")).unwrap(), FileAction::RemoveDir);
        assert_eq!(writer.remove_dir_if_empty(Path::new("app/views")).unwrap(), FileAction::NotEmpty);
        assert_eq!(writer.remove_dir_if_empty(Path::new("app/views/widgets")).unwrap(), FileAction::Missing);
    }

    #[test]
    fn test_create_dir_reports_existing() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir);
        assert_eq!(writer.create_dir(Path::new("app/models")).unwrap(), FileAction::Create);
        assert_eq!(writer.create_dir(Path::new("app/models")).unwrap(), FileAction::Exists);
    }
}
