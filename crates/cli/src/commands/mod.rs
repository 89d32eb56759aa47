pub mod routes;
pub mod scaffold;

use std::path::PathBuf;

use hamlet_codegen::ScaffoldGenerator;
use hamlet_core::{HamletConfig, Result};
use tracing::debug;

/// The Rails project a command runs against
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    /// Explicit configuration file; `<root>/.hamlet/config.yaml` otherwise.
    pub config_path: Option<PathBuf>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_path,
        }
    }

    pub fn load_config(&self) -> Result<HamletConfig> {
        match &self.config_path {
            Some(path) => HamletConfig::load(path),
            None => HamletConfig::load_from_project(&self.root),
        }
    }

    pub fn generator(&self) -> Result<ScaffoldGenerator> {
        let config = self.load_config()?;
        debug!(root = %self.root.display(), profile = %config.profile, "project loaded");
        ScaffoldGenerator::new(&self.root, config)
    }
}
