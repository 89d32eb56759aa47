//! Project-level configuration, read from `.hamlet/config.yaml`.
//!
//! Every section is optional; missing keys fall back to `Default`. Command
//! line flags are applied on top by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HamletError, Result};
use crate::inflector::Inflections;

/// Default location of the configuration file, relative to the project root.
pub const CONFIG_FILE: &str = ".hamlet/config.yaml";

/// Marker line that starts the route declarations in `config/routes.rb`.
pub const DEFAULT_ROUTES_SENTINEL: &str = "ActionController::Routing::Routes.draw do |map|";

pub const DEFAULT_ROUTES_FILE: &str = "config/routes.rb";

pub const DEFAULT_SCOPE_EVERYTHING_FIELD: &str = "company_id";

/// What to do when a destination file exists with different content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    Overwrite,
    Skip,
    #[default]
    #[serde(alias = "fail")]
    FailOnConflict,
}

impl FromStr for CollisionPolicy {
    type Err = HamletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "overwrite" | "force" => Ok(CollisionPolicy::Overwrite),
            "skip" => Ok(CollisionPolicy::Skip),
            "fail" | "fail_on_conflict" => Ok(CollisionPolicy::FailOnConflict),
            _ => Err(HamletError::configuration(format!(
                "unknown collision policy '{}', expected overwrite, skip or fail",
                s
            ))),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self {
            CollisionPolicy::Overwrite => "overwrite",
            CollisionPolicy::Skip => "skip",
            CollisionPolicy::FailOnConflict => "fail",
        };
        write!(f, "{}", policy)
    }
}

/// How the route patcher treats a declaration that is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteInsertMode {
    /// Always insert, even if the same line exists.
    #[default]
    Always,
    /// Leave the file alone when the exact line already exists.
    Unique,
}

impl FromStr for RouteInsertMode {
    type Err = HamletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(RouteInsertMode::Always),
            "unique" => Ok(RouteInsertMode::Unique),
            _ => Err(HamletError::configuration(format!(
                "unknown route insert mode '{}', expected always or unique",
                s
            ))),
        }
    }
}

/// Which set of files a scaffold produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// index, show, new, edit, _list and _form views.
    #[default]
    Full,
    /// index, show, new, edit and _form views plus a scaffold stylesheet.
    Simple,
}

impl FromStr for Profile {
    type Err = HamletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Profile::Full),
            "simple" => Ok(Profile::Simple),
            _ => Err(HamletError::configuration(format!(
                "unknown profile '{}', expected full or simple",
                s
            ))),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Full => write!(f, "full"),
            Profile::Simple => write!(f, "simple"),
        }
    }
}

/// Optional companion libraries the target project uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Adds `created_by` / `updated_by` columns.
    pub userstamps: bool,
    /// Adds the scoping column named by `scope_everything_field`.
    pub scope_everything: bool,
    pub scope_everything_field: String,
    /// Controllers inherit from `InheritedResources::Base`.
    pub inherited_resources: bool,
    /// Forms use `semantic_form_for`.
    pub formtastic: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            userstamps: false,
            scope_everything: false,
            scope_everything_field: DEFAULT_SCOPE_EVERYTHING_FIELD.to_string(),
            inherited_resources: false,
            formtastic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub file: PathBuf,
    pub sentinel: String,
    pub insert_mode: RouteInsertMode,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_ROUTES_FILE),
            sentinel: DEFAULT_ROUTES_SENTINEL.to_string(),
            insert_mode: RouteInsertMode::default(),
        }
    }
}

/// Project-specific additions to the English inflections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflectionsConfig {
    /// `[singular, plural]` pairs.
    pub irregular: Vec<(String, String)>,
    pub uncountable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamletConfig {
    pub capabilities: Capabilities,
    pub profile: Profile,
    pub collision: CollisionPolicy,
    pub routes: RoutesConfig,
    pub inflections: InflectionsConfig,
}

impl HamletConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: HamletConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file at `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads `<project_root>/.hamlet/config.yaml`.
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        Self::load(&project_root.join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.routes.sentinel.trim().is_empty() {
            return Err(HamletError::configuration("routes.sentinel must not be empty"));
        }
        if self.routes.sentinel.contains('\n') {
            return Err(HamletError::configuration("routes.sentinel must be a single line"));
        }

        let field = &self.capabilities.scope_everything_field;
        let valid_field = field
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_field {
            return Err(HamletError::configuration(format!(
                "capabilities.scope_everything_field '{}' is not a column name",
                field
            )));
        }

        Ok(())
    }

    /// English inflections extended with the configured words.
    pub fn inflector(&self) -> Result<Inflections> {
        let mut inflections = Inflections::english();
        for (singular, plural) in &self.inflections.irregular {
            inflections.irregular(singular, plural)?;
        }
        for word in &self.inflections.uncountable {
            inflections.uncountable(word);
        }
        Ok(inflections)
    }
}
