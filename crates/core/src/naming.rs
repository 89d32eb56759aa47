//! Name resolution: every class name and path variant a scaffold needs,
//! derived from the single model name given on the command line.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{HamletError, Result};
use crate::inflector::{self, Inflector};

/// Name variants for the controller side, derived from the pluralized name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerIdentity {
    /// `Admin::Widgets`
    pub class_name: String,
    /// `Widgets`
    pub class_name_without_nesting: String,
    /// `["admin"]`
    pub class_path: Vec<String>,
    /// `admin/widgets`
    pub file_path: String,
    /// `Admin`
    pub class_nesting: String,
    pub nesting_depth: usize,
    /// `widgets`
    pub underscore_name: String,
    /// Same as `underscore_name`, used for file names.
    pub file_name: String,
    /// `widget`
    pub singular_name: String,
    /// `widgets`
    pub plural_name: String,
    /// Same as `plural_name`.
    pub table_name: String,
}

/// Every name variant derived from one generator invocation.
///
/// `raw_input` is not compared by `PartialEq`: a plural input that gets
/// normalized resolves to the same context as its singular form.
#[derive(Debug, Clone, Serialize)]
pub struct NamingContext {
    pub raw_input: String,
    /// The input after plural normalization.
    pub name: String,
    pub singular_name: String,
    pub plural_name: String,
    /// Underscored module segments, for paths.
    pub module_path: Vec<String>,
    /// Camelized module segments, for class names.
    pub class_nesting: Vec<String>,
    pub nesting_depth: usize,
    pub class_name: String,
    pub class_name_without_nesting: String,
    /// The class name without its modules.
    pub model_name: String,
    pub underscore_name: String,
    pub file_name: String,
    pub file_path: String,
    pub table_name: String,
    pub controller: ControllerIdentity,
    pub application_name: String,
}

impl PartialEq for NamingContext {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.singular_name == other.singular_name
            && self.plural_name == other.plural_name
            && self.module_path == other.module_path
            && self.class_nesting == other.class_nesting
            && self.nesting_depth == other.nesting_depth
            && self.class_name == other.class_name
            && self.class_name_without_nesting == other.class_name_without_nesting
            && self.model_name == other.model_name
            && self.underscore_name == other.underscore_name
            && self.file_name == other.file_name
            && self.file_path == other.file_path
            && self.table_name == other.table_name
            && self.controller == other.controller
            && self.application_name == other.application_name
    }
}

impl Eq for NamingContext {}

impl NamingContext {
    /// Module path joined for use under a directory, empty when not nested.
    pub fn class_path(&self) -> String {
        self.module_path.join("/")
    }
}

/// A name split into its modules and base name
#[derive(Debug, Clone, PartialEq, Eq)]
struct ModuleSplit {
    base_name: String,
    class_path: Vec<String>,
    file_path: String,
    class_nesting: String,
    nesting_segments: Vec<String>,
    nesting_depth: usize,
}

/// Derives a [`NamingContext`] from a raw model name
pub struct NameResolver<'a> {
    inflector: &'a dyn Inflector,
    application_name: String,
}

impl<'a> NameResolver<'a> {
    pub fn new(inflector: &'a dyn Inflector) -> Self {
        Self {
            inflector,
            application_name: String::new(),
        }
    }

    /// Sets the application name from the project root's directory name.
    pub fn with_project_root(mut self, project_root: &Path) -> Self {
        let basename = project_root
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(project_root)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        self.application_name = inflector::humanize(&basename);
        self
    }

    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = application_name.into();
        self
    }

    pub fn resolve(&self, raw_input: &str, force_plural: bool) -> Result<NamingContext> {
        validate_name(raw_input)?;

        let mut name = raw_input.to_string();
        if self.inflector.pluralize(&name) == name && !force_plural {
            let singular = self.inflector.singularize(&name);
            if singular != name {
                warn!(
                    input = %raw_input,
                    singular = %singular,
                    "Plural version of the model detected, using singularized version. Override with --force-plural."
                );
            }
            name = singular;
        }

        let model = self.extract_modules(&name);
        let (class_name_without_nesting, singular_name, plural_name) =
            self.inflect_names(&model.base_name);

        let (class_name, table_name) = if model.nesting_depth == 0 {
            (class_name_without_nesting.clone(), plural_name.clone())
        } else {
            (
                format!("{}::{}", model.class_nesting, class_name_without_nesting),
                format!(
                    "{}_{}",
                    inflector::underscore(&model.class_nesting).replace('/', "_"),
                    plural_name
                ),
            )
        };

        let controller = self.controller_identity(&name);
        debug!(
            class_name = %class_name,
            controller = %controller.class_name,
            "resolved scaffold names"
        );

        Ok(NamingContext {
            raw_input: raw_input.to_string(),
            underscore_name: inflector::underscore(&name),
            file_name: singular_name.clone(),
            file_path: model.file_path,
            model_name: inflector::demodulize(&class_name),
            module_path: model.class_path,
            class_nesting: model.nesting_segments,
            nesting_depth: model.nesting_depth,
            class_name,
            class_name_without_nesting,
            singular_name,
            plural_name,
            table_name,
            controller,
            application_name: self.application_name.clone(),
            name,
        })
    }

    fn controller_identity(&self, name: &str) -> ControllerIdentity {
        let controller_name = self.inflector.pluralize(name);
        let split = self.extract_modules(&controller_name);
        let (class_name_without_nesting, underscore_name, plural_name) =
            self.inflect_names(&split.base_name);
        let singular_name = self.inflector.singularize(&split.base_name);

        let class_name = if split.nesting_depth == 0 {
            class_name_without_nesting.clone()
        } else {
            format!("{}::{}", split.class_nesting, class_name_without_nesting)
        };

        ControllerIdentity {
            class_name,
            class_name_without_nesting,
            class_path: split.class_path,
            file_path: split.file_path,
            class_nesting: split.class_nesting,
            nesting_depth: split.nesting_depth,
            file_name: underscore_name.clone(),
            underscore_name,
            singular_name: inflector::underscore(&singular_name),
            table_name: plural_name.clone(),
            plural_name,
        }
    }

    fn extract_modules(&self, name: &str) -> ModuleSplit {
        let mut modules = split_segments(name);
        let base_name = modules.pop().unwrap_or_default();
        let class_path: Vec<String> = modules.iter().map(|m| inflector::underscore(m)).collect();
        let file_path = class_path
            .iter()
            .cloned()
            .chain(std::iter::once(inflector::underscore(&base_name)))
            .collect::<Vec<_>>()
            .join("/");
        let nesting_segments: Vec<String> =
            modules.iter().map(|m| inflector::camelize(m)).collect();

        ModuleSplit {
            base_name,
            nesting_depth: modules.len(),
            class_nesting: nesting_segments.join("::"),
            nesting_segments,
            class_path,
            file_path,
        }
    }

    /// Returns the camelized class name, underscored singular and plural.
    fn inflect_names(&self, base_name: &str) -> (String, String, String) {
        let underscore = inflector::underscore(base_name);
        let plural = self.inflector.pluralize(&underscore);
        (inflector::camelize(base_name), underscore, plural)
    }
}

fn split_segments(name: &str) -> Vec<String> {
    if name.contains('/') {
        name.split('/').map(str::to_string).collect()
    } else {
        name.split("::").map(str::to_string).collect()
    }
}

fn validate_name(raw_input: &str) -> Result<()> {
    if raw_input.trim().is_empty() {
        return Err(HamletError::invalid_name(raw_input, "the model name must not be empty"));
    }

    for segment in split_segments(raw_input) {
        let mut chars = segment.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(HamletError::invalid_name(
                raw_input,
                format!("'{}' is not a valid class or module name", segment),
            ));
        }
    }

    Ok(())
}
