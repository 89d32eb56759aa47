//! The directories and files one scaffold run produces.

use std::path::{Path, PathBuf};

use hamlet_core::{CollisionPolicy, NamingContext, Profile};

use crate::context::TemplateOptions;
use crate::templates;

pub const MIGRATION_DIR: &str = "db/migrate";

/// One file to render and write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub template: String,
    pub destination: PathBuf,
    /// Replaces the run's collision policy for this file.
    pub policy: Option<CollisionPolicy>,
    /// Shared with other scaffolds; never removed by destroy.
    pub shared: bool,
}

impl PlannedFile {
    fn new(template: impl Into<String>, destination: PathBuf) -> Self {
        Self {
            template: template.into(),
            destination,
            policy: None,
            shared: false,
        }
    }

    fn skip_existing(mut self) -> Self {
        self.policy = Some(CollisionPolicy::Skip);
        self
    }

    fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn policy_or(&self, default: CollisionPolicy) -> CollisionPolicy {
        self.policy.unwrap_or(default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldManifest {
    pub directories: Vec<PathBuf>,
    pub files: Vec<PlannedFile>,
}

/// `(view name, template id)` pairs for the configured profile and form type.
pub fn scaffold_views(options: &TemplateOptions) -> Vec<(&'static str, String)> {
    let mut views: Vec<(&'static str, String)> = match options.profile {
        Profile::Full => vec!["index", "show", "new", "edit", "_list"],
        Profile::Simple => vec!["index", "show", "new", "edit"],
    }
    .into_iter()
    .map(|view| (view, format!("views/{}.html.haml", view)))
    .collect();

    views.push((
        "_form",
        format!("{}{}.html.haml", templates::FORM_PREFIX, options.form_type.as_str()),
    ));
    views
}

impl ScaffoldManifest {
    /// Plans a scaffold; `migration` is the migration destination, or `None`
    /// when no migration is wanted.
    pub fn plan(naming: &NamingContext, options: &TemplateOptions, migration: Option<PathBuf>) -> Self {
        let model_path = &naming.module_path;
        let controller_path = &naming.controller.class_path;
        let controller_file = &naming.controller.file_name;
        let views_dir = nested("app/views", controller_path).join(controller_file);

        let mut directories = vec![
            nested("app/models", model_path),
            nested("app/controllers", controller_path),
        ];
        if options.include_helper {
            directories.push(nested("app/helpers", controller_path));
        }
        directories.push(views_dir.clone());
        directories.push(nested("test/functional", controller_path));
        directories.push(nested("test/unit", model_path));
        if options.include_helper {
            directories.push(nested("test/unit/helpers", controller_path));
        }
        directories.push(PathBuf::from("app/views/layouts"));
        directories.push(PathBuf::from("test/fixtures"));
        if migration.is_some() {
            directories.push(PathBuf::from(MIGRATION_DIR));
        }
        if options.profile == Profile::Simple {
            directories.push(PathBuf::from("public/stylesheets"));
        }

        let mut files: Vec<PlannedFile> = scaffold_views(options)
            .into_iter()
            .map(|(view, template)| {
                PlannedFile::new(template, views_dir.join(format!("{}.html.haml", view)))
            })
            .collect();

        files.push(PlannedFile::new(
            format!("{}{}.rb", templates::CONTROLLER_PREFIX, options.controller_type.as_str()),
            nested("app/controllers", controller_path)
                .join(format!("{}_controller.rb", controller_file)),
        ));
        files.push(PlannedFile::new(
            templates::MODEL,
            nested("app/models", model_path).join(format!("{}.rb", naming.file_name)),
        ));
        if options.include_helper {
            files.push(PlannedFile::new(
                templates::HELPER,
                nested("app/helpers", controller_path)
                    .join(format!("{}_helper.rb", controller_file)),
            ));
            files.push(PlannedFile::new(
                templates::HELPER_TEST,
                nested("test/unit/helpers", controller_path)
                    .join(format!("{}_helper_test.rb", controller_file)),
            ));
        }
        files.push(PlannedFile::new(
            templates::FUNCTIONAL_TEST,
            nested("test/functional", controller_path)
                .join(format!("{}_controller_test.rb", controller_file)),
        ));
        files.push(
            PlannedFile::new(
                templates::LAYOUT,
                PathBuf::from("app/views/layouts/application.html.haml"),
            )
            .skip_existing()
            .shared(),
        );

        files.push(
            PlannedFile::new(
                templates::UNIT_TEST,
                nested("test/unit", model_path).join(format!("{}_test.rb", naming.file_name)),
            )
            .skip_existing(),
        );
        files.push(
            PlannedFile::new(
                templates::FIXTURES,
                Path::new("test/fixtures").join(format!("{}.yml", naming.table_name)),
            )
            .skip_existing(),
        );
        if let Some(migration) = migration {
            files.push(PlannedFile::new(templates::MIGRATION, migration).skip_existing());
        }

        if options.profile == Profile::Simple {
            files.push(
                PlannedFile::new(
                    templates::STYLESHEET,
                    PathBuf::from("public/stylesheets/scaffold.css"),
                )
                .skip_existing()
                .shared(),
            );
        }

        Self { directories, files }
    }

    /// Directories that may be pruned on destroy, deepest first.
    pub fn removable_directories(&self) -> Vec<PathBuf> {
        let mut directories = self.directories.clone();
        directories.sort_by(|a, b| {
            b.components()
                .count()
                .cmp(&a.components().count())
                .then_with(|| a.cmp(b))
        });
        directories.dedup();
        directories
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.destination.as_path())
    }
}

/// File name of a new migration for `table_name`.
pub fn migration_file_name(version: &str, table_name: &str) -> String {
    format!("{}_create_{}.rb", version, table_name)
}

/// Whether `file_name` is a create migration for `table_name`.
pub fn is_create_migration(file_name: &str, table_name: &str) -> bool {
    let suffix = format!("_create_{}.rb", table_name);
    file_name
        .strip_suffix(&suffix)
        .is_some_and(|version| !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()))
}

fn nested(base: &str, segments: &[String]) -> PathBuf {
    let mut path = PathBuf::from(base);
    for segment in segments {
        path.push(segment);
    }
    path
}
