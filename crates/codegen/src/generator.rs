use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hamlet_core::{
    parse_attributes, AttributeSpec, GenerationOptions, HamletConfig, HamletError, Inflections,
    NameResolver, NamingContext, Result,
};
use tracing::{debug, info, warn};

use crate::collisions::ClassIndex;
use crate::context::{TemplateContext, TemplateOptions};
use crate::manifest::{self, ScaffoldManifest, MIGRATION_DIR};
use crate::routes::{RouteEntry, RoutePatcher, POSITION_MEMBER_ROUTES};
use crate::templates::TemplateEngine;
use crate::writer::{CodeWriter, FileAction};

/// Project-local templates replacing the built-in ones by id.
pub const TEMPLATE_OVERRIDES_DIR: &str = ".hamlet/templates";

/// What to scaffold: the model name, its `name:type` pairs and the run's flags
#[derive(Debug, Clone, Default)]
pub struct ScaffoldRequest {
    pub model: String,
    pub attributes: Vec<String>,
    pub options: GenerationOptions,
}

impl ScaffoldRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a generate or destroy run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub naming: NamingContext,
    pub files: Vec<(PathBuf, FileAction)>,
    pub route: RouteEntry,
    /// Whether the routing file content changed (or would have, when pretending).
    pub routes_changed: bool,
}

impl ScaffoldReport {
    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|(_, a)| *a == action).count()
    }
}

/// Everything derived from a request before touching the disk
struct ScaffoldPlan {
    context: TemplateContext,
    manifest: ScaffoldManifest,
    route: RouteEntry,
}

/// Generates and destroys HAML scaffolds inside one Rails project
pub struct ScaffoldGenerator {
    root: PathBuf,
    config: HamletConfig,
    inflections: Inflections,
    templates: TemplateEngine,
    timestamp: Option<DateTime<Utc>>,
    quiet: bool,
}

impl ScaffoldGenerator {
    pub fn new(root: impl Into<PathBuf>, config: HamletConfig) -> Result<Self> {
        let root = root.into();
        let inflections = config.inflector()?;
        let templates = TemplateEngine::with_overrides(&root.join(TEMPLATE_OVERRIDES_DIR))?;
        Ok(Self {
            root,
            config,
            inflections,
            templates,
            timestamp: None,
            quiet: false,
        })
    }

    /// Fixes the clock used for migration versions and `generated_at`.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
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

    pub fn config(&self) -> &HamletConfig {
        &self.config
    }

    pub fn resolve(&self, model: &str, force_plural: bool) -> Result<NamingContext> {
        NameResolver::new(&self.inflections)
            .with_project_root(&self.root)
            .resolve(model, force_plural)
    }

    pub fn generate(&self, request: &ScaffoldRequest) -> Result<ScaffoldReport> {
        let options = &request.options;
        let plan = self.plan(request, !options.skip_migration)?;
        if options.skip_class_collisions {
            debug!("class collision check skipped");
        } else {
            self.check_collisions(&plan)?;
        }

        // Nothing is written until every template has rendered.
        let tera_context = plan.context.to_tera()?;
        let rendered = plan
            .manifest
            .files
            .iter()
            .map(|file| self.templates.render(&file.template, &tera_context))
            .collect::<Result<Vec<_>>>()?;

        let writer = self.writer(options.pretend);
        let policy = options.collision_policy(self.config.collision);
        debug!(policy = %policy, pretend = options.pretend, "writing scaffold");

        for directory in &plan.manifest.directories {
            writer.create_dir(directory)?;
        }

        let mut files = Vec::with_capacity(rendered.len());
        for (file, content) in plan.manifest.files.iter().zip(&rendered) {
            let action = writer.write_file(&file.destination, content, file.policy_or(policy))?;
            files.push((file.destination.clone(), action));
        }

        let routes_changed = self.add_route(&writer, &plan.route)?;

        info!(
            model = %plan.context.naming.class_name,
            controller = %plan.context.naming.controller.class_name,
            files = files.len(),
            "scaffold generated"
        );

        Ok(ScaffoldReport {
            naming: plan.context.naming,
            files,
            route: plan.route,
            routes_changed,
        })
    }

    pub fn destroy(&self, request: &ScaffoldRequest) -> Result<ScaffoldReport> {
        let options = &request.options;
        let plan = self.plan(request, false)?;
        let writer = self.writer(options.pretend);

        let mut files = Vec::new();
        for file in plan.manifest.files.iter().filter(|file| !file.shared) {
            files.push((file.destination.clone(), writer.remove_file(&file.destination)?));
        }

        if !options.skip_migration {
            for migration in self.existing_migrations(&plan.context.naming.table_name)? {
                let action = writer.remove_file(&migration)?;
                files.push((migration, action));
            }
        }

        for directory in plan.manifest.removable_directories() {
            writer.remove_dir_if_empty(&directory)?;
        }

        let routes_changed = self.remove_route(&writer, &plan.route)?;

        info!(
            model = %plan.context.naming.class_name,
            controller = %plan.context.naming.controller.class_name,
            "scaffold destroyed"
        );

        Ok(ScaffoldReport {
            naming: plan.context.naming,
            files,
            route: plan.route,
            routes_changed,
        })
    }

    /// Resource declarations in the routing file.
    pub fn list_routes(&self) -> Result<Vec<String>> {
        let path = self.root.join(&self.config.routes.file);
        let text = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };
        self.route_patcher().list_routes(&text)
    }

    fn plan(&self, request: &ScaffoldRequest, with_migration: bool) -> Result<ScaffoldPlan> {
        let options = &request.options;
        let capabilities = &self.config.capabilities;
        let naming = self.resolve(&request.model, options.force_plural)?;

        let mut attributes = parse_attributes(&request.attributes)?;
        if options.uses_userstamps(capabilities) {
            info!("Adding Userstamp fields");
            push_missing(&mut attributes, "created_by", "integer");
            push_missing(&mut attributes, "updated_by", "integer");
        }
        if options.uses_scope_everything(capabilities) {
            info!(field = %capabilities.scope_everything_field, "Adding ScopeEverything field");
            push_missing(&mut attributes, &capabilities.scope_everything_field, "integer");
        }

        let controller_type = options.controller_type(capabilities);
        info!("Using '{}' controller type", controller_type.as_str());
        let form_type = options.form_type(capabilities);
        info!("Using '{}' form type", form_type.as_str());

        let has_position = !options.skip_positions
            && attributes.iter().any(|attribute| attribute.is("position", "integer"));

        let template_options = TemplateOptions {
            has_position,
            skip_timestamps: options.skip_timestamps,
            include_helper: options.include_helper,
            userstamps: options.uses_userstamps(capabilities),
            scope_everything: options.uses_scope_everything(capabilities),
            controller_type,
            form_type,
            profile: options.profile(self.config.profile),
        };

        let extra_reserved = if capabilities.scope_everything {
            vec![capabilities.scope_everything_field.clone()]
        } else {
            Vec::new()
        };

        let now = self.timestamp.unwrap_or_else(Utc::now);
        let migration = if with_migration {
            Some(self.migration_path(&naming.table_name, now)?)
        } else {
            None
        };

        let manifest = ScaffoldManifest::plan(&naming, &template_options, migration);
        let route = RouteEntry::new(naming.controller.file_name.clone())
            .with_member_options(has_position.then_some(POSITION_MEMBER_ROUTES));
        let context =
            TemplateContext::new(naming, attributes, &extra_reserved, template_options, now);

        Ok(ScaffoldPlan {
            context,
            manifest,
            route,
        })
    }

    /// Aborts when a class the scaffold declares already exists in the project.
    fn check_collisions(&self, plan: &ScaffoldPlan) -> Result<()> {
        let index = ClassIndex::scan(&self.root)?;
        let naming = &plan.context.naming;

        let candidates = [
            format!("{}Controller", naming.controller.class_name),
            format!("{}Helper", naming.controller.class_name),
            naming.class_name.clone(),
        ];

        for class_name in candidates {
            if let Some(path) = index.find(&class_name).first() {
                return Err(HamletError::NamingCollision {
                    class_name,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// An existing create migration for the table, or a new timestamped one.
    fn migration_path(&self, table_name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
        if let Some(existing) = self.existing_migrations(table_name)?.into_iter().next() {
            debug!(path = %existing.display(), "reusing existing migration");
            return Ok(existing);
        }
        let version = now.format("%Y%m%d%H%M%S").to_string();
        Ok(Path::new(MIGRATION_DIR).join(manifest::migration_file_name(&version, table_name)))
    }

    fn existing_migrations(&self, table_name: &str) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(MIGRATION_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut migrations = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if manifest::is_create_migration(file_name, table_name) {
                migrations.push(Path::new(MIGRATION_DIR).join(file_name));
            }
        }
        migrations.sort();
        Ok(migrations)
    }

    fn add_route(&self, writer: &CodeWriter, entry: &RouteEntry) -> Result<bool> {
        let path = &self.config.routes.file;
        let current = writer.read(path)?.unwrap_or_default();
        let patched = self.route_patcher().add_route(&current, entry)?;

        writer.status(FileAction::Route, entry.declaration().trim_start());
        if patched == current {
            return Ok(false);
        }
        writer.update_file(path, &patched)?;
        Ok(true)
    }

    fn remove_route(&self, writer: &CodeWriter, entry: &RouteEntry) -> Result<bool> {
        let path = &self.config.routes.file;
        let Some(current) = writer.read(path)? else {
            warn!(path = %path.display(), "routing file not found, no route removed");
            return Ok(false);
        };

        writer.status(FileAction::Route, entry.declaration().trim_start());
        let patched = self.route_patcher().remove_route(&current, entry);
        if patched == current {
            return Ok(false);
        }
        writer.update_file(path, &patched)?;
        Ok(true)
    }

    fn route_patcher(&self) -> RoutePatcher {
        RoutePatcher::new(self.config.routes.sentinel.clone())
            .with_insert_mode(self.config.routes.insert_mode)
            .with_path(&self.config.routes.file)
    }

    fn writer(&self, pretend: bool) -> CodeWriter {
        CodeWriter::new(&self.root).pretend(pretend).quiet(self.quiet)
    }
}

fn push_missing(attributes: &mut Vec<AttributeSpec>, name: &str, column_type: &str) {
    if !attributes.iter().any(|attribute| attribute.name == name) {
        attributes.push(AttributeSpec::new(name, column_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hamlet_core::Capabilities;
    use tempfile::TempDir;

    fn generator(temp_dir: &TempDir, config: HamletConfig) -> ScaffoldGenerator {
        ScaffoldGenerator::new(temp_dir.path(), config)
            .unwrap()
            .with_timestamp(Utc.with_ymd_and_hms(2009, 3, 14, 15, 9, 26).unwrap())
            .quiet(true)
    }

    #[test]
    fn test_plan_positions_and_route() {
        let temp_dir = TempDir::new().unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());
        let request = ScaffoldRequest::new("widget").attributes(["title:string", "position:integer"]);

        let plan = generator.plan(&request, true).unwrap();
        assert_eq!(plan.context.naming.plural_name, "widgets");
        assert!(plan.context.options.has_position);
        assert_eq!(
            plan.route.to_string(),
            "widgets, member: {move_lower: put, move_higher: put}"
        );
        assert!(plan
            .manifest
            .destinations()
            .any(|path| path == Path::new("db/migrate/20090314150926_create_widgets.rb")));
    }

    #[test]
    fn test_plan_skip_positions() {
        let temp_dir = TempDir::new().unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());
        let request = ScaffoldRequest::new("widget")
            .attributes(["position:integer"])
            .options(GenerationOptions {
                skip_positions: true,
                ..GenerationOptions::default()
            });

        let plan = generator.plan(&request, true).unwrap();
        assert!(!plan.context.options.has_position);
        assert_eq!(plan.route.to_string(), "widgets");
    }

    #[test]
    fn test_plan_adds_capability_columns() {
        let temp_dir = TempDir::new().unwrap();
        let config = HamletConfig {
            capabilities: Capabilities {
                userstamps: true,
                scope_everything: true,
                ..Capabilities::default()
            },
            ..HamletConfig::default()
        };
        let generator = generator(&temp_dir, config);
        let request = ScaffoldRequest::new("widget").attributes(["name:string", "created_by:integer"]);

        let plan = generator.plan(&request, true).unwrap();
        let all: Vec<&str> = plan.context.all_attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(all, vec!["name", "created_by", "updated_by", "company_id"]);
        let shown: Vec<&str> = plan.context.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(shown, vec!["name"]);
    }

    #[test]
    fn test_plan_reuses_existing_migration() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("db/migrate")).unwrap();
        fs::write(temp_dir.path().join("db/migrate/20080101000000_create_widgets.rb"), "").unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());

        let plan = generator.plan(&ScaffoldRequest::new("widget"), true).unwrap();
        assert!(plan
            .manifest
            .destinations()
            .any(|path| path == Path::new("db/migrate/20080101000000_create_widgets.rb")));
    }

    #[test]
    fn test_existing_model_class_is_a_collision() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app/models")).unwrap();
        fs::write(temp_dir.path().join("app/models/widget.rb"), "class Widget < ActiveRecord::Base\nend\n").unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());

        let plan = generator.plan(&ScaffoldRequest::new("widget"), false).unwrap();
        match generator.check_collisions(&plan) {
            Err(HamletError::NamingCollision { class_name, path }) => {
                assert_eq!(class_name, "Widget");
                assert_eq!(path, Path::new("app/models/widget.rb"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_controller_class_elsewhere_is_a_collision() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
        fs::write(temp_dir.path().join("lib/legacy.rb"), "class WidgetsController\nend\n").unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());

        let plan = generator.plan(&ScaffoldRequest::new("widget"), false).unwrap();
        assert!(matches!(
            generator.check_collisions(&plan),
            Err(HamletError::NamingCollision { class_name, .. }) if class_name == "WidgetsController"
        ));
    }

    #[test]
    fn test_unrelated_classes_are_not_collisions() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app/models")).unwrap();
        fs::write(temp_dir.path().join("app/models/gadget.rb"), "class Gadget\nend\n").unwrap();
        let generator = generator(&temp_dir, HamletConfig::default());

        let plan = generator.plan(&ScaffoldRequest::new("widget"), false).unwrap();
        assert!(generator.check_collisions(&plan).is_ok());
    }
}
