use clap::Args;
use hamlet_codegen::{FileAction, ScaffoldReport, ScaffoldRequest};
use hamlet_core::{CollisionPolicy, GenerationOptions, Profile, Result};

use super::Project;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldArgs {
    /// Model name, e.g. Widget or Admin::Widget
    pub model: String,

    /// Attributes as name:type pairs
    #[arg(value_name = "NAME:TYPE")]
    pub attributes: Vec<String>,

    /// Don't add timestamps to the migration file for this model
    #[arg(long)]
    pub skip_timestamps: bool,

    /// Don't add userstamps to the migration file for this model
    #[arg(long)]
    pub skip_userstamps: bool,

    /// Don't add a scope everything field to the migration file for this model
    #[arg(long)]
    pub skip_scope_everything: bool,

    /// Don't add position related stuff
    #[arg(long)]
    pub skip_positions: bool,

    /// Don't generate a migration file for this model
    #[arg(long)]
    pub skip_migration: bool,

    /// Don't use an inherited resources controller
    #[arg(long)]
    pub skip_inherited_resources: bool,

    /// Don't use a formtastic form
    #[arg(long)]
    pub skip_formtastic: bool,

    /// Generate a helper and its test
    #[arg(long)]
    pub include_helper: bool,

    /// Keep a plural model name as given
    #[arg(long)]
    pub force_plural: bool,

    /// Generate even when the model, controller or helper class already exists
    #[arg(long)]
    pub skip_class_collisions: bool,

    /// Show what would happen without changing any file
    #[arg(long, short = 'p')]
    pub pretend: bool,

    /// What to do with existing files that differ: overwrite, skip or fail
    #[arg(long, value_name = "POLICY")]
    pub collision: Option<CollisionPolicy>,

    /// Set of files to generate: full or simple
    #[arg(long)]
    pub profile: Option<Profile>,
}

impl ScaffoldArgs {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            skip_timestamps: self.skip_timestamps,
            skip_userstamps: self.skip_userstamps,
            skip_scope_everything: self.skip_scope_everything,
            skip_positions: self.skip_positions,
            skip_migration: self.skip_migration,
            skip_inherited_resources: self.skip_inherited_resources,
            skip_formtastic: self.skip_formtastic,
            include_helper: self.include_helper,
            force_plural: self.force_plural,
            skip_class_collisions: self.skip_class_collisions,
            pretend: self.pretend,
            collision: self.collision,
            profile: self.profile,
        }
    }

    pub fn request(&self) -> ScaffoldRequest {
        ScaffoldRequest::new(self.model.clone())
            .attributes(self.attributes.iter().cloned())
            .options(self.options())
    }
}

pub fn generate(project: &Project, args: &ScaffoldArgs) -> Result<()> {
    let report = project.generator()?.generate(&args.request())?;
    print_summary("generated", &report, args.pretend);
    Ok(())
}

pub fn destroy(project: &Project, args: &ScaffoldArgs) -> Result<()> {
    let report = project.generator()?.destroy(&args.request())?;
    print_summary("destroyed", &report, args.pretend);
    Ok(())
}

fn print_summary(verb: &str, report: &ScaffoldReport, pretend: bool) {
    let changed = report
        .files
        .iter()
        .filter(|(_, action)| {
            matches!(action, FileAction::Create | FileAction::Force | FileAction::Remove)
        })
        .count();

    println!();
    if pretend {
        println!(
            "Scaffold for {} would be {} ({} files); nothing was written.",
            report.naming.class_name, verb, changed
        );
    } else {
        println!(
            "Scaffold for {} {} ({} files, {} skipped).",
            report.naming.class_name,
            verb,
            changed,
            report.count(FileAction::Skip)
        );
    }
}
