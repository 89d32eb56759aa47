use serde::Serialize;

use crate::config::{Capabilities, CollisionPolicy, Profile};

/// Per-run switches from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub skip_timestamps: bool,
    pub skip_userstamps: bool,
    pub skip_scope_everything: bool,
    pub skip_positions: bool,
    pub skip_migration: bool,
    pub skip_inherited_resources: bool,
    pub skip_formtastic: bool,
    pub include_helper: bool,
    pub force_plural: bool,
    /// Generate even when the scaffold's classes already exist in the project.
    pub skip_class_collisions: bool,
    /// Log every action without touching the disk.
    pub pretend: bool,
    /// Overrides the configured collision policy.
    pub collision: Option<CollisionPolicy>,
    /// Overrides the configured profile.
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    Regular,
    InheritedResources,
}

impl ControllerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerType::Regular => "regular",
            ControllerType::InheritedResources => "inherited_resources",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Regular,
    Formtastic,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Regular => "regular",
            FormType::Formtastic => "formtastic",
        }
    }
}

impl GenerationOptions {
    pub fn uses_userstamps(&self, capabilities: &Capabilities) -> bool {
        capabilities.userstamps && !self.skip_userstamps
    }

    pub fn uses_scope_everything(&self, capabilities: &Capabilities) -> bool {
        capabilities.scope_everything && !self.skip_scope_everything
    }

    pub fn controller_type(&self, capabilities: &Capabilities) -> ControllerType {
        if capabilities.inherited_resources && !self.skip_inherited_resources {
            ControllerType::InheritedResources
        } else {
            ControllerType::Regular
        }
    }

    pub fn form_type(&self, capabilities: &Capabilities) -> FormType {
        if capabilities.formtastic && !self.skip_formtastic {
            FormType::Formtastic
        } else {
            FormType::Regular
        }
    }

    pub fn collision_policy(&self, configured: CollisionPolicy) -> CollisionPolicy {
        self.collision.unwrap_or(configured)
    }

    pub fn profile(&self, configured: Profile) -> Profile {
        self.profile.unwrap_or(configured)
    }
}
