//! Scaffold generation for Rails projects using HAML views.
//!
//! [`ScaffoldGenerator`] plans a [`ScaffoldManifest`], renders it through the
//! [`TemplateEngine`], writes it with [`CodeWriter`] and patches the routing
//! file with [`RoutePatcher`].

pub mod collisions;
pub mod context;
pub mod generator;
pub mod manifest;
pub mod routes;
pub mod templates;
pub mod writer;

pub use collisions::ClassIndex;
pub use context::{ResourceNames, TemplateContext, TemplateOptions};
pub use generator::{ScaffoldGenerator, ScaffoldReport, ScaffoldRequest, TEMPLATE_OVERRIDES_DIR};
pub use manifest::{PlannedFile, ScaffoldManifest};
pub use routes::{RouteEntry, RoutePatcher, POSITION_MEMBER_ROUTES};
pub use templates::TemplateEngine;
pub use writer::{CodeWriter, FileAction};
