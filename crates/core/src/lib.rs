pub mod attributes;
pub mod config;
pub mod error;
pub mod inflector;
pub mod naming;
pub mod options;

pub use attributes::{parse_attributes, renderable_attributes, AttributeSpec};
pub use config::{
    Capabilities, CollisionPolicy, HamletConfig, Profile, RouteInsertMode, RoutesConfig,
};
pub use error::{HamletError, Result};
pub use inflector::{Inflections, Inflector};
pub use naming::{ControllerIdentity, NameResolver, NamingContext};
pub use options::{ControllerType, FormType, GenerationOptions};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
