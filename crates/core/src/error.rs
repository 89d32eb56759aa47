use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the hamlet generator
#[derive(Debug, Error)]
pub enum HamletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid attribute '{definition}': expected name:type")]
    InvalidAttribute { definition: String },

    #[error("The name '{class_name}' is either already used in your application or reserved (declared in {})", .path.display())]
    NamingCollision { class_name: String, path: PathBuf },

    #[error("Could not find '{sentinel}' in {}", .path.display())]
    SentinelNotFound { path: PathBuf, sentinel: String },

    #[error("Found '{sentinel}' {count} times in {}, expected exactly one", .path.display())]
    AmbiguousSentinel {
        path: PathBuf,
        sentinel: String,
        count: usize,
    },

    #[error("{} already exists and differs from the generated content", .path.display())]
    FileConflict { path: PathBuf },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl HamletError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Process exit code reported by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HamletError::NamingCollision { .. } => 2,
            HamletError::SentinelNotFound { .. } | HamletError::AmbiguousSentinel { .. } => 3,
            HamletError::FileConflict { .. } => 4,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HamletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let collision = HamletError::NamingCollision {
            class_name: "WidgetsController".to_string(),
            path: PathBuf::from("app/controllers/widgets_controller.rb"),
        };
        assert_eq!(collision.exit_code(), 2);

        let sentinel = HamletError::SentinelNotFound {
            path: PathBuf::from("config/routes.rb"),
            sentinel: "draw".to_string(),
        };
        assert_eq!(sentinel.exit_code(), 3);
        assert_eq!(HamletError::template("boom").exit_code(), 1);
    }

    #[test]
    fn test_sentinel_message_names_file() {
        let err = HamletError::SentinelNotFound {
            path: PathBuf::from("config/routes.rb"),
            sentinel: "ActionController::Routing::Routes.draw do |map|".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("config/routes.rb"));
        assert!(message.contains("Routes.draw"));
    }
}
