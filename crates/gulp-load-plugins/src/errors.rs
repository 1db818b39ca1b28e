//! Error types for plugin loading
//!
//! `LoadError` is `Clone` so that a lazy binding can keep its failure and
//! hand the same error back on every later read.

use thiserror::Error;

/// Errors that can occur while building or reading a plugin namespace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Could not find dependencies. Do you have a package.json file in your project? ({0})")]
    MissingManifest(String),

    #[error("Invalid plugin pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid replace string '{pattern}': {message}")]
    InvalidReplaceString { pattern: String, message: String },

    #[error("Could not define the property \"{require_name}\", {hint}")]
    Collision {
        require_name: String,
        name: String,
        hint: String,
    },

    #[error("Failed to load plugin '{name}': {message}")]
    ModuleLoad { name: String, message: String },

    #[error("Post-require transform for '{require_name}' failed: {message}")]
    Transform {
        require_name: String,
        message: String,
    },

    #[error("Property '{0}' is not defined")]
    NotFound(String),

    #[error("Property '{0}' is a scope, not a plugin")]
    NotAPlugin(String),

    #[error("Invalid options file: {0}")]
    OptionsFile(String),
}

impl LoadError {
    /// Build a collision error for `name` resolving to an occupied `require_name`
    ///
    /// The hint differs with `maintain_scope`: with nested scopes the clash is
    /// between two names in the same object, without them it may cross scopes.
    pub fn collision(require_name: &str, name: &str, prefix: &str, maintain_scope: bool) -> Self {
        let hint = if maintain_scope {
            format!(
                "you may have repeated dependencies in your package.json like \"{prefix}-{require_name}\" and \"{require_name}\""
            )
        } else {
            format!(
                "you may have repeated a dependency in another scope like \"{prefix}-{require_name}\" and \"@foo/{prefix}-{require_name}\""
            )
        };

        LoadError::Collision {
            require_name: require_name.to_string(),
            name: name.to_string(),
            hint,
        }
    }

    /// Wrap a module loader failure
    pub fn module_load(name: &str, err: &anyhow::Error) -> Self {
        LoadError::ModuleLoad {
            name: name.to_string(),
            message: format!("{:#}", err),
        }
    }

    /// Wrap a post-require transform failure
    pub fn transform(require_name: &str, err: &anyhow::Error) -> Self {
        LoadError::Transform {
            require_name: require_name.to_string(),
            message: format!("{:#}", err),
        }
    }
}
