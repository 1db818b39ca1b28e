//! TOML options file
//!
//! ```toml
//! pattern = ["gulp-*", "my-plugin-*"]
//! override_pattern = true
//! scope = "devDependencies"
//! lazy = false
//!
//! [rename]
//! "gulp-concat" = "merge"
//! ```
//!
//! Keys may be written in snake_case or camelCase (`overridePattern`).
//! Unknown keys are ignored. Relative paths are taken relative to the file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::LoadError;
use crate::options::{ConfigSource, LoadOptions};

/// A single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Options that can be stored in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<OneOrMany>,

    #[serde(alias = "overridePattern", skip_serializing_if = "Option::is_none")]
    pub override_pattern: Option<bool>,

    /// Path to the manifest file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,

    #[serde(alias = "baseDir", skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<OneOrMany>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Regular expression stripped by the default rename
    #[serde(alias = "replaceString", skip_serializing_if = "Option::is_none")]
    pub replace_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camelize: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rename: BTreeMap<String, String>,

    #[serde(alias = "maintainScope", skip_serializing_if = "Option::is_none")]
    pub maintain_scope: Option<bool>,

    #[serde(alias = "DEBUG", skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(alias = "logFile", skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl OptionsFile {
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        toml::from_str(content).map_err(|e| LoadError::OptionsFile(e.to_string()))
    }

    /// Read an options file, anchoring relative paths at its directory
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        debug!("Reading options from: {:?}", path);

        let content = fs::read_to_string(path)
            .map_err(|e| LoadError::OptionsFile(format!("{}: {}", path.display(), e)))?;
        let mut file = Self::from_toml_str(&content)?;

        if let Some(dir) = path.parent() {
            for slot in [&mut file.config, &mut file.base_dir, &mut file.log_file] {
                if let Some(relative) = slot.as_mut() {
                    *relative = dir.join(&*relative);
                }
            }
        }

        Ok(file)
    }
}

impl<M> From<&LoadOptions<M>> for OptionsFile {
    fn from(options: &LoadOptions<M>) -> Self {
        OptionsFile {
            pattern: options.pattern.clone().map(OneOrMany::Many),
            override_pattern: Some(options.override_pattern),
            config: match options.config {
                ConfigSource::Path(ref path) => Some(path.clone()),
                _ => None,
            },
            base_dir: Some(options.base_dir.clone()),
            scope: Some(OneOrMany::Many(options.scope.clone())),
            prefix: Some(options.prefix.clone()),
            replace_string: options
                .replace_string
                .as_ref()
                .map(|r| r.as_str().to_string()),
            camelize: Some(options.camelize),
            lazy: Some(options.lazy),
            rename: options
                .rename
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            maintain_scope: Some(options.maintain_scope),
            debug: Some(options.debug),
            log_file: options.log.log_file().map(Path::to_path_buf),
        }
    }
}
