//! Load options
//!
//! Every recognized option is a typed field with a default. Options that can
//! be expressed as data can also come from a TOML file (see
//! [`crate::options_file`]); closures are set in code.

use glp_logger::DebugLog;
use glp_manifest::{PackageManifest, ResolvedPackage};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::LoadError;
use crate::loader::{ModuleLoader, NodeResolver, RenameFn, Transform};
use crate::options_file::OptionsFile;

/// Conventional plugin prefix
pub const DEFAULT_PREFIX: &str = "gulp";

/// Name of this loader; always excluded from discovery
pub const SELF_NAME: &str = "gulp-load-plugins";

/// Manifest categories scanned when no `scope` is configured
pub const DEFAULT_SCOPES: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Where the dependency manifest comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Search upward from `base_dir` for a `package.json`
    #[default]
    Search,
    /// Read this manifest file; modules resolve relative to its directory
    Path(PathBuf),
    /// Use an already parsed manifest; modules resolve relative to `base_dir`
    Manifest(PackageManifest),
}

/// Options for [`crate::load_plugins`]
pub struct LoadOptions<M> {
    /// Glob patterns selecting plugin names (`None` = defaults)
    pub pattern: Option<Vec<String>>,
    /// Replace the default patterns (true) or append to them (false)
    pub override_pattern: bool,
    pub config: ConfigSource,
    /// Directory of the calling build script
    pub base_dir: PathBuf,
    /// Manifest categories to scan
    pub scope: Vec<String>,
    /// Prefix used by the default patterns and default `replace_string`
    pub prefix: String,
    /// Stripped from names by the default rename (`None` = `^<prefix>(-|\.)`)
    pub replace_string: Option<Regex>,
    pub camelize: bool,
    pub lazy: bool,
    /// Candidate name -> forced require name
    pub rename: HashMap<String, String>,
    pub rename_fn: Option<RenameFn>,
    pub maintain_scope: bool,
    /// Require name -> transform applied after loading
    pub post_require_transforms: HashMap<String, Transform<M>>,
    pub require_fn: Arc<dyn ModuleLoader<M>>,
    pub debug: bool,
    /// Outputs of the debug channel; only used when `debug` is set
    pub log: DebugLog,
}

impl Default for LoadOptions<ResolvedPackage> {
    fn default() -> Self {
        LoadOptions::new(NodeResolver)
    }
}

impl<M> LoadOptions<M> {
    /// Default options loading modules with `loader`
    pub fn new<L>(loader: L) -> Self
    where
        L: ModuleLoader<M> + 'static,
    {
        LoadOptions {
            pattern: None,
            override_pattern: true,
            config: ConfigSource::Search,
            base_dir: PathBuf::from("."),
            scope: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            prefix: DEFAULT_PREFIX.to_string(),
            replace_string: None,
            camelize: true,
            lazy: true,
            rename: HashMap::new(),
            rename_fn: None,
            maintain_scope: true,
            post_require_transforms: HashMap::new(),
            require_fn: Arc::new(loader),
            debug: false,
            log: DebugLog::default(),
        }
    }

    pub fn with_pattern<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pattern = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_override_pattern(mut self, override_pattern: bool) -> Self {
        self.override_pattern = override_pattern;
        self
    }

    pub fn with_config(mut self, config: ConfigSource) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_path(self, path: impl Into<PathBuf>) -> Self {
        self.with_config(ConfigSource::Path(path.into()))
    }

    pub fn with_manifest(self, manifest: PackageManifest) -> Self {
        self.with_config(ConfigSource::Manifest(manifest))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_scope<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_replace_string(mut self, replace_string: Regex) -> Self {
        self.replace_string = Some(replace_string);
        self
    }

    pub fn with_camelize(mut self, camelize: bool) -> Self {
        self.camelize = camelize;
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_rename(mut self, name: impl Into<String>, require_name: impl Into<String>) -> Self {
        self.rename.insert(name.into(), require_name.into());
        self
    }

    pub fn with_rename_fn<F>(mut self, rename_fn: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rename_fn = Some(Arc::new(rename_fn));
        self
    }

    pub fn with_maintain_scope(mut self, maintain_scope: bool) -> Self {
        self.maintain_scope = maintain_scope;
        self
    }

    /// Register a transform for the plugin bound under `require_name`
    pub fn with_transform<F>(mut self, require_name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(M) -> anyhow::Result<M> + Send + Sync + 'static,
    {
        self.post_require_transforms
            .insert(require_name.into(), Arc::new(transform));
        self
    }

    pub fn with_require_fn<L>(mut self, loader: L) -> Self
    where
        L: ModuleLoader<M> + 'static,
    {
        self.require_fn = Arc::new(loader);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_log(mut self, log: DebugLog) -> Self {
        self.log = log;
        self
    }

    /// The pattern stripped by the default rename
    pub fn replace_regex(&self) -> Result<Regex, LoadError> {
        if let Some(ref regex) = self.replace_string {
            return Ok(regex.clone());
        }

        let pattern = format!(r"^{}(-|\.)", regex::escape(&self.prefix));
        Regex::new(&pattern).map_err(|e| LoadError::InvalidReplaceString {
            pattern,
            message: e.to_string(),
        })
    }

    /// Overlay the keys present in `file` onto these options
    pub fn apply_file(mut self, file: OptionsFile) -> Result<Self, LoadError> {
        if let Some(pattern) = file.pattern {
            self.pattern = Some(pattern.into_vec());
        }
        if let Some(override_pattern) = file.override_pattern {
            self.override_pattern = override_pattern;
        }
        if let Some(config) = file.config {
            self.config = ConfigSource::Path(config);
        }
        if let Some(base_dir) = file.base_dir {
            self.base_dir = base_dir;
        }
        if let Some(scope) = file.scope {
            self.scope = scope.into_vec();
        }
        if let Some(prefix) = file.prefix {
            self.prefix = prefix;
        }
        if let Some(replace_string) = file.replace_string {
            let regex = Regex::new(&replace_string).map_err(|e| {
                LoadError::InvalidReplaceString {
                    pattern: replace_string.clone(),
                    message: e.to_string(),
                }
            })?;
            self.replace_string = Some(regex);
        }
        if let Some(camelize) = file.camelize {
            self.camelize = camelize;
        }
        if let Some(lazy) = file.lazy {
            self.lazy = lazy;
        }
        self.rename.extend(file.rename);
        if let Some(maintain_scope) = file.maintain_scope {
            self.maintain_scope = maintain_scope;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if let Some(log_file) = file.log_file {
            self.log = self.log.with_log_file(log_file);
        }

        Ok(self)
    }
}
