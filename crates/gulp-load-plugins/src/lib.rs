//! Load build-tool plugins declared in `package.json`
//!
//! Dependency names matching the plugin patterns (`gulp-*`, `gulp.*`,
//! `@*/gulp-*` by default) are bound into a single [`Namespace`] under a
//! derived name, so a build script does not need to load each plugin itself:
//!
//! ```no_run
//! use gulp_load_plugins::{load_plugins, LoadOptions};
//!
//! # fn main() -> Result<(), gulp_load_plugins::LoadError> {
//! let plugins = load_plugins(LoadOptions::default().with_base_dir("web"))?;
//! let concat = plugins.plugin("concat")?; // gulp-concat
//! let bar = plugins.resolve("foo.bar")?; // @foo/gulp-bar
//! # let _ = (concat, bar);
//! # Ok(())
//! # }
//! ```
//!
//! Bindings are lazy by default: nothing is loaded until a plugin is read.

pub mod binding;
pub mod errors;
pub mod load;
pub mod loader;
pub mod namespace;
pub mod naming;
pub mod options;
pub mod options_file;
pub mod patterns;

pub use binding::{Binding, LazyBinding};
pub use errors::LoadError;
pub use glp_manifest::{PackageManifest, ResolvedPackage};
pub use load::load_plugins;
pub use loader::{ModuleLoader, NodeResolver, RenameFn, Transform};
pub use namespace::{Entry, Namespace};
pub use naming::{camelize, Namer, PluginName};
pub use options::{ConfigSource, LoadOptions, DEFAULT_PREFIX, DEFAULT_SCOPES, SELF_NAME};
pub use options_file::{OneOrMany, OptionsFile};
pub use patterns::{default_patterns, effective_patterns, PatternSet};
