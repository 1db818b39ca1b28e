//! Module loading seam
//!
//! Plugin loading itself is delegated: a [`ModuleLoader`] turns a package
//! name plus a base directory into a module value. Any closure with the right
//! signature is a loader; [`NodeResolver`] is the default for
//! [`ResolvedPackage`] and locates packages through `node_modules`.

use glp_manifest::{resolve_package, ResolvedPackage};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::LoadError;

/// Loads a module by name, relative to a base directory
pub trait ModuleLoader<M>: Send + Sync {
    fn load(&self, name: &str, base_dir: &Path) -> anyhow::Result<M>;
}

impl<M, F> ModuleLoader<M> for F
where
    F: Fn(&str, &Path) -> anyhow::Result<M> + Send + Sync,
{
    fn load(&self, name: &str, base_dir: &Path) -> anyhow::Result<M> {
        self(name, base_dir)
    }
}

/// Default loader: resolve the package directory from `node_modules`
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeResolver;

impl ModuleLoader<ResolvedPackage> for NodeResolver {
    fn load(&self, name: &str, base_dir: &Path) -> anyhow::Result<ResolvedPackage> {
        Ok(resolve_package(name, base_dir)?)
    }
}

/// Post-load transform applied to a module before it is bound
pub type Transform<M> = Arc<dyn Fn(M) -> anyhow::Result<M> + Send + Sync>;

/// Custom rename function replacing the default strip-and-camelize rule
pub type RenameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Everything a binding needs to produce its value, shared by all lazy bindings
pub(crate) struct LoadContext<M> {
    loader: Arc<dyn ModuleLoader<M>>,
    base_dir: PathBuf,
    transforms: Vec<(String, Transform<M>)>,
    log: glp_logger::DebugLog,
}

impl<M> LoadContext<M> {
    pub(crate) fn new(
        loader: Arc<dyn ModuleLoader<M>>,
        base_dir: PathBuf,
        transforms: Vec<(String, Transform<M>)>,
        log: glp_logger::DebugLog,
    ) -> Self {
        LoadContext {
            loader,
            base_dir,
            transforms,
            log,
        }
    }

    pub(crate) fn log(&self) -> &glp_logger::DebugLog {
        &self.log
    }

    /// Load `name` and pass it through the transform registered for `require_name`
    pub(crate) fn require(&self, name: &str, require_name: &str) -> Result<M, LoadError> {
        let module = self
            .loader
            .load(name, &self.base_dir)
            .map_err(|e| LoadError::module_load(name, &e))?;
        self.apply_transform(require_name, module)
    }

    fn apply_transform(&self, require_name: &str, module: M) -> Result<M, LoadError> {
        let Some((_, transform)) = self.transforms.iter().find(|(key, _)| key == require_name)
        else {
            return Ok(module);
        };

        self.log.info(&format!("transforming {}", require_name));
        transform(module).map_err(|e| LoadError::transform(require_name, &e))
    }
}
