//! Plugin loading pipeline
//!
//! 1. Discovery: dependency names from the manifest, filtered by patterns
//! 2. Naming: require name for each candidate
//! 3. Binding: attach each candidate to the namespace (or its scope
//!    namespace), lazily or eagerly, refusing name collisions
//!
//! Every call reads the manifest again and builds a fresh namespace.

use glp_logger::DebugLog;
use glp_manifest::{find_manifest, read_from_path, PackageManifest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::binding::{Binding, LazyBinding};
use crate::errors::LoadError;
use crate::loader::LoadContext;
use crate::namespace::{Entry, Namespace};
use crate::naming::{Namer, PluginName};
use crate::options::{ConfigSource, LoadOptions};
use crate::options_file::OptionsFile;
use crate::patterns::{discover, PatternSet};

/// Build the plugin namespace described by `options`
pub fn load_plugins<M>(options: LoadOptions<M>) -> Result<Namespace<M>, LoadError> {
    let mut log = options.log.clone();
    log.set_enabled(options.debug);

    let summary = serde_json::to_string(&OptionsFile::from(&options)).unwrap_or_default();
    log.info(&format!("Debug enabled with options: {}", summary));

    let patterns = PatternSet::from_options(&options)?;
    log.info(&format!("pattern: {}", patterns.patterns().join(", ")));

    let namer = Namer::from_options(&options)?;

    let (manifest, base_dir) = locate_manifest(&options.config, &options.base_dir)
        .map_err(|e| {
            log.info(&format!("error: {}", e));
            e
        })?;

    let names = manifest.dependency_names(&options.scope);
    log.info(&format!(
        "{} plugin(s) found: {}",
        names.len(),
        names.join(" ")
    ));

    let candidates = discover(&manifest, &options.scope, &patterns);
    debug!("{} candidate(s) after pattern filtering", candidates.len());

    let LoadOptions {
        lazy,
        maintain_scope,
        prefix,
        post_require_transforms,
        require_fn,
        ..
    } = options;

    let context = Arc::new(LoadContext::new(
        require_fn,
        base_dir,
        post_require_transforms.into_iter().collect(),
        log.clone(),
    ));

    let binder = Binder {
        lazy,
        maintain_scope,
        prefix: &prefix,
        context: &context,
        log: &log,
    };

    let mut root = Namespace::new();

    for name in &candidates {
        let plugin = PluginName::parse(name);

        let target = match plugin.scope() {
            Some(scope) if maintain_scope => match root.scope_entry(scope) {
                Some(namespace) => namespace,
                None => {
                    log.info(&format!("error: defineProperty {}", name));
                    return Err(LoadError::collision(scope, name, &prefix, maintain_scope));
                }
            },
            _ => &mut root,
        };

        let require_name = namer.require_name(&plugin);
        log.info(&format!("renaming {} to {}", name, require_name));

        binder.define_property(target, &require_name, name)?;
    }

    Ok(root)
}

/// Get the manifest and the directory modules resolve from
fn locate_manifest(
    config: &ConfigSource,
    base_dir: &Path,
) -> Result<(PackageManifest, PathBuf), LoadError> {
    let missing = |e: glp_manifest::ManifestError| LoadError::MissingManifest(e.to_string());

    let manifest_path = match config {
        ConfigSource::Manifest(manifest) => return Ok((manifest.clone(), base_dir.to_path_buf())),
        ConfigSource::Path(path) => base_dir.join(path),
        ConfigSource::Search => find_manifest(base_dir).map_err(missing)?,
    };

    let manifest = read_from_path(&manifest_path).map_err(|e| {
        LoadError::MissingManifest(format!("{}: {}", manifest_path.display(), e))
    })?;
    let module_dir = manifest_path
        .parent()
        .map_or_else(|| base_dir.to_path_buf(), Path::to_path_buf);

    Ok((manifest, module_dir))
}

struct Binder<'a, M> {
    lazy: bool,
    maintain_scope: bool,
    prefix: &'a str,
    context: &'a Arc<LoadContext<M>>,
    log: &'a DebugLog,
}

impl<M> Binder<'_, M> {
    fn define_property(
        &self,
        target: &mut Namespace<M>,
        require_name: &str,
        name: &str,
    ) -> Result<(), LoadError> {
        if target.contains(require_name) {
            self.log.info(&format!("error: defineProperty {}", name));
            return Err(LoadError::collision(
                require_name,
                name,
                self.prefix,
                self.maintain_scope,
            ));
        }

        let binding = if self.lazy {
            self.log
                .info(&format!("lazyload: adding property {}", require_name));
            Binding::Lazy(LazyBinding::new(
                name,
                require_name,
                Arc::clone(self.context),
            ))
        } else {
            self.log.info(&format!("requiring {}...", name));
            Binding::Eager(self.context.require(name, require_name)?)
        };

        target.insert(require_name, Entry::Plugin(binding));
        Ok(())
    }
}
