//! Installed package resolution
//!
//! Locates a package the way Node does: look for `node_modules/<name>` in the
//! base directory, then in each parent directory, and take the first hit.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::ManifestError;
use crate::manifest::{absolute_dir, MANIFEST_FILE_NAME};

const MODULES_DIR: &str = "node_modules";
const DEFAULT_MAIN: &str = "index.js";

/// An installed package located on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    /// Package name as requested (e.g. "@foo/gulp-bar")
    pub name: String,

    /// Version from the package's own manifest, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Package directory inside `node_modules`
    pub root: PathBuf,

    /// Entry file (`main` from the manifest, or `index.js`)
    pub main: PathBuf,
}

/// Resolve `name` relative to `base_dir`
pub fn resolve_package(name: &str, base_dir: &Path) -> Result<ResolvedPackage, ManifestError> {
    let start_dir = absolute_dir(base_dir)?;
    for dir in start_dir.ancestors() {
        let root = dir.join(MODULES_DIR).join(name);
        if !root.is_dir() {
            continue;
        }

        debug!("Resolved '{}' to {:?}", name, root);
        return describe_package(name, root);
    }

    Err(ManifestError::PackageNotFound {
        name: name.to_string(),
        base_dir: base_dir.to_path_buf(),
    })
}

fn describe_package(name: &str, root: PathBuf) -> Result<ResolvedPackage, ManifestError> {
    let manifest_path = root.join(MANIFEST_FILE_NAME);

    let (version, main) = if manifest_path.is_file() {
        let content = fs::read_to_string(&manifest_path)?;
        let value: Value = serde_json::from_str(&content)?;
        (
            value.get("version").and_then(Value::as_str).map(String::from),
            value.get("main").and_then(Value::as_str).map(String::from),
        )
    } else {
        (None, None)
    };

    let main = root.join(main.as_deref().unwrap_or(DEFAULT_MAIN));

    Ok(ResolvedPackage {
        name: name.to_string(),
        version,
        root,
        main,
    })
}

#[cfg(test)]
mod tests {
    use crate::package_resolver::*;
    use tempfile::TempDir;

    fn install(base: &Path, name: &str, manifest: Option<&str>) -> bool {
        let root = base.join(MODULES_DIR).join(name);
        if fs::create_dir_all(&root).is_err() {
            return false;
        }
        match manifest {
            Some(content) => fs::write(root.join(MANIFEST_FILE_NAME), content).is_ok(),
            None => true,
        }
    }

    #[test]
    fn test_resolves_package_with_manifest() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let base = temp_dir.path();
        assert!(install(
            base,
            "gulp-concat",
            Some(r#"{"name": "gulp-concat", "version": "2.6.1", "main": "lib/index.js"}"#)
        ));

        let resolved = resolve_package("gulp-concat", base);
        assert!(resolved.is_ok(), "Failed to resolve package");
        let Ok(resolved) = resolved else {
            return;
        };
        assert_eq!(resolved.version.as_deref(), Some("2.6.1"));
        assert!(resolved.main.ends_with("node_modules/gulp-concat/lib/index.js"));
    }

    #[test]
    fn test_resolves_scoped_package_from_parent() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let base = temp_dir.path();
        assert!(install(base, "@foo/gulp-bar", None));
        let nested = base.join("build").join("tasks");
        assert!(fs::create_dir_all(&nested).is_ok());

        let resolved = resolve_package("@foo/gulp-bar", &nested);
        assert!(resolved.is_ok_and(|r| r.version.is_none()
            && r.main.ends_with("node_modules/@foo/gulp-bar/index.js")));
    }

    #[test]
    fn test_missing_package() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let result = resolve_package("gulp-missing-xyz", temp_dir.path());
        assert!(matches!(
            result,
            Err(ManifestError::PackageNotFound { ref name, .. }) if name == "gulp-missing-xyz"
        ));
    }
}
