//! `package.json` manifest model
//!
//! Only the parts plugin loading cares about are kept: the package name and
//! version, and every top-level section that maps dependency names to version
//! strings (`dependencies`, `devDependencies`, `peerDependencies`, ...).

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::ManifestError;

/// File name searched for by [`find_manifest`]
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Dependency names grouped by scope category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Scope category (e.g. "devDependencies") -> dependency name -> version
    pub sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl PackageManifest {
    /// Parse a manifest from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(&value)
    }

    /// Build a manifest from an already parsed JSON document
    ///
    /// Top-level objects become sections. Entries inside a section whose
    /// value is not a string are skipped; non-object top-level values other
    /// than `name`/`version` are ignored.
    pub fn from_json_value(value: &Value) -> Result<Self, ManifestError> {
        let Value::Object(root) = value else {
            return Err(ManifestError::Invalid(
                "manifest root must be a JSON object".to_string(),
            ));
        };

        let mut manifest = PackageManifest {
            name: root.get("name").and_then(Value::as_str).map(String::from),
            version: root.get("version").and_then(Value::as_str).map(String::from),
            sections: BTreeMap::new(),
        };

        for (key, section) in root {
            let Value::Object(entries) = section else {
                continue;
            };

            let deps: BTreeMap<String, String> = entries
                .iter()
                .filter_map(|(dep, version)| {
                    version.as_str().map(|v| (dep.clone(), v.to_string()))
                })
                .collect();

            trace!("Section '{}' has {} string entries", key, deps.len());
            manifest.sections.insert(key.clone(), deps);
        }

        Ok(manifest)
    }

    /// Add a dependency to a section, creating the section if needed
    pub fn with_dependency(
        mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.sections
            .entry(scope.into())
            .or_default()
            .insert(name.into(), version.into());
        self
    }

    /// Get the entries of one scope category
    pub fn section(&self, scope: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(scope)
    }

    /// Collect dependency names listed under any of `scopes`
    ///
    /// Scopes are visited in the order given and names within a scope in
    /// sorted order; a name listed in several scopes is reported once, at
    /// its first position. Unknown scopes contribute nothing.
    pub fn dependency_names<S: AsRef<str>>(&self, scopes: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for scope in scopes {
            let Some(section) = self.section(scope.as_ref()) else {
                continue;
            };
            for name in section.keys() {
                if seen.insert(name.as_str()) {
                    names.push(name.clone());
                }
            }
        }

        names
    }
}

/// Read and parse a manifest file
pub fn read_from_path(manifest_path: &Path) -> Result<PackageManifest, ManifestError> {
    debug!("Reading manifest from: {:?}", manifest_path);

    let content = fs::read_to_string(manifest_path)?;
    let manifest = PackageManifest::from_json_str(&content)?;

    debug!(
        "Manifest loaded with {} section(s)",
        manifest.sections.len()
    );

    Ok(manifest)
}

/// Make `dir` absolute against the current working directory
///
/// Walking ancestors of a relative path stops at the path's own first
/// component, so lookups anchor the start directory first.
pub fn absolute_dir(dir: &Path) -> Result<PathBuf, ManifestError> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(anchor_at(dir, &std::env::current_dir()?))
}

fn anchor_at(dir: &Path, cwd: &Path) -> PathBuf {
    if dir == Path::new(".") || dir.as_os_str().is_empty() {
        cwd.to_path_buf()
    } else {
        cwd.join(dir)
    }
}

/// Find the nearest `package.json`, starting at `start_dir` and walking up
pub fn find_manifest(start_dir: &Path) -> Result<PathBuf, ManifestError> {
    let start_dir = absolute_dir(start_dir)?;
    for dir in start_dir.ancestors() {
        let candidate = dir.join(MANIFEST_FILE_NAME);
        trace!("Looking for manifest at {:?}", candidate);
        if candidate.is_file() {
            debug!("Found manifest: {:?}", candidate);
            return Ok(candidate);
        }
    }

    Err(ManifestError::ManifestNotFound {
        file_name: MANIFEST_FILE_NAME.to_string(),
        start_dir,
    })
}
