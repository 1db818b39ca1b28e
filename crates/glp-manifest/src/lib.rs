//! Manifest handling for gulp-load-plugins
//!
//! This crate covers the on-disk side of plugin loading:
//! - reading `package.json` manifests into dependency sections
//! - locating the nearest manifest by walking up from a directory
//! - resolving an installed package through `node_modules` lookup

pub mod errors;
pub mod manifest;
pub mod package_resolver;

pub use errors::ManifestError;
pub use manifest::{absolute_dir, find_manifest, read_from_path, PackageManifest, MANIFEST_FILE_NAME};
pub use package_resolver::{resolve_package, ResolvedPackage};
