//! Pattern-based plugin discovery
//!
//! Dependency names from the manifest are filtered through an ordered list of
//! glob patterns. A pattern starting with `!` excludes. A name is a candidate
//! when it matches at least one including pattern (or no including pattern
//! exists) and none of the excluding ones. `*` never crosses `/`, so
//! `gulp-*` does not pick up `@foo/gulp-bar`.

use globset::{GlobBuilder, GlobMatcher};
use glp_manifest::PackageManifest;
use std::collections::HashSet;
use tracing::trace;

use crate::errors::LoadError;
use crate::options::{LoadOptions, SELF_NAME};

/// Default patterns for a plugin prefix: `<p>-*`, `<p>.*`, `@*/<p>{-,.}*`
pub fn default_patterns(prefix: &str) -> Vec<String> {
    vec![
        format!("{}-*", prefix),
        format!("{}.*", prefix),
        format!("@*/{}{{-,.}}*", prefix),
    ]
}

/// Patterns in effect for the given options, ending with the self exclusion
pub fn effective_patterns(
    pattern: Option<&[String]>,
    override_pattern: bool,
    prefix: &str,
) -> Vec<String> {
    let mut patterns = match (pattern, override_pattern) {
        (Some(custom), true) => custom.to_vec(),
        (None, _) => default_patterns(prefix),
        (Some(custom), false) => {
            let mut patterns = default_patterns(prefix);
            patterns.extend(custom.iter().cloned());
            patterns
        }
    };

    patterns.push(format!("!{}", SELF_NAME));
    patterns
}

/// Compiled include/exclude globs
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    include: Vec<GlobMatcher>,
    exclude: Vec<GlobMatcher>,
}

impl PatternSet {
    /// Compile `patterns` as given (no defaults, no self exclusion added)
    pub fn new(patterns: Vec<String>) -> Result<Self, LoadError> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for pattern in &patterns {
            match pattern.strip_prefix('!') {
                Some(negated) => exclude.push(compile(pattern, negated)?),
                None => include.push(compile(pattern, pattern)?),
            }
        }

        Ok(PatternSet {
            patterns,
            include,
            exclude,
        })
    }

    /// Compile the effective patterns of `options`
    pub fn from_options<M>(options: &LoadOptions<M>) -> Result<Self, LoadError> {
        Self::new(effective_patterns(
            options.pattern.as_deref(),
            options.override_pattern,
            &options.prefix,
        ))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_match(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|g| g.is_match(name));
        included && !self.exclude.iter().any(|g| g.is_match(name))
    }

    /// Keep matching names, dropping duplicates, in input order
    pub fn filter<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for name in names {
            let name = name.as_ref();
            if !self.is_match(name) {
                trace!("Skipping {}: no pattern match", name);
                continue;
            }
            if seen.insert(name.to_string()) {
                kept.push(name.to_string());
            }
        }

        kept
    }
}

fn compile(original: &str, glob: &str) -> Result<GlobMatcher, LoadError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| LoadError::InvalidPattern {
            pattern: original.to_string(),
            message: e.to_string(),
        })
}

/// Candidate plugin names: dependency names of `scopes` that pass `patterns`
pub fn discover<S: AsRef<str>>(
    manifest: &PackageManifest,
    scopes: &[S],
    patterns: &PatternSet,
) -> Vec<String> {
    patterns.filter(manifest.dependency_names(scopes))
}
