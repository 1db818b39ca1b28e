//! Naming: candidate name -> require name
//!
//! - `@scope/local` names are split so the rename applies to `local` only
//! - an explicit rename wins over everything else
//! - otherwise `rename_fn`, or the default rule: strip `replace_string`, then
//!   camelize (`gulp-minify-css` -> `minifyCss`)

use regex::Regex;
use std::collections::HashMap;

use crate::errors::LoadError;
use crate::loader::RenameFn;
use crate::options::LoadOptions;

/// A candidate name, decomposed when scoped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginName<'a> {
    Plain(&'a str),
    Scoped {
        full: &'a str,
        scope: &'a str,
        local: &'a str,
    },
}

impl<'a> PluginName<'a> {
    /// Split `@scope/local`; the scope extends to the last `/` that still
    /// leaves a non-empty local part. Anything else is plain.
    pub fn parse(name: &'a str) -> Self {
        let Some(rest) = name.strip_prefix('@') else {
            return PluginName::Plain(name);
        };

        rest.rmatch_indices('/')
            .map(|(idx, _)| idx)
            .find(|&idx| idx > 0 && idx + 1 < rest.len())
            .map_or(PluginName::Plain(name), |idx| PluginName::Scoped {
                full: name,
                scope: &rest[..idx],
                local: &rest[idx + 1..],
            })
    }

    /// The name as written in the manifest
    pub fn full(&self) -> &'a str {
        match *self {
            PluginName::Plain(name) => name,
            PluginName::Scoped { full, .. } => full,
        }
    }

    pub fn scope(&self) -> Option<&'a str> {
        match *self {
            PluginName::Plain(_) => None,
            PluginName::Scoped { scope, .. } => Some(scope),
        }
    }

    /// The part the rename applies to
    pub fn local(&self) -> &'a str {
        match *self {
            PluginName::Plain(name) => name,
            PluginName::Scoped { local, .. } => local,
        }
    }
}

/// Upper-case every ASCII word character (`[A-Za-z0-9_]`) following a `-`,
/// dropping the `-`
pub fn camelize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    result.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        result.push(ch);
    }

    result
}

/// Computes require names from the naming options
#[derive(Clone)]
pub struct Namer {
    replace: Regex,
    camelize: bool,
    rename: HashMap<String, String>,
    rename_fn: Option<RenameFn>,
}

impl Namer {
    pub fn new(replace: Regex, camelize: bool) -> Self {
        Namer {
            replace,
            camelize,
            rename: HashMap::new(),
            rename_fn: None,
        }
    }

    pub fn from_options<M>(options: &LoadOptions<M>) -> Result<Self, LoadError> {
        Ok(Namer {
            replace: options.replace_regex()?,
            camelize: options.camelize,
            rename: options.rename.clone(),
            rename_fn: options.rename_fn.clone(),
        })
    }

    /// Apply `rename_fn`, or strip the replace pattern and camelize
    pub fn transform(&self, name: &str) -> String {
        if let Some(ref rename_fn) = self.rename_fn {
            return rename_fn(name);
        }

        let stripped = self.replace.replace(name, "");
        if self.camelize {
            camelize(&stripped)
        } else {
            stripped.into_owned()
        }
    }

    /// Property name a candidate is bound under
    ///
    /// Renames are looked up by the full name first; scoped names also accept
    /// a rename keyed by their local part.
    pub fn require_name(&self, name: &PluginName<'_>) -> String {
        let renamed = self
            .rename_for(name.full())
            .or_else(|| name.scope().and_then(|_| self.rename_for(name.local())));

        match renamed {
            Some(require_name) => require_name.to_string(),
            None => self.transform(name.local()),
        }
    }

    fn rename_for(&self, key: &str) -> Option<&str> {
        self.rename
            .get(key)
            .map(String::as_str)
            .filter(|renamed| !renamed.is_empty())
    }
}
