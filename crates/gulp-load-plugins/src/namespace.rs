//! The result namespace
//!
//! Top-level entries are plugins or nested scope namespaces (one per
//! `@scope` when scopes are maintained). Entries iterate in name order.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::binding::Binding;
use crate::errors::LoadError;

/// A namespace entry
pub enum Entry<M> {
    Plugin(Binding<M>),
    Scope(Namespace<M>),
}

impl<M: fmt::Debug> fmt::Debug for Entry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Plugin(binding) => f.debug_tuple("Plugin").field(binding).finish(),
            Entry::Scope(scope) => f.debug_tuple("Scope").field(scope).finish(),
        }
    }
}

/// Plugins bound by require name
pub struct Namespace<M> {
    entries: BTreeMap<String, Entry<M>>,
}

impl<M> Default for Namespace<M> {
    fn default() -> Self {
        Namespace {
            entries: BTreeMap::new(),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for Namespace<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<M> Namespace<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry<M>> {
        self.entries.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Entry<M>> {
        self.entries.iter()
    }

    pub fn binding(&self, name: &str) -> Option<&Binding<M>> {
        match self.entries.get(name) {
            Some(Entry::Plugin(binding)) => Some(binding),
            _ => None,
        }
    }

    pub fn binding_mut(&mut self, name: &str) -> Option<&mut Binding<M>> {
        match self.entries.get_mut(name) {
            Some(Entry::Plugin(binding)) => Some(binding),
            _ => None,
        }
    }

    pub fn scope(&self, name: &str) -> Option<&Namespace<M>> {
        match self.entries.get(name) {
            Some(Entry::Scope(scope)) => Some(scope),
            _ => None,
        }
    }

    /// Read the plugin bound under `name`, loading it if lazy
    pub fn plugin(&self, name: &str) -> Result<&M, LoadError> {
        match self.entries.get(name) {
            Some(Entry::Plugin(binding)) => binding.get(),
            Some(Entry::Scope(_)) => Err(LoadError::NotAPlugin(name.to_string())),
            None => Err(LoadError::NotFound(name.to_string())),
        }
    }

    /// Read a plugin by path: `"concat"` or `"foo.bar"` for scope `foo`
    pub fn resolve(&self, path: &str) -> Result<&M, LoadError> {
        if self.binding(path).is_some() {
            return self.plugin(path);
        }

        match path.split_once('.') {
            Some((scope, rest)) => match self.scope(scope) {
                Some(namespace) => namespace.resolve(rest).map_err(|e| match e {
                    LoadError::NotFound(_) => LoadError::NotFound(path.to_string()),
                    LoadError::NotAPlugin(_) => LoadError::NotAPlugin(path.to_string()),
                    other => other,
                }),
                None => Err(LoadError::NotFound(path.to_string())),
            },
            None => self.plugin(path),
        }
    }

    /// Whether the plugin under `name` has been loaded (false if unbound)
    pub fn is_loaded(&self, name: &str) -> bool {
        self.binding(name).is_some_and(Binding::is_loaded)
    }

    /// All bound plugin paths, nested ones as `scope.name`
    pub fn require_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (name, entry) in &self.entries {
            match entry {
                Entry::Plugin(_) => names.push(name.clone()),
                Entry::Scope(scope) => names.extend(
                    scope
                        .require_names()
                        .into_iter()
                        .map(|nested| format!("{}.{}", name, nested)),
                ),
            }
        }
        names
    }

    /// Load every lazy binding, stopping at the first failure
    pub fn load_all(&self) -> Result<(), LoadError> {
        for entry in self.entries.values() {
            match entry {
                Entry::Plugin(binding) => {
                    binding.get()?;
                }
                Entry::Scope(scope) => scope.load_all()?,
            }
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, name: &str, entry: Entry<M>) {
        self.entries.insert(name.to_string(), entry);
    }

    /// Nested namespace for `scope`, created on first use
    ///
    /// Returns `None` when `scope` is already taken by a plugin.
    pub(crate) fn scope_entry(&mut self, scope: &str) -> Option<&mut Namespace<M>> {
        let entry = self
            .entries
            .entry(scope.to_string())
            .or_insert_with(|| Entry::Scope(Namespace::new()));

        match entry {
            Entry::Scope(namespace) => Some(namespace),
            Entry::Plugin(_) => None,
        }
    }
}

impl<'a, M> IntoIterator for &'a Namespace<M> {
    type Item = (&'a String, &'a Entry<M>);
    type IntoIter = btree_map::Iter<'a, String, Entry<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
