//! Plugin bindings
//!
//! A binding is either a value loaded up front ([`Binding::Eager`]) or a
//! deferred load ([`Binding::Lazy`]) that runs the module loader on first
//! read. Both are read through [`Binding::get`], so callers cannot tell them
//! apart except by timing.
//!
//! A lazy binding keeps whatever its first read produced, error included:
//! once a load or transform has failed, every later read returns the same
//! error without calling the loader again.

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::errors::LoadError;
use crate::loader::LoadContext;

/// A bound plugin value
pub enum Binding<M> {
    Eager(M),
    Lazy(LazyBinding<M>),
}

impl<M> Binding<M> {
    /// Read the value, loading it first if the binding is lazy
    pub fn get(&self) -> Result<&M, LoadError> {
        match self {
            Binding::Eager(value) => Ok(value),
            Binding::Lazy(lazy) => lazy.get(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Binding::Lazy(_))
    }

    /// Whether reading the binding would skip the loader
    pub fn is_loaded(&self) -> bool {
        match self {
            Binding::Eager(_) => true,
            Binding::Lazy(lazy) => lazy.is_loaded(),
        }
    }

    /// Replace the bound value
    pub fn set(&mut self, value: M) {
        *self = Binding::Eager(value);
    }
}

impl<M: fmt::Debug> fmt::Debug for Binding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Eager(value) => f.debug_tuple("Eager").field(value).finish(),
            Binding::Lazy(lazy) => f.debug_tuple("Lazy").field(lazy).finish(),
        }
    }
}

/// Deferred load of one plugin
pub struct LazyBinding<M> {
    name: String,
    require_name: String,
    context: Arc<LoadContext<M>>,
    cell: OnceCell<Result<M, LoadError>>,
}

impl<M> LazyBinding<M> {
    pub(crate) fn new(name: &str, require_name: &str, context: Arc<LoadContext<M>>) -> Self {
        LazyBinding {
            name: name.to_string(),
            require_name: require_name.to_string(),
            context,
            cell: OnceCell::new(),
        }
    }

    /// Candidate name passed to the loader
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn require_name(&self) -> &str {
        &self.require_name
    }

    pub fn get(&self) -> Result<&M, LoadError> {
        self.cell
            .get_or_init(|| {
                self.context
                    .log()
                    .info(&format!("lazyload: requiring {}...", self.name));
                self.context.require(&self.name, &self.require_name)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<M: fmt::Debug> fmt::Debug for LazyBinding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyBinding")
            .field("name", &self.name)
            .field("require_name", &self.require_name)
            .field("state", &self.cell.get())
            .finish()
    }
}
