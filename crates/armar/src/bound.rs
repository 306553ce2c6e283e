//! Bound control values: eager or deferred resolution.
//!
//! `Bound<C>` is what the binder assigns onto a control-typed page field.
//! For eager controls it already holds the constructed instance; for
//! lazy-eligible controls it holds an initializer closure plus an empty
//! cell, and the first [`Bound::get`] performs the lookup and construction.

use crate::control::Control;
use crate::result::{ArmarError, ArmarResult};
use std::fmt;
use std::sync::OnceLock;

type Initializer<C> = Box<dyn Fn() -> ArmarResult<C> + Send + Sync>;

/// A control field value, resolved now or on first use
pub struct Bound<C: Control> {
    state: BoundState<C>,
}

enum BoundState<C> {
    /// Default state of a field the factory never bound
    Unbound,
    /// Resolved at bind time
    Eager(C),
    /// Resolved on first access
    Deferred {
        cell: OnceLock<C>,
        init: Initializer<C>,
    },
}

impl<C: Control> Bound<C> {
    /// An unbound value; [`Bound::get`] fails until the factory binds it
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            state: BoundState::Unbound,
        }
    }

    /// Wrap an already-constructed control
    #[must_use]
    pub fn eager(control: C) -> Self {
        Self {
            state: BoundState::Eager(control),
        }
    }

    /// Defer resolution to the given initializer
    #[must_use]
    pub fn deferred(init: impl Fn() -> ArmarResult<C> + Send + Sync + 'static) -> Self {
        Self {
            state: BoundState::Deferred {
                cell: OnceLock::new(),
                init: Box::new(init),
            },
        }
    }

    /// Access the control, resolving it first if deferred.
    ///
    /// Resolution happens at most once per field: the first successful run
    /// of the initializer is cached and every later access returns the same
    /// instance. A *failed* resolution is not cached; the next access
    /// retries the lookup and construction.
    ///
    /// The cell is an exchange-once primitive: if two threads race on first
    /// access, both may run the initializer, but the first stored value wins
    /// and every reader observes that same instance.
    pub fn get(&self) -> ArmarResult<&C> {
        match &self.state {
            BoundState::Unbound => Err(ArmarError::Unbound),
            BoundState::Eager(control) => Ok(control),
            BoundState::Deferred { cell, init } => {
                if let Some(control) = cell.get() {
                    return Ok(control);
                }
                let resolved = init()?;
                Ok(cell.get_or_init(|| resolved))
            }
        }
    }

    /// Whether the control is resolved (eager, or deferred and already used)
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match &self.state {
            BoundState::Unbound => false,
            BoundState::Eager(_) => true,
            BoundState::Deferred { cell, .. } => cell.get().is_some(),
        }
    }

    /// Whether this value defers resolution to first use
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self.state, BoundState::Deferred { .. })
    }
}

impl<C: Control> Default for Bound<C> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<C: Control> fmt::Debug for Bound<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            BoundState::Unbound => "unbound",
            BoundState::Eager(_) => "eager",
            BoundState::Deferred { cell, .. } => {
                if cell.get().is_some() {
                    "deferred (resolved)"
                } else {
                    "deferred (unresolved)"
                }
            }
        };
        f.debug_struct("Bound").field("state", &state).finish()
    }
}
