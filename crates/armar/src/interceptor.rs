//! Interceptor chain for cross-cutting behavior on constructed pages.
//!
//! The chain is an explicit registry owned by the factory, scoped to one
//! test run. When non-empty at creation time, every page handle the factory
//! returns routes its invocations through the chain: each interceptor's
//! `before_call` runs before the operation and `after_call` after it, in
//! registration order. What an interceptor does inside its hooks (timing,
//! logging, recording) is its own contract; this core only guarantees every
//! entry gets the opportunity to run.
//!
//! The chain performs no internal synchronization; mutating it from
//! multiple threads at once is caller responsibility.

use std::sync::Arc;

/// One intercepted call on a constructed page
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Page type name
    pub page: &'a str,
    /// Method name as reported by the caller
    pub method: &'a str,
}

/// A registered behavior wrapping method invocations on constructed pages
pub trait PageInterceptor: Send + Sync {
    /// Called before the operation runs
    fn before_call(&self, invocation: &Invocation<'_>) {
        let _ = invocation;
    }

    /// Called after the operation ran
    fn after_call(&self, invocation: &Invocation<'_>) {
        let _ = invocation;
    }
}

/// Ordered collection of interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    entries: Vec<Arc<dyn PageInterceptor>>,
}

impl InterceptorChain {
    /// Create an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor; standard collection semantics, duplicates
    /// allowed. Always returns `true`.
    pub fn add(&mut self, interceptor: Arc<dyn PageInterceptor>) -> bool {
        self.entries.push(interceptor);
        true
    }

    /// Remove the first occurrence of an interceptor, matched by pointer
    /// identity. Returns whether anything was removed.
    pub fn remove(&mut self, interceptor: &Arc<dyn PageInterceptor>) -> bool {
        match self
            .entries
            .iter()
            .position(|entry| Arc::ptr_eq(entry, interceptor))
        {
            Some(index) => {
                let _ = self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered interceptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PageInterceptor>> {
        self.entries.iter()
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        before: AtomicUsize,
        after: AtomicUsize,
    }

    impl PageInterceptor for Counting {
        fn before_call(&self, _invocation: &Invocation<'_>) {
            let _ = self.before.fetch_add(1, Ordering::SeqCst);
        }

        fn after_call(&self, _invocation: &Invocation<'_>) {
            let _ = self.after.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_add_and_len() {
        let mut chain = InterceptorChain::new();
        assert!(chain.is_empty());
        assert!(chain.add(Arc::new(Counting::default())));
        assert!(chain.add(Arc::new(Counting::default())));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut chain = InterceptorChain::new();
        let first: Arc<dyn PageInterceptor> = Arc::new(Counting::default());
        let second: Arc<dyn PageInterceptor> = Arc::new(Counting::default());
        let _ = chain.add(Arc::clone(&first));
        let _ = chain.add(Arc::clone(&second));

        assert!(chain.remove(&first));
        assert_eq!(chain.len(), 1);
        // Already removed
        assert!(!chain.remove(&first));
        assert!(chain.remove(&second));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_duplicates_allowed_and_removed_one_at_a_time() {
        let mut chain = InterceptorChain::new();
        let interceptor: Arc<dyn PageInterceptor> = Arc::new(Counting::default());
        let _ = chain.add(Arc::clone(&interceptor));
        let _ = chain.add(Arc::clone(&interceptor));
        assert_eq!(chain.len(), 2);

        assert!(chain.remove(&interceptor));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_iteration_is_registration_order() {
        let mut chain = InterceptorChain::new();
        let first: Arc<dyn PageInterceptor> = Arc::new(Counting::default());
        let second: Arc<dyn PageInterceptor> = Arc::new(Counting::default());
        let _ = chain.add(Arc::clone(&first));
        let _ = chain.add(Arc::clone(&second));

        let order: Vec<bool> = chain.iter().map(|e| Arc::ptr_eq(e, &first)).collect();
        assert_eq!(order, vec![true, false]);
    }
}
