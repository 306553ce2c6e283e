//! Page factory: construction dispatch and field binding.
//!
//! The factory is the public entry point. `create_page` matches a
//! registered constructor against the runtime arguments (driver handle
//! prepended), constructs the page, binds every registered field, and wraps
//! the result in a [`PageHandle`]. When the factory's interceptor chain is
//! non-empty at creation time the handle carries the chain and routes
//! invocations through it; otherwise the handle is plain. Either way the
//! handle derefs to the page type, so the choice is transparent to callers.
//!
//! There is no partial success: any failure during argument validation,
//! matching, construction, or binding aborts creation and no instance
//! escapes.

use crate::binder::FieldBinder;
use crate::driver::DriverHandle;
use crate::interceptor::{InterceptorChain, Invocation, PageInterceptor};
use crate::matcher::{match_constructor, ArgValue, PageArgs};
use crate::page::{Page, PageDescriptor};
use crate::result::ArmarResult;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Builds page objects over a driver handle
pub struct PageFactory {
    driver: DriverHandle,
    interceptors: InterceptorChain,
}

impl PageFactory {
    /// Create a factory with an empty interceptor chain
    #[must_use]
    pub fn new(driver: DriverHandle) -> Self {
        Self {
            driver,
            interceptors: InterceptorChain::new(),
        }
    }

    /// Create a factory with a pre-populated interceptor chain
    #[must_use]
    pub fn with_interceptors(driver: DriverHandle, interceptors: InterceptorChain) -> Self {
        Self {
            driver,
            interceptors,
        }
    }

    /// The driver handle pages are built over
    #[must_use]
    pub fn driver(&self) -> &DriverHandle {
        &self.driver
    }

    /// Register an interceptor; affects pages created afterwards
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn PageInterceptor>) -> bool {
        self.interceptors.add(interceptor)
    }

    /// Remove an interceptor (pointer identity, first occurrence)
    pub fn remove_interceptor(&mut self, interceptor: &Arc<dyn PageInterceptor>) -> bool {
        self.interceptors.remove(interceptor)
    }

    /// Number of registered interceptors
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Create a page, prepending the driver handle to the caller-supplied
    /// arguments. Argument types are taken from the values themselves; an
    /// absent entry fails with
    /// [`ArgumentInference`](crate::ArmarError::ArgumentInference) before
    /// any allocation is attempted.
    pub fn create_page<P: Page>(&self, args: PageArgs) -> ArmarResult<PageHandle<P>> {
        let caller_args = args.into_values()?;
        let mut values = Vec::with_capacity(caller_args.len() + 1);
        values.push(ArgValue::new(Arc::clone(&self.driver)));
        values.extend(caller_args);
        self.instantiate(values)
    }

    /// Create a page from an explicit argument list, used as-is: the driver
    /// handle is *not* prepended.
    pub fn create_page_with<P: Page>(&self, args: Vec<ArgValue>) -> ArmarResult<PageHandle<P>> {
        self.instantiate(args)
    }

    /// Bind registered fields onto an already-constructed page instance,
    /// without going through construction. Used to retrofit binding onto
    /// pages not created by this factory.
    pub fn init_element<P: Page>(&self, page: &mut P) -> ArmarResult<()> {
        let descriptor = P::descriptor();
        self.bind_fields(&descriptor, page)
    }

    fn instantiate<P: Page>(&self, values: Vec<ArgValue>) -> ArmarResult<PageHandle<P>> {
        let descriptor = P::descriptor();
        let constructor = match_constructor(descriptor.name(), descriptor.constructors(), &values)?;
        tracing::debug!(
            page = descriptor.name(),
            arity = values.len(),
            intercepted = !self.interceptors.is_empty(),
            "constructing page"
        );
        let mut page = constructor.construct(values)?;
        self.bind_fields(&descriptor, &mut page)?;

        let chain = if self.interceptors.is_empty() {
            None
        } else {
            Some(self.interceptors.clone())
        };
        Ok(PageHandle {
            name: descriptor.name(),
            page,
            chain,
        })
    }

    fn bind_fields<P: Page>(&self, descriptor: &PageDescriptor<P>, page: &mut P) -> ArmarResult<()> {
        let binder = FieldBinder::new(Arc::clone(&self.driver));
        for field in descriptor.fields() {
            let _ = binder.decorate(field, page)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFactory")
            .field("driver", &self.driver.name())
            .field("interceptors", &self.interceptors)
            .finish()
    }
}

/// A constructed page, plain or intercepted.
///
/// Derefs to the page type. [`PageHandle::invoke`] additionally reports the
/// call to the interceptor chain captured at creation time, when there was
/// one.
pub struct PageHandle<P> {
    name: &'static str,
    page: P,
    chain: Option<InterceptorChain>,
}

impl<P> PageHandle<P> {
    /// Whether calls through this handle are routed through interceptors
    #[must_use]
    pub const fn is_intercepted(&self) -> bool {
        self.chain.is_some()
    }

    /// Page type name
    #[must_use]
    pub const fn page_name(&self) -> &'static str {
        self.name
    }

    /// Run an operation on the page; every chain entry's `before_call` runs
    /// first and every `after_call` runs afterwards, in registration order.
    pub fn invoke<R>(&self, method: &str, operation: impl FnOnce(&P) -> R) -> R {
        match &self.chain {
            Some(chain) => {
                let invocation = Invocation {
                    page: self.name,
                    method,
                };
                for interceptor in chain.iter() {
                    interceptor.before_call(&invocation);
                }
                let out = operation(&self.page);
                for interceptor in chain.iter() {
                    interceptor.after_call(&invocation);
                }
                out
            }
            None => operation(&self.page),
        }
    }

    /// Like [`PageHandle::invoke`], for operations needing `&mut`
    pub fn invoke_mut<R>(&mut self, method: &str, operation: impl FnOnce(&mut P) -> R) -> R {
        match &self.chain {
            Some(chain) => {
                let invocation = Invocation {
                    page: self.name,
                    method,
                };
                for interceptor in chain.iter() {
                    interceptor.before_call(&invocation);
                }
                let out = operation(&mut self.page);
                for interceptor in chain.iter() {
                    interceptor.after_call(&invocation);
                }
                out
            }
            None => operation(&mut self.page),
        }
    }

    /// Unwrap the page, dropping any interception
    pub fn into_inner(self) -> P {
        self.page
    }
}

impl<P> Deref for PageHandle<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.page
    }
}

impl<P> DerefMut for PageHandle<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.page
    }
}

impl<P> std::fmt::Debug for PageHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle")
            .field("page", &self.name)
            .field("intercepted", &self.chain.is_some())
            .finish()
    }
}
