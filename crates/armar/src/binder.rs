//! Field binding: eager and lazy decoration of registered page fields.
//!
//! For each registered field the binder decides whether to resolve the
//! element now or defer to first use:
//!
//! - raw-element fields resolve immediately and get the element unwrapped;
//! - control fields consult the control's lazy flag: eager controls are
//!   looked up and constructed during binding, lazy-eligible ones get a
//!   [`Bound::deferred`] value that performs the lookup on first access;
//! - fields whose declared type is outside the control family, and fields
//!   registered without locator metadata, are skipped silently.

use crate::bound::Bound;
use crate::control::Control;
use crate::driver::{DriverHandle, ElementHandle};
use crate::locator::Locator;
use crate::result::ArmarResult;
use std::sync::Arc;

type ElementAssign<P> = Box<dyn Fn(&mut P, ElementHandle) -> ArmarResult<()> + Send + Sync>;
type BoundAssign<P, C> = Box<dyn Fn(&mut P, Bound<C>) -> ArmarResult<()> + Send + Sync>;

/// One registered page field: name, locator metadata, and binding target
pub struct FieldSpec<P> {
    name: &'static str,
    locator: Option<Locator>,
    target: FieldTarget<P>,
}

enum FieldTarget<P> {
    /// Raw-element field: bind the looked-up element directly
    Element(ElementAssign<P>),
    /// Control field: eager or deferred per the control's spec
    Control(Box<dyn ControlBind<P>>),
    /// Declared type outside the control family: never bound
    Opaque,
}

impl<P> FieldSpec<P> {
    /// A raw-element field with an infallible setter
    #[must_use]
    pub fn element(
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, ElementHandle) + Send + Sync + 'static,
    ) -> Self {
        Self::try_element(name, locator, move |page, element| {
            assign(page, element);
            Ok(())
        })
    }

    /// A raw-element field with a fallible setter; a rejection surfaces as
    /// an [`Access`](crate::ArmarError::Access) failure
    #[must_use]
    pub fn try_element(
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, ElementHandle) -> ArmarResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            locator: Some(locator),
            target: FieldTarget::Element(Box::new(assign)),
        }
    }

    /// A control field with an infallible setter
    #[must_use]
    pub fn control<C: Control>(
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, Bound<C>) + Send + Sync + 'static,
    ) -> Self
    where
        P: 'static,
    {
        Self::try_control(name, locator, move |page, bound| {
            assign(page, bound);
            Ok(())
        })
    }

    /// A control field with a fallible setter
    #[must_use]
    pub fn try_control<C: Control>(
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, Bound<C>) -> ArmarResult<()> + Send + Sync + 'static,
    ) -> Self
    where
        P: 'static,
    {
        Self {
            name,
            locator: Some(locator),
            target: FieldTarget::Control(Box::new(ControlFieldBind::<P, C> {
                assign: Box::new(assign),
            })),
        }
    }

    /// A field carrying locator metadata whose declared type is outside the
    /// control family; the binder leaves it unbound
    #[must_use]
    pub fn opaque(name: &'static str, locator: Locator) -> Self {
        Self {
            name,
            locator: Some(locator),
            target: FieldTarget::Opaque,
        }
    }

    /// A field without locator metadata; ignored entirely by binding
    #[must_use]
    pub fn unannotated(name: &'static str) -> Self {
        Self {
            name,
            locator: None,
            target: FieldTarget::Opaque,
        }
    }

    /// Field name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Locator metadata, if any
    #[must_use]
    pub const fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }
}

impl<P> std::fmt::Debug for FieldSpec<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            FieldTarget::Element(_) => "element",
            FieldTarget::Control(bind) => bind.control_name(),
            FieldTarget::Opaque => "opaque",
        };
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("locator", &self.locator)
            .field("target", &target)
            .finish()
    }
}

/// Type-erased control binding for one field
trait ControlBind<P>: Send + Sync {
    fn bind(&self, driver: &DriverHandle, locator: &Locator, page: &mut P) -> ArmarResult<()>;
    fn is_lazy(&self) -> bool;
    fn control_name(&self) -> &'static str;
}

struct ControlFieldBind<P, C: Control> {
    assign: BoundAssign<P, C>,
}

impl<P, C: Control> ControlBind<P> for ControlFieldBind<P, C> {
    fn bind(&self, driver: &DriverHandle, locator: &Locator, page: &mut P) -> ArmarResult<()> {
        let spec = C::spec();
        if spec.is_lazy() {
            let driver = Arc::clone(driver);
            let locator = locator.clone();
            let bound = Bound::deferred(move || {
                let element = driver.find_element(&locator)?;
                C::spec().instantiate(element)
            });
            (self.assign)(page, bound)
        } else {
            let element = driver.find_element(locator)?;
            let control = spec.instantiate(element)?;
            (self.assign)(page, Bound::eager(control))
        }
    }

    fn is_lazy(&self) -> bool {
        C::spec().is_lazy()
    }

    fn control_name(&self) -> &'static str {
        C::spec().name()
    }
}

/// Binds registered fields on a page instance
#[derive(Clone)]
pub struct FieldBinder {
    driver: DriverHandle,
}

impl std::fmt::Debug for FieldBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinder").finish_non_exhaustive()
    }
}

impl FieldBinder {
    /// Create a binder over a driver handle
    #[must_use]
    pub fn new(driver: DriverHandle) -> Self {
        Self { driver }
    }

    /// Bind one field. Returns whether a value was assigned; fields without
    /// locator metadata and fields outside the control family report `false`
    /// and are otherwise untouched.
    pub fn decorate<P>(&self, field: &FieldSpec<P>, page: &mut P) -> ArmarResult<bool> {
        let Some(locator) = &field.locator else {
            return Ok(false);
        };
        match &field.target {
            FieldTarget::Element(assign) => {
                let element = self.driver.find_element(locator)?;
                assign(page, element)?;
                tracing::debug!(field = field.name, %locator, "bound raw element field");
                Ok(true)
            }
            FieldTarget::Control(bind) => {
                bind.bind(&self.driver, locator, page)?;
                tracing::debug!(
                    field = field.name,
                    control = bind.control_name(),
                    lazy = bind.is_lazy(),
                    %locator,
                    "bound control field"
                );
                Ok(true)
            }
            FieldTarget::Opaque => Ok(false),
        }
    }
}
