//! Control registration.
//!
//! A control is a user type wrapping one resolved UI element. Instead of
//! runtime type introspection, each control type registers a [`ControlSpec`]
//! once: its construction convention (an element-accepting constructor
//! preferred, a no-argument fallback otherwise) and whether resolution may
//! be deferred until first use.

use crate::driver::ElementHandle;
use crate::result::{ArmarError, ArmarResult};

/// A type that can be bound to a page field as a control.
///
/// # Example
///
/// ```
/// use armar::{Control, ControlSpec, ElementHandle};
///
/// struct TextControl {
///     element: ElementHandle,
/// }
///
/// impl Control for TextControl {
///     fn spec() -> ControlSpec<Self> {
///         ControlSpec::new("TextControl")
///             .with_element_constructor(|element| Ok(Self { element }))
///     }
/// }
/// ```
pub trait Control: Sized + Send + Sync + 'static {
    /// The registration table entry for this control type
    fn spec() -> ControlSpec<Self>;
}

/// Registration entry for one control type
pub struct ControlSpec<C> {
    name: &'static str,
    lazy: bool,
    from_element: Option<fn(ElementHandle) -> ArmarResult<C>>,
    fallback: Option<fn() -> ArmarResult<C>>,
}

impl<C> ControlSpec<C> {
    /// Create a spec with no constructors and eager resolution
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            lazy: false,
            from_element: None,
            fallback: None,
        }
    }

    /// Mark the control lazy-eligible: fields of this type defer element
    /// resolution until first use.
    #[must_use]
    pub const fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Register the element-accepting constructor (preferred form)
    #[must_use]
    pub const fn with_element_constructor(
        mut self,
        constructor: fn(ElementHandle) -> ArmarResult<C>,
    ) -> Self {
        self.from_element = Some(constructor);
        self
    }

    /// Register the no-argument fallback constructor
    #[must_use]
    pub const fn with_fallback_constructor(mut self, constructor: fn() -> ArmarResult<C>) -> Self {
        self.fallback = Some(constructor);
        self
    }

    /// Control type name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether fields of this type resolve lazily
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Build a control instance from a resolved element.
    ///
    /// Prefers the element-accepting constructor; falls back to the
    /// no-argument form. Constructor failures are wrapped as
    /// [`ArmarError::Construction`] with the cause preserved.
    pub fn instantiate(&self, element: ElementHandle) -> ArmarResult<C> {
        if let Some(from_element) = self.from_element {
            return from_element(element).map_err(|cause| {
                ArmarError::construction(self.name, "element constructor failed", Some(cause))
            });
        }
        if let Some(fallback) = self.fallback {
            return fallback().map_err(|cause| {
                ArmarError::construction(self.name, "fallback constructor failed", Some(cause))
            });
        }
        Err(ArmarError::construction(
            self.name,
            "no usable constructor registered",
            None,
        ))
    }
}

impl<C> std::fmt::Debug for ControlSpec<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSpec")
            .field("name", &self.name)
            .field("lazy", &self.lazy)
            .field("has_element_constructor", &self.from_element.is_some())
            .field("has_fallback_constructor", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget {
        element: Option<ElementHandle>,
    }

    #[test]
    fn test_element_constructor_preferred() {
        let spec: ControlSpec<Widget> = ControlSpec::new("Widget")
            .with_element_constructor(|element| {
                Ok(Widget {
                    element: Some(element),
                })
            })
            .with_fallback_constructor(|| Ok(Widget { element: None }));

        let widget = spec.instantiate(ElementHandle::new("w", "div")).unwrap();
        assert!(widget.element.is_some());
    }

    #[test]
    fn test_fallback_used_without_element_constructor() {
        let spec: ControlSpec<Widget> =
            ControlSpec::new("Widget").with_fallback_constructor(|| Ok(Widget { element: None }));

        let widget = spec.instantiate(ElementHandle::new("w", "div")).unwrap();
        assert!(widget.element.is_none());
    }

    #[test]
    fn test_no_constructor_is_construction_error() {
        let spec: ControlSpec<Widget> = ControlSpec::new("Widget");
        let err = spec.instantiate(ElementHandle::new("w", "div")).unwrap_err();
        assert!(matches!(err, ArmarError::Construction { source: None, .. }));
    }

    #[test]
    fn test_failing_constructor_is_wrapped_with_cause() {
        let spec: ControlSpec<Widget> = ControlSpec::new("Widget").with_element_constructor(|_| {
            Err(ArmarError::Access {
                field: "element".to_string(),
                message: "refused".to_string(),
            })
        });

        let err = spec.instantiate(ElementHandle::new("w", "div")).unwrap_err();
        match err {
            ArmarError::Construction {
                type_name, source, ..
            } => {
                assert_eq!(type_name, "Widget");
                assert!(matches!(*source.unwrap(), ArmarError::Access { .. }));
            }
            other => panic!("expected Construction, got {other:?}"),
        }
    }

    #[test]
    fn test_lazy_flag_defaults_off() {
        let spec: ControlSpec<Widget> = ControlSpec::new("Widget");
        assert!(!spec.is_lazy());
        let spec = spec.lazy();
        assert!(spec.is_lazy());
    }
}
