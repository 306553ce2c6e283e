//! Page registration tables.
//!
//! A page declares its shape once, through a [`PageDescriptor`] built with a
//! declarative builder: the constructors it accepts (in declaration order)
//! and the fields the factory should bind. Ancestor field sets are composed
//! with [`PageDescriptor::include`], which stands in for walking a type
//! hierarchy up to (excluding) the universal base.

use crate::binder::FieldSpec;
use crate::bound::Bound;
use crate::control::Control;
use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::matcher::{ConstructorSpec, CtorArgs, TypeKey};
use crate::result::ArmarResult;

/// A user-declared type representing one UI screen/view.
///
/// # Example
///
/// ```
/// use armar::{
///     Bound, Control, ControlSpec, CtorArgs, DriverHandle, Locator, Page,
///     PageDescriptor, TypeKey,
/// };
///
/// struct TextControl;
///
/// impl Control for TextControl {
///     fn spec() -> ControlSpec<Self> {
///         ControlSpec::new("TextControl").with_element_constructor(|_| Ok(Self))
///     }
/// }
///
/// struct LoginPage {
///     driver: DriverHandle,
///     username_box: Bound<TextControl>,
/// }
///
/// impl Page for LoginPage {
///     fn descriptor() -> PageDescriptor<Self> {
///         PageDescriptor::new("LoginPage")
///             .constructor(vec![TypeKey::of::<DriverHandle>()], |mut args: CtorArgs| {
///                 Ok(Self {
///                     driver: args.take(0)?,
///                     username_box: Bound::unbound(),
///                 })
///             })
///             .control_field("username_box", Locator::new("input[name='username']"), |page, bound| {
///                 page.username_box = bound;
///             })
///     }
/// }
/// ```
pub trait Page: Sized + Send + Sync + 'static {
    /// The registration table for this page type
    fn descriptor() -> PageDescriptor<Self>;
}

/// Registration table for one page type: ordered constructors and fields
pub struct PageDescriptor<P> {
    name: &'static str,
    constructors: Vec<ConstructorSpec<P>>,
    fields: Vec<FieldSpec<P>>,
}

impl<P> PageDescriptor<P> {
    /// Start a descriptor for the named page type
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            constructors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare a constructor; call order is declaration order for matching
    #[must_use]
    pub fn constructor(
        mut self,
        params: Vec<TypeKey>,
        build: impl Fn(CtorArgs) -> ArmarResult<P> + Send + Sync + 'static,
    ) -> Self {
        self.constructors.push(ConstructorSpec::new(params, build));
        self
    }

    /// Declare a raw-element field
    #[must_use]
    pub fn element_field(
        mut self,
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, ElementHandle) + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldSpec::element(name, locator, assign));
        self
    }

    /// Declare a raw-element field with a fallible setter
    #[must_use]
    pub fn try_element_field(
        mut self,
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, ElementHandle) -> ArmarResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.fields
            .push(FieldSpec::try_element(name, locator, assign));
        self
    }

    /// Declare a control field
    #[must_use]
    pub fn control_field<C: Control>(
        mut self,
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, Bound<C>) + Send + Sync + 'static,
    ) -> Self
    where
        P: 'static,
    {
        self.fields.push(FieldSpec::control(name, locator, assign));
        self
    }

    /// Declare a control field with a fallible setter
    #[must_use]
    pub fn try_control_field<C: Control>(
        mut self,
        name: &'static str,
        locator: Locator,
        assign: impl Fn(&mut P, Bound<C>) -> ArmarResult<()> + Send + Sync + 'static,
    ) -> Self
    where
        P: 'static,
    {
        self.fields
            .push(FieldSpec::try_control(name, locator, assign));
        self
    }

    /// Declare a locator-carrying field whose declared type is outside the
    /// control family; it is left unbound
    #[must_use]
    pub fn opaque_field(mut self, name: &'static str, locator: Locator) -> Self {
        self.fields.push(FieldSpec::opaque(name, locator));
        self
    }

    /// Declare a field without locator metadata; binding ignores it
    #[must_use]
    pub fn unannotated_field(mut self, name: &'static str) -> Self {
        self.fields.push(FieldSpec::unannotated(name));
        self
    }

    /// Append an ancestor's field set, in its declared order. The
    /// ancestor's constructors are not inherited.
    #[must_use]
    pub fn include(mut self, ancestor: PageDescriptor<P>) -> Self {
        self.fields.extend(ancestor.fields);
        self
    }

    /// Page type name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared constructors, in order
    #[must_use]
    pub fn constructors(&self) -> &[ConstructorSpec<P>] {
        &self.constructors
    }

    /// Registered fields, in binding order
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec<P>] {
        &self.fields
    }
}

impl<P> std::fmt::Debug for PageDescriptor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDescriptor")
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    #[test]
    fn test_builder_orders_constructors_and_fields() {
        let descriptor: PageDescriptor<Plain> = PageDescriptor::new("Plain")
            .constructor(vec![], |_| Ok(Plain))
            .constructor(vec![TypeKey::of::<String>()], |_| Ok(Plain))
            .element_field("first", Locator::new("a"), |_, _| {})
            .unannotated_field("second");

        assert_eq!(descriptor.name(), "Plain");
        assert_eq!(descriptor.constructors().len(), 2);
        assert_eq!(descriptor.constructors()[0].params().len(), 0);
        assert_eq!(descriptor.constructors()[1].params().len(), 1);
        assert_eq!(descriptor.fields()[0].name(), "first");
        assert_eq!(descriptor.fields()[1].name(), "second");
    }

    #[test]
    fn test_include_appends_ancestor_fields() {
        let ancestor: PageDescriptor<Plain> = PageDescriptor::new("BasePage")
            .element_field("header", Locator::new("header"), |_, _| {})
            .constructor(vec![], |_| Ok(Plain));

        let descriptor: PageDescriptor<Plain> = PageDescriptor::new("Derived")
            .element_field("own", Locator::new("main"), |_, _| {})
            .include(ancestor);

        // Own fields first, then the ancestor's, mirroring a subclass walk
        let names: Vec<&str> = descriptor.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, vec!["own", "header"]);
        // Ancestor constructors are not inherited
        assert!(descriptor.constructors().is_empty());
    }
}
