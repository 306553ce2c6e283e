//! Armar: page object construction with lazy element binding.
//!
//! Armar (Spanish: "to assemble") builds page objects for UI-driving test
//! code. A page type registers its constructors and locator-carrying fields
//! once; the factory matches a constructor against the runtime arguments,
//! constructs the page, and binds every registered field, either eagerly or
//! deferred to first use. Constructed pages can be routed through an
//! interceptor chain for cross-cutting behavior without touching the page
//! types themselves.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      ARMAR Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌─────────────┐   ┌────────────┐   ┌────────┐ │
//! │  │ Page       │   │ Constructor │   │ Field      │   │ Ui     │ │
//! │  │ Factory    │──►│ Matcher     │   │ Binder     │──►│ Driver │ │
//! │  │            │───────────────────► │ eager/lazy │   │ (seam) │ │
//! │  └────────────┘   └─────────────┘   └────────────┘   └────────┘ │
//! │        │                                                        │
//! │        ▼ chain non-empty?                                       │
//! │  ┌────────────────────┐                                         │
//! │  │ PageHandle         │  plain, or invocations routed through   │
//! │  │ (Deref to page)    │  the interceptor chain                  │
//! │  └────────────────────┘                                         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use armar::{
//!     Bound, Control, ControlSpec, CtorArgs, DriverHandle, ElementHandle,
//!     Locator, MockDriver, Page, PageArgs, PageDescriptor, PageFactory,
//!     TypeKey,
//! };
//! use std::sync::Arc;
//!
//! struct TextControl {
//!     element: ElementHandle,
//! }
//!
//! impl Control for TextControl {
//!     fn spec() -> ControlSpec<Self> {
//!         ControlSpec::new("TextControl")
//!             .with_element_constructor(|element| Ok(Self { element }))
//!     }
//! }
//!
//! struct LoginPage {
//!     username_box: Bound<TextControl>,
//! }
//!
//! impl Page for LoginPage {
//!     fn descriptor() -> PageDescriptor<Self> {
//!         PageDescriptor::new("LoginPage")
//!             .constructor(vec![TypeKey::of::<DriverHandle>()], |mut args: CtorArgs| {
//!                 let _driver: DriverHandle = args.take(0)?;
//!                 Ok(Self { username_box: Bound::unbound() })
//!             })
//!             .control_field(
//!                 "username_box",
//!                 Locator::new("input[name='username']"),
//!                 |page, bound| page.username_box = bound,
//!             )
//!     }
//! }
//!
//! # fn main() -> armar::ArmarResult<()> {
//! let mut mock = MockDriver::new();
//! mock.register(
//!     "css:input[name='username']",
//!     ElementHandle::new("user-box", "input"),
//! );
//! let factory = PageFactory::new(Arc::new(mock));
//!
//! let page = factory.create_page::<LoginPage>(PageArgs::new())?;
//! assert_eq!(page.username_box.get()?.element.id, "user-box");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod binder;
mod bound;
mod control;
mod driver;
mod factory;
mod interceptor;
mod locator;
mod matcher;
mod page;
mod result;

pub use binder::{FieldBinder, FieldSpec};
pub use bound::Bound;
pub use control::{Control, ControlSpec};
pub use driver::{DriverHandle, ElementHandle, MockDriver, UiDriver};
pub use factory::{PageFactory, PageHandle};
pub use interceptor::{InterceptorChain, Invocation, PageInterceptor};
pub use locator::{Locator, Selector};
pub use matcher::{
    match_constructor, ArgValue, ConstructorSpec, CtorArgs, PageArgs, TypeKey,
};
pub use page::{Page, PageDescriptor};
pub use result::{ArmarError, ArmarResult};
