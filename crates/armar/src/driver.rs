//! UiDriver - the element-lookup collaborator seam.
//!
//! Armar never talks to a real UI itself. Everything that resolves a
//! [`Locator`] into an element goes through the [`UiDriver`] trait, which a
//! real automation backend implements and tests stub out with [`MockDriver`].
//!
//! Lookups are synchronous and run on the calling thread. Timeouts, retries,
//! and not-found semantics belong to the driver implementation; Armar passes
//! its failures through unmodified.

use crate::locator::Locator;
use crate::result::{ArmarError, ArmarResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Handle to one resolved UI element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier for the element
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content
    #[serde(default)]
    pub text: Option<String>,
    /// Element attributes
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text: None,
            attributes: HashMap::new(),
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get an attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Abstract driver trait for element lookup
///
/// Implementations decide what a locator means and how long a lookup may
/// block; Armar only decides *when* a lookup happens.
pub trait UiDriver: Send + Sync {
    /// Resolve a locator to a single element
    fn find_element(&self, locator: &Locator) -> ArmarResult<ElementHandle>;

    /// Driver name for logging
    fn name(&self) -> &str {
        "driver"
    }
}

/// Shared handle to a driver, cloned into lazy initializers
pub type DriverHandle = Arc<dyn UiDriver>;

/// Mock driver for unit testing
///
/// Registered elements are keyed by the locator's selector string. Every
/// lookup is recorded, so tests can assert exactly when (and how often)
/// resolution happened.
#[derive(Debug, Default)]
pub struct MockDriver {
    elements: HashMap<String, ElementHandle>,
    lookups: Mutex<Vec<String>>,
}

impl MockDriver {
    /// Create a new mock driver with no elements
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load registered elements from a JSON fixture mapping selector
    /// strings (e.g. `"css:button"`) to element handles.
    pub fn from_json(fixture: &str) -> ArmarResult<Self> {
        let elements: HashMap<String, ElementHandle> = serde_json::from_str(fixture)?;
        Ok(Self {
            elements,
            lookups: Mutex::new(Vec::new()),
        })
    }

    /// Register an element for a selector
    pub fn register(&mut self, selector: impl Into<String>, element: ElementHandle) {
        let _ = self.elements.insert(selector.into(), element);
    }

    /// Total number of lookups performed
    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Number of lookups performed for one selector
    pub fn lookups_for(&self, selector: &str) -> usize {
        self.lookups
            .lock()
            .map(|l| l.iter().filter(|s| s.as_str() == selector).count())
            .unwrap_or(0)
    }

    /// Whether a selector was ever looked up
    pub fn was_looked_up(&self, selector: &str) -> bool {
        self.lookups_for(selector) > 0
    }
}

impl UiDriver for MockDriver {
    fn find_element(&self, locator: &Locator) -> ArmarResult<ElementHandle> {
        let key = locator.selector().to_string();
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(key.clone());
        }
        self.elements
            .get(&key)
            .cloned()
            .ok_or_else(|| ArmarError::Lookup {
                selector: locator.to_string(),
                message: "no element registered for selector".to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
