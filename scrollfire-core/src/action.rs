//! Scroll actions: an element, a callback and its fired state

use std::fmt;
use std::sync::Arc;

use crate::element::ElementRef;
use crate::error::{Result, ScrollfireError};

/// Zero-argument callback invoked when an action fires
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for a new scroll action
///
/// `name` and `method` are required; building a [`ScrollAction`] without
/// either fails with [`ScrollfireError::Configuration`].
///
/// # Example
///
/// ```
/// use scrollfire_core::ActionConfig;
///
/// let config = ActionConfig::new("hero", || println!("hero in view")).persist(true);
/// assert_eq!(config.name.as_deref(), Some("hero"));
/// ```
#[derive(Clone, Default)]
pub struct ActionConfig {
    /// Identifier used by `remove_action`; not required to be unique
    pub name: Option<String>,
    /// Callback to fire
    pub method: Option<Callback>,
    /// Fire on every in-band scan instead of once
    pub persist: bool,
}

impl ActionConfig {
    /// Config with both required fields set
    pub fn new<F>(name: impl Into<String>, method: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            method: Some(Arc::new(method)),
            persist: false,
        }
    }

    /// Set the action name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the callback
    pub fn method<F>(mut self, method: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.method = Some(Arc::new(method));
        self
    }

    /// Set whether the action keeps firing after the first time
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("name", &self.name)
            .field("method", &self.method.as_ref().map(|_| "<callback>"))
            .field("persist", &self.persist)
            .finish()
    }
}

/// A registered scroll trigger
#[derive(Clone)]
pub struct ScrollAction {
    element: Option<ElementRef>,
    name: String,
    method: Callback,
    persist: bool,
    has_fired: bool,
}

impl ScrollAction {
    /// Build an action from an element and its config
    pub fn new(element: Option<ElementRef>, config: ActionConfig) -> Result<Self> {
        let name = config
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ScrollfireError::configuration("You must specify a config.name."))?;
        let method = config.method.ok_or_else(|| {
            ScrollfireError::configuration("You must specify a config.method to fire.")
        })?;

        Ok(Self {
            element,
            name,
            method,
            persist: config.persist,
            has_fired: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    /// Whether a non-persistent action has already fired
    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Whether the next in-band scan would invoke the callback
    pub fn is_armed(&self) -> bool {
        !self.has_fired
    }

    /// Invoke the callback and latch the fired flag unless persistent.
    pub(crate) fn fire(&mut self) {
        if !self.persist {
            self.has_fired = true;
        }
        (self.method)();
    }
}

impl fmt::Debug for ScrollAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAction")
            .field("name", &self.name)
            .field("element", &self.element)
            .field("persist", &self.persist)
            .field("has_fired", &self.has_fired)
            .finish()
    }
}
