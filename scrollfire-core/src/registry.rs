//! Ordered action collection mutated only through registry signals

use crate::action::ScrollAction;
use crate::signal::{RegistrySignal, Signal};

/// Ordered collection of registered scroll actions
///
/// The collection changes only when a [`RegistrySignal`] is dispatched.
/// Scans get per-entry mutable access through [`ActionRegistry::iter_mut`],
/// which cannot insert or remove entries.
///
/// # Example
/// ```
/// use scrollfire_core::{ActionConfig, ActionRegistry, RegistrySignal, ScrollAction};
///
/// let mut registry = ActionRegistry::new();
/// let action = ScrollAction::new(None, ActionConfig::new("intro", || {})).unwrap();
///
/// assert!(registry.dispatch(RegistrySignal::Add(action)));
/// assert_eq!(registry.len(), 1);
///
/// assert!(registry.dispatch(RegistrySignal::Remove("intro".into())));
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<ScrollAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a signal to the collection
    ///
    /// Returns `true` if the collection changed.
    pub fn dispatch(&mut self, signal: RegistrySignal) -> bool {
        match signal {
            RegistrySignal::Add(action) => {
                self.actions.push(action);
                true
            }
            RegistrySignal::Remove(name) => self.remove_named(&name) > 0,
        }
    }

    /// Remove every action named `name`, keeping the order of the rest
    fn remove_named(&mut self, name: &str) -> usize {
        let before = self.actions.len();
        self.actions.retain(|action| action.name() != name);
        before - self.actions.len()
    }

    /// Live view of the collection in insertion order
    pub fn actions(&self) -> &[ScrollAction] {
        &self.actions
    }

    /// Find the first action with the given name
    pub fn get(&self, name: &str) -> Option<&ScrollAction> {
        self.actions.iter().find(|action| action.name() == name)
    }

    /// Number of actions with the given name
    pub fn count_named(&self, name: &str) -> usize {
        self.actions.iter().filter(|a| a.name() == name).count()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, ScrollAction> {
        self.actions.iter_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.actions.clear();
    }
}

/// Middleware trait for observing registry signals
///
/// Implement this trait to add logging or auditing around signal
/// application.
pub trait Middleware<S: Signal> {
    /// Called before the signal is applied
    fn before(&mut self, signal: &S);

    /// Called after the signal is applied
    fn after(&mut self, signal: &S, changed: bool);
}

/// Middleware that logs signals (for debugging)
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before the signal is applied
    pub log_before: bool,
    /// Whether to log after the signal is applied
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }
}

impl Middleware<RegistrySignal> for LoggingMiddleware {
    fn before(&mut self, signal: &RegistrySignal) {
        if self.log_before {
            tracing::debug!(
                signal = %signal.name(),
                action = %signal.action_name(),
                "Applying registry signal"
            );
        }
    }

    fn after(&mut self, signal: &RegistrySignal, changed: bool) {
        if self.log_after {
            tracing::debug!(
                signal = %signal.name(),
                action = %signal.action_name(),
                changed = changed,
                "Registry signal applied"
            );
        }
    }
}

/// Compose multiple middleware into a single middleware
pub struct ComposedMiddleware<S: Signal> {
    middlewares: Vec<Box<dyn Middleware<S> + Send>>,
}

impl<S: Signal> std::fmt::Debug for ComposedMiddleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<S: Signal> Default for ComposedMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signal> ComposedMiddleware<S> {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware<S> + Send + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<S: Signal> Middleware<S> for ComposedMiddleware<S> {
    fn before(&mut self, signal: &S) {
        for middleware in &mut self.middlewares {
            middleware.before(signal);
        }
    }

    fn after(&mut self, signal: &S, changed: bool) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(signal, changed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionConfig;
    use std::sync::{Arc, Mutex};

    fn add(name: &str) -> RegistrySignal {
        RegistrySignal::Add(ScrollAction::new(None, ActionConfig::new(name, || {})).unwrap())
    }

    fn names(registry: &ActionRegistry) -> Vec<&str> {
        registry.actions().iter().map(|a| a.name()).collect()
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut registry = ActionRegistry::new();
        registry.dispatch(add("a"));
        registry.dispatch(add("b"));
        registry.dispatch(add("c"));

        assert_eq!(names(&registry), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_all_matches() {
        let mut registry = ActionRegistry::new();
        for name in ["dup", "keep", "dup", "dup", "other", "dup"] {
            registry.dispatch(add(name));
        }

        assert!(registry.dispatch(RegistrySignal::Remove("dup".into())));
        assert_eq!(names(&registry), vec!["keep", "other"]);
        assert_eq!(registry.count_named("dup"), 0);
    }

    #[test]
    fn test_remove_adjacent_duplicates() {
        let mut registry = ActionRegistry::new();
        for name in ["x", "x", "x"] {
            registry.dispatch(add(name));
        }

        registry.dispatch(RegistrySignal::Remove("x".into()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_unchanged() {
        let mut registry = ActionRegistry::new();
        registry.dispatch(add("a"));

        assert!(!registry.dispatch(RegistrySignal::Remove("missing".into())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut registry = ActionRegistry::new();
        registry.dispatch(add("a"));
        registry.dispatch(add("b"));

        assert_eq!(registry.get("b").map(|a| a.name()), Some("b"));
        assert!(registry.get("c").is_none());
    }

    #[derive(Clone, Default)]
    struct RecordingMiddleware {
        events: Arc<Mutex<Vec<String>>>,
        tag: &'static str,
    }

    impl Middleware<RegistrySignal> for RecordingMiddleware {
        fn before(&mut self, signal: &RegistrySignal) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:before:{}", self.tag, signal.name()));
        }

        fn after(&mut self, signal: &RegistrySignal, changed: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:after:{}:{}", self.tag, signal.name(), changed));
        }
    }

    #[test]
    fn test_composed_middleware_nesting() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut composed = ComposedMiddleware::new();
        assert!(composed.is_empty());
        composed.add(RecordingMiddleware {
            events: events.clone(),
            tag: "outer",
        });
        composed.add(RecordingMiddleware {
            events: events.clone(),
            tag: "inner",
        });
        assert_eq!(composed.len(), 2);

        let signal = RegistrySignal::Remove("a".into());
        composed.before(&signal);
        composed.after(&signal, false);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "outer:before:scrollActionRemove",
                "inner:before:scrollActionRemove",
                "inner:after:scrollActionRemove:false",
                "outer:after:scrollActionRemove:false",
            ]
        );
    }
}
