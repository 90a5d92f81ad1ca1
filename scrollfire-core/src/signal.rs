//! Registry signals: queued add/remove requests

use std::fmt::Debug;

use crate::action::ScrollAction;

/// Marker trait for messages that flow through the signal queue
///
/// Signals are:
/// - Clone: they may be logged or inspected by middleware
/// - Debug: for logging
/// - Send + 'static: handles enqueue them from other tasks
pub trait Signal: Clone + Debug + Send + 'static {
    /// Signal name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Mutation request for the action registry
///
/// Public API calls never touch the collection directly; they enqueue one of
/// these and the registry applies it at the next flush.
#[derive(Clone, Debug)]
pub enum RegistrySignal {
    /// Append an action to the end of the collection
    Add(ScrollAction),
    /// Remove every action with this name
    Remove(String),
}

impl Signal for RegistrySignal {
    fn name(&self) -> &'static str {
        match self {
            RegistrySignal::Add(_) => "scrollActionAdd",
            RegistrySignal::Remove(_) => "scrollActionRemove",
        }
    }
}

impl RegistrySignal {
    /// Name of the action this signal targets
    pub fn action_name(&self) -> &str {
        match self {
            RegistrySignal::Add(action) => action.name(),
            RegistrySignal::Remove(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionConfig;

    #[test]
    fn test_signal_names() {
        let action = ScrollAction::new(None, ActionConfig::new("intro", || {})).unwrap();
        let add = RegistrySignal::Add(action);
        let remove = RegistrySignal::Remove("intro".into());

        assert_eq!(add.name(), "scrollActionAdd");
        assert_eq!(remove.name(), "scrollActionRemove");
        assert_eq!(add.action_name(), "intro");
        assert_eq!(remove.action_name(), "intro");
    }
}
