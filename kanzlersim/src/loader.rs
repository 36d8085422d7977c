//! Catalog loading for the runner.

use anyhow::Result;
use kanzlersim_core::{DecisionCatalog, EventCatalog};
use std::path::Path;

/// Load the decision catalog from a JSON file, or fall back to the
/// built-in demo set.
pub fn load_decisions(path: Option<&Path>) -> Result<DecisionCatalog> {
    match path {
        Some(path) => DecisionCatalog::load(path),
        None => Ok(DecisionCatalog::builtin()),
    }
}

/// Load the event catalog from a JSON file, or fall back to the built-in
/// demo set.
pub fn load_events(path: Option<&Path>) -> Result<EventCatalog> {
    match path {
        Some(path) => EventCatalog::load(path),
        None => Ok(EventCatalog::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_builtin() {
        let decisions = load_decisions(None).unwrap();
        let events = load_events(None).unwrap();
        assert!(!decisions.is_empty());
        assert!(!events.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_decisions(Some(Path::new("/nonexistent/catalog.json")));
        assert!(err.is_err());
    }
}
