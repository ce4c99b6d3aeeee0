use crate::base::Config;
use std::collections::HashMap;

/// Maps string keys to owned solution schemes (configurations)
///
/// Applications often maintain several solution schemes (e.g., a robust one
/// with the Lagrange multiplier method and small steps, and a fast one for
/// the elastic phases) and switch between them by name. The orchestrator owns
/// the schemes; dropping it (or calling [Orchestrator::clear_all]) releases them.
pub struct Orchestrator {
    /// All schemes, keyed by name
    schemes: HashMap<String, Config>,
}

impl Orchestrator {
    /// Allocates a new instance with no schemes
    pub fn new() -> Self {
        Orchestrator {
            schemes: HashMap::new(),
        }
    }

    /// Returns the scheme under the given key, creating a default one if absent
    ///
    /// Idempotent: calling twice with the same key returns the same stored
    /// scheme (the second call does not reset it).
    pub fn scheme(&mut self, key: &str) -> &mut Config {
        self.schemes.entry(key.to_string()).or_insert_with(Config::new)
    }

    /// Returns the scheme under the given key, if present
    pub fn get_scheme(&self, key: &str) -> Option<&Config> {
        self.schemes.get(key)
    }

    /// Returns the number of stored schemes
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// Removes all schemes
    pub fn clear_all(&mut self) {
        self.schemes.clear();
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Orchestrator;

    #[test]
    fn scheme_is_get_or_create() {
        let mut orchestrator = Orchestrator::new();
        assert!(orchestrator.get_scheme("fast").is_none());

        orchestrator.scheme("fast").set_n_max_iterations(3);
        assert_eq!(orchestrator.len(), 1);

        // an existing key returns the stored scheme unchanged
        assert_eq!(orchestrator.scheme("fast").n_max_iterations, 3);
        assert_eq!(orchestrator.len(), 1);

        // a different key creates a fresh default
        assert_eq!(orchestrator.scheme("robust").n_max_iterations, 10);
        assert_eq!(orchestrator.len(), 2);

        assert!(orchestrator.get_scheme("fast").is_some());
        orchestrator.clear_all();
        assert_eq!(orchestrator.len(), 0);
        assert!(orchestrator.get_scheme("fast").is_none());
    }
}
