//! Backend selection by name.

use super::{dpll::Dpll, SatBackend};

type Constructor = Box<dyn Fn() -> Box<dyn SatBackend>>;

/// A mapping from backend names to constructors.
///
/// An explicit value rather than process-wide state: build one at program
/// start and hand it to whoever selects backends.
#[derive(Default)]
pub struct BackendRegistry {
    entries: Vec<(String, Constructor)>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        BackendRegistry { entries: Vec::new() }
    }

    /// A registry holding the bundled backends.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("dpll", || Box::new(Dpll::new()));
        registry
    }

    /// Registers a constructor under a name. A later registration of the
    /// same name shadows the earlier one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn() -> Box<dyn SatBackend> + 'static,
    ) {
        self.entries.insert(0, (name.into(), Box::new(constructor)));
    }

    /// Constructs the backend registered under `name`.
    pub fn backend(&self, name: &str) -> Option<Box<dyn SatBackend>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, constructor)| constructor())
    }

    /// The registered names, most recently registered first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}
