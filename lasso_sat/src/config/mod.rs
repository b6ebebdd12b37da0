//! Configuration of a solver.

/// The configuration a [Solver](crate::solver::Solver) is built from.
#[derive(Clone, Debug)]
pub struct Config {
    /// The name of the backend to draw from the registry.
    pub backend: String,

    /// Apply the past-removal translation unconditionally.
    ///
    /// The translation is applied to formulas with past operators in any
    /// case; on pure-future formulas it is the identity, so this switch only
    /// forces the translation machinery through.
    pub remove_past: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { backend: "dpll".to_owned(), remove_past: false }
    }
}
