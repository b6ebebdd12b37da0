/*!
The narrow abstraction over an external SAT or SMT solver.

The solver loop drives a [SatBackend] and nothing more: assert a formula,
ask for satisfiability, read values back, and manage a stack of backtrack
points. A backend without backtrack points advertises as much through its
[features](SatBackend::features) and is driven non-incrementally instead,
with the monotonic prefix of the encoding re-asserted at each check.

Backends are selected by name from a [BackendRegistry], an explicit value
populated at program start --- there is no global registry.

The bundled [dpll](dpll::Dpll) backend decides the propositional fragment
and is the registry default.
*/

pub mod dpll;

mod registry;
pub use registry::BackendRegistry;

use crate::logic::Formula;

/// What a backend can decide, and how it can be driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendFeatures {
    /// Propositional formulas.
    pub propositional: bool,

    /// Ground first-order atoms over background theories.
    pub smt: bool,

    /// Quantified formulas.
    pub quantifiers: bool,

    /// Stack-like backtrack points via `push`/`pop`.
    pub push_pop: bool,
}

/// The contract between the solver loop and a satisfiability engine.
///
/// Implementations may cache by [unique_id](Formula::unique_id) but must not
/// hold formula handles beyond the call that received them: the backend is
/// dropped before the alphabet.
pub trait SatBackend {
    /// The features of the backend.
    fn features(&self) -> BackendFeatures;

    /// Adds a formula to the current context.
    fn assert_formula(&mut self, f: Formula<'_>);

    /// Opens a backtrack point.
    fn push(&mut self);

    /// Closes the most recent backtrack point, discarding everything
    /// asserted since.
    fn pop(&mut self);

    /// Decides the satisfiability of the asserted formulas.
    fn solve(&mut self) -> bool;

    /// The value of a proposition in the model of the last satisfiable
    /// [solve](SatBackend::solve), if any.
    fn value(&self, p: Formula<'_>) -> Option<bool>;

    /// Empties the backend of all assertions.
    fn clear(&mut self);

    /// The license text of the underlying engine, if it requires display.
    fn license(&self) -> Option<&'static str> {
        None
    }
}
