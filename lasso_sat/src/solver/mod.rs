/*!
The solver --- to which formulas are asserted and which drives a backend
through the bounded search for a model.

A solver borrows its alphabet, owns its backend, and follows the lifecycle
`clear → assert_formula* → solve`. A single instance may be reused across
invocations, one at a time.

# Example
```rust
# use lasso_sat::config::Config;
# use lasso_sat::logic::Alphabet;
# use lasso_sat::parser::parse_formula;
# use lasso_sat::reports::Report;
# use lasso_sat::sat::BackendRegistry;
# use lasso_sat::solver::Solver;
let sigma = Alphabet::new();
let registry = BackendRegistry::with_defaults();

let parsed = parse_formula(&sigma, "G p & F !p", |msg| eprintln!("{msg}"));
# let parsed = parsed.unwrap();

let mut solver = Solver::from_config(&sigma, Config::default(), &registry).unwrap();
solver.assert_formula(parsed.formula);

assert_eq!(solver.solve(Some(10)), Ok(Report::Unsatisfiable));
```
*/

use std::collections::HashMap;

use crate::config::Config;
use crate::generic::OrderedSet;
use crate::logic::{Alphabet, Formula, FormulaId, FormulaKind, UnaryOp};
use crate::parser::Features;
use crate::procedures::{remove_past, to_nnf};
use crate::reports::Model;
use crate::sat::{BackendRegistry, SatBackend};
use crate::types::err::ErrorKind;

/// Counters over a solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    /// The bound the search has reached.
    pub iterations: usize,

    /// Satisfiability checks posed to the backend.
    pub sat_checks: usize,
}

/// The bounded-satisfiability solver.
pub struct Solver<'a> {
    pub(crate) sigma: &'a Alphabet,

    /// The configuration of the solver.
    pub config: Config,

    /// Counters over the last solve.
    pub counters: Counters,

    pub(crate) backend: Box<dyn SatBackend>,
    pub(crate) incremental: bool,

    // The formula as asserted, and as encoded (weak next and past operators
    // translated away).
    pub(crate) source: Option<Formula<'a>>,
    pub(crate) frm: Option<Formula<'a>>,

    pub(crate) features: Features,

    pub(crate) x_closure: OrderedSet<Formula<'a>>,
    pub(crate) x_requests: OrderedSet<Formula<'a>>,

    // The monotonic prefix of the encoding, replayed in full at each check
    // when the backend has no backtrack points.
    pub(crate) prefix: Vec<Formula<'a>>,

    pub(crate) model: Option<Model>,
}

impl<'a> Solver<'a> {
    /// Creates a solver over `sigma`, with the backend the configuration
    /// names drawn from the registry.
    pub fn from_config(
        sigma: &'a Alphabet,
        config: Config,
        registry: &BackendRegistry,
    ) -> Result<Self, ErrorKind> {
        let backend = registry
            .backend(&config.backend)
            .ok_or_else(|| ErrorKind::UnknownBackend(config.backend.clone()))?;
        Ok(Self::with_backend(sigma, config, backend))
    }

    /// Creates a solver over `sigma` with the given backend.
    pub fn with_backend(
        sigma: &'a Alphabet,
        config: Config,
        backend: Box<dyn SatBackend>,
    ) -> Self {
        let incremental = backend.features().push_pop;
        Solver {
            sigma,
            config,
            counters: Counters::default(),
            backend,
            incremental,
            source: None,
            frm: None,
            features: Features::default(),
            x_closure: OrderedSet::new(),
            x_requests: OrderedSet::new(),
            prefix: Vec::new(),
            model: None,
        }
    }

    /// Asserts a formula. Multiple assertions are conjoined.
    pub fn assert_formula(&mut self, f: Formula<'a>) {
        self.features = self.features.union(Features::of(f));

        let mut prepared = replace_weak_next(f);
        if self.features.past || self.config.remove_past {
            prepared = remove_past(prepared);
        }
        // The encoder unfolds temporal operators in positive position only,
        // so negations go down to the literals before anything is encoded.
        let prepared = to_nnf(prepared);

        self.source = Some(match self.source {
            None => f,
            Some(g) => g & f,
        });
        self.frm = Some(match self.frm {
            None => prepared,
            Some(g) => g & prepared,
        });

        self.add_x_closure(prepared);
    }

    /// Forgets everything asserted, readying the solver for a fresh
    /// assert–solve round.
    pub fn clear(&mut self) {
        self.source = None;
        self.frm = None;
        self.features = Features::default();
        self.x_closure.clear();
        self.x_requests.clear();
        self.prefix.clear();
        self.model = None;
        self.counters = Counters::default();
        self.backend.clear();
    }

    /// The model found by the last satisfiable solve.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub(crate) fn store_model(&mut self, k: usize, loop_index: usize, values: HashMap<(FormulaId, usize), bool>) {
        self.model = Some(Model::new(k + 1, loop_index, values));
    }
}

// Weak next coincides with next over the infinite models built here, and is
// rewritten away before any encoding sees it.
fn replace_weak_next(f: Formula<'_>) -> Formula<'_> {
    let sigma = f.alphabet();
    match f.kind() {
        FormulaKind::Unary(UnaryOp::WTomorrow, arg) => {
            sigma.unary(UnaryOp::Tomorrow, replace_weak_next(arg))
        }
        FormulaKind::Unary(op, arg) => sigma.unary(op, replace_weak_next(arg)),
        FormulaKind::Binary(op, left, right) => {
            sigma.binary(op, replace_weak_next(left), replace_weak_next(right))
        }
        FormulaKind::Quantifier(kind, vars, matrix) => {
            sigma.quantifier(kind, vars, replace_weak_next(matrix))
        }
        _ => f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_next_is_rewritten() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");

        let weak = sigma.unary(UnaryOp::WTomorrow, p);
        assert_eq!(replace_weak_next(weak), sigma.unary(UnaryOp::Tomorrow, p));

        let nested = sigma.unary(UnaryOp::Always, weak) & p;
        let rewritten = replace_weak_next(nested);
        assert_eq!(
            rewritten,
            sigma.unary(UnaryOp::Always, sigma.unary(UnaryOp::Tomorrow, p)) & p
        );
    }
}
