/*!
The solver loop.

For each `k = 0, 1, 2, …` up to the bound:

```none
assert the k-unraveling            --- unsatisfiable? → UNSAT
push a backtrack point
    assert EMPTY(k) ∨ LOOP(k)      --- satisfiable?   → SAT, extract model
pop the backtrack point
assert ¬PRUNE(k)                   --- unsatisfiable? → UNSAT
```

Outside the backtrack window the backend holds exactly the monotonic
conjunction `unraveling(0) ∧ … ∧ unraveling(k) ∧ ¬prune(0) ∧ … ∧
¬prune(k-1)`; the check under EMPTY ∨ LOOP is the only point that returns
SAT. A backend without backtrack points is driven by replaying that prefix
at every check.

The model is read off inside the backtrack window, while the backend still
holds it: the value of `⟨a, i⟩` for every input atom `a` and step `i ≤ k`,
and the loop-back index recovered by evaluating the loop encodings over the
backend's valuation.
*/

use std::collections::HashMap;

use crate::logic::simplify::simplify;
use crate::logic::{collect_atoms, BinaryOp, Formula, FormulaKind, UnaryOp};
use crate::misc::log::targets;
use crate::reports::Report;
use crate::solver::{Counters, Solver};
use crate::types::err::{ErrorKind, FragmentError};

impl<'a> Solver<'a> {
    /// Decides the satisfiability of the asserted formula, searching up to
    /// `bound` when one is given.
    pub fn solve(&mut self, bound: Option<usize>) -> Result<Report, ErrorKind> {
        let Some(frm) = self.frm else {
            return Err(ErrorKind::NothingAsserted);
        };

        self.check_fragment()?;

        let bound = bound.unwrap_or(usize::MAX);

        self.backend.clear();
        self.prefix.clear();
        self.model = None;
        self.counters = Counters::default();

        for k in 0..=bound {
            self.counters.iterations = k;
            log::debug!(target: targets::SOLVE, "k = {k}");

            let unraveling = self.k_unraveling(frm, k);
            self.assert_monotone(unraveling);
            if !self.check() {
                log::debug!(target: targets::SOLVE, "unraveling unsatisfiable at k = {k}");
                return Ok(Report::Unsatisfiable);
            }

            let empty_or_loop = simplify(self.k_empty(k) | self.k_loop(k));

            let satisfiable = if self.incremental {
                self.backend.push();
                self.backend.assert_formula(empty_or_loop);
                let satisfiable = self.check();
                if satisfiable {
                    self.extract_model(k);
                }
                self.backend.pop();
                satisfiable
            } else {
                self.replay(Some(empty_or_loop));
                let satisfiable = self.backend.solve();
                self.counters.sat_checks += 1;
                if satisfiable {
                    self.extract_model(k);
                }
                satisfiable
            };

            if satisfiable {
                log::debug!(target: targets::SOLVE, "model closed at k = {k}");
                return Ok(Report::Satisfiable);
            }

            let prune = self.prune(k);
            self.assert_monotone(simplify(!prune));
            if !self.check() {
                log::debug!(target: targets::SOLVE, "search pruned dry at k = {k}");
                return Ok(Report::Unsatisfiable);
            }
        }

        Ok(Report::Unknown)
    }

    // The asserted features against what the backend offers.
    fn check_fragment(&self) -> Result<(), ErrorKind> {
        let offered = self.backend.features();

        if self.features.quantifiers && !offered.quantifiers {
            return Err(FragmentError::Quantifiers.into());
        }
        if (self.features.first_order || self.features.nextvar) && !offered.smt {
            return Err(FragmentError::FirstOrder.into());
        }

        Ok(())
    }

    // Extends the monotonic prefix of the encoding.
    fn assert_monotone(&mut self, f: Formula<'a>) {
        self.prefix.push(f);
        if self.incremental {
            self.backend.assert_formula(f);
        }
    }

    // A satisfiability check of the prefix, replayed in full for a
    // non-incremental backend.
    fn check(&mut self) -> bool {
        if !self.incremental {
            self.replay(None);
        }
        self.counters.sat_checks += 1;
        self.backend.solve()
    }

    fn replay(&mut self, extra: Option<Formula<'a>>) {
        self.backend.clear();
        for f in &self.prefix {
            self.backend.assert_formula(*f);
        }
        if let Some(f) = extra {
            self.backend.assert_formula(f);
        }
    }

    // Reads the model off the backend. Called under the EMPTY ∨ LOOP
    // assertion, before the backtrack point closes.
    fn extract_model(&mut self, k: usize) {
        let Some(source) = self.source else {
            return;
        };

        let mut values = HashMap::new();
        for atom in collect_atoms(source) {
            for step in 0..=k {
                let timed = self.sigma.timed_var(atom, step);
                if let Some(value) = self.backend.value(timed) {
                    values.insert((atom.unique_id(), step), value);
                }
            }
        }

        // The loop-back point: k itself when EMPTY discharged every
        // obligation, otherwise the first l whose loop encodings hold.
        let empty = self.k_empty(k);
        let mut loop_index = k;
        if self.eval(empty) != Some(true) {
            for l in 0..k {
                let candidate = simplify(self.l_to_k_loop(l, k) & self.l_to_k_period(l, k));
                if self.eval(candidate) == Some(true) {
                    loop_index = l;
                    break;
                }
            }
        }

        self.store_model(k, loop_index, values);
    }

    // Evaluates a ground formula over the backend's valuation, three-valued.
    fn eval(&self, f: Formula<'a>) -> Option<bool> {
        match f.kind() {
            FormulaKind::Boolean(value) => Some(value),

            FormulaKind::Proposition(_) | FormulaKind::Atom(..) => self.backend.value(f),

            FormulaKind::Unary(UnaryOp::Negation, arg) => self.eval(arg).map(|value| !value),

            FormulaKind::Binary(BinaryOp::Conjunction, left, right) => {
                match (self.eval(left), self.eval(right)) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }

            FormulaKind::Binary(BinaryOp::Disjunction, left, right) => {
                match (self.eval(left), self.eval(right)) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                }
            }

            FormulaKind::Binary(BinaryOp::Implication, left, right) => {
                match (self.eval(left), self.eval(right)) {
                    (Some(false), _) | (_, Some(true)) => Some(true),
                    (Some(true), Some(false)) => Some(false),
                    _ => None,
                }
            }

            FormulaKind::Binary(BinaryOp::Iff, left, right) => {
                match (self.eval(left), self.eval(right)) {
                    (Some(a), Some(b)) => Some(a == b),
                    _ => None,
                }
            }

            _ => None,
        }
    }
}
