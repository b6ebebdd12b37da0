/*!
Ground next normal form at a time step.

Every temporal operator is replaced by its fixed-point unfolding, with the
residual next-step obligation standing as the ground proposition
`⟨X ψ, k⟩`, and propositions and atoms grounded to `⟨·, k⟩`:

```none
xnf(p,     k) = ⟨p, k⟩
xnf(X φ,   k) = ⟨X φ, k⟩
xnf(F φ,   k) = xnf(φ, k) ∨ ⟨X F φ, k⟩
xnf(G φ,   k) = xnf(φ, k) ∧ ⟨X G φ, k⟩
xnf(φ U ψ, k) = xnf(ψ, k) ∨ (xnf(φ, k) ∧ ⟨X(φ U ψ), k⟩)
xnf(φ R ψ, k) = xnf(ψ, k) ∧ (xnf(φ, k) ∨ ⟨X(φ R ψ), k⟩)
xnf(φ W ψ, k) = xnf(ψ, k) ∨ (xnf(φ, k) ∧ ⟨X(φ W ψ), k⟩)
xnf(φ M ψ, k) = xnf(ψ, k) ∧ (xnf(φ, k) ∨ ⟨X(φ M ψ), k⟩)
```

With `update` the discovered obligations are appended to the pending
X-requests --- the unraveling wants that, the EMPTY/LOOP/PRUNE encodings
work over a fixed request set and pass `false`.
*/

use crate::logic::{BinaryOp, Formula, FormulaKind, UnaryOp};
use crate::solver::Solver;

impl<'a> Solver<'a> {
    pub(crate) fn ground_xnf(&mut self, f: Formula<'a>, k: usize, update: bool) -> Formula<'a> {
        let sigma = self.sigma;
        match f.kind() {
            FormulaKind::Boolean(_) => f,

            FormulaKind::Proposition(_) | FormulaKind::Atom(..) => sigma.timed_var(f, k),

            FormulaKind::Unary(UnaryOp::Tomorrow, _) => {
                if update {
                    self.x_requests.insert(f);
                }
                sigma.timed_var(f, k)
            }

            FormulaKind::Unary(UnaryOp::Negation, arg) => !self.ground_xnf(arg, k, update),

            FormulaKind::Binary(BinaryOp::Conjunction, left, right) => {
                self.ground_xnf(left, k, update) & self.ground_xnf(right, k, update)
            }

            FormulaKind::Binary(BinaryOp::Disjunction, left, right) => {
                self.ground_xnf(left, k, update) | self.ground_xnf(right, k, update)
            }

            FormulaKind::Binary(BinaryOp::Implication, left, right) => {
                let left = self.ground_xnf(left, k, update);
                let right = self.ground_xnf(right, k, update);
                left.implies(right)
            }

            FormulaKind::Binary(BinaryOp::Iff, left, right) => {
                let left = self.ground_xnf(left, k, update);
                let right = self.ground_xnf(right, k, update);
                left.iff(right)
            }

            FormulaKind::Unary(UnaryOp::Eventually, arg) => {
                let obligation = self.obligation(f, k, update);
                self.ground_xnf(arg, k, update) | obligation
            }

            FormulaKind::Unary(UnaryOp::Always, arg) => {
                let obligation = self.obligation(f, k, update);
                self.ground_xnf(arg, k, update) & obligation
            }

            FormulaKind::Binary(BinaryOp::Until, left, right)
            | FormulaKind::Binary(BinaryOp::WUntil, left, right) => {
                let obligation = self.obligation(f, k, update);
                self.ground_xnf(right, k, update)
                    | (self.ground_xnf(left, k, update) & obligation)
            }

            FormulaKind::Binary(BinaryOp::Release, left, right)
            | FormulaKind::Binary(BinaryOp::SRelease, left, right) => {
                let obligation = self.obligation(f, k, update);
                self.ground_xnf(right, k, update)
                    & (self.ground_xnf(left, k, update) | obligation)
            }

            FormulaKind::Unary(UnaryOp::WTomorrow, _) => {
                unreachable!("weak next is rewritten when asserted")
            }
            FormulaKind::Unary(_, _) | FormulaKind::Binary(_, _, _) => {
                unreachable!("past operators are removed when asserted")
            }
            FormulaKind::Quantifier(..) => {
                unreachable!("quantified formulas are rejected before encoding")
            }
        }
    }

    // The ground proposition for the next-step obligation of `f`, recorded
    // as pending when requested.
    fn obligation(&mut self, f: Formula<'a>, k: usize, update: bool) -> Formula<'a> {
        let x_f = self.sigma.unary(UnaryOp::Tomorrow, f);
        if update {
            self.x_requests.insert(x_f);
        }
        self.sigma.timed_var(x_f, k)
    }
}
