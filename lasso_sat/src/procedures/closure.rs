/*!
The X-closure: every next-step obligation the encoding can ever raise.

One pre-solve pass over the asserted formula. A subformula whose unfolding
under XNF introduces an `X ψ` obligation contributes that `X ψ`; the
collection is deduplicated and iterates in insertion order, so the
unraveling built over it is the same formula on every run.
*/

use crate::logic::{BinaryOp, Formula, FormulaKind, UnaryOp};
use crate::solver::Solver;

impl<'a> Solver<'a> {
    pub(crate) fn add_x_closure(&mut self, f: Formula<'a>) {
        let sigma = self.sigma;
        let mut stack = vec![f];

        while let Some(g) = stack.pop() {
            match g.kind() {
                FormulaKind::Unary(UnaryOp::Tomorrow, arg) => {
                    self.x_closure.insert(g);
                    stack.push(arg);
                }

                FormulaKind::Unary(op, arg) => {
                    if matches!(op, UnaryOp::Always | UnaryOp::Eventually) {
                        self.x_closure.insert(sigma.unary(UnaryOp::Tomorrow, g));
                    }
                    stack.push(arg);
                }

                FormulaKind::Binary(op, left, right) => {
                    if matches!(
                        op,
                        BinaryOp::Until | BinaryOp::Release | BinaryOp::WUntil | BinaryOp::SRelease
                    ) {
                        self.x_closure.insert(sigma.unary(UnaryOp::Tomorrow, g));
                    }
                    stack.push(right);
                    stack.push(left);
                }

                FormulaKind::Quantifier(_, _, matrix) => stack.push(matrix),

                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::logic::{Alphabet, BinaryOp, UnaryOp};
    use crate::sat::dpll::Dpll;
    use crate::solver::Solver;

    #[test]
    fn closure_is_ordered_and_deduplicated() {
        let sigma = Alphabet::new();
        let mut slv = Solver::with_backend(&sigma, Config::default(), Box::new(Dpll::new()));

        let p = sigma.proposition("p");
        let q = sigma.proposition("q");
        let x = |f| sigma.unary(UnaryOp::Tomorrow, f);

        let until = sigma.binary(BinaryOp::Until, p, q);
        let always = sigma.unary(UnaryOp::Always, until);

        // G (p U q) & (X p | p U q)
        slv.add_x_closure(always & (x(p) | until));

        let closure: Vec<_> = slv.x_closure.iter().copied().collect();
        assert_eq!(closure, vec![x(always), x(until), x(p)]);
    }

    #[test]
    fn propositional_formulas_have_an_empty_closure() {
        let sigma = Alphabet::new();
        let mut slv = Solver::with_backend(&sigma, Config::default(), Box::new(Dpll::new()));

        let p = sigma.proposition("p");
        let q = sigma.proposition("q");
        slv.add_x_closure((p & !q).iff(q));

        assert!(slv.x_closure.is_empty());
    }
}
