/*!
Negation normal form.

Negations are pushed down to the literals through the dual tables. The
negated biconditional is rewritten to its canonical disjunctive form
`(φ ∧ ¬ψ) ∨ (¬φ ∧ ψ)`, which a second application leaves unchanged --- so
the transformation is idempotent.
*/

use crate::logic::{BinaryOp, Formula, FormulaKind, QuantifierKind, UnaryOp};

fn dual_unary(op: UnaryOp) -> UnaryOp {
    match op {
        UnaryOp::Negation => UnaryOp::Negation,
        UnaryOp::Tomorrow => UnaryOp::Tomorrow,
        UnaryOp::WTomorrow => UnaryOp::WTomorrow,
        UnaryOp::Yesterday => UnaryOp::Yesterday,
        UnaryOp::WYesterday => UnaryOp::WYesterday,
        UnaryOp::Always => UnaryOp::Eventually,
        UnaryOp::Eventually => UnaryOp::Always,
        UnaryOp::Once => UnaryOp::Historically,
        UnaryOp::Historically => UnaryOp::Once,
    }
}

fn dual_binary(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Conjunction => BinaryOp::Disjunction,
        BinaryOp::Disjunction => BinaryOp::Conjunction,
        BinaryOp::Until => BinaryOp::Release,
        BinaryOp::Release => BinaryOp::Until,
        BinaryOp::WUntil => BinaryOp::SRelease,
        BinaryOp::SRelease => BinaryOp::WUntil,
        BinaryOp::Since => BinaryOp::Triggered,
        BinaryOp::Triggered => BinaryOp::Since,
        // Implication and iff have no simple dual; both are rewritten before
        // this table is consulted.
        BinaryOp::Implication | BinaryOp::Iff => unreachable!(),
    }
}

/// Rewrites a formula so every negation stands over a proposition or atom.
pub fn to_nnf(f: Formula<'_>) -> Formula<'_> {
    let sigma = f.alphabet();
    match f.kind() {
        FormulaKind::Boolean(_) | FormulaKind::Proposition(_) | FormulaKind::Atom(..) => f,

        // Push the negation down to the literals.
        FormulaKind::Unary(UnaryOp::Negation, n) => match n.kind() {
            FormulaKind::Boolean(value) => sigma.boolean(!value),

            FormulaKind::Proposition(_) | FormulaKind::Atom(..) => f,

            FormulaKind::Unary(UnaryOp::Negation, g) => to_nnf(g),

            FormulaKind::Unary(op, g) => sigma.unary(dual_unary(op), to_nnf(!g)),

            FormulaKind::Binary(BinaryOp::Implication, left, right) => {
                to_nnf(left) & to_nnf(!right)
            }

            FormulaKind::Binary(BinaryOp::Iff, left, right) => {
                (to_nnf(left) & to_nnf(!right)) | (to_nnf(!left) & to_nnf(right))
            }

            FormulaKind::Binary(op, left, right) => {
                sigma.binary(dual_binary(op), to_nnf(!left), to_nnf(!right))
            }

            FormulaKind::Quantifier(kind, vars, matrix) => {
                let dual = match kind {
                    QuantifierKind::Exists => QuantifierKind::Forall,
                    QuantifierKind::Forall => QuantifierKind::Exists,
                };
                sigma.quantifier(dual, vars, to_nnf(!matrix))
            }
        },

        // Other cases: just recurse down the formula.
        FormulaKind::Unary(op, arg) => sigma.unary(op, to_nnf(arg)),
        FormulaKind::Binary(op, left, right) => sigma.binary(op, to_nnf(left), to_nnf(right)),
        FormulaKind::Quantifier(kind, vars, matrix) => {
            sigma.quantifier(kind, vars, to_nnf(matrix))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;

    // Every negation in `f` stands directly over a proposition or atom.
    fn negations_are_atomic(f: Formula<'_>) -> bool {
        let mut stack = vec![f];
        while let Some(g) = stack.pop() {
            match g.kind() {
                FormulaKind::Unary(UnaryOp::Negation, arg) => {
                    if !arg.is_atomic() {
                        return false;
                    }
                }
                FormulaKind::Unary(_, arg) => stack.push(arg),
                FormulaKind::Binary(_, left, right) => {
                    stack.push(left);
                    stack.push(right);
                }
                FormulaKind::Quantifier(_, _, matrix) => stack.push(matrix),
                _ => {}
            }
        }
        true
    }

    fn samples(sigma: &Alphabet) -> Vec<Formula<'_>> {
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");
        let until = sigma.binary(BinaryOp::Until, p, q);
        let always = sigma.unary(UnaryOp::Always, p);

        vec![
            !(p & q),
            !(p | !q),
            !always,
            !until,
            !(p.implies(q)),
            !(p.iff(q)),
            !(!p),
            !sigma.unary(UnaryOp::Eventually, !until),
            !sigma.binary(BinaryOp::Since, p, q),
            sigma.unary(UnaryOp::Always, !(p.iff(q))),
        ]
    }

    #[test]
    fn duals() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        assert_eq!(
            to_nnf(!sigma.unary(UnaryOp::Always, p)),
            sigma.unary(UnaryOp::Eventually, !p)
        );
        assert_eq!(
            to_nnf(!sigma.binary(BinaryOp::Until, p, q)),
            sigma.binary(BinaryOp::Release, !p, !q)
        );
        assert_eq!(to_nnf(!(p & q)), !p | !q);
        assert_eq!(to_nnf(!(p.implies(q))), p & !q);
        assert_eq!(to_nnf(!(p.iff(q))), (p & !q) | (!p & q));
        assert_eq!(to_nnf(!(!p)), p);
    }

    #[test]
    fn negations_end_on_literals() {
        let sigma = Alphabet::new();
        for f in samples(&sigma) {
            assert!(negations_are_atomic(to_nnf(f)), "{f}");
        }
    }

    #[test]
    fn idempotent() {
        let sigma = Alphabet::new();
        for f in samples(&sigma) {
            let once = to_nnf(f);
            assert_eq!(to_nnf(once), once, "{f}");
        }
    }
}
