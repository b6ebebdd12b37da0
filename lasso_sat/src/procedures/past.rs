/*!
The past-removal translation: LTL+Past to equi-satisfiable pure-future LTL.

Every past subformula is replaced by a *witness* proposition carrying its
value one step back, pinned down by an initial value and an unfolding
constraint:

- `Y ψ` becomes a witness `w` with `¬w` initially and `G(X w ↔ ψ̂)`;
- `Z ψ` the same with `w` initially;
- `φ S ψ` unfolds to `ψ̂ ∨ (φ̂ ∧ y)` where `y` witnesses the yesterday of
  the whole since, with `¬y` initially and `G(X y ↔ ψ̂ ∨ (φ̂ ∧ y))`;
- `φ T ψ` dually unfolds to `ψ̂ ∧ (φ̂ ∨ z)` with `z` initially;
- `O ψ ≡ ⊤ S ψ` and `H ψ ≡ ⊥ T ψ`.

The result is the translated formula conjoined with the collected
constraints, and is the input's equal when no past operator occurs.
*/

use std::collections::HashMap;

use crate::logic::simplify::simplify;
use crate::logic::{big_and, BinaryOp, Formula, FormulaId, FormulaKind, Label, UnaryOp};

/// Translates LTL+Past into equi-satisfiable pure-future LTL.
pub fn remove_past(f: Formula<'_>) -> Formula<'_> {
    let mut remover = PastRemover {
        constraints: Vec::new(),
        translated: HashMap::new(),
    };
    let body = remover.translate(f);

    big_and(
        f.alphabet(),
        std::iter::once(body).chain(remover.constraints),
    )
}

struct PastRemover<'a> {
    constraints: Vec<Formula<'a>>,
    translated: HashMap<FormulaId, Formula<'a>>,
}

impl<'a> PastRemover<'a> {
    fn translate(&mut self, f: Formula<'a>) -> Formula<'a> {
        if let Some(done) = self.translated.get(&f.unique_id()) {
            return *done;
        }

        let sigma = f.alphabet();
        let result = match f.kind() {
            FormulaKind::Boolean(_) | FormulaKind::Proposition(_) | FormulaKind::Atom(..) => f,

            FormulaKind::Unary(UnaryOp::Yesterday, arg) => {
                let arg = self.translate(arg);
                self.yesterday(f, arg, false)
            }

            FormulaKind::Unary(UnaryOp::WYesterday, arg) => {
                let arg = self.translate(arg);
                self.yesterday(f, arg, true)
            }

            FormulaKind::Unary(UnaryOp::Once, arg) => {
                let arg = self.translate(arg);
                self.since(f, sigma.top(), arg)
            }

            FormulaKind::Unary(UnaryOp::Historically, arg) => {
                let arg = self.translate(arg);
                self.triggered(f, sigma.bottom(), arg)
            }

            FormulaKind::Binary(BinaryOp::Since, left, right) => {
                let left = self.translate(left);
                let right = self.translate(right);
                self.since(f, left, right)
            }

            FormulaKind::Binary(BinaryOp::Triggered, left, right) => {
                let left = self.translate(left);
                let right = self.translate(right);
                self.triggered(f, left, right)
            }

            FormulaKind::Unary(op, arg) => sigma.unary(op, self.translate(arg)),
            FormulaKind::Binary(op, left, right) => {
                sigma.binary(op, self.translate(left), self.translate(right))
            }
            FormulaKind::Quantifier(kind, vars, matrix) => {
                sigma.quantifier(kind, vars, self.translate(matrix))
            }
        };

        self.translated.insert(f.unique_id(), result);
        result
    }

    // A proposition carrying the value of `arg` one step back: false (or,
    // weak, true) at the origin, and stepped by `G(X w ↔ arg)`.
    fn yesterday(&mut self, key: Formula<'a>, arg: Formula<'a>, weak: bool) -> Formula<'a> {
        let sigma = key.alphabet();
        let witness = sigma.proposition(Label::Witness(key.unique_id()));

        self.constraints.push(if weak { witness } else { !witness });
        self.step(witness, arg);

        witness
    }

    fn since(&mut self, key: Formula<'a>, left: Formula<'a>, right: Formula<'a>) -> Formula<'a> {
        let sigma = key.alphabet();
        let witness = sigma.proposition(Label::Witness(key.unique_id()));

        let expansion = simplify(right | simplify(left & witness));
        self.constraints.push(!witness);
        self.step(witness, expansion);

        expansion
    }

    fn triggered(&mut self, key: Formula<'a>, left: Formula<'a>, right: Formula<'a>) -> Formula<'a> {
        let sigma = key.alphabet();
        let witness = sigma.proposition(Label::Witness(key.unique_id()));

        let expansion = simplify(right & simplify(left | witness));
        self.constraints.push(witness);
        self.step(witness, expansion);

        expansion
    }

    fn step(&mut self, witness: Formula<'a>, value: Formula<'a>) {
        let sigma = witness.alphabet();
        let next_witness = sigma.unary(UnaryOp::Tomorrow, witness);
        self.constraints
            .push(sigma.unary(UnaryOp::Always, next_witness.iff(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;
    use crate::parser::Features;

    #[test]
    fn output_is_pure_future() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        let formulas = [
            sigma.unary(UnaryOp::Yesterday, p),
            sigma.unary(UnaryOp::WYesterday, p & q),
            sigma.unary(UnaryOp::Once, p),
            sigma.unary(UnaryOp::Historically, p.implies(q)),
            sigma.binary(BinaryOp::Since, p, q),
            sigma.binary(BinaryOp::Triggered, p, q),
            sigma.unary(UnaryOp::Always, sigma.binary(BinaryOp::Since, p, q)),
        ];

        for f in formulas {
            let translated = remove_past(f);
            assert!(!Features::of(translated).past, "{f} -> {translated}");
        }
    }

    #[test]
    fn pure_future_input_is_untouched() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        let f = sigma.unary(UnaryOp::Always, p.implies(sigma.unary(UnaryOp::Eventually, q)));
        assert_eq!(remove_past(f), f);
    }

    #[test]
    fn shared_past_subformulas_share_a_witness() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let yp = sigma.unary(UnaryOp::Yesterday, p);

        // Two occurrences of Y p, one witness: one initial constraint and
        // one stepping constraint beside the two conjuncts of the body.
        let translated = remove_past(yp & (yp | p));
        assert_eq!(translated.conjuncts().len(), 4);
    }
}
