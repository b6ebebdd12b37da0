//! Constant folding on the top-level operator of a formula.
//!
//! Used when assembling the big conjunctions and disjunctions of the
//! encoder, so that neutral and absorbing constants never pile up in an
//! encoding.

use super::formula::{BinaryOp, Formula, FormulaKind, UnaryOp};

/// Simplifies the top-level operator of `f` with respect to ⊤ and ⊥.
///
/// The children are left untouched; apply bottom-up for a deep fold.
pub fn simplify(f: Formula<'_>) -> Formula<'_> {
    let sigma = f.alphabet();
    match f.kind() {
        FormulaKind::Unary(UnaryOp::Negation, arg) => match arg.as_boolean() {
            Some(value) => sigma.boolean(!value),
            None => f,
        },

        FormulaKind::Binary(BinaryOp::Conjunction, left, right) => {
            match (left.as_boolean(), right.as_boolean()) {
                (Some(false), _) | (_, Some(false)) => sigma.bottom(),
                (Some(true), _) => right,
                (_, Some(true)) => left,
                _ => f,
            }
        }

        FormulaKind::Binary(BinaryOp::Disjunction, left, right) => {
            match (left.as_boolean(), right.as_boolean()) {
                (Some(true), _) | (_, Some(true)) => sigma.top(),
                (Some(false), _) => right,
                (_, Some(false)) => left,
                _ => f,
            }
        }

        FormulaKind::Binary(BinaryOp::Implication, left, right) => {
            match (left.as_boolean(), right.as_boolean()) {
                (Some(false), _) | (_, Some(true)) => sigma.top(),
                (Some(true), _) => right,
                (_, Some(false)) => simplify(!left),
                _ => f,
            }
        }

        FormulaKind::Binary(BinaryOp::Iff, left, right) => {
            match (left.as_boolean(), right.as_boolean()) {
                (Some(true), _) => right,
                (_, Some(true)) => left,
                (Some(false), _) => simplify(!right),
                (_, Some(false)) => simplify(!left),
                _ => f,
            }
        }

        _ => f,
    }
}
