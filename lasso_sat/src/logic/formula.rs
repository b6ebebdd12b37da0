/*!
Formulas, as copyable handles into an [Alphabet].

A handle pairs an alphabet reference with a node identifier and is treated as
an immutable value. Two handles are equal exactly when they identify the same
node of the same alphabet, so equality and hashing are O(1).

Inspection goes through [kind](Formula::kind), which returns an owned
[FormulaKind] suitable for direct `match`ing. The aggregate views
[conjuncts](Formula::conjuncts) and [disjuncts](Formula::disjuncts) flatten a
spine of ∧ or ∨ nodes into its operand sequence, left to right, regardless of
the shape of the underlying tree.
*/

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use super::alphabet::{Alphabet, FormulaId, FormulaNode, Label};
use super::simplify::simplify;
use super::term::Term;

/// The unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// ¬
    Negation,
    /// X --- next.
    Tomorrow,
    /// wX --- weak next.
    WTomorrow,
    /// Y --- yesterday.
    Yesterday,
    /// Z --- weak yesterday.
    WYesterday,
    /// G --- always.
    Always,
    /// F --- eventually.
    Eventually,
    /// O --- once.
    Once,
    /// H --- historically.
    Historically,
}

/// The binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// ∧
    Conjunction,
    /// ∨
    Disjunction,
    /// →
    Implication,
    /// ↔
    Iff,
    /// U
    Until,
    /// R
    Release,
    /// W --- weak until.
    WUntil,
    /// M --- strong release.
    SRelease,
    /// S --- since.
    Since,
    /// T --- triggered.
    Triggered,
}

/// The kinds of quantifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    Exists,
    Forall,
}

impl UnaryOp {
    /// Whether the operator is temporal (anything but negation).
    pub fn is_temporal(self) -> bool {
        !matches!(self, UnaryOp::Negation)
    }

    /// Whether the operator speaks about the past.
    pub fn is_past(self) -> bool {
        matches!(
            self,
            UnaryOp::Yesterday | UnaryOp::WYesterday | UnaryOp::Once | UnaryOp::Historically
        )
    }
}

impl BinaryOp {
    /// Whether the operator is temporal (anything but a boolean connective).
    pub fn is_temporal(self) -> bool {
        !matches!(
            self,
            BinaryOp::Conjunction | BinaryOp::Disjunction | BinaryOp::Implication | BinaryOp::Iff
        )
    }

    /// Whether the operator speaks about the past.
    pub fn is_past(self) -> bool {
        matches!(self, BinaryOp::Since | BinaryOp::Triggered)
    }
}

/// A formula: a value handle over a node of an [Alphabet].
#[derive(Clone, Copy)]
pub struct Formula<'a> {
    sigma: &'a Alphabet,
    id: FormulaId,
}

/// The shape of a formula, for matching.
///
/// The native `match` replaces the variadic matcher of pointer-based
/// hash-consing designs: arms are tried in order, operand order is preserved,
/// and the value of the selected arm is the value of the `match`.
#[derive(Clone)]
pub enum FormulaKind<'a> {
    /// ⊤ or ⊥.
    Boolean(bool),

    /// An atomic proposition.
    Proposition(Label),

    /// A relation applied to terms.
    Atom(super::term::Relation, Vec<Term<'a>>),

    /// A unary operator applied to a formula.
    Unary(UnaryOp, Formula<'a>),

    /// A binary operator applied to two formulas.
    Binary(BinaryOp, Formula<'a>, Formula<'a>),

    /// A quantified formula.
    Quantifier(QuantifierKind, Vec<Term<'a>>, Formula<'a>),
}

impl<'a> Formula<'a> {
    pub(crate) fn new(sigma: &'a Alphabet, id: FormulaId) -> Self {
        Formula { sigma, id }
    }

    /// The alphabet this formula belongs to.
    pub fn alphabet(&self) -> &'a Alphabet {
        self.sigma
    }

    /// The opaque identifier of the node, stable for the lifetime of the
    /// alphabet and usable as a hash-map key.
    pub fn unique_id(&self) -> FormulaId {
        self.id
    }

    /// The shape of the formula.
    pub fn kind(&self) -> FormulaKind<'a> {
        match self.sigma.formula_node(self.id) {
            FormulaNode::Boolean(b) => FormulaKind::Boolean(b),
            FormulaNode::Proposition(label) => FormulaKind::Proposition(label),
            FormulaNode::Atom { rel, args } => FormulaKind::Atom(
                rel,
                args.iter().map(|t| self.sigma.term(*t)).collect(),
            ),
            FormulaNode::Unary { op, arg } => FormulaKind::Unary(op, self.sigma.formula(arg)),
            FormulaNode::Binary { op, left, right } => {
                FormulaKind::Binary(op, self.sigma.formula(left), self.sigma.formula(right))
            }
            FormulaNode::Quantifier { kind, vars, matrix } => FormulaKind::Quantifier(
                kind,
                vars.iter().map(|t| self.sigma.term(*t)).collect(),
                self.sigma.formula(matrix),
            ),
        }
    }

    /// The boolean value, if the formula is a constant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self.kind() {
            FormulaKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// The label, if the formula is a proposition.
    pub fn as_proposition(&self) -> Option<Label> {
        match self.kind() {
            FormulaKind::Proposition(label) => Some(label),
            _ => None,
        }
    }

    /// The operator and operand, if the top of the formula is unary.
    pub fn as_unary(&self) -> Option<(UnaryOp, Formula<'a>)> {
        match self.kind() {
            FormulaKind::Unary(op, arg) => Some((op, arg)),
            _ => None,
        }
    }

    /// The operator and operands, if the top of the formula is binary.
    pub fn as_binary(&self) -> Option<(BinaryOp, Formula<'a>, Formula<'a>)> {
        match self.kind() {
            FormulaKind::Binary(op, left, right) => Some((op, left, right)),
            _ => None,
        }
    }

    /// Whether the formula is a proposition or first-order atom.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self.kind(),
            FormulaKind::Boolean(_) | FormulaKind::Proposition(_) | FormulaKind::Atom(..)
        )
    }

    /// Whether the top of the formula is propositional: a leaf or a boolean
    /// connective.
    pub fn is_propositional(&self) -> bool {
        match self.kind() {
            FormulaKind::Boolean(_) | FormulaKind::Proposition(_) | FormulaKind::Atom(..) => true,
            FormulaKind::Unary(op, _) => !op.is_temporal(),
            FormulaKind::Binary(op, _, _) => !op.is_temporal(),
            FormulaKind::Quantifier(..) => false,
        }
    }

    /// Whether the top of the formula is a temporal operator.
    pub fn is_temporal(&self) -> bool {
        match self.kind() {
            FormulaKind::Unary(op, _) => op.is_temporal(),
            FormulaKind::Binary(op, _, _) => op.is_temporal(),
            _ => false,
        }
    }

    /// Whether the top of the formula is a future temporal operator.
    pub fn is_future_temporal(&self) -> bool {
        match self.kind() {
            FormulaKind::Unary(op, _) => op.is_temporal() && !op.is_past(),
            FormulaKind::Binary(op, _, _) => op.is_temporal() && !op.is_past(),
            _ => false,
        }
    }

    /// Whether the top of the formula is a past temporal operator.
    pub fn is_past_temporal(&self) -> bool {
        match self.kind() {
            FormulaKind::Unary(op, _) => op.is_past(),
            FormulaKind::Binary(op, _, _) => op.is_past(),
            _ => false,
        }
    }

    /// The operands of the maximal spine of ∧ nodes rooted here, left to
    /// right. A formula which is not a conjunction is its own only operand.
    pub fn conjuncts(&self) -> Vec<Formula<'a>> {
        self.operands(BinaryOp::Conjunction)
    }

    /// The operands of the maximal spine of ∨ nodes rooted here, left to
    /// right. A formula which is not a disjunction is its own only operand.
    pub fn disjuncts(&self) -> Vec<Formula<'a>> {
        self.operands(BinaryOp::Disjunction)
    }

    fn operands(&self, op: BinaryOp) -> Vec<Formula<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(f) = stack.pop() {
            match f.kind() {
                FormulaKind::Binary(o, left, right) if o == op => {
                    // Right is pushed first so operands pop left to right.
                    stack.push(right);
                    stack.push(left);
                }
                _ => out.push(f),
            }
        }
        out
    }

    /// The implication `self → rhs`.
    pub fn implies(self, rhs: Formula<'a>) -> Formula<'a> {
        self.sigma.binary(BinaryOp::Implication, self, rhs)
    }

    /// The equivalence `self ↔ rhs`.
    pub fn iff(self, rhs: Formula<'a>) -> Formula<'a> {
        self.sigma.binary(BinaryOp::Iff, self, rhs)
    }
}

impl PartialEq for Formula<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.sigma, other.sigma) && self.id == other.id
    }
}

impl Eq for Formula<'_> {}

impl Hash for Formula<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.sigma as *const Alphabet as usize).hash(state);
        self.id.hash(state);
    }
}

impl std::fmt::Debug for Formula<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Formula({}, {})", self.id, self)
    }
}

impl<'a> std::ops::Not for Formula<'a> {
    type Output = Formula<'a>;

    fn not(self) -> Formula<'a> {
        self.sigma.unary(UnaryOp::Negation, self)
    }
}

impl<'a> std::ops::BitAnd for Formula<'a> {
    type Output = Formula<'a>;

    fn bitand(self, rhs: Formula<'a>) -> Formula<'a> {
        self.sigma.binary(BinaryOp::Conjunction, self, rhs)
    }
}

impl<'a> std::ops::BitOr for Formula<'a> {
    type Output = Formula<'a>;

    fn bitor(self, rhs: Formula<'a>) -> Formula<'a> {
        self.sigma.binary(BinaryOp::Disjunction, self, rhs)
    }
}

/// Conjoins the given formulas, in order, folding constants away.
///
/// The conjunction of no formulas is ⊤.
pub fn big_and<'a>(
    sigma: &'a Alphabet,
    formulas: impl IntoIterator<Item = Formula<'a>>,
) -> Formula<'a> {
    let mut acc: Option<Formula<'a>> = None;
    for f in formulas {
        acc = Some(match acc {
            None => f,
            Some(a) => simplify(a & f),
        });
    }
    acc.unwrap_or_else(|| sigma.top())
}

/// Disjoins the given formulas, in order, folding constants away.
///
/// The disjunction of no formulas is ⊥.
pub fn big_or<'a>(
    sigma: &'a Alphabet,
    formulas: impl IntoIterator<Item = Formula<'a>>,
) -> Formula<'a> {
    let mut acc: Option<Formula<'a>> = None;
    for f in formulas {
        acc = Some(match acc {
            None => f,
            Some(a) => simplify(a | f),
        });
    }
    acc.unwrap_or_else(|| sigma.bottom())
}

/// Collects the propositions and first-order atoms of a formula, in first
/// occurrence order, each once.
///
/// Propositions minted by the solver (timed variables and past witnesses)
/// are skipped: the collection is of the atoms the input spoke about.
pub fn collect_atoms<'a>(f: Formula<'a>) -> Vec<Formula<'a>> {
    let mut out = Vec::new();
    let mut seen: HashSet<FormulaId> = HashSet::new();
    let mut stack = vec![f];
    while let Some(g) = stack.pop() {
        match g.kind() {
            FormulaKind::Proposition(Label::Name(_)) | FormulaKind::Atom(..) => {
                if seen.insert(g.unique_id()) {
                    out.push(g);
                }
            }
            FormulaKind::Unary(_, arg) => stack.push(arg),
            FormulaKind::Binary(_, left, right) => {
                stack.push(right);
                stack.push(left);
            }
            FormulaKind::Quantifier(_, _, matrix) => stack.push(matrix),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjuncts_flatten_any_spine() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");
        let r = sigma.proposition("r");
        let s = sigma.proposition("s");

        let left_leaning = (p & q) & r;
        let right_leaning = p & (q & r);
        let mixed = (p & q) & (r & s);

        assert_eq!(left_leaning.conjuncts(), vec![p, q, r]);
        assert_eq!(right_leaning.conjuncts(), vec![p, q, r]);
        assert_eq!(mixed.conjuncts(), vec![p, q, r, s]);

        // A disjunction below the spine is a single operand.
        let with_or = p & (q | r);
        assert_eq!(with_or.conjuncts(), vec![p, q | r]);

        assert_eq!(p.conjuncts(), vec![p]);
    }

    #[test]
    fn classifiers_look_at_the_top_operator() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        assert!(p.is_propositional());
        assert!((p & q).is_propositional());
        assert!(!(p & q).is_temporal());

        let until = sigma.binary(BinaryOp::Until, p, q);
        assert!(until.is_temporal());
        assert!(until.is_future_temporal());
        assert!(!until.is_past_temporal());

        let since = sigma.binary(BinaryOp::Since, p, q);
        assert!(since.is_past_temporal());
        assert!(!since.is_future_temporal());

        // The classification is of the top operator only.
        let x_under_and = sigma.unary(UnaryOp::Tomorrow, p) & q;
        assert!(x_under_and.is_propositional());
    }

    #[test]
    fn atoms_are_collected_in_first_occurrence_order() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        let f = (q & p) & (q | sigma.unary(UnaryOp::Eventually, p));
        assert_eq!(collect_atoms(f), vec![q, p]);

        // Timed variables do not count as input atoms.
        let timed = sigma.timed_var(p, 0) & p;
        assert_eq!(collect_atoms(timed), vec![p]);
    }
}
