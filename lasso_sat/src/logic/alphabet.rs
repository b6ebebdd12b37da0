/*!
The alphabet --- a hash-consing arena owning every formula and term node.

Nodes live in contiguous vectors and are addressed by 32-bit identifiers.
Interning keeps a map from the structural shape of a node to its identifier,
so requesting the same shape twice yields the same identifier, and equality
of formulas reduces to equality of identifiers.

Handles borrow the alphabet, so a handle outliving its alphabet is a compile
time error rather than a dangling pointer.

Interning happens through a shared reference by way of interior mutability.
As a consequence an alphabet is not [Sync], which is in line with the rest of
the library: a solve is strictly single-threaded.

# Example
```rust
# use lasso_sat::logic::Alphabet;
let sigma = Alphabet::new();

let p = sigma.proposition("p");
let q = sigma.proposition("p");

assert_eq!(p, q);
assert_eq!(p.unique_id(), q.unique_id());
```
*/

use std::cell::RefCell;
use std::collections::HashMap;

use super::formula::{BinaryOp, Formula, QuantifierKind, UnaryOp};
use super::term::{Constant, Function, Relation, Term};

/// The identifier of a formula node, stable for the lifetime of its alphabet.
///
/// Usable as a hash-map key, and printable for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(pub(crate) u32);

/// The identifier of a term node, stable for the lifetime of its alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

impl std::fmt::Display for FormulaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f{}", self.0)
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The label of a proposition.
///
/// Most propositions are named by the identifier which introduced them.
/// The two remaining variants are minted by the solver:
///
/// - [Timed](Label::Timed) is the proposition `⟨f, k⟩` which stands for the
///   formula `f` holding at time step `k`.
/// - [Witness](Label::Witness) names the surrogate introduced for a past
///   subformula by the past-removal translation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// A proposition named in the input.
    Name(String),

    /// The ground proposition associating a formula with a time step.
    Timed(FormulaId, usize),

    /// The surrogate proposition standing for a past subformula.
    Witness(FormulaId),
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Name(name.to_owned())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::Name(name)
    }
}

/// The stored shape of a formula node.
///
/// Children are identifiers of nodes interned earlier, so the graph of nodes
/// is acyclic by construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FormulaNode {
    Boolean(bool),
    Proposition(Label),
    Atom { rel: Relation, args: Vec<TermId> },
    Unary { op: UnaryOp, arg: FormulaId },
    Binary { op: BinaryOp, left: FormulaId, right: FormulaId },
    Quantifier { kind: QuantifierKind, vars: Vec<TermId>, matrix: FormulaId },
}

/// The stored shape of a term node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TermNode {
    Constant(Constant),
    Variable(String),
    Application { func: Function, args: Vec<TermId> },
    Next(TermId),
    WNext(TermId),
}

#[derive(Default)]
struct Arena {
    formulas: Vec<FormulaNode>,
    formula_ids: HashMap<FormulaNode, FormulaId>,
    terms: Vec<TermNode>,
    term_ids: HashMap<TermNode, TermId>,
}

impl Arena {
    fn intern_formula(&mut self, node: FormulaNode) -> FormulaId {
        if let Some(id) = self.formula_ids.get(&node) {
            return *id;
        }
        let id = FormulaId(self.formulas.len() as u32);
        self.formulas.push(node.clone());
        self.formula_ids.insert(node, id);
        id
    }

    fn intern_term(&mut self, node: TermNode) -> TermId {
        if let Some(id) = self.term_ids.get(&node) {
            return *id;
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(node.clone());
        self.term_ids.insert(node, id);
        id
    }
}

/// The arena owning every formula and term node, and the only way to mint
/// new ones.
pub struct Alphabet {
    arena: RefCell<Arena>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Alphabet { arena: RefCell::new(Arena::default()) }
    }

    /// The constant ⊤.
    pub fn top(&self) -> Formula<'_> {
        self.boolean(true)
    }

    /// The constant ⊥.
    pub fn bottom(&self) -> Formula<'_> {
        self.boolean(false)
    }

    /// The boolean constant with the given value.
    pub fn boolean(&self, value: bool) -> Formula<'_> {
        self.formula_from(FormulaNode::Boolean(value))
    }

    /// The proposition with the given label.
    ///
    /// Two calls with equal labels return the same node.
    pub fn proposition(&self, label: impl Into<Label>) -> Formula<'_> {
        self.formula_from(FormulaNode::Proposition(label.into()))
    }

    /// The ground proposition `⟨f, k⟩` standing for `f` at time step `k`.
    ///
    /// This is the bridge between the temporal formula and its propositional
    /// encoding: the encoder relies on one node per `(f, k)` pair.
    pub fn timed_var(&self, f: Formula<'_>, k: usize) -> Formula<'_> {
        debug_assert!(self.owns(f.alphabet()));
        self.proposition(Label::Timed(f.unique_id(), k))
    }

    /// The formula `op` applied to `arg`.
    pub fn unary<'a>(&'a self, op: UnaryOp, arg: Formula<'a>) -> Formula<'a> {
        self.formula_from(FormulaNode::Unary { op, arg: arg.unique_id() })
    }

    /// The formula `left op right`.
    pub fn binary<'a>(&'a self, op: BinaryOp, left: Formula<'a>, right: Formula<'a>) -> Formula<'a> {
        self.formula_from(FormulaNode::Binary {
            op,
            left: left.unique_id(),
            right: right.unique_id(),
        })
    }

    /// A quantified formula over the given variables.
    pub fn quantifier<'a>(
        &'a self,
        kind: QuantifierKind,
        vars: Vec<Term<'a>>,
        matrix: Formula<'a>,
    ) -> Formula<'a> {
        self.formula_from(FormulaNode::Quantifier {
            kind,
            vars: vars.iter().map(|v| v.unique_id()).collect(),
            matrix: matrix.unique_id(),
        })
    }

    /// A first-order atom: a relation applied to terms.
    pub fn atom<'a>(&'a self, rel: Relation, args: Vec<Term<'a>>) -> Formula<'a> {
        self.formula_from(FormulaNode::Atom {
            rel,
            args: args.iter().map(|t| t.unique_id()).collect(),
        })
    }

    /// A constant term.
    pub fn constant(&self, value: Constant) -> Term<'_> {
        self.term_from(TermNode::Constant(value))
    }

    /// A first-order variable.
    pub fn variable(&self, name: &str) -> Term<'_> {
        self.term_from(TermNode::Variable(name.to_owned()))
    }

    /// A function applied to terms.
    pub fn application<'a>(&'a self, func: Function, args: Vec<Term<'a>>) -> Term<'a> {
        self.term_from(TermNode::Application {
            func,
            args: args.iter().map(|t| t.unique_id()).collect(),
        })
    }

    /// The term `next(t)`.
    pub fn next<'a>(&'a self, t: Term<'a>) -> Term<'a> {
        self.term_from(TermNode::Next(t.unique_id()))
    }

    /// The term `wnext(t)`.
    pub fn wnext<'a>(&'a self, t: Term<'a>) -> Term<'a> {
        self.term_from(TermNode::WNext(t.unique_id()))
    }

    fn formula_from(&self, node: FormulaNode) -> Formula<'_> {
        let id = self.arena.borrow_mut().intern_formula(node);
        Formula::new(self, id)
    }

    fn term_from(&self, node: TermNode) -> Term<'_> {
        let id = self.arena.borrow_mut().intern_term(node);
        Term::new(self, id)
    }

    pub(crate) fn formula_node(&self, id: FormulaId) -> FormulaNode {
        self.arena.borrow().formulas[id.0 as usize].clone()
    }

    pub(crate) fn term_node(&self, id: TermId) -> TermNode {
        self.arena.borrow().terms[id.0 as usize].clone()
    }

    pub(crate) fn formula(&self, id: FormulaId) -> Formula<'_> {
        debug_assert!((id.0 as usize) < self.arena.borrow().formulas.len());
        Formula::new(self, id)
    }

    pub(crate) fn term(&self, id: TermId) -> Term<'_> {
        debug_assert!((id.0 as usize) < self.arena.borrow().terms.len());
        Term::new(self, id)
    }

    fn owns(&self, other: &Alphabet) -> bool {
        std::ptr::eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{BinaryOp, UnaryOp};

    #[test]
    fn interning_is_canonical() {
        let sigma = Alphabet::new();

        let p = sigma.proposition("p");
        let q = sigma.proposition("q");

        let a = sigma.binary(BinaryOp::Conjunction, p, q);
        let b = sigma.binary(BinaryOp::Conjunction, sigma.proposition("p"), sigma.proposition("q"));

        assert_eq!(a, b);
        assert_eq!(a.unique_id(), b.unique_id());
        assert_ne!(a, sigma.binary(BinaryOp::Conjunction, q, p));
    }

    #[test]
    fn timed_vars_are_shared() {
        let sigma = Alphabet::new();

        let p = sigma.proposition("p");
        let xp = sigma.unary(UnaryOp::Tomorrow, p);

        assert_eq!(sigma.timed_var(xp, 3), sigma.timed_var(xp, 3));
        assert_ne!(sigma.timed_var(xp, 3), sigma.timed_var(xp, 4));
        assert_ne!(sigma.timed_var(xp, 3), sigma.timed_var(p, 3));
    }

    #[test]
    fn constants_are_shared() {
        let sigma = Alphabet::new();

        assert_eq!(sigma.top(), sigma.boolean(true));
        assert_ne!(sigma.top(), sigma.bottom());

        let one = sigma.constant(Constant::Integer(1));
        assert_eq!(one, sigma.constant(Constant::Integer(1)));
    }
}
