/*!
Terms of the first-order layer.

Terms live in the same alphabet as formulas but form a separate universe:
a term is never a formula, though the parser may promote one (a variable to a
proposition, an application to an atom) when the grammar calls for it.
*/

use std::hash::{Hash, Hasher};

use super::alphabet::{Alphabet, TermId, TermNode};

/// A constant of the term language.
#[derive(Clone, Copy, Debug)]
pub enum Constant {
    Integer(i64),
    Real(f64),
}

// Reals are compared and hashed by bit pattern so constants can serve as
// interning keys.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::Real(a), Constant::Real(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Constant::Integer(a) => {
                0u8.hash(state);
                a.hash(state);
            }
            Constant::Real(a) => {
                1u8.hash(state);
                a.to_bits().hash(state);
            }
        }
    }
}

/// A function symbol: either one of the known arithmetic operators or a name
/// introduced by the input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    /// Unary minus.
    Negation,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Named(String),
}

/// A relation symbol: either one of the known comparisons or a name
/// introduced by the input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Named(String),
}

/// A term: a value handle over a node of an [Alphabet].
#[derive(Clone, Copy)]
pub struct Term<'a> {
    sigma: &'a Alphabet,
    id: TermId,
}

/// The shape of a term, for matching.
#[derive(Clone)]
pub enum TermKind<'a> {
    Constant(Constant),
    Variable(String),
    Application(Function, Vec<Term<'a>>),
    Next(Term<'a>),
    WNext(Term<'a>),
}

impl<'a> Term<'a> {
    pub(crate) fn new(sigma: &'a Alphabet, id: TermId) -> Self {
        Term { sigma, id }
    }

    /// The alphabet this term belongs to.
    pub fn alphabet(&self) -> &'a Alphabet {
        self.sigma
    }

    /// The opaque identifier of the node.
    pub fn unique_id(&self) -> TermId {
        self.id
    }

    /// The shape of the term.
    pub fn kind(&self) -> TermKind<'a> {
        match self.sigma.term_node(self.id) {
            TermNode::Constant(c) => TermKind::Constant(c),
            TermNode::Variable(name) => TermKind::Variable(name),
            TermNode::Application { func, args } => TermKind::Application(
                func,
                args.iter().map(|t| self.sigma.term(*t)).collect(),
            ),
            TermNode::Next(t) => TermKind::Next(self.sigma.term(t)),
            TermNode::WNext(t) => TermKind::WNext(self.sigma.term(t)),
        }
    }

    /// The name, if the term is a variable.
    pub fn as_variable(&self) -> Option<String> {
        match self.kind() {
            TermKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Whether a `next`/`wnext` occurs anywhere in the term.
    pub fn has_next(&self) -> bool {
        let mut stack = vec![*self];
        while let Some(t) = stack.pop() {
            match t.kind() {
                TermKind::Next(_) => return true,
                TermKind::WNext(inner) => stack.push(inner),
                TermKind::Application(_, args) => stack.extend(args),
                _ => {}
            }
        }
        false
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.sigma, other.sigma) && self.id == other.id
    }
}

impl Eq for Term<'_> {}

impl Hash for Term<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.sigma as *const Alphabet as usize).hash(state);
        self.id.hash(state);
    }
}

impl std::fmt::Debug for Term<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Term({}, {})", self.id, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_found_under_applications() {
        let sigma = Alphabet::new();
        let x = sigma.variable("x");
        let one = sigma.constant(Constant::Integer(1));

        let plain = sigma.application(Function::Addition, vec![x, one]);
        assert!(!plain.has_next());

        let stepped = sigma.application(Function::Addition, vec![sigma.next(x), one]);
        assert!(stepped.has_next());

        assert!(sigma.wnext(sigma.next(x)).has_next());
        assert!(!sigma.wnext(x).has_next());
    }
}
