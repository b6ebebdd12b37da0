/*!
The parser: precedence-climbing over the token stream.

Formulas and terms have separate grammars with separate precedence tables.
A primary which begins with a term is disambiguated by one token of
lookahead once the term has been parsed: a following comparison makes a
relational atom, otherwise the term is promoted to a formula (a variable to
a proposition, an application to an atom over a fresh relation symbol).

Symbol arities are fixed on first sight: a later use of the same name with a
different arity, or across the function/relation divide, is a syntax error.

Errors are reported through the caller supplied callback and yield `None`;
there is no recovery.

# Example
```rust
# use lasso_sat::logic::Alphabet;
# use lasso_sat::parser::parse_formula;
let sigma = Alphabet::new();
let parsed = parse_formula(&sigma, "G (p -> X p)", |msg| eprintln!("{msg}"));

let parsed = parsed.expect("a formula");
assert!(parsed.features.temporal);
assert!(!parsed.features.past);
```
*/

pub mod lexer;

use std::collections::HashMap;

use crate::logic::{
    Alphabet, BinaryOp, Constant, Formula, FormulaKind, Function, QuantifierKind, Relation, Term,
    TermKind,
};
use crate::misc::log::targets;

use lexer::{Keyword, Lexer, Token};

/// The syntactic features observed in a formula, accumulated as tokens are
/// consumed.
///
/// The solver consults these to pick an adequate backend and to reject
/// fragments the chosen backend cannot decide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Features {
    /// Any term-level construct.
    pub first_order: bool,

    /// A `next`/`wnext` term.
    pub nextvar: bool,

    /// A quantifier.
    pub quantifiers: bool,

    /// Any temporal operator.
    pub temporal: bool,

    /// Any past operator.
    pub past: bool,
}

impl Features {
    /// The pointwise union of two feature sets.
    pub fn union(self, other: Features) -> Features {
        Features {
            first_order: self.first_order || other.first_order,
            nextvar: self.nextvar || other.nextvar,
            quantifiers: self.quantifiers || other.quantifiers,
            temporal: self.temporal || other.temporal,
            past: self.past || other.past,
        }
    }

    /// The features of an already built formula, by syntactic scan.
    pub fn of(f: Formula<'_>) -> Features {
        let mut features = Features::default();
        let mut stack = vec![f];
        while let Some(g) = stack.pop() {
            match g.kind() {
                FormulaKind::Boolean(_) | FormulaKind::Proposition(_) => {}
                FormulaKind::Atom(_, args) => {
                    features.first_order = true;
                    for arg in args {
                        if arg.has_next() {
                            features.nextvar = true;
                        }
                    }
                }
                FormulaKind::Unary(op, arg) => {
                    features.temporal |= op.is_temporal();
                    features.past |= op.is_past();
                    stack.push(arg);
                }
                FormulaKind::Binary(op, left, right) => {
                    features.temporal |= op.is_temporal();
                    features.past |= op.is_past();
                    stack.push(right);
                    stack.push(left);
                }
                FormulaKind::Quantifier(_, _, matrix) => {
                    features.first_order = true;
                    features.quantifiers = true;
                    stack.push(matrix);
                }
            }
        }
        features
    }
}

/// A successfully parsed formula together with the features seen on the way.
pub struct Parsed<'a> {
    pub formula: Formula<'a>,
    pub features: Features,
}

/// Parses a formula from a string.
///
/// Syntax errors are handed to `error` as human-readable messages and the
/// result is `None`.
pub fn parse_formula<'a>(
    sigma: &'a Alphabet,
    input: &str,
    error: impl FnMut(String),
) -> Option<Parsed<'a>> {
    Parser::new(sigma, input, error).parse()
}

// Binding strengths of the formula-level binary operators.
fn precedence(tok: &Token) -> Option<i32> {
    match tok {
        Token::Binary(BinaryOp::Disjunction) => Some(20),
        Token::Binary(BinaryOp::Conjunction) => Some(30),
        Token::Binary(BinaryOp::Implication) | Token::Binary(BinaryOp::Iff) => Some(40),
        Token::Binary(_) => Some(50),
        _ => None,
    }
}

// Binding strengths of the term-level binary function symbols.
fn func_precedence(tok: &Token) -> Option<i32> {
    match tok {
        Token::Function(Function::Addition) | Token::Function(Function::Subtraction) => Some(10),
        Token::Function(Function::Multiplication)
        | Token::Function(Function::Division)
        | Token::Function(Function::Modulo) => Some(20),
        _ => None,
    }
}

struct Parser<'a, 's, E: FnMut(String)> {
    sigma: &'a Alphabet,
    lex: Lexer<'s>,
    features: Features,
    error: E,
    func_arities: HashMap<String, usize>,
    rel_arities: HashMap<String, usize>,
}

impl<'a, 's, E: FnMut(String)> Parser<'a, 's, E> {
    fn new(sigma: &'a Alphabet, input: &'s str, error: E) -> Self {
        Parser {
            sigma,
            lex: Lexer::new(input),
            features: Features::default(),
            error,
            func_arities: HashMap::new(),
            rel_arities: HashMap::new(),
        }
    }

    fn parse(mut self) -> Option<Parsed<'a>> {
        let formula = self.parse_formula()?;

        if let Some(tok) = self.lex.peek() {
            let message = format!("Expected end of formula, found '{tok}'");
            return self.error(message);
        }

        log::trace!(target: targets::PARSER, "parsed: {formula}");
        Some(Parsed { formula, features: self.features })
    }

    fn error<T>(&mut self, message: impl Into<String>) -> Option<T> {
        (self.error)(message.into());
        None
    }

    fn peek(&mut self) -> Option<Token> {
        self.lex.peek().cloned()
    }

    fn consume(&mut self) -> Option<Token> {
        let tok = self.lex.get();
        if let Some(tok) = &tok {
            self.set_features(tok);
        }
        tok
    }

    fn consume_punctuation(&mut self, expected: Token, what: &str) -> Option<Token> {
        match self.peek() {
            Some(tok) if tok == expected => self.consume(),
            _ => self.error(format!("Expected '{what}'")),
        }
    }

    // Records the features implied by a consumed token.
    fn set_features(&mut self, tok: &Token) {
        match tok {
            Token::Keyword(k) => {
                self.features.first_order = true;
                match k {
                    Keyword::Next | Keyword::WNext => self.features.nextvar = true,
                    Keyword::Exists | Keyword::Forall => self.features.quantifiers = true,
                }
            }
            Token::Unary(op) => {
                self.features.temporal |= op.is_temporal();
                self.features.past |= op.is_past();
            }
            Token::Binary(op) => {
                self.features.temporal |= op.is_temporal();
                self.features.past |= op.is_past();
            }
            _ => {}
        }
    }

    fn parse_formula(&mut self) -> Option<Formula<'a>> {
        let lhs = self.parse_primary()?;
        self.parse_binary_rhs(0, lhs)
    }

    fn parse_binary_rhs(&mut self, prec: i32, mut lhs: Formula<'a>) -> Option<Formula<'a>> {
        loop {
            let op_prec = match self.peek().as_ref().and_then(precedence) {
                Some(p) if p >= prec => p,
                _ => return Some(lhs),
            };

            let Some(Token::Binary(op)) = self.consume() else {
                return self.error("Expected binary operator");
            };

            let mut rhs = self.parse_primary()?;

            if let Some(next_prec) = self.peek().as_ref().and_then(precedence) {
                if op_prec < next_prec {
                    rhs = self.parse_binary_rhs(prec + 1, rhs)?;
                }
            }

            lhs = self.sigma.binary(op, lhs, rhs);
        }
    }

    fn parse_primary(&mut self) -> Option<Formula<'a>> {
        let Some(tok) = self.peek() else {
            return self.error("Expected formula, found end of input");
        };

        match tok {
            Token::Boolean(_) => self.parse_boolean(),

            Token::Integer(_)
            | Token::Real(_)
            | Token::Function(Function::Subtraction)
            | Token::Identifier(_)
            | Token::Keyword(Keyword::Next)
            | Token::Keyword(Keyword::WNext) => self.parse_atom(),

            Token::Keyword(Keyword::Exists) | Token::Keyword(Keyword::Forall) => {
                self.parse_quantifier()
            }

            Token::Unary(_) => self.parse_unary(),

            Token::LParen => self.parse_parens(),

            tok => self.error(format!("Expected formula, found '{tok}'")),
        }
    }

    fn parse_boolean(&mut self) -> Option<Formula<'a>> {
        match self.consume() {
            Some(Token::Boolean(value)) => Some(self.sigma.boolean(value)),
            _ => self.error("Expected boolean constant"),
        }
    }

    // A primary beginning with a term: either a relational atom, or a term
    // to be promoted to a formula.
    fn parse_atom(&mut self) -> Option<Formula<'a>> {
        let lhs = self.parse_term()?;

        let rel = match self.peek() {
            Some(Token::Relation(rel)) => rel,
            _ => return self.correct_term_to_formula(lhs),
        };

        self.register_application(lhs)?;
        self.consume();

        let rhs = self.parse_term()?;
        self.register_application(rhs)?;

        self.features.first_order = true;
        Some(self.sigma.atom(rel, vec![lhs, rhs]))
    }

    fn parse_quantifier(&mut self) -> Option<Formula<'a>> {
        let kind = match self.consume() {
            Some(Token::Keyword(Keyword::Exists)) => QuantifierKind::Exists,
            Some(Token::Keyword(Keyword::Forall)) => QuantifierKind::Forall,
            _ => return self.error("Expected quantifier"),
        };

        let mut names = Vec::new();
        while let Some(Token::Identifier(name)) = self.peek() {
            names.push(name);
            self.consume();
        }

        if names.is_empty() {
            return self.error("Expected variable list after quantifier");
        }

        match self.consume() {
            Some(Token::Dot) => {}
            _ => return self.error("Expected dot after quantifier"),
        }

        let matrix = self.parse_primary()?;

        let vars = names.iter().map(|name| self.sigma.variable(name)).collect();
        Some(self.sigma.quantifier(kind, vars, matrix))
    }

    fn parse_unary(&mut self) -> Option<Formula<'a>> {
        let Some(Token::Unary(op)) = self.consume() else {
            return self.error("Expected unary operator");
        };

        let arg = self.parse_primary()?;
        Some(self.sigma.unary(op, arg))
    }

    fn parse_parens(&mut self) -> Option<Formula<'a>> {
        self.consume();

        let formula = self.parse_formula()?;

        self.consume_punctuation(Token::RParen, ")")?;
        Some(formula)
    }

    // A term found where the grammar needs a formula: a variable becomes a
    // proposition, a named application an atom. Anything else is an error.
    fn correct_term_to_formula(&mut self, t: Term<'a>) -> Option<Formula<'a>> {
        match t.kind() {
            TermKind::Constant(_) => {
                self.error(format!("Expected formula, found numeric constant '{t}'"))
            }

            TermKind::Variable(name) => Some(self.sigma.proposition(name.as_str())),

            TermKind::Application(Function::Named(name), args) => {
                if let Some(arity) = self.rel_arities.get(&name) {
                    if *arity != args.len() {
                        return self.error(format!(
                            "Relation symbol '{name}' used twice with different arities"
                        ));
                    }
                }
                if self.func_arities.contains_key(&name) {
                    return self.error(format!(
                        "Relation symbol '{name}' already used as a function symbol"
                    ));
                }
                self.rel_arities.insert(name.clone(), args.len());

                self.features.first_order = true;
                Some(self.sigma.atom(Relation::Named(name), args))
            }

            TermKind::Application(..) => self.error("Expected formula, found term"),

            TermKind::Next(_) => self.error("Expected formula, found 'next' expression"),
            TermKind::WNext(_) => self.error("Expected formula, found 'wnext' expression"),
        }
    }

    // Fixes the arity of a named function symbol on first sight.
    fn register_application(&mut self, t: Term<'a>) -> Option<Term<'a>> {
        let TermKind::Application(Function::Named(name), args) = t.kind() else {
            return Some(t);
        };

        if let Some(arity) = self.func_arities.get(&name) {
            if *arity != args.len() {
                return self.error(format!(
                    "Function symbol '{name}' used twice with different arities"
                ));
            }
        }
        if self.rel_arities.contains_key(&name) {
            return self.error(format!(
                "Function symbol '{name}' already used as a relation symbol"
            ));
        }
        self.func_arities.insert(name, args.len());

        Some(t)
    }

    fn parse_term(&mut self) -> Option<Term<'a>> {
        let lhs = self.parse_term_primary()?;
        self.parse_term_binary_rhs(0, lhs)
    }

    fn parse_term_primary(&mut self) -> Option<Term<'a>> {
        let Some(tok) = self.peek() else {
            return self.error("Expected term, found end of input");
        };

        match tok {
            Token::Integer(_) | Token::Real(_) => self.parse_term_constant(),
            Token::Function(Function::Subtraction) => self.parse_term_unary_minus(),
            Token::Keyword(Keyword::Next) => self.parse_term_next(false),
            Token::Keyword(Keyword::WNext) => self.parse_term_next(true),
            Token::Identifier(_) => self.parse_term_var_or_func(),
            Token::LParen => self.parse_term_parens(),
            tok => self.error(format!("Expected term, found '{tok}'")),
        }
    }

    fn parse_term_binary_rhs(&mut self, prec: i32, mut lhs: Term<'a>) -> Option<Term<'a>> {
        loop {
            let op_prec = match self.peek().as_ref().and_then(func_precedence) {
                Some(p) if p >= prec => p,
                _ => return Some(lhs),
            };

            let Some(Token::Function(func)) = self.consume() else {
                return self.error("Expected binary function symbol");
            };

            let mut rhs = self.parse_term_primary()?;

            self.register_application(lhs)?;
            self.register_application(rhs)?;

            if let Some(next_prec) = self.peek().as_ref().and_then(func_precedence) {
                if op_prec < next_prec {
                    rhs = self.parse_term_binary_rhs(prec + 1, rhs)?;
                }
            }

            lhs = self.sigma.application(func, vec![lhs, rhs]);
        }
    }

    fn parse_term_constant(&mut self) -> Option<Term<'a>> {
        match self.consume() {
            Some(Token::Integer(i)) => Some(self.sigma.constant(Constant::Integer(i))),
            Some(Token::Real(r)) => Some(self.sigma.constant(Constant::Real(r))),
            _ => self.error("Expected constant"),
        }
    }

    fn parse_term_unary_minus(&mut self) -> Option<Term<'a>> {
        self.consume();

        let t = self.parse_term()?;
        self.register_application(t)?;

        Some(self.sigma.application(Function::Negation, vec![t]))
    }

    fn parse_term_next(&mut self, weak: bool) -> Option<Term<'a>> {
        self.consume();

        self.consume_punctuation(Token::LParen, "(")?;

        let t = self.parse_term()?;
        self.register_application(t)?;

        self.consume_punctuation(Token::RParen, ")")?;

        Some(if weak { self.sigma.wnext(t) } else { self.sigma.next(t) })
    }

    fn parse_term_var_or_func(&mut self) -> Option<Term<'a>> {
        let Some(Token::Identifier(name)) = self.consume() else {
            return self.error("Expected identifier");
        };

        // Without an open paren this is a simple variable.
        if self.peek() != Some(Token::LParen) {
            return Some(self.sigma.variable(&name));
        }

        let mut args = Vec::new();
        loop {
            self.consume(); // '(' first, ',' afterwards

            let t = self.parse_term()?;
            self.register_application(t)?;
            args.push(t);

            if self.peek() != Some(Token::Comma) {
                break;
            }
        }

        self.consume_punctuation(Token::RParen, ")")?;

        Some(self.sigma.application(Function::Named(name), args))
    }

    fn parse_term_parens(&mut self) -> Option<Term<'a>> {
        self.consume();

        let t = self.parse_term()?;

        self.consume_punctuation(Token::RParen, ")")?;
        Some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::UnaryOp;

    fn parse<'a>(sigma: &'a Alphabet, input: &str) -> Option<Parsed<'a>> {
        parse_formula(sigma, input, |_| {})
    }

    fn parse_err(input: &str) -> String {
        let sigma = Alphabet::new();
        let mut message = String::new();
        let result = parse_formula(&sigma, input, |msg| message = msg);
        assert!(result.is_none(), "'{input}' parsed unexpectedly");
        message
    }

    #[test]
    fn precedence_shapes() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("p");
        let q = sigma.proposition("q");
        let r = sigma.proposition("r");

        let f = parse(&sigma, "p | q & r").map(|p| p.formula);
        assert_eq!(f, Some(p | (q & r)));

        // Implication binds tighter than disjunction.
        let f = parse(&sigma, "p -> q | r").map(|p| p.formula);
        assert_eq!(f, Some(p.implies(q) | r));

        let f = parse(&sigma, "p & q U r").map(|p| p.formula);
        assert_eq!(f, Some(p & sigma.binary(BinaryOp::Until, q, r)));

        let f = parse(&sigma, "(p | q) & r").map(|p| p.formula);
        assert_eq!(f, Some((p | q) & r));

        // Unary operators bind tighter than any binary operator.
        let f = parse(&sigma, "X p U q").map(|p| p.formula);
        assert_eq!(
            f,
            Some(sigma.binary(BinaryOp::Until, sigma.unary(UnaryOp::Tomorrow, p), q))
        );

        let f = parse(&sigma, "! p & q").map(|p| p.formula);
        assert_eq!(f, Some(!p & q));
    }

    #[test]
    fn feature_flags_accumulate() {
        let sigma = Alphabet::new();

        let parsed = parse(&sigma, "p & q").expect("parse");
        assert_eq!(parsed.features, Features::default());

        let parsed = parse(&sigma, "G p").expect("parse");
        assert!(parsed.features.temporal);
        assert!(!parsed.features.past);

        let parsed = parse(&sigma, "p S q").expect("parse");
        assert!(parsed.features.temporal);
        assert!(parsed.features.past);

        let parsed = parse(&sigma, "x < 2").expect("parse");
        assert!(parsed.features.first_order);

        let parsed = parse(&sigma, "next(x) = 2").expect("parse");
        assert!(parsed.features.first_order);
        assert!(parsed.features.nextvar);

        let parsed = parse(&sigma, "exists x . x = 2").expect("parse");
        assert!(parsed.features.quantifiers);
    }

    #[test]
    fn term_promotion() {
        let sigma = Alphabet::new();

        let parsed = parse(&sigma, "p").expect("parse");
        assert_eq!(parsed.formula, sigma.proposition("p"));

        let parsed = parse(&sigma, "r(x, y)").expect("parse");
        assert!(matches!(parsed.formula.kind(), FormulaKind::Atom(Relation::Named(_), _)));

        assert!(parse_err("42").contains("numeric constant"));
        assert!(parse_err("next(x)").contains("next"));
    }

    #[test]
    fn arity_bookkeeping() {
        let message = parse_err("r(x) & r(x, y)");
        assert!(message.contains("different arities"), "{message}");

        let message = parse_err("f(x) = 1 & f(x, y) = 2");
        assert!(message.contains("different arities"), "{message}");

        let message = parse_err("f(x) = 1 & f(y)");
        assert!(message.contains("already used"), "{message}");
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(parse_err("p &").contains("end of input"));
        assert!(parse_err("(p").contains(")"));
        assert!(parse_err("p q").contains("Expected end of formula"));
        assert!(!parse_err("").is_empty());
    }

    #[test]
    fn independent_parses_share_nodes() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let sigma = Alphabet::new();

        let first = parse(&sigma, "G (p -> X p) & F q").expect("parse").formula;
        let second = parse(&sigma, "G (p -> X p) & F q").expect("parse").formula;

        assert_eq!(first, second);
        assert_eq!(first.unique_id(), second.unique_id());

        let hash = |f: Formula<'_>| {
            let mut hasher = DefaultHasher::new();
            f.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(first), hash(second));
    }

    #[test]
    fn round_trip_through_the_printer() {
        let sigma = Alphabet::new();

        let inputs = [
            "p",
            "True",
            "!p",
            "p & q",
            "p | (q & r)",
            "G (p -> X p)",
            "(p U q) R (F r)",
            "p <-> q",
            "Y p S (H q)",
            "wX (p W q)",
            "p M q",
        ];

        for input in inputs {
            let first = parse(&sigma, input).expect("parse").formula;
            let printed = first.to_string();
            let second = parse(&sigma, &printed).expect("reparse").formula;
            assert_eq!(first, second, "'{input}' printed as '{printed}'");
        }
    }
}
