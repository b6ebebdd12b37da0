//! Printing of formulas and terms in the concrete syntax accepted by the
//! parser.
//!
//! Operands of binary operators are parenthesised whenever their own top is
//! binary, so a printed formula reads back as the formula it came from.

use std::fmt;

use super::alphabet::Label;
use super::formula::{BinaryOp, Formula, FormulaKind, QuantifierKind, UnaryOp};
use super::term::{Constant, Function, Relation, Term, TermKind};

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Negation => "!",
            UnaryOp::Tomorrow => "X",
            UnaryOp::WTomorrow => "wX",
            UnaryOp::Yesterday => "Y",
            UnaryOp::WYesterday => "Z",
            UnaryOp::Always => "G",
            UnaryOp::Eventually => "F",
            UnaryOp::Once => "O",
            UnaryOp::Historically => "H",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Conjunction => "&",
            BinaryOp::Disjunction => "|",
            BinaryOp::Implication => "->",
            BinaryOp::Iff => "<->",
            BinaryOp::Until => "U",
            BinaryOp::Release => "R",
            BinaryOp::WUntil => "W",
            BinaryOp::SRelease => "M",
            BinaryOp::Since => "S",
            BinaryOp::Triggered => "T",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Equal => write!(f, "="),
            Relation::NotEqual => write!(f, "!="),
            Relation::LessThan => write!(f, "<"),
            Relation::LessThanEqual => write!(f, "<="),
            Relation::GreaterThan => write!(f, ">"),
            Relation::GreaterThanEqual => write!(f, ">="),
            Relation::Named(name) => write!(f, "{name}"),
        }
    }
}

// An operand needs parentheses when its own parse would continue past it:
// binary operators and quantifiers reach as far right as they can.
fn grouped(f: Formula<'_>) -> bool {
    matches!(f.kind(), FormulaKind::Binary(..) | FormulaKind::Quantifier(..))
}

fn write_operand(out: &mut fmt::Formatter<'_>, f: Formula<'_>) -> fmt::Result {
    if grouped(f) {
        write!(out, "({f})")
    } else {
        write!(out, "{f}")
    }
}

impl fmt::Display for Formula<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            FormulaKind::Boolean(true) => write!(out, "True"),
            FormulaKind::Boolean(false) => write!(out, "False"),

            FormulaKind::Proposition(Label::Name(name)) => write!(out, "{name}"),
            FormulaKind::Proposition(Label::Timed(id, k)) => {
                write!(out, "{{{},{k}}}", self.alphabet().formula(id))
            }
            FormulaKind::Proposition(Label::Witness(id)) => {
                write!(out, "w{{{}}}", self.alphabet().formula(id))
            }

            FormulaKind::Atom(rel, args) => match (&rel, args.as_slice()) {
                (Relation::Named(name), _) => {
                    write!(out, "{name}(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(out, ", ")?;
                        }
                        write!(out, "{arg}")?;
                    }
                    write!(out, ")")
                }
                (_, [left, right]) => write!(out, "{left} {rel} {right}"),
                _ => {
                    write!(out, "{rel}(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(out, ", ")?;
                        }
                        write!(out, "{arg}")?;
                    }
                    write!(out, ")")
                }
            },

            FormulaKind::Unary(UnaryOp::Negation, arg) => {
                write!(out, "!")?;
                write_operand(out, arg)
            }
            FormulaKind::Unary(op, arg) => {
                write!(out, "{op} ")?;
                write_operand(out, arg)
            }

            FormulaKind::Binary(op, left, right) => {
                write_operand(out, left)?;
                write!(out, " {op} ")?;
                write_operand(out, right)
            }

            FormulaKind::Quantifier(kind, vars, matrix) => {
                let q = match kind {
                    QuantifierKind::Exists => "exists",
                    QuantifierKind::Forall => "forall",
                };
                write!(out, "{q}")?;
                for v in &vars {
                    write!(out, " {v}")?;
                }
                write!(out, " . ")?;
                write_operand(out, matrix)
            }
        }
    }
}

impl fmt::Display for Term<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TermKind::Constant(Constant::Integer(i)) => write!(out, "{i}"),
            TermKind::Constant(Constant::Real(r)) => {
                // Keep the decimal point so the constant reads back as real.
                if r.fract() == 0.0 {
                    write!(out, "{r:.1}")
                } else {
                    write!(out, "{r}")
                }
            }

            TermKind::Variable(name) => write!(out, "{name}"),

            TermKind::Application(Function::Named(name), args) => {
                write!(out, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    write!(out, "{arg}")?;
                }
                write!(out, ")")
            }

            TermKind::Application(Function::Negation, args) => match args.as_slice() {
                [arg] => write!(out, "-{arg}"),
                _ => write!(out, "-(?)"),
            },

            TermKind::Application(func, args) => {
                let symbol = match func {
                    Function::Addition => "+",
                    Function::Subtraction => "-",
                    Function::Multiplication => "*",
                    Function::Division => "/",
                    Function::Modulo => "%",
                    _ => unreachable!(),
                };
                match args.as_slice() {
                    [left, right] => write!(out, "({left} {symbol} {right})"),
                    _ => write!(out, "({symbol})"),
                }
            }

            TermKind::Next(t) => write!(out, "next({t})"),
            TermKind::WNext(t) => write!(out, "wnext({t})"),
        }
    }
}
