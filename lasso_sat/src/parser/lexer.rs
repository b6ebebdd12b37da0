//! The lexer: a lazy token stream with one-token lookahead.

use crate::logic::{BinaryOp, Function, Relation, UnaryOp};

/// Punctuation-free keywords of the term layer and the quantifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Next,
    WNext,
    Exists,
    Forall,
}

/// A token of the concrete syntax.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Comma,
    Dot,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Relation(Relation),
    Function(Function),
    Keyword(Keyword),
    Identifier(String),

    /// A character, or an unfinished operator, the lexer could not resolve.
    Unknown(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Boolean(true) => write!(f, "True"),
            Token::Boolean(false) => write!(f, "False"),
            Token::Integer(i) => write!(f, "{i}"),
            Token::Real(r) => write!(f, "{r}"),
            Token::Unary(op) => write!(f, "{op}"),
            Token::Binary(op) => write!(f, "{op}"),
            Token::Relation(rel) => write!(f, "{rel}"),
            Token::Function(Function::Negation) | Token::Function(Function::Subtraction) => {
                write!(f, "-")
            }
            Token::Function(Function::Addition) => write!(f, "+"),
            Token::Function(Function::Multiplication) => write!(f, "*"),
            Token::Function(Function::Division) => write!(f, "/"),
            Token::Function(Function::Modulo) => write!(f, "%"),
            Token::Function(Function::Named(name)) => write!(f, "{name}"),
            Token::Keyword(Keyword::Next) => write!(f, "next"),
            Token::Keyword(Keyword::WNext) => write!(f, "wnext"),
            Token::Keyword(Keyword::Exists) => write!(f, "exists"),
            Token::Keyword(Keyword::Forall) => write!(f, "forall"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::Unknown(c) => write!(f, "{c}"),
        }
    }
}

fn keyword(id: &str) -> Option<Token> {
    let tok = match id {
        "True" => Token::Boolean(true),
        "False" => Token::Boolean(false),
        "NOT" => Token::Unary(UnaryOp::Negation),
        "X" => Token::Unary(UnaryOp::Tomorrow),
        "wX" => Token::Unary(UnaryOp::WTomorrow),
        "Y" => Token::Unary(UnaryOp::Yesterday),
        "Z" => Token::Unary(UnaryOp::WYesterday),
        "F" => Token::Unary(UnaryOp::Eventually),
        "G" => Token::Unary(UnaryOp::Always),
        "O" => Token::Unary(UnaryOp::Once),
        "H" => Token::Unary(UnaryOp::Historically),
        "AND" => Token::Binary(BinaryOp::Conjunction),
        "OR" => Token::Binary(BinaryOp::Disjunction),
        "THEN" => Token::Binary(BinaryOp::Implication),
        "IFF" => Token::Binary(BinaryOp::Iff),
        "U" => Token::Binary(BinaryOp::Until),
        "R" | "V" => Token::Binary(BinaryOp::Release),
        "W" => Token::Binary(BinaryOp::WUntil),
        "M" => Token::Binary(BinaryOp::SRelease),
        "S" => Token::Binary(BinaryOp::Since),
        "T" => Token::Binary(BinaryOp::Triggered),
        "next" => Token::Keyword(Keyword::Next),
        "wnext" => Token::Keyword(Keyword::WNext),
        "exists" => Token::Keyword(Keyword::Exists),
        "forall" => Token::Keyword(Keyword::Forall),
        _ => return None,
    };
    Some(tok)
}

fn is_initial_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A token stream over a character stream, with one token of lookahead.
pub struct Lexer<'s> {
    chars: std::str::Chars<'s>,
    pushback: Vec<char>,
    peeked: Option<Option<Token>>,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Lexer { chars: input.chars(), pushback: Vec::new(), peeked: None }
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            let tok = self.lex();
            self.peeked = Some(tok);
        }
        match &self.peeked {
            Some(tok) => tok.as_ref(),
            None => None,
        }
    }

    /// The next token, consuming it.
    pub fn get(&mut self) -> Option<Token> {
        match self.peeked.take() {
            Some(tok) => tok,
            None => self.lex(),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.pushback.pop().or_else(|| self.chars.next())
    }

    fn peek_char(&mut self) -> Option<char> {
        if self.pushback.is_empty() {
            if let Some(c) = self.chars.next() {
                self.pushback.push(c);
            }
        }
        self.pushback.last().copied()
    }

    fn unread(&mut self, c: char) {
        self.pushback.push(c);
    }

    // If the next character is `c`, consumes it.
    fn eat(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn lex(&mut self) -> Option<Token> {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }

        let c = self.peek_char()?;

        if let Some(tok) = self.symbol(c) {
            return Some(tok);
        }

        if c.is_ascii_digit() {
            return Some(self.number());
        }

        if is_initial_identifier_char(c) {
            return Some(self.identifier());
        }

        self.next_char();
        Some(Token::Unknown(c))
    }

    fn symbol(&mut self, c: char) -> Option<Token> {
        let tok = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '.' => Token::Dot,
            '~' => Token::Unary(UnaryOp::Negation),
            '+' => Token::Function(Function::Addition),
            '*' => Token::Function(Function::Multiplication),
            '/' => Token::Function(Function::Division),
            '%' => Token::Function(Function::Modulo),

            // '!' or '!='
            '!' => {
                self.next_char();
                if self.eat('=') {
                    return Some(Token::Relation(Relation::NotEqual));
                }
                return Some(Token::Unary(UnaryOp::Negation));
            }

            // '&' or '&&'
            '&' => {
                self.next_char();
                self.eat('&');
                return Some(Token::Binary(BinaryOp::Conjunction));
            }

            // '|' or '||'
            '|' => {
                self.next_char();
                self.eat('|');
                return Some(Token::Binary(BinaryOp::Disjunction));
            }

            // '->', or subtraction
            '-' => {
                self.next_char();
                if self.eat('>') {
                    return Some(Token::Binary(BinaryOp::Implication));
                }
                return Some(Token::Function(Function::Subtraction));
            }

            // '=>', or equality
            '=' => {
                self.next_char();
                if self.eat('>') {
                    return Some(Token::Binary(BinaryOp::Implication));
                }
                return Some(Token::Relation(Relation::Equal));
            }

            // '<->', '<=>', '<>', '<=', or less-than
            '<' => {
                self.next_char();
                if self.eat('-') {
                    if self.eat('>') {
                        return Some(Token::Binary(BinaryOp::Iff));
                    }
                    return Some(Token::Unknown('<'));
                }
                if self.eat('=') {
                    if self.eat('>') {
                        return Some(Token::Binary(BinaryOp::Iff));
                    }
                    return Some(Token::Relation(Relation::LessThanEqual));
                }
                if self.eat('>') {
                    return Some(Token::Binary(BinaryOp::Iff));
                }
                return Some(Token::Relation(Relation::LessThan));
            }

            // '>=' or greater-than
            '>' => {
                self.next_char();
                if self.eat('=') {
                    return Some(Token::Relation(Relation::GreaterThanEqual));
                }
                return Some(Token::Relation(Relation::GreaterThan));
            }

            _ => return None,
        };

        self.next_char();
        Some(tok)
    }

    fn digits_into(&mut self, buffer: &mut String) {
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_digit() {
                break;
            }
            buffer.push(c);
            self.next_char();
        }
    }

    fn number(&mut self) -> Token {
        let mut digits = String::new();
        self.digits_into(&mut digits);

        // A dot continues the number only when a digit follows, otherwise it
        // is punctuation (e.g. the dot of a quantifier).
        if self.peek_char() == Some('.') {
            self.next_char();
            if matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                digits.push('.');
                self.digits_into(&mut digits);
                return match digits.parse::<f64>() {
                    Ok(r) => Token::Real(r),
                    Err(_) => Token::Unknown('.'),
                };
            }
            self.unread('.');
        }

        match digits.parse::<i64>() {
            Ok(i) => Token::Integer(i),
            Err(_) => Token::Unknown('0'),
        }
    }

    fn identifier(&mut self) -> Token {
        let mut id = String::new();
        while let Some(c) = self.peek_char() {
            if !is_identifier_char(c) {
                break;
            }
            id.push(c);
            self.next_char();
        }

        match keyword(&id) {
            Some(tok) => tok,
            None => Token::Identifier(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lex = Lexer::new(input);
        let mut out = Vec::new();
        while let Some(tok) = lex.get() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn operator_spellings() {
        assert_eq!(tokens("! ~ NOT"), vec![Token::Unary(UnaryOp::Negation); 3]);
        assert_eq!(tokens("& && AND"), vec![Token::Binary(BinaryOp::Conjunction); 3]);
        assert_eq!(tokens("| || OR"), vec![Token::Binary(BinaryOp::Disjunction); 3]);
        assert_eq!(tokens("-> => THEN"), vec![Token::Binary(BinaryOp::Implication); 3]);
        assert_eq!(tokens("<-> <=> <> IFF"), vec![Token::Binary(BinaryOp::Iff); 4]);
        assert_eq!(tokens("R V"), vec![Token::Binary(BinaryOp::Release); 2]);
    }

    #[test]
    fn comparisons_and_arithmetic() {
        assert_eq!(tokens("!="), vec![Token::Relation(Relation::NotEqual)]);
        assert_eq!(
            tokens("< <= > >= ="),
            vec![
                Token::Relation(Relation::LessThan),
                Token::Relation(Relation::LessThanEqual),
                Token::Relation(Relation::GreaterThan),
                Token::Relation(Relation::GreaterThanEqual),
                Token::Relation(Relation::Equal),
            ]
        );
        assert_eq!(
            tokens("x - 1"),
            vec![
                Token::Identifier("x".to_owned()),
                Token::Function(Function::Subtraction),
                Token::Integer(1),
            ]
        );
    }

    #[test]
    fn numbers_and_quantifier_dots() {
        assert_eq!(tokens("42"), vec![Token::Integer(42)]);
        assert_eq!(tokens("1.5"), vec![Token::Real(1.5)]);

        // The dot of a quantifier is not swallowed by a number.
        assert_eq!(
            tokens("exists x . p"),
            vec![
                Token::Keyword(Keyword::Exists),
                Token::Identifier("x".to_owned()),
                Token::Dot,
                Token::Identifier("p".to_owned()),
            ]
        );
        assert_eq!(tokens("1 . p")[1], Token::Dot);
    }

    #[test]
    fn identifiers_exclude_keywords() {
        assert_eq!(tokens("Xp"), vec![Token::Identifier("Xp".to_owned())]);
        assert_eq!(tokens("X p").len(), 2);
        assert_eq!(tokens("wXa"), vec![Token::Identifier("wXa".to_owned())]);
        assert_eq!(tokens("_x1"), vec![Token::Identifier("_x1".to_owned())]);
    }

    #[test]
    fn unknown_prefixes_are_error_tokens() {
        assert_eq!(tokens("#"), vec![Token::Unknown('#')]);
        assert_eq!(tokens("<- p")[0], Token::Unknown('<'));
    }
}
