//! Signature format parser.
//!
//! Compiles human-written signatures such as
//! `"(int x, int y, string name = \"default\")"` into [`Signature`]s.
//!
//! Grammar:
//!
//! ```text
//! signature := '(' params ')' | params
//! params    := [ param { [','] param } ]
//! param     := type name [ '=' literal ]
//! type      := WORD | '(' params ')'
//! name      := WORD | STRING
//! literal   := WORD | STRING | '(' [ entry { [','] entry } ] ')'
//! entry     := [ (WORD | STRING) ':' ] literal
//! ```
//!
//! Default literals are read without type information and then resolved
//! against the parameter they belong to, so an `int` default becomes an
//! `int` value and an array default is matched child by child against the
//! array's own parameters (filling nested defaults along the way).

use tessera_foundation::{Error, Position, Result, Type, Value};

use crate::matcher::resolve_param;
use crate::signature::{Param, Shape, Signature};
use crate::tokenizer::{MAX_NESTING_DEPTH, is_keyword_char};
use crate::type_registry::TypeRegistry;

/// Parses a signature, expanding named types.
///
/// A named type with several overloads expands into one signature per
/// combination, leftmost parameter varying slowest.
///
/// # Errors
/// Returns a format error if the text does not follow the grammar, a
/// default does not fit its parameter, or a default is followed by a
/// parameter without one.
pub fn parse_format(source: &str, types: &TypeRegistry) -> Result<Vec<Signature>> {
    let tokens = lex(source)?;
    let mut parser = FormatParser {
        source,
        tokens,
        pos: 0,
        depth: 0,
        types,
    };
    let alternatives = parser.parse_signature()?;
    Ok(alternatives.into_iter().map(Signature::new).collect())
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Word(String),
    Quoted(String),
    LParen,
    RParen,
    Comma,
    Colon,
    Equals,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Self::Word(w) => format!("`{w}`"),
            Self::Quoted(q) => format!("\"{q}\""),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Equals => "'='".to_string(),
        }
    }
}

fn lex(source: &str) -> Result<Vec<(Tok, u32)>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().enumerate().peekable();

    while let Some((index, c)) = chars.next() {
        let column = column(index);
        let tok = match c {
            c if c.is_whitespace() => continue,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            ',' => Tok::Comma,
            ':' => Tok::Colon,
            '=' => Tok::Equals,
            '"' => {
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, ch)) => text.push(ch),
                        None => return Err(Error::format(source, "unterminated string", column)),
                    }
                }
                Tok::Quoted(text)
            }
            c if is_keyword_char(c) => {
                let mut word = String::from(c);
                while let Some((_, ch)) = chars.next_if(|(_, ch)| is_keyword_char(*ch)) {
                    word.push(ch);
                }
                Tok::Word(word)
            }
            other => {
                return Err(Error::format(
                    source,
                    format!("unexpected character '{other}'"),
                    column,
                ));
            }
        };
        tokens.push((tok, column));
    }

    Ok(tokens)
}

fn column(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

struct FormatParser<'a> {
    source: &'a str,
    tokens: Vec<(Tok, u32)>,
    pos: usize,
    depth: usize,
    types: &'a TypeRegistry,
}

impl FormatParser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|(tok, _)| tok)
    }

    fn current_column(&self) -> u32 {
        self.tokens.get(self.pos).map_or_else(
            || column(self.source.chars().count()),
            |(_, col)| *col,
        )
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|(tok, _)| tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> Error {
        self.error_at(self.current_column(), message)
    }

    fn error_at(&self, column: u32, message: impl Into<String>) -> Error {
        Error::format(self.source, message, column)
    }

    /// Enters one level of array nesting at the `(` just consumed.
    fn descend(&mut self, column: u32) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at(
                column,
                format!("arrays nested deeper than {MAX_NESTING_DEPTH}"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_comma(&mut self) {
        if self.peek() == Some(&Tok::Comma) {
            self.pos += 1;
        }
    }

    fn parse_signature(&mut self) -> Result<Vec<Vec<Param>>> {
        let wrapped = self.peek() == Some(&Tok::LParen) && self.is_whole_wrapped();
        if wrapped {
            self.pos += 1;
        }
        let params = self.parse_params(wrapped)?;
        if wrapped {
            self.expect_close()?;
        }
        if let Some(tok) = self.peek() {
            return Err(self.error(format!("unexpected {} after signature", tok.describe())));
        }
        Ok(params)
    }

    /// Returns true if the opening parenthesis at the cursor closes at the
    /// very end of the signature, as opposed to opening an array parameter
    /// type (`(int x, int y) origin`).
    fn is_whole_wrapped(&self) -> bool {
        let mut depth = 0usize;
        for (offset, (tok, _)) in self.tokens.iter().enumerate().skip(self.pos) {
            match tok {
                Tok::LParen => depth += 1,
                Tok::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return offset + 1 == self.tokens.len();
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn expect_close(&mut self) -> Result<()> {
        match self.advance() {
            Some(Tok::RParen) => Ok(()),
            Some(tok) => {
                self.pos -= 1;
                Err(self.error(format!("expected ')', found {}", tok.describe())))
            }
            None => Err(self.error("expected ')'")),
        }
    }

    /// Parses parameters up to the closing `)` (if `nested`) or end of input.
    ///
    /// Returns every expansion of the parameter list.
    fn parse_params(&mut self, nested: bool) -> Result<Vec<Vec<Param>>> {
        let mut expansions: Vec<Vec<Param>> = vec![Vec::new()];
        let mut defaulted: Option<String> = None;

        loop {
            self.skip_comma();
            match self.peek() {
                None => break,
                Some(Tok::RParen) if nested => break,
                _ => {}
            }

            let start = self.current_column();
            let alternatives = self.parse_param()?;

            if let Some(param) = alternatives.first() {
                if param.default.is_some() {
                    defaulted = Some(param.name.clone());
                } else if let Some(earlier) = &defaulted {
                    return Err(self.error_at(
                        start,
                        format!(
                            "parameter `{}` needs a default because `{earlier}` has one",
                            param.name
                        ),
                    ));
                }
            }

            expansions = expansions
                .into_iter()
                .flat_map(|prefix| {
                    alternatives.iter().map(move |param| {
                        let mut params = prefix.clone();
                        params.push(param.clone());
                        params
                    })
                })
                .collect();
        }

        Ok(expansions)
    }

    /// Parses one parameter, returning one `Param` per type expansion.
    fn parse_param(&mut self) -> Result<Vec<Param>> {
        let type_column = self.current_column();
        let shapes: Vec<(Shape, Option<String>)> = match self.advance() {
            Some(Tok::LParen) => {
                self.descend(type_column)?;
                let children = self.parse_params(true)?;
                self.expect_close()?;
                self.depth -= 1;
                children
                    .into_iter()
                    .map(|params| (Shape::Array(params), None))
                    .collect()
            }
            Some(Tok::Word(word)) => self.resolve_type(&word),
            Some(tok) => {
                return Err(self.error_at(
                    type_column,
                    format!("expected a parameter type, found {}", tok.describe()),
                ));
            }
            None => return Err(self.error_at(type_column, "expected a parameter type")),
        };

        let name = match self.peek() {
            Some(Tok::Word(name) | Tok::Quoted(name)) => {
                let name = name.clone();
                self.pos += 1;
                name
            }
            _ => return Err(self.error("expected a parameter name")),
        };

        let mut params: Vec<Param> = shapes
            .into_iter()
            .map(|(shape, type_name)| Param {
                name: name.clone(),
                shape,
                default: None,
                type_name,
            })
            .collect();

        if self.peek() == Some(&Tok::Equals) {
            self.pos += 1;
            let literal_column = self.current_column();
            let literal = self.parse_literal()?;
            for param in &mut params {
                let Some(resolved) = resolve_param(param, &literal) else {
                    return Err(self.error_at(
                        literal_column,
                        format!("default `{literal}` does not fit parameter `{param}`"),
                    ));
                };
                param.default = Some(resolved.detached());
            }
        }

        Ok(params)
    }

    fn resolve_type(&self, word: &str) -> Vec<(Shape, Option<String>)> {
        if let Some(ty) = Type::from_name(word) {
            return vec![(Shape::Scalar(ty), None)];
        }
        match self.types.get(word) {
            Some(overloads) => overloads
                .iter()
                .map(|sig| (Shape::Array(sig.params.clone()), Some(word.to_string())))
                .collect(),
            None => vec![(Shape::Scalar(Type::Unknown(word.to_string())), None)],
        }
    }

    /// Reads a literal without type information.
    fn parse_literal(&mut self) -> Result<Value> {
        let at = Position::default();
        let column = self.current_column();
        match self.advance() {
            Some(Tok::Word(word)) => Ok(Value::scalar(word, at)),
            Some(Tok::Quoted(text)) => Ok(Value::string(text, at)),
            Some(Tok::LParen) => {
                self.descend(column)?;
                let mut children = Vec::new();
                loop {
                    self.skip_comma();
                    match self.peek() {
                        Some(Tok::RParen) => {
                            self.pos += 1;
                            break;
                        }
                        None => return Err(self.error("expected ')' to close default")),
                        _ => {}
                    }
                    let name = match (self.peek(), self.peek_at(1)) {
                        (Some(Tok::Word(n) | Tok::Quoted(n)), Some(Tok::Colon)) => {
                            let n = n.clone();
                            self.pos += 2;
                            Some(n)
                        }
                        _ => None,
                    };
                    children.push(self.parse_literal()?.renamed(name));
                }
                self.depth -= 1;
                Ok(Value::array(children, at))
            }
            Some(tok) => {
                self.pos -= 1;
                Err(self.error(format!("expected a default value, found {}", tok.describe())))
            }
            None => Err(self.error("expected a default value")),
        }
    }
}
