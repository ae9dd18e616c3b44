//! Lexical analysis: turns each space-separated fragment into a token.
//!
//! The tokenizer knows nothing about evaluation. A fragment made only of
//! digits is a literal; otherwise its first character decides the operator.

use std::fmt;

use crate::error::{CompileError, CompileResult};

/// Arithmetic operators recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
  Add,
  Sub,
  Mul,
  Div,
  /// Lexically valid, rejected by the emitter.
  Pow,
}

impl Operator {
  fn from_byte(c: u8) -> Option<Self> {
    match c {
      b'+' => Some(Self::Add),
      b'-' => Some(Self::Sub),
      b'*' => Some(Self::Mul),
      b'/' => Some(Self::Div),
      b'^' => Some(Self::Pow),
      _ => None,
    }
  }

  pub fn symbol(self) -> char {
    match self {
      Self::Add => '+',
      Self::Sub => '-',
      Self::Mul => '*',
      Self::Div => '/',
      Self::Pow => '^',
    }
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Operator(Operator),
  Literal(u32),
}

/// A token plus the source range of the fragment it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor for a token covering `len` bytes at `loc`.
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }
}

/// Tokenize a single fragment in isolation.
pub fn tokenize_fragment(fragment: &str) -> CompileResult<Token> {
  lex_fragment(fragment, 0, fragment)
}

/// Split the source on single spaces and tokenize every fragment in order.
///
/// Trailing whitespace is dropped first, so a final newline is harmless, but
/// doubled spaces yield an empty fragment and fail.
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
  let body = source.trim_end();
  if body.is_empty() {
    return Err(CompileError::malformed(source, 0, "expression is empty"));
  }

  let mut tokens = Vec::new();
  let mut loc = 0;
  for fragment in body.split(' ') {
    tokens.push(lex_fragment(source, loc, fragment)?);
    loc += fragment.len() + 1;
  }
  Ok(tokens)
}

fn lex_fragment(source: &str, loc: usize, fragment: &str) -> CompileResult<Token> {
  let bytes = fragment.as_bytes();

  if !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit) {
    let value = fragment
      .parse::<u32>()
      .map_err(|err| CompileError::parse(source, loc, format!("invalid number: {err}")))?;
    return Ok(Token::new(TokenKind::Literal(value), loc, fragment.len()));
  }

  if let Some(op) = bytes.first().copied().and_then(Operator::from_byte) {
    return Ok(Token::new(TokenKind::Operator(op), loc, fragment.len()));
  }

  if bytes.first().is_some_and(u8::is_ascii_digit)
    && let Some((offset, c)) = fragment.char_indices().find(|(_, c)| !c.is_ascii_digit())
  {
    return Err(CompileError::parse(
      source,
      loc + offset,
      format!("invalid character {c:?} in number"),
    ));
  }

  let message = match fragment.chars().next() {
    None => "empty fragment".to_string(),
    Some(c) if c.is_ascii_alphabetic() => "expect a number or an operator".to_string(),
    Some(c) => format!("invalid token: '{c}'"),
  };
  Err(CompileError::parse(source, loc, message))
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  &source[token.loc..token.loc + token.len]
}
