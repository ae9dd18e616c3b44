//! Evaluation queue: tokens stored in reverse source order.
//!
//! The queue is drained from the end of its storage, so the reversal and the
//! LIFO drain cancel out and the emitter sees tokens in source order.

use crate::tokenizer::Token;

/// Tokens of one expression, last-read token first.
#[derive(Debug, Clone, Default)]
pub struct EvalQueue {
  tokens: Vec<Token>,
}

impl EvalQueue {
  /// Build the queue from tokens in the order they were read.
  pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
    tokens.reverse();
    Self { tokens }
  }

  /// Tokens in storage order: the last-read token comes first.
  pub fn as_slice(&self) -> &[Token] {
    &self.tokens
  }

  /// Tokens not yet handed to the emitter.
  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  /// Take the next token for evaluation.
  pub fn pop_next(&mut self) -> Option<Token> {
    self.tokens.pop()
  }
}

impl Iterator for EvalQueue {
  type Item = Token;

  fn next(&mut self) -> Option<Token> {
    self.pop_next()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.tokens.len(), Some(self.tokens.len()))
  }
}

impl ExactSizeIterator for EvalQueue {}
