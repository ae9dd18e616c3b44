//! Shared error utilities used across the translation pipeline.
//!
//! Every diagnostic echoes the expression and points at the offending
//! fragment with a caret, so the first failure is all a user needs to see.

use snafu::Snafu;

use crate::tokenizer::Operator;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// A fragment is neither a `u32` literal nor a known operator.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Parse {
    expr_line: String,
    marker: String,
    message: String,
  },

  /// The operator tokenizes but has no IR lowering.
  #[snafu(display("{expr_line}\n{marker} unsupported operation '{op}'"))]
  UnsupportedOperation {
    expr_line: String,
    marker: String,
    op: Operator,
  },

  /// The token sequence does not reduce to a single value.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  MalformedExpression {
    expr_line: String,
    marker: String,
    message: String,
  },
}

/// Render the quoted expression and a caret line under byte offset `loc`.
fn locate(expr: &str, loc: usize) -> (String, String) {
  let expr_line = format!("'{expr}'");
  let safe_loc = loc.min(expr.len());
  let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
  let marker = format!("{}^", " ".repeat(char_offset));
  (expr_line, marker)
}

impl CompileError {
  /// Construct a parse error anchored at a specific byte offset in the source.
  pub fn parse(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = locate(expr, loc);
    Self::Parse {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  /// Reject an operator the emitter cannot lower.
  pub fn unsupported(expr: &str, loc: usize, op: Operator) -> Self {
    let (expr_line, marker) = locate(expr, loc);
    Self::UnsupportedOperation {
      expr_line,
      marker,
      op,
    }
  }

  /// Report a token sequence that cannot reduce to one value.
  pub fn malformed(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = locate(expr, loc);
    Self::MalformedExpression {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  /// The human-readable message without the caret diagram.
  pub fn message(&self) -> String {
    match self {
      Self::Parse { message, .. } | Self::MalformedExpression { message, .. } => message.clone(),
      Self::UnsupportedOperation { op, .. } => format!("unsupported operation '{op}'"),
    }
  }
}
