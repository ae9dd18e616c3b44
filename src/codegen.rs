//! Code generation: lower the evaluation queue into QBE-style IR.
//!
//! The emitter runs a virtual stack machine. Literals are copied into fresh
//! `v` temporaries, operators pop two operands and bind the result to a fresh
//! `res` temporary. Nothing reaches the output until the whole walk succeeds.

use std::fmt::{self, Write};

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::queue::EvalQueue;
use crate::tokenizer::{Operator, Token, TokenKind};
use crate::ty::ValueType;

/// A single-assignment IR name. Literals and results are numbered
/// independently, in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temp {
  Literal(u32),
  Result(u32),
}

impl fmt::Display for Temp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal(n) => write!(f, "%v{n}"),
      Self::Result(n) => write!(f, "%res{n}"),
    }
  }
}

/// One entry of the virtual operand stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedValue {
  pub name: Temp,
  pub ty: ValueType,
  /// Only literals carry a known value.
  pub value: Option<u32>,
}

/// Operators with an IR lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl BinaryOp {
  fn lower(op: Operator) -> Option<Self> {
    match op {
      Operator::Add => Some(Self::Add),
      Operator::Sub => Some(Self::Sub),
      Operator::Mul => Some(Self::Mul),
      Operator::Div => Some(Self::Div),
      Operator::Pow => None,
    }
  }

  pub fn mnemonic(self) -> &'static str {
    match self {
      Self::Add => "add",
      Self::Sub => "sub",
      Self::Mul => "mul",
      Self::Div => "div",
    }
  }
}

/// One body instruction binding a fresh temporary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
  Copy {
    dest: Temp,
    ty: ValueType,
    value: u32,
  },
  Binary {
    op: BinaryOp,
    dest: Temp,
    ty: ValueType,
    lhs: Temp,
    rhs: Temp,
  },
}

impl Instr {
  pub fn dest(&self) -> Temp {
    match self {
      Self::Copy { dest, .. } | Self::Binary { dest, .. } => *dest,
    }
  }
}

impl fmt::Display for Instr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Copy { dest, ty, value } => write!(f, "{dest} ={ty} copy {value}"),
      Self::Binary {
        op,
        dest,
        ty,
        lhs,
        rhs,
      } => write!(f, "{dest} ={ty} {} {lhs}, {rhs}", op.mnemonic()),
    }
  }
}

/// The emitted function: body instructions followed by a single return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
  pub function: String,
  pub ret_ty: ValueType,
  pub body: Vec<Instr>,
  pub ret: Temp,
}

impl Program {
  /// Render the whole function into one buffer sized up front.
  pub fn render(&self) -> String {
    let mut out = String::with_capacity(64 + self.function.len() + self.body.len() * 32);
    // Writing into a `String` cannot fail.
    let _ = write!(out, "{self}");
    out
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "export function {} ${}() {{", self.ret_ty, self.function)?;
    writeln!(f, "@start")?;
    for instr in &self.body {
      writeln!(f, "    {instr}")?;
    }
    writeln!(f, "    ret {}", self.ret)?;
    writeln!(f, "}}")
  }
}

/// Which temporary the final `ret` refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnPolicy {
  /// Return the single value left on the virtual stack.
  #[default]
  StackTop,
  /// Return the last allocated `res` temporary, whatever the stack holds.
  LastResult,
}

/// Knobs for the emitted function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
  pub function_name: String,
  pub return_policy: ReturnPolicy,
}

impl Default for EmitOptions {
  fn default() -> Self {
    Self {
      function_name: "main".to_string(),
      return_policy: ReturnPolicy::default(),
    }
  }
}

/// Per-translation emission state: operand stack, name counters and the
/// instruction buffer.
pub struct Emitter<'a> {
  source: &'a str,
  options: &'a EmitOptions,
  stack: Vec<NamedValue>,
  literals: u32,
  results: u32,
  last_result: Option<Temp>,
  body: Vec<Instr>,
}

impl<'a> Emitter<'a> {
  pub fn new(source: &'a str, options: &'a EmitOptions) -> Self {
    Self {
      source,
      options,
      stack: Vec::new(),
      literals: 0,
      results: 0,
      last_result: None,
      body: Vec::new(),
    }
  }

  /// Values currently available as operands, bottom first.
  pub fn stack(&self) -> &[NamedValue] {
    &self.stack
  }

  pub fn emit_token(&mut self, token: Token) -> CompileResult<()> {
    match token.kind {
      TokenKind::Literal(value) => {
        self.emit_literal(value);
        Ok(())
      }
      TokenKind::Operator(op) => self.emit_operator(op, token.loc),
    }
  }

  fn emit_literal(&mut self, value: u32) {
    let dest = Temp::Literal(self.literals);
    self.literals += 1;
    self.stack.push(NamedValue {
      name: dest,
      ty: ValueType::Word,
      value: Some(value),
    });
    self.push_instr(Instr::Copy {
      dest,
      ty: ValueType::Word,
      value,
    });
  }

  fn emit_operator(&mut self, op: Operator, loc: usize) -> CompileResult<()> {
    let Some(bin) = BinaryOp::lower(op) else {
      return Err(CompileError::unsupported(self.source, loc, op));
    };

    let depth = self.stack.len();
    if depth < 2 {
      return Err(CompileError::malformed(
        self.source,
        loc,
        format!("operator '{op}' needs two operands, found {depth}"),
      ));
    }
    // First pop is the left operand.
    let (lhs, rhs) = (self.stack[depth - 1], self.stack[depth - 2]);
    self.stack.truncate(depth - 2);

    let dest = Temp::Result(self.results);
    self.results += 1;
    self.last_result = Some(dest);
    self.stack.push(NamedValue {
      name: dest,
      ty: ValueType::Word,
      value: None,
    });
    self.push_instr(Instr::Binary {
      op: bin,
      dest,
      ty: ValueType::Word,
      lhs: lhs.name,
      rhs: rhs.name,
    });
    Ok(())
  }

  fn push_instr(&mut self, instr: Instr) {
    debug!(%instr, depth = self.stack.len(), "emit");
    self.body.push(instr);
  }

  /// Close the function with its return instruction.
  pub fn finish(self) -> CompileResult<Program> {
    let end = self.source.trim_end().len();
    let ret = match self.options.return_policy {
      ReturnPolicy::StackTop => match self.stack.as_slice() {
        [only] => only.name,
        [] => return Err(CompileError::malformed(self.source, 0, "expression is empty")),
        rest => {
          return Err(CompileError::malformed(
            self.source,
            end,
            format!("expression leaves {} values on the stack", rest.len()),
          ));
        }
      },
      ReturnPolicy::LastResult => self.last_result.ok_or_else(|| {
        CompileError::malformed(self.source, end, "no operator result to return")
      })?,
    };

    Ok(Program {
      function: self.options.function_name.clone(),
      ret_ty: ValueType::Word,
      body: self.body,
      ret,
    })
  }
}

/// Drain the queue through a fresh emitter.
pub fn generate(queue: EvalQueue, source: &str, options: &EmitOptions) -> CompileResult<Program> {
  let mut emitter = Emitter::new(source, options);
  for token in queue {
    emitter.emit_token(token)?;
  }
  emitter.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tokenizer::tokenize;

  #[test]
  fn stack_tracks_literal_values_only() {
    let options = EmitOptions::default();
    let source = "8 2 / 5";
    let mut emitter = Emitter::new(source, &options);
    for token in tokenize(source).unwrap() {
      emitter.emit_token(token).unwrap();
    }
    let values: Vec<_> = emitter.stack().iter().map(|v| (v.name, v.value)).collect();
    assert_eq!(
      values,
      vec![(Temp::Result(0), None), (Temp::Literal(2), Some(5))]
    );
  }

  #[test]
  fn underflow_leaves_stack_untouched() {
    let options = EmitOptions::default();
    let source = "5 +";
    let mut emitter = Emitter::new(source, &options);
    let tokens = tokenize(source).unwrap();
    emitter.emit_token(tokens[0]).unwrap();
    let before = emitter.stack().to_vec();

    let err = emitter.emit_token(tokens[1]).unwrap_err();
    assert!(matches!(err, CompileError::MalformedExpression { .. }));
    assert_eq!(emitter.stack(), before.as_slice());
    assert_eq!(emitter.stack().len(), 1);
  }
}
