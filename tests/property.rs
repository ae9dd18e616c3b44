//! Property-based tests for tokenization and emission using `proptest`.

mod common;

use proptest::prelude::*;
use rpnc::codegen::{Instr, Temp};
use rpnc::tokenizer::{TokenKind, tokenize, tokenize_fragment};
use rpnc::{CompileError, EmitOptions, compile};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Expr {
  Lit(u32),
  Op(char, Box<Expr>, Box<Expr>),
}

impl Expr {
  fn rpn(&self) -> String {
    match self {
      Self::Lit(n) => n.to_string(),
      Self::Op(op, a, b) => format!("{} {} {op}", a.rpn(), b.rpn()),
    }
  }

  /// Value under the emitter's operand order: in `a b op` the most recent
  /// operand is on the left.
  fn value(&self) -> Option<u32> {
    match self {
      Self::Lit(n) => Some(*n),
      Self::Op(op, a, b) => {
        let (right, left) = (a.value()?, b.value()?);
        match op {
          '+' => Some(left.wrapping_add(right)),
          '-' => Some(left.wrapping_sub(right)),
          '*' => Some(left.wrapping_mul(right)),
          '/' => left.checked_div(right),
          _ => unreachable!(),
        }
      }
    }
  }
}

fn arb_expr() -> impl Strategy<Value = Expr> {
  prop_oneof![any::<u32>(), 0u32..16]
    .prop_map(Expr::Lit)
    .prop_recursive(5, 48, 2, |inner| {
      (
        prop::sample::select(vec!['+', '-', '*', '/']),
        inner.clone(),
        inner,
      )
        .prop_map(|(op, a, b)| Expr::Op(op, Box::new(a), Box::new(b)))
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
  #[test]
  fn any_u32_tokenizes_to_itself(n in any::<u32>()) {
    let token = tokenize_fragment(&n.to_string()).unwrap();
    prop_assert_eq!(token.kind, TokenKind::Literal(n));
  }

  #[test]
  fn out_of_range_literals_fail(n in (u32::MAX as u64 + 1)..=u64::MAX) {
    let err = tokenize_fragment(&n.to_string()).unwrap_err();
    prop_assert!(matches!(err, CompileError::Parse { .. }), "expected CompileError::Parse, got {:?}", err);
  }

  #[test]
  fn fragment_count_is_preserved(expr in arb_expr()) {
    let source = expr.rpn();
    let fragments = source.split(' ').count();
    prop_assert_eq!(tokenize(&source).unwrap().len(), fragments);

    let program = compile(&source, &EmitOptions::default()).unwrap();
    prop_assert_eq!(program.body.len(), fragments);
  }

  #[test]
  fn emitted_program_matches_reference(expr in arb_expr()) {
    let program = compile(&expr.rpn(), &EmitOptions::default()).unwrap();
    prop_assert_eq!(common::evaluate(&program), expr.value());
  }

  #[test]
  fn names_are_allocated_in_order(expr in arb_expr()) {
    let program = compile(&expr.rpn(), &EmitOptions::default()).unwrap();
    let (mut literals, mut results) = (0, 0);
    for instr in &program.body {
      match (instr, instr.dest()) {
        (Instr::Copy { .. }, Temp::Literal(n)) => {
          prop_assert_eq!(n, literals);
          literals += 1;
        }
        (Instr::Binary { .. }, Temp::Result(n)) => {
          prop_assert_eq!(n, results);
          results += 1;
        }
        (instr, _) => prop_assert!(false, "misnamed destination in {}", instr),
      }
    }
  }
}
