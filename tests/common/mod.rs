//! Reference interpreter for emitted programs.

use std::collections::HashMap;

use rpnc::codegen::{BinaryOp, Instr, Program};

/// Run the program with 32-bit wrapping arithmetic. `None` on division by
/// zero or a read of an unbound temporary.
pub fn evaluate(program: &Program) -> Option<u32> {
  let mut env = HashMap::new();
  for instr in &program.body {
    let value = match *instr {
      Instr::Copy { value, .. } => value,
      Instr::Binary { op, lhs, rhs, .. } => {
        let (l, r): (u32, u32) = (*env.get(&lhs)?, *env.get(&rhs)?);
        match op {
          BinaryOp::Add => l.wrapping_add(r),
          BinaryOp::Sub => l.wrapping_sub(r),
          BinaryOp::Mul => l.wrapping_mul(r),
          BinaryOp::Div => l.checked_div(r)?,
        }
      }
    };
    env.insert(instr.dest(), value);
  }
  env.get(&program.ret).copied()
}
