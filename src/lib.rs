//! Crate root: wires together the translation pipeline.
//!
//! - `tokenizer` splits the source into fragments and types each one.
//! - `queue` orders tokens for the stack machine.
//! - `codegen` lowers the queue into a QBE-style function.
//! - `driver` hands the IR to `qbe` and the system C compiler.
//! - `error` centralises reporting utilities shared by the other modules.

pub mod codegen;
pub mod driver;
pub mod error;
pub mod queue;
pub mod tokenizer;
pub mod ty;

pub use codegen::{EmitOptions, Program, ReturnPolicy};
pub use error::{CompileError, CompileResult};

/// Translate an RPN expression into an IR program.
pub fn compile(source: &str, options: &EmitOptions) -> CompileResult<Program> {
  let tokens = tokenizer::tokenize(source)?;
  let queue = queue::EvalQueue::from_tokens(tokens);
  codegen::generate(queue, source, options)
}

/// Translate an RPN expression into IR text with default options.
pub fn generate_ir(source: &str) -> CompileResult<String> {
  Ok(compile(source, &EmitOptions::default())?.render())
}
