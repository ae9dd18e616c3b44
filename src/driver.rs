//! Toolchain driver: source file in, executable out.
//!
//! The IR is written next to the requested output as `<out>.ssa`, lowered by
//! `qbe` into `<out>.s`, then assembled and linked by the system C compiler.
//! Both tools run as blocking child processes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::codegen::EmitOptions;
use crate::error::CompileError;

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DriverError {
  #[snafu(display("{source}"), context(false))]
  Compile { source: CompileError },

  #[snafu(display("cannot read {}: {source}", path.display()))]
  ReadSource { path: PathBuf, source: io::Error },

  #[snafu(display("cannot write {}: {source}", path.display()))]
  WriteArtifact { path: PathBuf, source: io::Error },

  #[snafu(display("cannot run {program}: {source}"))]
  Spawn { program: String, source: io::Error },

  #[snafu(display("{program} failed with {status}"))]
  ToolFailed { program: String, status: ExitStatus },
}

/// External programs used after IR emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub qbe: PathBuf,
  pub cc: PathBuf,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      qbe: PathBuf::from("qbe"),
      cc: PathBuf::from("cc"),
    }
  }
}

/// Read an expression from disk and translate it to IR text.
pub fn emit_ir_file(input: &Path, options: &EmitOptions) -> DriverResult<String> {
  let source = fs::read_to_string(input).context(ReadSourceSnafu { path: input })?;
  info!(input = %input.display(), "translating");
  let program = crate::compile(&source, options)?;
  Ok(program.render())
}

/// Write `contents` to `path` in one call.
pub fn write_artifact(path: &Path, contents: &str) -> DriverResult<()> {
  fs::write(path, contents).context(WriteArtifactSnafu { path })
}

/// Path of an intermediate artifact derived from the final output path.
pub fn artifact_path(output: &Path, extension: &str) -> PathBuf {
  let mut name = output.as_os_str().to_os_string();
  name.push(".");
  name.push(extension);
  PathBuf::from(name)
}

impl Toolchain {
  /// Translate `input` and build the executable at `output`.
  ///
  /// Nothing is written if translation fails.
  pub fn build(&self, input: &Path, output: &Path, options: &EmitOptions) -> DriverResult<()> {
    let ir = emit_ir_file(input, options)?;

    let ir_path = artifact_path(output, "ssa");
    let asm_path = artifact_path(output, "s");
    write_artifact(&ir_path, &ir)?;

    let mut qbe = Command::new(&self.qbe);
    qbe.arg("-o").arg(&asm_path).arg(&ir_path);
    run(&mut qbe, &self.qbe)?;

    let mut cc = Command::new(&self.cc);
    cc.arg("-o").arg(output).arg(&asm_path);
    run(&mut cc, &self.cc)?;

    info!(output = %output.display(), "linked");
    Ok(())
  }
}

fn run(command: &mut Command, program: &Path) -> DriverResult<()> {
  let program = program.display().to_string();
  debug!(?command, "spawning");
  let status = command.status().context(SpawnSnafu {
    program: program.clone(),
  })?;
  if !status.success() {
    return ToolFailedSnafu { program, status }.fail();
  }
  Ok(())
}
