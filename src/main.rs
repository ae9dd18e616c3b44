use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use rpnc::codegen::{EmitOptions, ReturnPolicy};
use rpnc::driver::{self, DriverResult, Toolchain};

const DEFAULT_OUTPUT: &str = "a.out";

/// Compile a reverse-Polish arithmetic expression into an executable whose
/// exit code is the result.
#[derive(Parser, Debug)]
#[command(name = "rpnc", version, about, long_about = None)]
struct Args {
  /// Source file holding one space-separated expression
  #[arg(value_name = "FILE")]
  input: PathBuf,

  /// Output path (IR with --emit-ir, otherwise the executable)
  #[arg(short, long, value_name = "PATH")]
  output: Option<PathBuf>,

  /// Stop after IR emission
  #[arg(long)]
  emit_ir: bool,

  /// Name of the exported function
  #[arg(long, value_name = "NAME", default_value = "main")]
  function: String,

  /// Return the last operator result instead of the remaining stack value
  #[arg(long)]
  legacy_return: bool,

  /// QBE executable
  #[arg(long, value_name = "PATH", default_value = "qbe")]
  qbe: PathBuf,

  /// C compiler used to assemble and link
  #[arg(long, value_name = "PATH", default_value = "cc")]
  cc: PathBuf,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn init_logging(verbose: bool) {
  let level = if verbose { Level::DEBUG } else { Level::WARN };
  tracing_subscriber::fmt()
    .without_time()
    .with_target(false)
    .with_max_level(level)
    .with_writer(io::stderr)
    .init();
}

impl Args {
  fn emit_options(&self) -> EmitOptions {
    EmitOptions {
      function_name: self.function.clone(),
      return_policy: if self.legacy_return {
        ReturnPolicy::LastResult
      } else {
        ReturnPolicy::StackTop
      },
    }
  }

  /// Where the build writes its result; IR goes to stdout when unset.
  fn output_path(&self) -> Option<PathBuf> {
    match (&self.output, self.emit_ir) {
      (Some(path), _) => Some(path.clone()),
      (None, true) => None,
      (None, false) => Some(PathBuf::from(DEFAULT_OUTPUT)),
    }
  }
}

fn run(args: Args) -> DriverResult<()> {
  let options = args.emit_options();
  let output = args.output_path();

  if args.emit_ir {
    let ir = driver::emit_ir_file(&args.input, &options)?;
    return match output {
      Some(path) => driver::write_artifact(&path, &ir),
      None => {
        print!("{ir}");
        Ok(())
      }
    };
  }

  let toolchain = Toolchain {
    qbe: args.qbe,
    cc: args.cc,
  };
  let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
  toolchain.build(&args.input, &output, &options)
}

fn main() {
  let args = Args::parse();
  init_logging(args.verbose);

  if let Err(err) = run(args) {
    eprintln!("{err}");
    process::exit(1);
  }
}
