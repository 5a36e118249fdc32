//! `kira` — the command-line entry point: no args starts the
//! REPL, a path runs a file, `-e`/`--eval` runs a string. Argument parsing
//! only; the shared driver logic lives in `src/lib.rs` so the integration
//! test harness can call it directly without spawning a subprocess.

use clap::Parser;
use std::path::PathBuf;

/// Kira: a small, dynamically-typed, expression-oriented programming language.
#[derive(Parser, Debug)]
#[command(name = "kira", version, about)]
struct Cli {
    /// A `.kira` source file to run. Omit to start the REPL.
    path: Option<PathBuf>,

    /// Evaluate `SOURCE` as a program instead of reading a file or starting
    /// the REPL.
    #[arg(short = 'e', long = "eval", value_name = "SOURCE")]
    eval: Option<String>,

    /// Raise logging verbosity (repeatable). `RUST_LOG` overrides this when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    kira::logging::init(cli.verbose);

    let code = match (&cli.path, &cli.eval) {
        (Some(_), Some(_)) => {
            eprintln!("kira: pass either a file path or -e, not both");
            2
        }
        (Some(path), None) => kira::run_file(path),
        (None, Some(source)) => kira::run_eval(source),
        (None, None) => kira::repl::run(),
    };
    std::process::exit(code);
}
