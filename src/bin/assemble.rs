//! Assembler CLI: `assemble <input.s> <output.bin>`.

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use a64_vm::prelude::*;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: assemble <input.s> <output.bin>");
        return ExitCode::FAILURE;
    }

    match run(&args[1], &args[2]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &str, output: &str) -> anyhow::Result<()> {
    let source =
        fs::read_to_string(input).with_context(|| format!("could not read {input}"))?;
    let binary = Assembler::new().assemble(&source)?;
    fs::write(output, binary).with_context(|| format!("could not write {output}"))?;
    Ok(())
}
