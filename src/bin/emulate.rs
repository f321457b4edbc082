//! Emulator CLI: `emulate <input.bin> <output.out>`.

use std::env;
use std::fs;
use std::io::BufWriter;
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
        eprintln!("Usage: emulate <input.bin> <output.out>");
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
    let image = fs::read(input).with_context(|| format!("could not read {input}"))?;

    let mut vm = Interpreter::new();
    vm.load_program(&image)?;
    vm.run()?;

    let file = fs::File::create(output).with_context(|| format!("could not create {output}"))?;
    vm.write_state(&mut BufWriter::new(file))
        .with_context(|| format!("could not write {output}"))?;
    Ok(())
}
