//! Two-pass assembler driver.
//!
//! The first pass records every label against the address of the next
//! executable line; the second pass tokenises, parses and encodes each
//! executable line into a little-endian 32-bit word.

mod parser;
mod symbol_table;
mod tokenizer;

pub use symbol_table::SymbolTable;

use crate::consts::{INSTRUCTION_BYTES, NOP_PATTERN};
use crate::error::{AssembleError, ParseError};
use tokenizer::tokenize;

use tracing::debug;

/// Two-pass assembler: owns the label table built by the first pass.
#[derive(Debug, Default)]
pub struct Assembler {
    labels: SymbolTable,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a source listing into little-endian machine-code bytes.
    pub fn assemble(mut self, source: &str) -> Result<Vec<u8>, AssembleError> {
        self.first_pass(source);
        self.second_pass(source)
    }

    /// Label table populated by the first pass.
    pub fn labels(&self) -> &SymbolTable {
        &self.labels
    }

    fn first_pass(&mut self, source: &str) {
        let mut line_index = 0;
        for line in source.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(label) = label_name(line) {
                self.labels.insert(label, line_index * INSTRUCTION_BYTES);
            } else {
                line_index += 1;
            }
        }
        debug!(labels = self.labels.len(), "first pass complete");
    }

    fn second_pass(&self, source: &str) -> Result<Vec<u8>, AssembleError> {
        let mut output = Vec::new();
        let mut line_index = 0;

        for (number, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || label_name(line).is_some() {
                continue;
            }

            let address = line_index * INSTRUCTION_BYTES;
            let word = self
                .encode_line(line, address)
                .map_err(|source| AssembleError::Parse {
                    line: number + 1,
                    source,
                })?;
            output.extend_from_slice(&word.to_le_bytes());
            line_index += 1;
        }

        debug!(words = line_index, "second pass complete");
        Ok(output)
    }

    fn encode_line(&self, line: &str, address: u32) -> Result<u32, ParseError> {
        let tokens = tokenize(line);
        match tokens.first().map(String::as_str) {
            Some("nop") => Ok(NOP_PATTERN),
            // The `.int` directive arrives as ["int", "<value>"] since the
            // period is a token delimiter.
            Some("int") => {
                let operand = tokens
                    .get(1)
                    .ok_or(ParseError::MissingOperand { index: 1 })?;
                parser::parse_literal(operand)
            }
            _ => parser::parse_instruction(&tokens, &self.labels, address)
                .map(|instruction| instruction.encode()),
        }
    }
}

/// Returns the label name if the line is a label definition: everything
/// before the first `:`.
fn label_name(line: &str) -> Option<&str> {
    line.split_once(':').map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_take_the_address_of_the_next_executable_line() {
        let mut assembler = Assembler::new();
        assembler.first_pass("start:\nmovz x0, #1\n\nloop:\nsub x0, x0, #1\nb loop\n");

        assert_eq!(assembler.labels().lookup("start"), Some(0));
        assert_eq!(assembler.labels().lookup("loop"), Some(4));
        assert_eq!(assembler.labels().lookup("missing"), None);
    }

    #[test]
    fn parse_errors_carry_the_source_line() {
        let error = Assembler::new()
            .assemble("movz x0, #1\nbogus x1, x2\n")
            .unwrap_err();

        assert!(matches!(error, AssembleError::Parse { line: 2, .. }));
    }
}
