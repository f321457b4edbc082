//! Error types for the assembler and the emulator.

use std::io;

use thiserror::Error;

/// Reasons a 32-bit word cannot be decoded into an instruction of the
/// supported subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// The op0 field matches none of the four instruction classes.
    #[error("word {0:#010x} does not match any supported instruction class")]
    UnknownClass(u32),
    /// A data-processing immediate word whose opi selects neither the
    /// arithmetic nor the wide-move group.
    #[error("unsupported data-processing immediate group in word {0:#010x}")]
    UnknownImmediateGroup(u32),
    /// The wide-move opc `0b01` is not allocated.
    #[error("invalid wide-move opcode {0:#04b}")]
    InvalidWideMoveOpcode(u8),
    /// The branch identifier `0b10` is not allocated.
    #[error("invalid branch kind in word {0:#010x}")]
    InvalidBranchKind(u32),
    /// A conditional branch carrying a condition code outside the supported
    /// set.
    #[error("invalid condition code {0:#x}")]
    InvalidCondition(u8),
}

/// Emulator runtime error variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The fetched word is not a valid instruction.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A data transfer or fetch touched memory outside the 2 MiB region.
    #[error("memory access of {size} bytes at {address:#x} is out of bounds")]
    MemoryAccess {
        /// First byte of the failed access.
        address: u64,
        /// Width of the failed access, in bytes.
        size: usize,
    },
    /// The program image does not fit into the emulator memory.
    #[error("program image of {size} bytes exceeds the emulator memory")]
    ProgramTooLarge {
        /// Size of the rejected image, in bytes.
        size: usize,
    },
}

/// Reasons a source line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    #[error("malformed register `{0}`")]
    InvalidRegister(String),
    #[error("malformed immediate `{0}`")]
    InvalidImmediate(String),
    #[error("unknown shift `{0}`")]
    InvalidShift(String),
    #[error("unknown branch condition `{0}`")]
    InvalidCondition(String),
    #[error("malformed directive literal `{0}`")]
    InvalidLiteral(String),
    #[error("label `{0}` is not defined")]
    UndefinedLabel(String),
    #[error("missing operand {index}")]
    MissingOperand {
        /// Position of the absent operand token.
        index: usize,
    },
}

/// Assembler failure: a parse error tagged with its 1-based source line, or
/// an I/O failure at the file boundary.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based line number of the offending source line.
        line: usize,
        source: ParseError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}
