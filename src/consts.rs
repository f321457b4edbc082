//! Machine parameters

/// Size of the byte-addressable memory, in bytes (2 MiB).
pub const MEMORY_SIZE: usize = 2 * 1024 * 1024;

/// Number of general-purpose registers, excluding the zero register.
pub const GENERAL_REGISTER_COUNT: usize = 31;

/// Encoded index of the zero register. Reads yield zero, writes are
/// discarded.
pub const ZERO_REGISTER: u8 = 31;

/// Length of an encoded instruction, in bytes.
pub const INSTRUCTION_BYTES: u32 = 4;

/// Terminates execution when fetched (`and x0, x0, x0` by encoding).
pub const HALT_PATTERN: u32 = 0x8A00_0000;

/// Advances the program counter without any other effect.
pub const NOP_PATTERN: u32 = 0xD503_201F;
