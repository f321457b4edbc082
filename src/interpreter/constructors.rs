//! Exposed constructors API for the [`Interpreter`]

use super::Interpreter;
use crate::consts::{GENERAL_REGISTER_COUNT, MEMORY_SIZE};
use crate::state::Pstate;

impl Interpreter {
    /// Creates an interpreter in the reset state: zeroed memory and
    /// registers, `PC = 0` and PSTATE `(N, Z, C, V) = (0, 1, 0, 0)`.
    pub fn new() -> Self {
        Self {
            registers: [0; GENERAL_REGISTER_COUNT],
            memory: vec![0; MEMORY_SIZE],
            pc: 0,
            pstate: Pstate::default(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
