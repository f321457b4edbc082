use super::Interpreter;
use crate::consts::{HALT_PATTERN, NOP_PATTERN};
use crate::error::RuntimeError;
use crate::instruction::{BitMode, Instruction};
use crate::state::ExecuteState;

use tracing::debug;

impl Interpreter {
    /// Fetches the word at PC and executes it.
    ///
    /// The halt pattern terminates the pipeline without being decoded and
    /// the nop pattern only advances PC; everything else is decoded and
    /// dispatched to its class executor.
    pub fn step(&mut self) -> Result<ExecuteState, RuntimeError> {
        let word = self.read_memory(BitMode::Bit32, self.pc)? as u32;

        if word == HALT_PATTERN {
            debug!(pc = self.pc, "halt pattern fetched");
            return Ok(ExecuteState::Halted);
        }
        if word == NOP_PATTERN {
            self.inc_pc();
            return Ok(ExecuteState::Proceed);
        }

        match Instruction::decode(word)? {
            Instruction::DataProcessingImmediate(dp) => self.execute_dp_immediate(dp),
            Instruction::DataProcessingRegister(dp) => self.execute_dp_register(dp),
            Instruction::SingleDataTransfer(transfer) => self.execute_data_transfer(transfer)?,
            Instruction::Branch(branch) => self.execute_branch(branch),
        }

        Ok(ExecuteState::Proceed)
    }

    /// Runs the fetch/decode/execute loop until the halt pattern is fetched.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.step()?.should_continue() {}
        Ok(())
    }
}
