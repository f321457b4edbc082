use super::Interpreter;

use std::io::{self, Write};

use itertools::Itertools;

impl Interpreter {
    /// Writes the final machine state: every general-purpose register, the
    /// PC, the PSTATE flags and all non-zero 32-bit memory words in
    /// ascending address order.
    pub fn write_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Registers:")?;
        for (index, value) in self.registers.iter().enumerate() {
            writeln!(out, "X{index:02} = {value:016x}")?;
        }
        writeln!(out, "PC  = {:016x}", self.pc)?;
        writeln!(
            out,
            "PSTATE : {}{}{}{}",
            flag(self.pstate.n, 'N'),
            flag(self.pstate.z, 'Z'),
            flag(self.pstate.c, 'C'),
            flag(self.pstate.v, 'V')
        )?;

        writeln!(out, "Non-Zero memory:")?;
        let words = self
            .memory
            .iter()
            .tuples()
            .map(|(a, b, c, d)| u32::from_le_bytes([*a, *b, *c, *d]));
        for (index, word) in words.enumerate() {
            if word != 0 {
                writeln!(out, "{:#010x} : {word:08x}", index * 4)?;
            }
        }

        Ok(())
    }
}

fn flag(set: bool, symbol: char) -> char {
    if set {
        symbol
    } else {
        '-'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::BitMode;

    #[test]
    fn dump_lists_registers_flags_and_non_zero_words() {
        let mut vm = Interpreter::new();
        vm.write_register(BitMode::Bit64, 0, 0x1234);
        vm.write_memory(BitMode::Bit32, 0x100, 0x42).unwrap();

        let mut dump = Vec::new();
        vm.write_state(&mut dump).unwrap();
        let dump = String::from_utf8(dump).unwrap();

        assert!(dump.starts_with("Registers:\n"));
        assert!(dump.contains("X00 = 0000000000001234\n"));
        assert!(dump.contains("X30 = 0000000000000000\n"));
        assert!(dump.contains("PC  = 0000000000000000\n"));
        assert!(dump.contains("PSTATE : -Z--\n"));
        assert!(dump.contains("0x00000100 : 00000042\n"));
        assert!(!dump.contains("0x00000104"));
    }
}
