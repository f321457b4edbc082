use super::Interpreter;
use crate::bits;
use crate::consts::MEMORY_SIZE;
use crate::error::RuntimeError;
use crate::instruction::{AddressingMode, BitMode, DataTransfer, Word};

impl Interpreter {
    /// Copies a program image to address zero.
    ///
    /// Fails without touching memory when the image is larger than the
    /// 2 MiB region.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), RuntimeError> {
        if image.len() > MEMORY_SIZE {
            return Err(RuntimeError::ProgramTooLarge { size: image.len() });
        }
        self.memory[..image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Reads 4 or 8 consecutive bytes at `address`, least-significant byte
    /// first.
    pub(crate) fn read_memory(&self, mode: BitMode, address: Word) -> Result<Word, RuntimeError> {
        let range = checked_range(address, mode.bytes())?;
        let mut value = 0;
        for (i, byte) in self.memory[range].iter().enumerate() {
            value |= (*byte as Word) << (i * 8);
        }
        Ok(value)
    }

    /// Writes the low 4 or 8 bytes of `value` at `address`, least-significant
    /// byte first.
    pub(crate) fn write_memory(
        &mut self,
        mode: BitMode,
        address: Word,
        value: Word,
    ) -> Result<(), RuntimeError> {
        let range = checked_range(address, mode.bytes())?;
        for (i, byte) in self.memory[range].iter_mut().enumerate() {
            *byte = (value >> (i * 8)) as u8;
        }
        Ok(())
    }

    /// Executes a single data transfer, updating PC afterwards.
    pub(crate) fn execute_data_transfer(
        &mut self,
        transfer: DataTransfer,
    ) -> Result<(), RuntimeError> {
        match transfer {
            DataTransfer::Sdt {
                sf,
                load,
                mode,
                xn,
                rt,
            } => {
                let base = self.read_register(sf, xn);
                let (address, write_back) = match mode {
                    AddressingMode::UnsignedOffset(imm12) => {
                        (base.wrapping_add(imm12 as Word * sf.bytes() as Word), None)
                    }
                    AddressingMode::PreIndex(simm9) => {
                        let address = base.wrapping_add(simm9 as Word);
                        (address, Some(address))
                    }
                    AddressingMode::PostIndex(simm9) => {
                        (base, Some(base.wrapping_add(simm9 as Word)))
                    }
                    AddressingMode::RegisterOffset(xm) => {
                        (base.wrapping_add(self.read_register(sf, xm)), None)
                    }
                };

                if load {
                    let value = self.read_memory(sf, address)?;
                    self.write_register(sf, rt, value);
                } else {
                    let value = self.read_register(sf, rt);
                    self.write_memory(sf, address, value)?;
                }

                if let Some(value) = write_back {
                    self.write_register(sf, xn, value);
                }
            }
            DataTransfer::LoadLiteral { sf, simm19, rt } => {
                let address = bits::pc_offset(self.pc, simm19 as i64, 19);
                let value = self.read_memory(sf, address)?;
                self.write_register(sf, rt, value);
            }
        }

        self.inc_pc();
        Ok(())
    }
}

fn checked_range(address: Word, size: usize) -> Result<std::ops::Range<usize>, RuntimeError> {
    let start = usize::try_from(address)
        .ok()
        .filter(|start| start.checked_add(size).is_some_and(|end| end <= MEMORY_SIZE))
        .ok_or(RuntimeError::MemoryAccess { address, size })?;
    Ok(start..start + size)
}
