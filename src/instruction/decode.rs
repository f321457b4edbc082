//! Bit-exact decoding of 32-bit words into instruction records.

use super::fields::*;
use super::{
    AddressingMode, ArithmeticOp, BitMode, Branch, Condition, DataTransfer, DpImmediate,
    DpRegister, Instruction, LogicalOp, MultiplyOp, RegisterId, ShiftType, WideMoveOp,
};
use crate::bits::{extract, sign_extend};
use crate::error::DecodeError;

impl Instruction {
    /// Decodes a 32-bit word, classifying it through the op0 field.
    ///
    /// Fails on words outside the supported subset; the halt and nop
    /// patterns are the caller's concern and are never passed here by the
    /// emulator.
    pub fn decode(word: u32) -> Result<Self, DecodeError> {
        let op0 = extract(word as u64, OP0_LO, OP0_HI);

        if op0 & DP_IMM_OP0_MASK == DP_IMM_OP0_PATTERN {
            decode_dp_immediate(word)
        } else if op0 & DP_REG_OP0_MASK == DP_REG_OP0_PATTERN {
            Ok(decode_dp_register(word))
        } else if op0 & SDT_OP0_MASK == SDT_OP0_PATTERN {
            Ok(decode_data_transfer(word))
        } else if op0 & BRANCH_OP0_MASK == BRANCH_OP0_PATTERN {
            decode_branch(word)
        } else {
            Err(DecodeError::UnknownClass(word))
        }
    }
}

fn register(word: u32, position: u32) -> RegisterId {
    extract(word as u64, position, position + 4) as RegisterId
}

fn decode_dp_immediate(word: u32) -> Result<Instruction, DecodeError> {
    let w = word as u64;
    let sf = BitMode::from_sf(extract(w, DP_SF, DP_SF));
    let opc = extract(w, DP_OPC, DP_OPC + 1);
    let rd = register(word, 0);

    let dp = match extract(w, OPI, OPI + 2) as u32 {
        ARITHMETIC_OPI => DpImmediate::Arithmetic {
            sf,
            op: ArithmeticOp::from_opc(opc),
            sh: extract(w, SH, SH) == 1,
            imm12: extract(w, IMM12, IMM12 + 11) as u16,
            rn: register(word, RN),
            rd,
        },
        WIDE_MOVE_OPI => DpImmediate::WideMove {
            sf,
            op: match opc {
                0 => WideMoveOp::Movn,
                2 => WideMoveOp::Movz,
                3 => WideMoveOp::Movk,
                _ => return Err(DecodeError::InvalidWideMoveOpcode(opc as u8)),
            },
            hw: extract(w, HW, HW + 1) as u8,
            imm16: extract(w, IMM16, IMM16 + 15) as u16,
            rd,
        },
        _ => return Err(DecodeError::UnknownImmediateGroup(word)),
    };

    Ok(Instruction::DataProcessingImmediate(dp))
}

fn decode_dp_register(word: u32) -> Instruction {
    let w = word as u64;
    let sf = BitMode::from_sf(extract(w, DP_SF, DP_SF));
    let opc = extract(w, DP_OPC, DP_OPC + 1);
    let rm = register(word, RM);
    let rn = register(word, RN);
    let rd = register(word, 0);

    let dp = if extract(w, M, M) == 1 {
        DpRegister::Multiply {
            sf,
            op: if extract(w, X, X) == 0 {
                MultiplyOp::Madd
            } else {
                MultiplyOp::Msub
            },
            rm,
            ra: register(word, RA),
            rn,
            rd,
        }
    } else {
        let shift = ShiftType::from_code(extract(w, SHIFT, SHIFT + 1));
        let amount = extract(w, OPERAND, OPERAND + 5) as u8;
        if extract(w, ARITHMETIC_BIT, ARITHMETIC_BIT) == 1 {
            DpRegister::Arithmetic {
                sf,
                op: ArithmeticOp::from_opc(opc),
                shift,
                amount,
                rm,
                rn,
                rd,
            }
        } else {
            DpRegister::Logical {
                sf,
                op: LogicalOp::from_fields(opc, extract(w, N, N)),
                shift,
                amount,
                rm,
                rn,
                rd,
            }
        }
    };

    Instruction::DataProcessingRegister(dp)
}

fn decode_data_transfer(word: u32) -> Instruction {
    let w = word as u64;
    let sf = BitMode::from_sf(extract(w, SDT_SF, SDT_SF));
    let rt = register(word, 0);

    let transfer = if extract(w, SDT_IDENTIFIER, SDT_IDENTIFIER) == 1 {
        // U selects the unsigned offset, then R the register offset, then I
        // picks between pre- and post-index.
        let mode = if extract(w, U, U) == 1 {
            AddressingMode::UnsignedOffset(extract(w, IMM12, IMM12 + 11) as u16)
        } else if extract(w, R, R) == 1 {
            AddressingMode::RegisterOffset(register(word, XM))
        } else {
            let simm9 = sign_extend(extract(w, SIMM9, SIMM9 + 8), 9) as i16;
            if extract(w, I, I) == 1 {
                AddressingMode::PreIndex(simm9)
            } else {
                AddressingMode::PostIndex(simm9)
            }
        };

        DataTransfer::Sdt {
            sf,
            load: extract(w, L, L) == 1,
            mode,
            xn: register(word, XN),
            rt,
        }
    } else {
        DataTransfer::LoadLiteral {
            sf,
            simm19: sign_extend(extract(w, SIMM19, SIMM19 + 18), 19) as i32,
            rt,
        }
    };

    Instruction::SingleDataTransfer(transfer)
}

fn decode_branch(word: u32) -> Result<Instruction, DecodeError> {
    let w = word as u64;

    let branch = match extract(w, BRANCH_IDENTIFIER, BRANCH_IDENTIFIER + 1) {
        UNCONDITIONAL_IDENTIFIER => Branch::Unconditional {
            simm26: sign_extend(extract(w, 0, 25), 26) as i32,
        },
        REGISTER_IDENTIFIER => Branch::Register {
            xn: register(word, XN),
        },
        CONDITIONAL_IDENTIFIER => Branch::Conditional {
            simm19: sign_extend(extract(w, SIMM19, SIMM19 + 18), 19) as i32,
            cond: match extract(w, COND, COND + 3) {
                0 => Condition::Eq,
                1 => Condition::Ne,
                10 => Condition::Ge,
                11 => Condition::Lt,
                12 => Condition::Gt,
                13 => Condition::Le,
                14 => Condition::Al,
                code => return Err(DecodeError::InvalidCondition(code as u8)),
            },
        },
        _ => return Err(DecodeError::InvalidBranchKind(word)),
    };

    Ok(Instruction::Branch(branch))
}
