use super::Interpreter;
use crate::bits;
use crate::instruction::{
    ArithmeticOp, BitMode, DpImmediate, DpRegister, LogicalBase, MultiplyOp, RegisterId,
    WideMoveOp, Word,
};

impl Interpreter {
    /// Executes a data-processing immediate instruction, updating PC
    /// afterwards.
    pub(crate) fn execute_dp_immediate(&mut self, dp: DpImmediate) {
        match dp {
            DpImmediate::Arithmetic {
                sf,
                op,
                sh,
                imm12,
                rn,
                rd,
            } => {
                let op2 = if sh {
                    bits::lsl(imm12 as Word, 12, sf)
                } else {
                    imm12 as Word
                };
                self.arithmetic(sf, op, rn, rd, op2);
            }
            DpImmediate::WideMove {
                sf,
                op,
                hw,
                imm16,
                rd,
            } => self.wide_move(sf, op, hw, imm16, rd),
        }
        self.inc_pc();
    }

    /// Executes a data-processing register instruction, updating PC
    /// afterwards.
    pub(crate) fn execute_dp_register(&mut self, dp: DpRegister) {
        match dp {
            DpRegister::Arithmetic {
                sf,
                op,
                shift,
                amount,
                rm,
                rn,
                rd,
            } => {
                let op2 = shift.apply(self.read_register(sf, rm), amount as u32, sf);
                self.arithmetic(sf, op, rn, rd, op2);
            }
            DpRegister::Logical {
                sf,
                op,
                shift,
                amount,
                rm,
                rn,
                rd,
            } => {
                let mut op2 = shift.apply(self.read_register(sf, rm), amount as u32, sf);
                if op.negates_operand() {
                    op2 = sf.truncate(!op2);
                }
                let op1 = self.read_register(sf, rn);
                let result = match op.base() {
                    LogicalBase::And => op1 & op2,
                    LogicalBase::Orr => op1 | op2,
                    LogicalBase::Eor => op1 ^ op2,
                };
                if op.sets_flags() {
                    self.set_flags_logical(sf, sf.truncate(result));
                }
                self.write_register(sf, rd, result);
            }
            DpRegister::Multiply {
                sf,
                op,
                rm,
                ra,
                rn,
                rd,
            } => {
                let product = self
                    .read_register(sf, rn)
                    .wrapping_mul(self.read_register(sf, rm));
                let ra = self.read_register(sf, ra);
                let result = match op {
                    MultiplyOp::Madd => ra.wrapping_add(product),
                    MultiplyOp::Msub => ra.wrapping_sub(product),
                };
                self.write_register(sf, rd, result);
            }
        }
        self.inc_pc();
    }

    /// Shared add/sub tail of the immediate and register forms: `op2` is
    /// already shifted.
    fn arithmetic(&mut self, sf: BitMode, op: ArithmeticOp, rn: RegisterId, rd: RegisterId, op2: Word) {
        let op1 = self.read_register(sf, rn);
        let result = if op.is_subtraction() {
            op1.wrapping_sub(op2)
        } else {
            op1.wrapping_add(op2)
        };
        if op.sets_flags() {
            self.set_flags_arithmetic(sf, op, op1, op2, result);
        }
        self.write_register(sf, rd, result);
    }

    fn wide_move(&mut self, sf: BitMode, op: WideMoveOp, hw: u8, imm16: u16, rd: RegisterId) {
        let shift = hw as u32 * 16;
        let operand = (imm16 as Word) << shift;
        let value = match op {
            WideMoveOp::Movz => operand,
            WideMoveOp::Movn => !operand,
            WideMoveOp::Movk => {
                // Only the shifted 16-bit window of rd is replaced.
                let keep = self.read_register(sf, rd) & !bits::mask(shift, shift + 15);
                keep | operand
            }
        };
        self.write_register(sf, rd, value);
    }

    /// N is the sign of the truncated result, Z its zero-ness; C and V
    /// follow the unsigned-wrap and signed-overflow rules of add/sub.
    fn set_flags_arithmetic(&mut self, sf: BitMode, op: ArithmeticOp, op1: Word, op2: Word, result: Word) {
        let sign_bit = sf.width() - 1;
        let truncated = sf.truncate(result);
        let op1_sign = bits::extract(op1, sign_bit, sign_bit);
        let op2_sign = bits::extract(op2, sign_bit, sign_bit);
        let result_sign = bits::extract(truncated, sign_bit, sign_bit);

        self.pstate.n = result_sign == 1;
        self.pstate.z = truncated == 0;
        if op.is_subtraction() {
            self.pstate.c = op1 >= op2;
            self.pstate.v = op1_sign != op2_sign && op2_sign == result_sign;
        } else {
            self.pstate.c = truncated < op1 || truncated < op2;
            self.pstate.v = op1_sign == op2_sign && op2_sign != result_sign;
        }
    }

    fn set_flags_logical(&mut self, sf: BitMode, result: Word) {
        let sign_bit = sf.width() - 1;
        self.pstate.n = bits::extract(result, sign_bit, sign_bit) == 1;
        self.pstate.z = result == 0;
        self.pstate.c = false;
        self.pstate.v = false;
    }
}
