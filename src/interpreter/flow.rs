use super::Interpreter;
use crate::bits;
use crate::instruction::{BitMode, Branch, Condition};
use crate::state::Pstate;

impl Interpreter {
    /// Executes a branch. Taken branches set PC directly; an untaken
    /// conditional branch falls through to the next instruction.
    pub(crate) fn execute_branch(&mut self, branch: Branch) {
        match branch {
            Branch::Unconditional { simm26 } => {
                self.pc = bits::pc_offset(self.pc, simm26 as i64, 26);
            }
            Branch::Register { xn } => {
                self.pc = self.read_register(BitMode::Bit64, xn);
            }
            Branch::Conditional { simm19, cond } => {
                if condition_holds(cond, &self.pstate) {
                    self.pc = bits::pc_offset(self.pc, simm19 as i64, 19);
                } else {
                    self.inc_pc();
                }
            }
        }
    }
}

fn condition_holds(cond: Condition, pstate: &Pstate) -> bool {
    match cond {
        Condition::Eq => pstate.z,
        Condition::Ne => !pstate.z,
        Condition::Ge => pstate.n == pstate.v,
        Condition::Lt => pstate.n != pstate.v,
        Condition::Gt => !pstate.z && pstate.n == pstate.v,
        Condition::Le => !(!pstate.z && pstate.n == pstate.v),
        Condition::Al => true,
    }
}
