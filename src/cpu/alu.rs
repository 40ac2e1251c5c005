// ALU - math and comparisons on register values
use super::CPU;
use super::error::CpuError;
use super::registers::{FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
    Inc,
    Dec,
    Cmp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluResult {
    Value(u8),
    Compare(Ordering),
}

/// Evaluates `op` on two register values. Arithmetic wraps at 8 bits.
/// `Inc` and `Dec` ignore `b`.
pub fn evaluate(op: AluOp, a: u8, b: u8) -> AluResult {
    match op {
        AluOp::Add => AluResult::Value(a.wrapping_add(b)),
        AluOp::Mul => AluResult::Value(a.wrapping_mul(b)),
        AluOp::Inc => AluResult::Value(a.wrapping_add(1)),
        AluOp::Dec => AluResult::Value(a.wrapping_sub(1)),
        AluOp::Cmp => AluResult::Compare(a.cmp(&b)),
    }
}

pub fn ordering_to_flags(ordering: Ordering) -> u8 {
    match ordering {
        Ordering::Less => FLAG_LESS,
        Ordering::Greater => FLAG_GREATER,
        Ordering::Equal => FLAG_EQUAL,
    }
}

impl CPU {
    // Runs `op` on regA/regB. Arithmetic results land in regA; comparisons
    // are returned and leave every register untouched.
    pub(crate) fn alu(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<AluResult, CpuError> {
        let a = self.registers.get(reg_a)?;
        let b = self.registers.get(reg_b)?;
        let result = evaluate(op, a, b);
        if let AluResult::Value(value) = result {
            self.registers.set(reg_a, value)?;
        }
        Ok(result)
    }
}
