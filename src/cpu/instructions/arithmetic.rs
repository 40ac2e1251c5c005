// Arithmetic and compare instructions, all routed through the ALU
use super::super::CPU;
use super::super::alu::{AluOp, AluResult, ordering_to_flags};
use super::super::error::CpuError;
use super::{ADD, CMP, Effect, InstructionInfo, InstructionTable, MUL};

pub fn register_instructions(table: &mut InstructionTable) {
    // ADD regA, regB
    table[ADD as usize] = Some(InstructionInfo {
        handler: |cpu, a, b| cpu.add(a, b),
        mnemonic: "ADD",
    });

    // MUL regA, regB
    table[MUL as usize] = Some(InstructionInfo {
        handler: |cpu, a, b| cpu.mul(a, b),
        mnemonic: "MUL",
    });

    // CMP regA, regB
    table[CMP as usize] = Some(InstructionInfo {
        handler: |cpu, a, b| cpu.cmp(a, b),
        mnemonic: "CMP",
    });
}

impl CPU {
    // ADD regA, regB - regA += regB
    pub(crate) fn add(&mut self, reg_a: u8, reg_b: u8) -> Result<Effect, CpuError> {
        self.alu(AluOp::Add, reg_a, reg_b)?;
        Ok(Effect::Advance)
    }

    // MUL regA, regB - regA *= regB
    pub(crate) fn mul(&mut self, reg_a: u8, reg_b: u8) -> Result<Effect, CpuError> {
        self.alu(AluOp::Mul, reg_a, reg_b)?;
        log::trace!("R{} = {}", reg_a, self.registers.get(reg_a)?);
        Ok(Effect::Advance)
    }

    // CMP regA, regB - record L/G/E in FL, registers unchanged
    pub(crate) fn cmp(&mut self, reg_a: u8, reg_b: u8) -> Result<Effect, CpuError> {
        if let AluResult::Compare(ordering) = self.alu(AluOp::Cmp, reg_a, reg_b)? {
            self.registers.fl = ordering_to_flags(ordering);
            log::trace!("FL = {:08b}", self.registers.fl);
        }
        Ok(Effect::Advance)
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::registers::{FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};
    use super::super::tests::{cpu_with, run_to_halt};
    use super::super::*;

    #[test]
    fn mul_program_prints_72() {
        let mut cpu = cpu_with(&[LDI, 0, 8, LDI, 1, 9, MUL, 0, 1, PRN, 0, HLT]);
        assert_eq!(run_to_halt(&mut cpu), vec![72]);
        assert!(cpu.is_halted());
    }

    #[test]
    fn add_accumulates_into_reg_a() {
        let mut cpu = cpu_with(&[LDI, 0, 10, LDI, 1, 20, ADD, 0, 1, ADD, 0, 0, PRN, 0, HLT]);
        assert_eq!(run_to_halt(&mut cpu), vec![60]);
        assert_eq!(cpu.registers.get(1).unwrap(), 20);
    }

    #[test]
    fn cmp_equal_sets_only_e() {
        for v in [0u8, 5, 255] {
            let mut cpu = cpu_with(&[LDI, 2, v, LDI, 3, v, CMP, 2, 3, HLT]);
            cpu.registers.fl = FLAG_LESS | FLAG_GREATER;
            run_to_halt(&mut cpu);
            assert_eq!(cpu.registers.fl, FLAG_EQUAL);
        }
    }

    #[test]
    fn cmp_less_and_greater() {
        let mut cpu = cpu_with(&[LDI, 0, 1, LDI, 1, 2, CMP, 0, 1, HLT]);
        run_to_halt(&mut cpu);
        assert_eq!(cpu.registers.fl, FLAG_LESS);

        let mut cpu = cpu_with(&[LDI, 0, 3, LDI, 1, 2, CMP, 0, 1, HLT]);
        run_to_halt(&mut cpu);
        assert_eq!(cpu.registers.fl, FLAG_GREATER);
        assert_eq!(cpu.registers.get(0).unwrap(), 3);
    }
}
