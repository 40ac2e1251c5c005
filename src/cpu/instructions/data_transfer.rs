// Data transfer instructions
use super::super::CPU;
use super::super::error::CpuError;
use super::{Effect, InstructionInfo, InstructionTable, LDI, PRN};

pub fn register_instructions(table: &mut InstructionTable) {
    // LDI reg, #imm
    table[LDI as usize] = Some(InstructionInfo {
        handler: |cpu, reg, immediate| cpu.ldi(reg, immediate),
        mnemonic: "LDI",
    });

    // PRN reg
    table[PRN as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.prn(reg),
        mnemonic: "PRN",
    });
}

impl CPU {
    // LDI reg, #imm - load an immediate into a register
    pub(crate) fn ldi(&mut self, reg: u8, immediate: u8) -> Result<Effect, CpuError> {
        self.registers.set(reg, immediate)?;
        Ok(Effect::Advance)
    }

    // PRN reg - hand the register's value to the output stream
    pub(crate) fn prn(&mut self, reg: u8) -> Result<Effect, CpuError> {
        let value = self.registers.get(reg)?;
        Ok(Effect::Print(value))
    }
}
