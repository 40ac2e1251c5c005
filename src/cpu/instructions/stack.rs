// Stack instructions. The stack lives at the top of RAM, grows downward,
// and R7 holds the address of the last pushed byte.
use super::super::CPU;
use super::super::error::CpuError;
use super::{Effect, InstructionInfo, InstructionTable, POP, PUSH};

pub fn register_instructions(table: &mut InstructionTable) {
    // PUSH reg
    table[PUSH as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.push(reg),
        mnemonic: "PUSH",
    });

    // POP reg
    table[POP as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.pop(reg),
        mnemonic: "POP",
    });
}

impl CPU {
    // PUSH reg - SP--, then store the register at SP
    pub(crate) fn push(&mut self, reg: u8) -> Result<Effect, CpuError> {
        let value = self.registers.get(reg)?;
        self.push_stack(value)?;
        Ok(Effect::Advance)
    }

    // POP reg - load the byte at SP into the register, then SP++
    pub(crate) fn pop(&mut self, reg: u8) -> Result<Effect, CpuError> {
        let value = self.pop_stack()?;
        self.registers.set(reg, value)?;
        Ok(Effect::Advance)
    }

    // Shared with CALL/RET. SP only moves once the write has succeeded.
    pub(crate) fn push_stack(&mut self, value: u8) -> Result<(), CpuError> {
        let sp = self.registers.sp().wrapping_sub(1);
        self.ram.write(sp as usize, value)?;
        self.registers.set_sp(sp);
        Ok(())
    }

    pub(crate) fn pop_stack(&mut self) -> Result<u8, CpuError> {
        let sp = self.registers.sp();
        let value = self.ram.read(sp as usize)?;
        self.registers.set_sp(sp.wrapping_add(1));
        Ok(value)
    }
}
