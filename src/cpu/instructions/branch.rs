// Control flow instructions
use super::super::CPU;
use super::super::error::CpuError;
use super::super::registers::FLAG_EQUAL;
use super::{CALL, Effect, InstructionInfo, InstructionTable, JEQ, JMP, JNE, RET};

pub fn register_instructions(table: &mut InstructionTable) {
    table[CALL as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.call(reg),
        mnemonic: "CALL",
    });
    table[RET as usize] = Some(InstructionInfo {
        handler: |cpu, _, _| cpu.ret(),
        mnemonic: "RET",
    });
    table[JMP as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.jmp(reg),
        mnemonic: "JMP",
    });
    table[JEQ as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.jeq(reg),
        mnemonic: "JEQ",
    });
    table[JNE as usize] = Some(InstructionInfo {
        handler: |cpu, reg, _| cpu.jne(reg),
        mnemonic: "JNE",
    });
}

impl CPU {
    // CALL reg - push the address after the CALL, jump to the register's value
    pub(crate) fn call(&mut self, reg: u8) -> Result<Effect, CpuError> {
        let target = self.registers.get(reg)?;
        let return_addr = self.registers.pc.wrapping_add(2);
        self.push_stack(return_addr)?;
        log::trace!("call {:#04x}, return to {:#04x}", target, return_addr);
        Ok(Effect::Jump(target))
    }

    // RET - pop the return address into PC
    pub(crate) fn ret(&mut self) -> Result<Effect, CpuError> {
        let return_addr = self.pop_stack()?;
        Ok(Effect::Jump(return_addr))
    }

    // JMP reg
    pub(crate) fn jmp(&mut self, reg: u8) -> Result<Effect, CpuError> {
        Ok(Effect::Jump(self.registers.get(reg)?))
    }

    // JEQ reg - jump if E is set
    pub(crate) fn jeq(&mut self, reg: u8) -> Result<Effect, CpuError> {
        self.jump_if(self.registers.flag(FLAG_EQUAL), reg)
    }

    // JNE reg - jump if E is clear
    pub(crate) fn jne(&mut self, reg: u8) -> Result<Effect, CpuError> {
        self.jump_if(!self.registers.flag(FLAG_EQUAL), reg)
    }

    fn jump_if(&self, condition: bool, reg: u8) -> Result<Effect, CpuError> {
        let target = self.registers.get(reg)?;
        if condition {
            Ok(Effect::Jump(target))
        } else {
            Ok(Effect::Advance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::registers::STACK_TOP;
    use super::super::tests::{cpu_with, run_to_halt};
    use super::super::*;

    #[test]
    fn call_then_ret_resumes_after_call() {
        // 0: LDI R1, 8
        // 3: CALL R1
        // 5: PRN R0
        // 7: HLT
        // 8: LDI R0, 11
        // 11: RET
        let program = [LDI, 1, 8, CALL, 1, PRN, 0, HLT, LDI, 0, 11, RET];
        let mut cpu = cpu_with(&program);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.registers.pc, 8);
        assert_eq!(cpu.ram.read((STACK_TOP - 1) as usize).unwrap(), 5);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.registers.pc, 5);
        assert_eq!(cpu.registers.sp(), STACK_TOP);
        assert_eq!(run_to_halt(&mut cpu), vec![11]);
    }

    #[test]
    fn call_frames_share_the_stack_with_push() {
        // The subroutine at 11 sees its return address on top of the
        // caller's pushed R0
        let program = [
            LDI, 0, 4, PUSH, 0, LDI, 1, 11, CALL, 1, HLT, // 0..=10
            POP, 2, POP, 3, PRN, 3, PUSH, 2, RET, // 11..
        ];
        let mut cpu = cpu_with(&program);
        assert_eq!(run_to_halt(&mut cpu), vec![4]);
        assert_eq!(cpu.registers.pc, 10);
    }

    #[test]
    fn jmp_is_unconditional() {
        let program = [LDI, 0, 8, JMP, 0, PRN, 0, HLT, LDI, 0, 1, PRN, 0, HLT];
        let mut cpu = cpu_with(&program);
        assert_eq!(run_to_halt(&mut cpu), vec![1]);
    }

    #[test]
    fn jeq_jumps_when_equal() {
        // 0: LDI R0,5  3: LDI R1,5  6: LDI R2,17  9: CMP R0,R1  12: JEQ R2
        // 14: PRN R0  16: HLT  17: PRN R1  19: HLT
        let program = [
            LDI, 0, 5, LDI, 1, 5, LDI, 2, 17, CMP, 0, 1, JEQ, 2, PRN, 0, HLT, PRN, 1, HLT,
        ];
        let mut cpu = cpu_with(&program);
        let printed = run_to_halt(&mut cpu);
        assert_eq!(printed, vec![5]);
        assert_eq!(cpu.registers.pc, 19);
    }

    #[test]
    fn jeq_falls_through_when_not_equal() {
        let program = [
            LDI, 0, 5, LDI, 1, 6, LDI, 2, 17, CMP, 0, 1, JEQ, 2, PRN, 0, HLT, PRN, 1, HLT,
        ];
        let mut cpu = cpu_with(&program);
        assert_eq!(run_to_halt(&mut cpu), vec![5]);
        assert_eq!(cpu.registers.pc, 16);
    }

    #[test]
    fn jne_follows_the_equal_bit() {
        let program = |b: u8| {
            vec![LDI, 0, 5, LDI, 1, b, LDI, 2, 17, CMP, 0, 1, JNE, 2, PRN, 0, HLT, PRN, 1, HLT]
        };
        let mut taken = cpu_with(&program(9));
        assert_eq!(run_to_halt(&mut taken), vec![9]);

        let mut not_taken = cpu_with(&program(5));
        assert_eq!(run_to_halt(&mut not_taken), vec![5]);
    }

    #[test]
    fn conditional_jump_reads_flags_bitwise() {
        let mut cpu = cpu_with(&[JEQ, 0, HLT]);
        cpu.registers.set(0, 2).unwrap();
        cpu.registers.fl = 0b0000_0001;
        cpu.step().unwrap();
        assert_eq!(cpu.registers.pc, 2);
    }
}
