pub mod arithmetic;
pub mod branch;
pub mod data_transfer;
pub mod stack;

use super::CPU;
use super::error::CpuError;
use std::sync::LazyLock;

pub const HLT: u8 = 0b0000_0001;
pub const RET: u8 = 0b0001_0001;
pub const PRN: u8 = 0b0100_0011;
pub const PUSH: u8 = 0b0100_0101;
pub const POP: u8 = 0b0100_0110;
pub const CALL: u8 = 0b0101_0000;
pub const JMP: u8 = 0b0101_0100;
pub const JEQ: u8 = 0b0101_0101;
pub const JNE: u8 = 0b0101_0110;
pub const LDI: u8 = 0b1001_1001;
pub const ADD: u8 = 0b1010_1000;
pub const CMP: u8 = 0b1010_0111;
pub const MUL: u8 = 0b1010_1010;

/// What a handler asks the engine to do once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fall through to the next instruction.
    Advance,
    /// PC was chosen by the instruction; do not advance.
    Jump(u8),
    /// Emit a value on the output stream, then advance.
    Print(u8),
    Halt,
}

/// Result of one tick, as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    Printed(u8),
    Halted,
}

pub type InstructionHandler = fn(&mut CPU, u8, u8) -> Result<Effect, CpuError>;

#[derive(Clone, Copy)]
pub struct InstructionInfo {
    pub handler: InstructionHandler,
    pub mnemonic: &'static str,
}

pub type InstructionTable = [Option<InstructionInfo>; 256];

static INSTRUCTION_TABLE: LazyLock<InstructionTable> = LazyLock::new(build_instruction_table);

pub fn build_instruction_table() -> InstructionTable {
    let mut table: InstructionTable = [None; 256];

    arithmetic::register_instructions(&mut table);
    branch::register_instructions(&mut table);
    data_transfer::register_instructions(&mut table);
    stack::register_instructions(&mut table);

    table[HLT as usize] = Some(InstructionInfo {
        handler: |cpu, _, _| cpu.hlt(),
        mnemonic: "HLT",
    });

    table
}

pub fn lookup(opcode: u8) -> Option<&'static InstructionInfo> {
    INSTRUCTION_TABLE[opcode as usize].as_ref()
}

// Operand count lives in the two high bits of the opcode
pub fn operand_count(opcode: u8) -> u8 {
    opcode >> 6
}

impl CPU {
    pub(crate) fn execute_instruction(&mut self) -> Result<StepOutcome, CpuError> {
        let pc = self.registers.pc;
        let opcode = self.ram.read(pc as usize)?;

        // Decode before the operand reads so an unknown opcode is always
        // reported as such, wherever it sits in memory
        let Some(info) = lookup(opcode) else {
            log::error!("Unknown instruction: {:08b} at {:#04x}", opcode, pc);
            return Err(CpuError::UnknownInstruction { opcode, pc });
        };

        let count = operand_count(opcode);
        let operand_a = self.fetch_operand(pc, 1, count)?;
        let operand_b = self.fetch_operand(pc, 2, count)?;

        log::trace!("{} {:#04x} {:#04x}", info.mnemonic, operand_a, operand_b);

        let outcome = match (info.handler)(self, operand_a, operand_b)? {
            Effect::Advance => StepOutcome::Executed,
            Effect::Print(value) => StepOutcome::Printed(value),
            Effect::Jump(target) => {
                self.registers.pc = target;
                return Ok(StepOutcome::Executed);
            }
            Effect::Halt => {
                self.halted = true;
                return Ok(StepOutcome::Halted);
            }
        };

        self.registers.pc = pc.wrapping_add(1 + count);
        Ok(outcome)
    }

    // Operand bytes are always read; one the instruction does not use may lie
    // past the end of memory and reads as 0.
    fn fetch_operand(&self, pc: u8, offset: u8, count: u8) -> Result<u8, CpuError> {
        let address = pc as usize + offset as usize;
        if offset <= count {
            Ok(self.ram.read(address)?)
        } else {
            Ok(self.ram.peek(address).unwrap_or(0))
        }
    }

    // HLT - stop the machine
    pub(crate) fn hlt(&mut self) -> Result<Effect, CpuError> {
        Ok(Effect::Halt)
    }
}
