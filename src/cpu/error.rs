use super::memory::MemoryError;
use thiserror::Error;

/// Errors raised by the execution engine. All of them halt the machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CpuError {
    /// Opcode with no entry in the instruction table.
    #[error("unknown instruction {opcode:#010b} at {pc:#04x}")]
    UnknownInstruction { opcode: u8, pc: u8 },
    /// Register operand outside R0-R7.
    #[error("invalid register R{0}")]
    InvalidRegister(u8),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}
