//! LS-8 emulator: an 8-bit fetch-decode-execute machine with eight registers,
//! a downward-growing stack in R7 and a 13-instruction opcode table.

pub mod cpu;
pub mod emulator;
pub mod instruction_debug;
pub mod loader;
