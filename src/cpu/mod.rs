pub mod alu;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod registers;

use error::CpuError;
use instructions::StepOutcome;
use memory::{MemoryError, Ram};
use registers::{Registers, stack_top_for};

pub struct CPU {
    pub registers: Registers,
    pub ram: Ram,
    halted: bool, // set by HLT, an error, or an external stop
}

impl CPU {
    pub fn new() -> Self {
        CPU::with_ram(Ram::default())
    }

    pub fn with_ram(ram: Ram) -> Self {
        CPU {
            registers: Registers::with_stack_top(stack_top_for(ram.len())),
            ram,
            halted: false,
        }
    }

    // Store a byte in memory, used for program loading
    pub fn poke(&mut self, address: usize, value: u8) -> Result<(), MemoryError> {
        self.ram.write(address, value)
    }

    // Poke a program image starting at address 0
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        for (address, &byte) in program.iter().enumerate() {
            self.poke(address, byte)?;
        }
        Ok(())
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// A halted CPU does nothing and reports [`StepOutcome::Halted`]. Any error
    /// halts the CPU before it is returned.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }
        let result = self.execute_instruction();
        if result.is_err() {
            self.halted = true;
        }
        result
    }
}

impl Default for CPU {
    fn default() -> Self {
        CPU::new()
    }
}
