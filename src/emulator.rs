// Emulator wrapper - drives the CPU and owns everything that is not hardware:
// the output sink, the instruction counter, the clock and the runaway guard.
use crate::cpu::CPU;
use crate::cpu::error::CpuError;
use crate::cpu::instructions::{StepOutcome, lookup};
use crate::cpu::memory::{DEFAULT_MEMORY_SIZE, Ram};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
    #[error("executed more than {0} instructions, giving up")]
    InstructionLimit(u64),
    #[error("memory size {0} outside 1..={max}", max = DEFAULT_MEMORY_SIZE)]
    MemorySize(usize),
}

#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    pub debug: bool,
    pub memory_size: usize,
    pub max_instructions: Option<u64>,
    // None drives the CPU in a tight loop
    pub clock_interval: Option<Duration>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            debug: false,
            memory_size: DEFAULT_MEMORY_SIZE,
            max_instructions: Some(100_000_000),
            clock_interval: None,
        }
    }
}

pub struct Emulator<W: Write> {
    pub cpu: CPU,
    pub config: EmulatorConfig,
    pub instruction_count: u64,
    pub is_halted: bool,
    output: W,
}

impl Emulator<io::Stdout> {
    pub fn new(config: EmulatorConfig) -> Result<Self, EmulatorError> {
        Emulator::with_output(config, io::stdout())
    }
}

impl<W: Write> Emulator<W> {
    /// Builds an emulator around a fresh CPU.
    ///
    /// PC is 8 bits wide, so memory larger than 256 bytes would hold cells
    /// no instruction can reach; such sizes, and 0, are rejected.
    pub fn with_output(config: EmulatorConfig, output: W) -> Result<Self, EmulatorError> {
        if config.memory_size == 0 || config.memory_size > DEFAULT_MEMORY_SIZE {
            return Err(EmulatorError::MemorySize(config.memory_size));
        }
        Ok(Emulator {
            cpu: CPU::with_ram(Ram::new(config.memory_size)),
            config,
            instruction_count: 0,
            is_halted: false,
            output,
        })
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs one tick. PRN values go to the output sink, one per line.
    ///
    /// HLT or any error leaves the emulator halted; later calls are no-ops.
    pub fn execute_instruction(&mut self) -> Result<(), EmulatorError> {
        if self.is_halted {
            return Ok(());
        }

        self.instruction_count += 1;
        if self.config.debug {
            log::debug!("{}", self.trace_line());
        }

        let outcome = match self.cpu.step() {
            Ok(outcome) => outcome,
            Err(err) => {
                self.is_halted = true;
                return Err(err.into());
            }
        };

        match outcome {
            StepOutcome::Printed(value) => writeln!(self.output, "{}", value)?,
            StepOutcome::Halted => self.is_halted = true,
            StepOutcome::Executed => {}
        }
        Ok(())
    }

    /// Ticks until the machine halts, as fast as possible.
    pub fn run(&mut self) -> Result<(), EmulatorError> {
        while !self.is_halted {
            self.check_instruction_limit()?;
            self.execute_instruction()?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Ticks once per `interval` on the calling thread until the machine halts.
    /// Each tick finishes before the next sleep starts, so ticks never overlap.
    pub fn run_clock(&mut self, interval: Duration) -> Result<(), EmulatorError> {
        while !self.is_halted {
            thread::sleep(interval);
            self.check_instruction_limit()?;
            self.execute_instruction()?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Runs with the configured driver: the clock if an interval is set,
    /// the tight loop otherwise.
    pub fn start(&mut self) -> Result<(), EmulatorError> {
        match self.config.clock_interval {
            Some(interval) => self.run_clock(interval),
            None => self.run(),
        }
    }

    // Stop the clock from outside the program
    pub fn stop(&mut self) {
        self.cpu.halt();
        self.is_halted = true;
    }

    // "[count][pc] MNEMONIC" for the instruction about to run
    fn trace_line(&self) -> String {
        let pc = self.cpu.registers.pc;
        let mnemonic = self
            .cpu
            .ram
            .peek(pc as usize)
            .and_then(lookup)
            .map_or("???", |info| info.mnemonic);
        format!("[{}][{:#04x}] {}", self.instruction_count, pc, mnemonic)
    }

    fn check_instruction_limit(&mut self) -> Result<(), EmulatorError> {
        if let Some(limit) = self.config.max_instructions {
            if self.instruction_count >= limit {
                log::warn!("instruction limit {} reached at PC {:#04x}", limit, self.cpu.registers.pc);
                self.stop();
                return Err(EmulatorError::InstructionLimit(limit));
            }
        }
        Ok(())
    }
}
