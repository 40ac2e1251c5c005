use super::error::CpuError;

pub const REGISTER_COUNT: usize = 8;
// R7 doubles as the stack pointer
pub const SP: u8 = 7;
// Initial SP on a full 256-byte memory; 0xF5-0xFF are reserved
pub const STACK_TOP: u8 = 0xF4;

// FL layout: 00000LGE
pub const FLAG_LESS: u8 = 0b0000_0100;
pub const FLAG_GREATER: u8 = 0b0000_0010;
pub const FLAG_EQUAL: u8 = 0b0000_0001;

pub struct Registers {
    gp: [u8; REGISTER_COUNT], // R0-R7
    pub pc: u8,               // program counter
    pub fl: u8,               // flags
}

impl Registers {
    pub fn new() -> Self {
        Registers::with_stack_top(STACK_TOP)
    }

    pub fn with_stack_top(stack_top: u8) -> Self {
        let mut gp = [0; REGISTER_COUNT];
        gp[SP as usize] = stack_top;
        Registers { gp, pc: 0, fl: 0 }
    }

    pub fn get(&self, index: u8) -> Result<u8, CpuError> {
        self.gp
            .get(index as usize)
            .copied()
            .ok_or(CpuError::InvalidRegister(index))
    }

    pub fn set(&mut self, index: u8, value: u8) -> Result<(), CpuError> {
        let slot = self
            .gp
            .get_mut(index as usize)
            .ok_or(CpuError::InvalidRegister(index))?;
        *slot = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.gp[SP as usize]
    }

    pub(crate) fn set_sp(&mut self, value: u8) {
        self.gp[SP as usize] = value;
    }

    pub fn flag(&self, mask: u8) -> bool {
        self.fl & mask != 0
    }
}

// First PUSH lands on the highest usable cell of a memory this size
pub fn stack_top_for(memory_size: usize) -> u8 {
    memory_size.min(STACK_TOP as usize) as u8
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_state() {
        let regs = Registers::new();
        assert_eq!(regs.pc, 0);
        assert_eq!(regs.fl, 0);
        assert_eq!(regs.sp(), STACK_TOP);
        for i in 0..7 {
            assert_eq!(regs.get(i).unwrap(), 0);
        }
    }

    #[test]
    fn stack_top_follows_memory_size() {
        assert_eq!(stack_top_for(256), STACK_TOP);
        assert_eq!(stack_top_for(245), STACK_TOP);
        assert_eq!(stack_top_for(32), 32);
        assert_eq!(Registers::with_stack_top(32).sp(), 32);
    }

    #[test]
    fn register_index_past_r7_is_rejected() {
        let mut regs = Registers::new();
        assert!(matches!(regs.get(8), Err(CpuError::InvalidRegister(8))));
        assert!(matches!(regs.set(200, 1), Err(CpuError::InvalidRegister(200))));
    }

    #[test]
    fn flag_is_a_bit_test() {
        let mut regs = Registers::new();
        regs.fl = FLAG_EQUAL;
        assert!(regs.flag(FLAG_EQUAL));
        assert!(!regs.flag(FLAG_LESS));
        assert!(!regs.flag(FLAG_GREATER));
    }
}
