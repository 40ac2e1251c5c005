use thiserror::Error;

// Full 8-bit address space
pub const DEFAULT_MEMORY_SIZE: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address {address:#04x} out of range (memory size {size})")]
    OutOfBounds { address: usize, size: usize },
}

/// Flat byte-addressable RAM. Fixed size, zeroed on creation.
pub struct Ram {
    cells: Vec<u8>,
}

impl Ram {
    pub fn new(size: usize) -> Self {
        Ram {
            cells: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn read(&self, address: usize) -> Result<u8, MemoryError> {
        self.peek(address).ok_or(MemoryError::OutOfBounds {
            address,
            size: self.cells.len(),
        })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), MemoryError> {
        let size = self.cells.len();
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(MemoryError::OutOfBounds { address, size })?;
        *cell = value;
        Ok(())
    }

    // Non-failing read, used for candidate operand bytes
    pub fn peek(&self, address: usize) -> Option<u8> {
        self.cells.get(address).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Ram {
    fn default() -> Self {
        Ram::new(DEFAULT_MEMORY_SIZE)
    }
}
