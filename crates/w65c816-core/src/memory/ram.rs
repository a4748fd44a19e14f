//! Fixed-capacity RAM backing store with bounds-checked byte access.

use super::{Address, Bus, MemoryImage};
use crate::fault::MemoryError;

/// Default backing-store size (512 KiB, banks `0x00..=0x07`).
pub const DEFAULT_MEMORY_BYTES: usize = 512 * 1024;

/// Fixed-capacity, zero-initialised RAM with bounds-checked access.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    ram: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocates a zeroed store of [`DEFAULT_MEMORY_BYTES`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_BYTES)
    }

    /// Allocates a zeroed store of `bytes` bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            ram: vec![0; bytes].into_boxed_slice(),
        }
    }

    /// Capacity of the backing store in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ram.len()
    }

    /// Raw view of the backing store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }

    /// Copies every segment of `image` into memory.
    ///
    /// All segments are bounds-checked before any byte is written, so a
    /// failing load leaves memory untouched. Overlapping segments resolve
    /// last-write-wins in ascending start-address order.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] for the first segment that runs
    /// past the end of the store.
    pub fn load_image(&mut self, image: &MemoryImage) -> Result<(), MemoryError> {
        for (start, bytes) in image.segments() {
            let fits = usize::try_from(start)
                .ok()
                .and_then(|start| start.checked_add(bytes.len()))
                .is_some_and(|end| end <= self.ram.len());
            if !fits {
                let capacity = Address::try_from(self.ram.len()).unwrap_or(Address::MAX);
                return Err(self.out_of_range(start.max(capacity)));
            }
        }

        for (start, bytes) in image.segments() {
            let start = self.index(start)?;
            self.ram[start..start + bytes.len()].copy_from_slice(bytes);
        }

        log::debug!(
            "loaded {} segment(s) into {} byte memory",
            image.len(),
            self.ram.len()
        );
        Ok(())
    }

    fn out_of_range(&self, address: Address) -> MemoryError {
        MemoryError::OutOfRange {
            address,
            capacity: self.ram.len(),
        }
    }

    fn index(&self, address: Address) -> Result<usize, MemoryError> {
        usize::try_from(address)
            .ok()
            .filter(|index| *index < self.ram.len())
            .ok_or_else(|| self.out_of_range(address))
    }
}

impl Bus for Memory {
    fn read_byte(&self, address: Address) -> Result<u8, MemoryError> {
        let index = self.index(address)?;
        Ok(self.ram[index])
    }

    fn write_byte(&mut self, address: Address, value: u8) -> Result<(), MemoryError> {
        let index = self.index(address)?;
        self.ram[index] = value;
        Ok(())
    }
}
