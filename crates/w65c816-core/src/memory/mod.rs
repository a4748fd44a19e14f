//! Memory access primitives over the flat 24-bit, bank-addressed space.

/// Bulk program/data image loader.
pub mod loader;
/// Fixed-capacity bounds-checked RAM backing store.
pub mod ram;

pub use loader::{load_image, MemoryImage};
pub use ram::{Memory, DEFAULT_MEMORY_BYTES};

use crate::fault::MemoryError;

/// A 24-bit address: bank byte in bits 23..16, bank-relative offset in bits 15..0.
pub type Address = u32;

/// Mask selecting the architecturally visible 24 address bits.
pub const ADDRESS_MASK: Address = 0x00FF_FFFF;

/// Composes a 24-bit address from a bank byte and a 16-bit offset.
#[must_use]
pub const fn bank_address(bank: u8, offset: u16) -> Address {
    ((bank as Address) << 16) | offset as Address
}

/// Splits a 24-bit address into its `(bank, offset)` pair.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split_address(address: Address) -> (u8, u16) {
    (((address >> 16) & 0xFF) as u8, (address & 0xFFFF) as u16)
}

/// Byte-addressable memory the execution engine borrows for one step.
///
/// Implementations own bounds checking. The engine performs no address
/// validation of its own and only propagates the returned [`MemoryError`].
pub trait Bus {
    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when `address` is not backed.
    fn read_byte(&self, address: Address) -> Result<u8, MemoryError>;

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when `address` is not backed.
    fn write_byte(&mut self, address: Address, value: u8) -> Result<(), MemoryError>;

    /// Reads a 16-bit value: high byte at `address`, low byte at `address + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when either byte is not backed.
    fn read_word(&self, address: Address) -> Result<u16, MemoryError> {
        let hi = self.read_byte(address)?;
        let lo = self.read_byte(address.wrapping_add(1) & ADDRESS_MASK)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Reads one byte at `bank:offset`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when the composed address is not backed.
    fn read_byte_banked(&self, bank: u8, offset: u16) -> Result<u8, MemoryError> {
        self.read_byte(bank_address(bank, offset))
    }

    /// Reads a 16-bit value at `bank:offset` with the [`Bus::read_word`] byte order.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when either byte is not backed.
    fn read_word_banked(&self, bank: u8, offset: u16) -> Result<u16, MemoryError> {
        self.read_word(bank_address(bank, offset))
    }

    /// Writes one byte at `bank:offset`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when the composed address is not backed.
    fn write_byte_banked(&mut self, bank: u8, offset: u16, value: u8) -> Result<(), MemoryError> {
        self.write_byte(bank_address(bank, offset), value)
    }
}

#[cfg(test)]
mod tests {
    use super::{bank_address, split_address, Bus, Memory, ADDRESS_MASK};
    use crate::fault::MemoryError;

    #[test]
    fn bank_composition_places_bank_in_high_byte() {
        assert_eq!(bank_address(0x00, 0x1100), 0x00_1100);
        assert_eq!(bank_address(0x7E, 0x0000), 0x7E_0000);
        assert_eq!(bank_address(0xFF, 0xFFFF), ADDRESS_MASK);
    }

    #[test]
    fn split_inverts_composition() {
        assert_eq!(split_address(0x12_3456), (0x12, 0x3456));
        assert_eq!(split_address(bank_address(0xAB, 0xCDEF)), (0xAB, 0xCDEF));
    }

    #[test]
    fn word_reads_put_first_byte_high() {
        let mut memory = Memory::with_capacity(0x100);
        memory.write_byte(0x10, 0x12).expect("in range");
        memory.write_byte(0x11, 0x34).expect("in range");

        assert_eq!(memory.read_word(0x10), Ok(0x1234));
        assert_eq!(memory.read_word_banked(0x00, 0x0010), Ok(0x1234));
    }

    #[test]
    fn banked_accessors_compose_full_address() {
        let mut memory = Memory::with_capacity(0x2_0000);
        memory
            .write_byte_banked(0x01, 0x0004, 0x5A)
            .expect("in range");

        assert_eq!(memory.read_byte(0x01_0004), Ok(0x5A));
        assert_eq!(memory.read_byte_banked(0x01, 0x0004), Ok(0x5A));
        assert_eq!(memory.read_byte_banked(0x00, 0x0004), Ok(0x00));
    }

    #[test]
    fn word_read_straddling_capacity_fails() {
        let memory = Memory::with_capacity(0x100);
        assert_eq!(
            memory.read_word(0xFF),
            Err(MemoryError::OutOfRange {
                address: 0x100,
                capacity: 0x100,
            })
        );
    }
}
