use thiserror::Error;

use crate::memory::Address;

/// Fault classes used to group step failures for hosts and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Opcode or addressing-mode dispatch failed.
    Decode,
    /// The backing memory rejected an access.
    Memory,
}

/// Stable fault taxonomy surfaced through the step `Error` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// The fetched opcode has no instruction table entry.
    #[error("no instruction registered for fetched opcode")]
    UnknownOpcode = 0x01,
    /// The instruction's addressing mode has no resolver.
    #[error("addressing mode has no resolver")]
    UnknownMode = 0x02,
    /// A fetch, resolve, or execute access fell outside the backing memory.
    #[error("memory access outside backing store")]
    MemoryOutOfRange = 0x03,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::UnknownOpcode),
            0x02 => Some(Self::UnknownMode),
            0x03 => Some(Self::MemoryOutOfRange),
            _ => None,
        }
    }

    /// Returns the fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::UnknownOpcode | Self::UnknownMode => FaultClass::Decode,
            Self::MemoryOutOfRange => FaultClass::Memory,
        }
    }
}

/// Failure reported by a [`Bus`](crate::Bus) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MemoryError {
    /// The address lies past the end of the backing store.
    #[error("address {address:#08x} is outside memory of {capacity} bytes")]
    OutOfRange {
        /// Offending 24-bit address.
        address: Address,
        /// Capacity of the backing store in bytes.
        capacity: usize,
    },
}

impl MemoryError {
    /// Maps a memory failure to the canonical fault code surface.
    #[must_use]
    pub const fn fault_code(self) -> FaultCode {
        match self {
            Self::OutOfRange { .. } => FaultCode::MemoryOutOfRange,
        }
    }
}

impl From<MemoryError> for FaultCode {
    fn from(value: MemoryError) -> Self {
        value.fault_code()
    }
}
