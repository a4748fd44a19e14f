//! Architectural CPU state model primitives.

/// Dual-width register cells, register file, and status bit layout.
pub mod registers;

pub use registers::{
    DualRegister, RegisterFile, STATUS_C, STATUS_D, STATUS_FLAGS, STATUS_I, STATUS_M, STATUS_N,
    STATUS_V, STATUS_X, STATUS_Z,
};
