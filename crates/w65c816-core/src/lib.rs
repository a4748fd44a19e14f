//! Single-step 65C816-class CPU core over a flat, bank-addressed memory.

/// Memory access primitives, bounded RAM, and the bulk image loader.
pub mod memory;
pub use memory::{
    bank_address, load_image, split_address, Address, Bus, Memory, MemoryImage, ADDRESS_MASK,
    DEFAULT_MEMORY_BYTES,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, RunOutcome, StepOutcome, TraceEvent, TraceSink, DEFAULT_STACK_POINTER,
    STATUS_CODE_CONTINUE, STATUS_CODE_ERROR, STATUS_CODE_HALTED,
};

/// Architectural register and status file.
pub mod state;
pub use state::{
    DualRegister, RegisterFile, STATUS_C, STATUS_D, STATUS_FLAGS, STATUS_I, STATUS_M, STATUS_N,
    STATUS_V, STATUS_X, STATUS_Z,
};

/// Addressing modes and their resolvers.
pub mod addressing;
pub use addressing::{resolver, AddressingMode, InstructionInfo, ResolveFn};

/// Opcode descriptors and the built-in instruction table.
pub mod table;
pub use table::{
    ExecuteFn, Instruction, InstructionTable, HALT_OPCODE, INSTRUCTION_TABLE, OPCODE_SLOTS,
};

/// Fault taxonomy and memory errors.
pub mod fault;
pub use fault::{FaultClass, FaultCode, MemoryError};

/// Instruction execution engine.
pub mod execute;
pub use execute::{run, run_with_table, step_one, step_with_table};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
