//! Opcode to instruction descriptor table.

use core::fmt;

use crate::addressing::{AddressingMode, InstructionInfo};
use crate::execute::ops;
use crate::fault::MemoryError;
use crate::memory::Bus;
use crate::state::RegisterFile;

/// Opcode that halts the engine. It is handled before table lookup.
pub const HALT_OPCODE: u8 = 0xEA;

/// Number of opcode slots.
pub const OPCODE_SLOTS: usize = 256;

/// Execute signature shared by every instruction.
pub type ExecuteFn =
    fn(&mut RegisterFile, &mut dyn Bus, &InstructionInfo) -> Result<(), MemoryError>;

/// Immutable descriptor for one opcode.
#[derive(Clone, Copy)]
pub struct Instruction {
    /// Assembler mnemonic.
    pub mnemonic: &'static str,
    /// Addressing mode resolved before execution.
    pub mode: AddressingMode,
    /// Encoded length in bytes, opcode included. PC advances by this much.
    pub size: u8,
    /// Declared cycle cost.
    pub cycles: u8,
    /// Semantics applied to the register file and memory.
    pub execute: ExecuteFn,
}

impl Instruction {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(
        mnemonic: &'static str,
        mode: AddressingMode,
        size: u8,
        cycles: u8,
        execute: ExecuteFn,
    ) -> Self {
        Self {
            mnemonic,
            mode,
            size,
            cycles,
            execute,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("mnemonic", &self.mnemonic)
            .field("mode", &self.mode)
            .field("size", &self.size)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

/// Fixed 256-slot opcode table. Empty slots decode as unknown opcodes.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    entries: [Option<Instruction>; OPCODE_SLOTS],
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl InstructionTable {
    /// Creates a table with every slot empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: [None; OPCODE_SLOTS],
        }
    }

    /// Returns the table with `opcode` bound to `instruction`, replacing any
    /// existing entry.
    #[must_use]
    pub const fn with(mut self, opcode: u8, instruction: Instruction) -> Self {
        self.entries[opcode as usize] = Some(instruction);
        self
    }

    /// The built-in instruction catalogue.
    #[must_use]
    pub const fn standard() -> Self {
        use AddressingMode::{
            Absolute, AbsoluteX, AbsoluteY, Accumulator, DirectPage, DirectPageIndirectX,
            DirectPageX, Immediate,
        };

        Self::empty()
            .with(0xC2, Instruction::new("REP", Immediate, 2, 3, ops::op_rep))
            .with(0xE2, Instruction::new("SEP", Immediate, 2, 3, ops::op_sep))
            .with(0xA1, Instruction::new("LDA", DirectPageIndirectX, 2, 7, ops::op_lda))
            .with(0xA5, Instruction::new("LDA", DirectPage, 2, 4, ops::op_lda))
            .with(0xB5, Instruction::new("LDA", DirectPageX, 2, 5, ops::op_lda))
            .with(0xAD, Instruction::new("LDA", Absolute, 3, 5, ops::op_lda))
            .with(0xBD, Instruction::new("LDA", AbsoluteX, 3, 5, ops::op_lda))
            .with(0xB9, Instruction::new("LDA", AbsoluteY, 3, 5, ops::op_lda))
            .with(0x48, Instruction::new("PHA", Accumulator, 1, 4, ops::op_pha))
            .with(0x68, Instruction::new("PLA", Accumulator, 1, 5, ops::op_pla))
            .with(0xDA, Instruction::new("PHX", Accumulator, 1, 4, ops::op_phx))
            .with(0x5A, Instruction::new("PHY", Accumulator, 1, 4, ops::op_phy))
            .with(0xFA, Instruction::new("PLX", Accumulator, 1, 5, ops::op_plx))
            .with(0x7A, Instruction::new("PLY", Accumulator, 1, 5, ops::op_ply))
            .with(0xFB, Instruction::new("XCE", Accumulator, 1, 2, ops::op_xce))
    }

    /// Looks up the descriptor bound to `opcode`.
    #[must_use]
    pub const fn lookup(&self, opcode: u8) -> Option<&Instruction> {
        self.entries[opcode as usize].as_ref()
    }

    /// Iterates `(opcode, descriptor)` pairs for every bound slot.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Instruction)> + '_ {
        (0..=u8::MAX).filter_map(|opcode| self.lookup(opcode).map(|entry| (opcode, entry)))
    }

    /// Number of bound opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns `true` when no opcode is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide built-in table used by [`step_one`](crate::step_one).
pub static INSTRUCTION_TABLE: InstructionTable = InstructionTable::standard();

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Instruction, InstructionTable, HALT_OPCODE, INSTRUCTION_TABLE};
    use crate::addressing::{resolver, AddressingMode};
    use crate::execute::ops;

    #[test]
    fn standard_catalogue_matches_declared_shape() {
        let expected = [
            (0xC2, "REP", AddressingMode::Immediate, 2, 3),
            (0xE2, "SEP", AddressingMode::Immediate, 2, 3),
            (0xA1, "LDA", AddressingMode::DirectPageIndirectX, 2, 7),
            (0xA5, "LDA", AddressingMode::DirectPage, 2, 4),
            (0xB5, "LDA", AddressingMode::DirectPageX, 2, 5),
            (0xAD, "LDA", AddressingMode::Absolute, 3, 5),
            (0xBD, "LDA", AddressingMode::AbsoluteX, 3, 5),
            (0xB9, "LDA", AddressingMode::AbsoluteY, 3, 5),
            (0x48, "PHA", AddressingMode::Accumulator, 1, 4),
            (0x68, "PLA", AddressingMode::Accumulator, 1, 5),
            (0xDA, "PHX", AddressingMode::Accumulator, 1, 4),
            (0x5A, "PHY", AddressingMode::Accumulator, 1, 4),
            (0xFA, "PLX", AddressingMode::Accumulator, 1, 5),
            (0x7A, "PLY", AddressingMode::Accumulator, 1, 5),
            (0xFB, "XCE", AddressingMode::Accumulator, 1, 2),
        ];

        assert_eq!(INSTRUCTION_TABLE.len(), expected.len());
        for (opcode, mnemonic, mode, size, cycles) in expected {
            let entry = INSTRUCTION_TABLE
                .lookup(opcode)
                .unwrap_or_else(|| panic!("opcode {opcode:#04x} is bound"));
            assert_eq!(entry.mnemonic, mnemonic);
            assert_eq!(entry.mode, mode);
            assert_eq!(entry.size, size);
            assert_eq!(entry.cycles, cycles);
        }
    }

    #[test]
    fn halt_opcode_is_not_in_table() {
        assert!(INSTRUCTION_TABLE.lookup(HALT_OPCODE).is_none());
    }

    #[test]
    fn every_standard_mode_is_resolvable() {
        for (opcode, entry) in INSTRUCTION_TABLE.iter() {
            assert!(resolver(entry.mode).is_some(), "opcode {opcode:#04x}");
        }
    }

    #[test]
    fn iteration_yields_unique_ascending_opcodes() {
        let opcodes: Vec<u8> = INSTRUCTION_TABLE.iter().map(|(opcode, _)| opcode).collect();
        let unique: HashSet<u8> = opcodes.iter().copied().collect();
        assert_eq!(unique.len(), opcodes.len());
        assert!(opcodes.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn with_registers_and_replaces_entries() {
        let table = InstructionTable::empty();
        assert!(table.is_empty());

        let table = table
            .with(0x02, Instruction::new("LDA", AddressingMode::Absolute, 3, 5, ops::op_lda))
            .with(0x02, Instruction::new("SEP", AddressingMode::Immediate, 2, 3, ops::op_sep));
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(0x02).map(|entry| entry.mnemonic), Some("SEP"));
    }

    #[test]
    fn debug_output_names_descriptor_fields() {
        let entry = INSTRUCTION_TABLE.lookup(0xA5).expect("LDA dp is bound");
        let rendered = format!("{entry:?}");
        assert!(rendered.contains("\"LDA\""));
        assert!(rendered.contains("DirectPage"));
    }
}
