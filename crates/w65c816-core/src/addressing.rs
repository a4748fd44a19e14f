//! Addressing-mode resolution.
//!
//! Every resolver is a pure function over the register file and memory: it
//! reads operand bytes following the opcode at `PBR:PC`, composes the
//! effective address, and never mutates state or advances PC.

use crate::fault::MemoryError;
use crate::memory::{bank_address, Address, Bus, ADDRESS_MASK};
use crate::state::RegisterFile;

/// Closed set of addressing modes an instruction can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressingMode {
    /// `op #imm`: the operand byte itself.
    Immediate,
    /// `op addr`: data bank plus a word operand.
    Absolute,
    /// `op addr,X`.
    AbsoluteX,
    /// `op addr,Y`.
    AbsoluteY,
    /// `op (addr)`: the raw word operand, dereferenced later.
    AbsoluteIndirect,
    /// `op (addr,X)`: pointer in the program bank.
    AbsoluteIndirectX,
    /// `op (addr),Y`. Declared but not resolvable.
    AbsoluteIndirectY,
    /// No operand.
    Accumulator,
    /// `op dp`.
    DirectPage,
    /// `op dp,X`.
    DirectPageX,
    /// `op dp,Y`.
    DirectPageY,
    /// `op (dp,X)`.
    DirectPageIndirectX,
}

impl AddressingMode {
    /// Every mode in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Immediate,
        Self::Absolute,
        Self::AbsoluteX,
        Self::AbsoluteY,
        Self::AbsoluteIndirect,
        Self::AbsoluteIndirectX,
        Self::AbsoluteIndirectY,
        Self::Accumulator,
        Self::DirectPage,
        Self::DirectPageX,
        Self::DirectPageY,
        Self::DirectPageIndirectX,
    ];
}

/// Result of resolving one instruction's addressing mode.
///
/// Produced once per step and handed to the instruction's execute function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InstructionInfo {
    /// Final 24-bit location the instruction reads or writes.
    pub effective_address: Address,
    /// Auxiliary bank-relative address (pointer or direct-page offset).
    pub address: u16,
}

impl InstructionInfo {
    /// Creates an info value from both fields.
    #[must_use]
    pub const fn new(effective_address: Address, address: u16) -> Self {
        Self {
            effective_address,
            address,
        }
    }
}

/// Resolver signature shared by every addressing mode.
pub type ResolveFn = fn(&RegisterFile, &dyn Bus) -> Result<InstructionInfo, MemoryError>;

/// Returns the resolver for `mode`, or `None` when the mode has none.
#[must_use]
pub const fn resolver(mode: AddressingMode) -> Option<ResolveFn> {
    match mode {
        AddressingMode::Immediate => Some(immediate),
        AddressingMode::Absolute => Some(absolute),
        AddressingMode::AbsoluteX => Some(absolute_x),
        AddressingMode::AbsoluteY => Some(absolute_y),
        AddressingMode::AbsoluteIndirect => Some(absolute_indirect),
        AddressingMode::AbsoluteIndirectX => Some(absolute_indirect_x),
        AddressingMode::Accumulator => Some(accumulator),
        AddressingMode::DirectPage => Some(direct_page),
        AddressingMode::DirectPageX => Some(direct_page_x),
        AddressingMode::DirectPageY => Some(direct_page_y),
        AddressingMode::DirectPageIndirectX => Some(direct_page_indirect_x),
        AddressingMode::AbsoluteIndirectY => None,
    }
}

fn operand_byte(regs: &RegisterFile, bus: &dyn Bus) -> Result<u8, MemoryError> {
    bus.read_byte_banked(regs.program_bank(), regs.pc().wrapping_add(1))
}

fn operand_word(regs: &RegisterFile, bus: &dyn Bus) -> Result<u16, MemoryError> {
    bus.read_word_banked(regs.program_bank(), regs.pc().wrapping_add(1))
}

#[allow(clippy::unnecessary_wraps)]
const fn immediate(regs: &RegisterFile, _bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    let operand = regs.pc().wrapping_add(1);
    Ok(InstructionInfo::new(
        bank_address(regs.program_bank(), operand),
        operand,
    ))
}

fn absolute(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    let operand = operand_word(regs, bus)?;
    Ok(InstructionInfo::new(
        bank_address(regs.data_bank(), operand),
        operand,
    ))
}

fn absolute_indexed(
    regs: &RegisterFile,
    bus: &dyn Bus,
    index: u16,
) -> Result<InstructionInfo, MemoryError> {
    let operand = operand_word(regs, bus)?;
    let base = bank_address(regs.data_bank(), operand);
    Ok(InstructionInfo::new(
        base.wrapping_add(Address::from(index)) & ADDRESS_MASK,
        operand,
    ))
}

fn absolute_x(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    absolute_indexed(regs, bus, regs.index_x())
}

fn absolute_y(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    absolute_indexed(regs, bus, regs.index_y())
}

fn absolute_indirect(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    let operand = operand_word(regs, bus)?;
    Ok(InstructionInfo::new(Address::from(operand), operand))
}

fn absolute_indirect_x(
    regs: &RegisterFile,
    bus: &dyn Bus,
) -> Result<InstructionInfo, MemoryError> {
    let pointer = operand_word(regs, bus)?.wrapping_add(regs.index_x());
    let target = bus.read_word_banked(regs.program_bank(), pointer)?;
    Ok(InstructionInfo::new(
        bank_address(regs.program_bank(), target),
        pointer,
    ))
}

#[allow(clippy::unnecessary_wraps)]
const fn accumulator(
    _regs: &RegisterFile,
    _bus: &dyn Bus,
) -> Result<InstructionInfo, MemoryError> {
    Ok(InstructionInfo::new(0, 0))
}

fn direct_page_indexed(
    regs: &RegisterFile,
    bus: &dyn Bus,
    index: u16,
) -> Result<InstructionInfo, MemoryError> {
    let offset = operand_byte(regs, bus)?;
    let addr = regs
        .d()
        .as_word()
        .wrapping_add(u16::from(offset))
        .wrapping_add(index);
    Ok(InstructionInfo::new(Address::from(addr), addr))
}

fn direct_page(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    direct_page_indexed(regs, bus, 0)
}

// Index width is selected before the sum is formed.
fn direct_page_x(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    direct_page_indexed(regs, bus, regs.index_x())
}

fn direct_page_y(regs: &RegisterFile, bus: &dyn Bus) -> Result<InstructionInfo, MemoryError> {
    direct_page_indexed(regs, bus, regs.index_y())
}

fn direct_page_indirect_x(
    regs: &RegisterFile,
    bus: &dyn Bus,
) -> Result<InstructionInfo, MemoryError> {
    let offset = operand_byte(regs, bus)?;
    let pointer = u16::from(offset)
        .wrapping_add(regs.x().as_word())
        .wrapping_add(regs.d().as_word());
    let target = bus.read_word_banked(0x00, pointer)?;
    Ok(InstructionInfo::new(Address::from(target), target))
}
