//! Per-opcode execute functions.
//!
//! Each function matches [`ExecuteFn`](crate::table::ExecuteFn) and receives
//! the [`InstructionInfo`] its addressing mode resolved. None of them touch PC.

use super::stack::{pull_byte, pull_word, push_byte, push_word};
use crate::addressing::InstructionInfo;
use crate::fault::MemoryError;
use crate::memory::Bus;
use crate::state::{DualRegister, RegisterFile, STATUS_C, STATUS_M, STATUS_X};

/// `REP`: clears every status bit set in the operand mask.
///
/// # Errors
///
/// Propagates the bus error reading the mask.
pub fn op_rep(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let mask = bus.read_byte(info.effective_address)?;
    regs.set_status(regs.status() & !mask);
    Ok(())
}

/// `SEP`: sets every status bit set in the operand mask.
///
/// # Errors
///
/// Propagates the bus error reading the mask.
pub fn op_sep(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let mask = bus.read_byte(info.effective_address)?;
    regs.set_status(regs.status() | mask);
    Ok(())
}

/// `LDA`: loads the accumulator at its current width.
///
/// An 8-bit load writes only the low byte view. Flags are not affected.
///
/// # Errors
///
/// Propagates the bus error reading the operand.
pub fn op_lda(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    info: &InstructionInfo,
) -> Result<(), MemoryError> {
    if regs.accumulator_is_8bit() {
        let value = bus.read_byte(info.effective_address)?;
        regs.a_mut().set_low_byte(value);
    } else {
        let value = bus.read_word(info.effective_address)?;
        regs.a_mut().set_word(value);
    }
    Ok(())
}

fn push_register(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    register: DualRegister,
    eight_bit: bool,
) -> Result<(), MemoryError> {
    if eight_bit {
        push_byte(regs, bus, register.low_byte())
    } else {
        push_word(regs, bus, register.as_word())
    }
}

fn pull_register(
    regs: &mut RegisterFile,
    bus: &dyn Bus,
    eight_bit: bool,
) -> Result<u16, MemoryError> {
    if eight_bit {
        pull_byte(regs, bus).map(u16::from)
    } else {
        pull_word(regs, bus)
    }
}

/// `PHA`: pushes the accumulator at its current width.
///
/// # Errors
///
/// Propagates the bus error writing the stack.
pub fn op_pha(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.accumulator_is_8bit();
    let register = regs.a();
    push_register(regs, bus, register, eight_bit)
}

/// `PHX`: pushes `X` at the current index width.
///
/// # Errors
///
/// Propagates the bus error writing the stack.
pub fn op_phx(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.index_is_8bit();
    let register = regs.x();
    push_register(regs, bus, register, eight_bit)
}

/// `PHY`: pushes `Y` at the current index width.
///
/// # Errors
///
/// Propagates the bus error writing the stack.
pub fn op_phy(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.index_is_8bit();
    let register = regs.y();
    push_register(regs, bus, register, eight_bit)
}

/// `PLA`: pulls the accumulator at its current width.
///
/// # Errors
///
/// Propagates the bus error reading the stack.
pub fn op_pla(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.accumulator_is_8bit();
    let value = pull_register(regs, bus, eight_bit)?;
    regs.a_mut().set_value(value, eight_bit);
    Ok(())
}

/// `PLX`: pulls `X` at the current index width.
///
/// # Errors
///
/// Propagates the bus error reading the stack.
pub fn op_plx(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.index_is_8bit();
    let value = pull_register(regs, bus, eight_bit)?;
    regs.x_mut().set_value(value, eight_bit);
    Ok(())
}

/// `PLY`: pulls `Y` at the current index width.
///
/// # Errors
///
/// Propagates the bus error reading the stack.
pub fn op_ply(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let eight_bit = regs.index_is_8bit();
    let value = pull_register(regs, bus, eight_bit)?;
    regs.y_mut().set_value(value, eight_bit);
    Ok(())
}

/// `XCE`: exchanges carry with the emulation flag.
///
/// Entering emulation sets `M` and `X`, zeroes the high bytes of `X` and
/// `Y`, and pins the stack to page one.
///
/// # Errors
///
/// Never fails; the signature matches the table.
#[allow(clippy::unnecessary_wraps)]
pub const fn op_xce(
    regs: &mut RegisterFile,
    _bus: &mut dyn Bus,
    _info: &InstructionInfo,
) -> Result<(), MemoryError> {
    let carry = regs.flag_is_set(STATUS_C);
    let emulation = regs.emulation();
    regs.set_flag(STATUS_C, emulation);
    regs.set_emulation(carry);

    if carry {
        regs.set_flag(STATUS_M | STATUS_X, true);
        regs.x_mut().set_high_byte(0x00);
        regs.y_mut().set_high_byte(0x00);
        regs.sp_mut().set_high_byte(0x01);
    }
    Ok(())
}
