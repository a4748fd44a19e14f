//! Hardware stack in bank zero.
//!
//! A push writes at `SP` then decrements; a pull increments then reads. In
//! emulation mode only the low byte of `SP` moves, so the stack wraps inside
//! its page. Words go high byte first, so the low byte ends up on top.

use crate::fault::MemoryError;
use crate::memory::{bank_address, Address, Bus};
use crate::state::{DualRegister, RegisterFile};

const fn stack_address(sp: DualRegister) -> Address {
    bank_address(0x00, sp.as_word())
}

const fn stepped_stack_pointer(regs: &RegisterFile, up: bool) -> DualRegister {
    let mut sp = regs.sp();
    if regs.emulation() {
        let low = sp.low_byte();
        sp.set_low_byte(if up {
            low.wrapping_add(1)
        } else {
            low.wrapping_sub(1)
        });
    } else {
        let word = sp.as_word();
        sp.set_word(if up {
            word.wrapping_add(1)
        } else {
            word.wrapping_sub(1)
        });
    }
    sp
}

const fn move_stack_pointer(regs: &mut RegisterFile, up: bool) {
    let sp = stepped_stack_pointer(regs, up);
    *regs.sp_mut() = sp;
}

/// Pushes one byte.
///
/// # Errors
///
/// Returns the bus error when the stack slot is not backed; `SP` is unchanged.
pub fn push_byte(regs: &mut RegisterFile, bus: &mut dyn Bus, value: u8) -> Result<(), MemoryError> {
    bus.write_byte(stack_address(regs.sp()), value)?;
    move_stack_pointer(regs, false);
    Ok(())
}

/// Pulls one byte.
///
/// # Errors
///
/// Returns the bus error when the stack slot is not backed; `SP` is unchanged.
pub fn pull_byte(regs: &mut RegisterFile, bus: &dyn Bus) -> Result<u8, MemoryError> {
    let before = regs.sp();
    move_stack_pointer(regs, true);
    match bus.read_byte(stack_address(regs.sp())) {
        Ok(value) => Ok(value),
        Err(err) => {
            *regs.sp_mut() = before;
            Err(err)
        }
    }
}

/// Pushes a word, high byte first.
///
/// Both slots are probed with a read before anything is written. On a bus
/// whose readable and writable ranges coincide, such as [`Memory`](crate::memory::Memory),
/// a failure leaves memory and `SP` unchanged. A bus that rejects writes to
/// readable addresses may keep the high byte when the low-byte write fails.
///
/// # Errors
///
/// Returns the bus error for the first unbacked slot. `SP` is unchanged.
pub fn push_word(regs: &mut RegisterFile, bus: &mut dyn Bus, value: u16) -> Result<(), MemoryError> {
    let [hi, lo] = value.to_be_bytes();
    bus.read_byte(stack_address(regs.sp()))?;
    bus.read_byte(stack_address(stepped_stack_pointer(regs, false)))?;

    push_byte(regs, bus, hi)?;
    push_byte(regs, bus, lo)
}

/// Pulls a word, low byte first.
///
/// # Errors
///
/// Returns the bus error for the first unbacked slot; `SP` is unchanged.
pub fn pull_word(regs: &mut RegisterFile, bus: &dyn Bus) -> Result<u16, MemoryError> {
    let before = regs.sp();
    let lo = pull_byte(regs, bus)?;
    match pull_byte(regs, bus) {
        Ok(hi) => Ok(u16::from_be_bytes([hi, lo])),
        Err(err) => {
            *regs.sp_mut() = before;
            Err(err)
        }
    }
}
