use crate::memory::{bank_address, Address};
use crate::CoreConfig;

/// Status bit `N` (negative). Bit order is internal: `N` lowest, `C` highest.
pub const STATUS_N: u8 = 1 << 0;
/// Status bit `V` (overflow).
pub const STATUS_V: u8 = 1 << 1;
/// Status bit `M`: accumulator is 8-bit when set.
pub const STATUS_M: u8 = 1 << 2;
/// Status bit `X`: index registers are 8-bit when set.
pub const STATUS_X: u8 = 1 << 3;
/// Status bit `D` (decimal).
pub const STATUS_D: u8 = 1 << 4;
/// Status bit `I` (interrupt disable).
pub const STATUS_I: u8 = 1 << 5;
/// Status bit `Z` (zero).
pub const STATUS_Z: u8 = 1 << 6;
/// Status bit `C` (carry).
pub const STATUS_C: u8 = 1 << 7;

/// Every status bit in declaration order `N V M X D I Z C`.
pub const STATUS_FLAGS: [u8; 8] = [
    STATUS_N, STATUS_V, STATUS_M, STATUS_X, STATUS_D, STATUS_I, STATUS_Z, STATUS_C,
];

/// A 16-bit register cell with an 8-bit low-byte view.
///
/// Both views read the same storage, so writing one keeps the other
/// consistent. Byte extraction is arithmetic and independent of host order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DualRegister(u16);

#[allow(clippy::cast_possible_truncation)]
impl DualRegister {
    /// Creates a register holding `word`.
    #[must_use]
    pub const fn new(word: u16) -> Self {
        Self(word)
    }

    /// Low byte view.
    #[must_use]
    pub const fn low_byte(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// High byte of the word view.
    #[must_use]
    pub const fn high_byte(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Full word view.
    #[must_use]
    pub const fn as_word(self) -> u16 {
        self.0
    }

    /// Writes the low byte, leaving the high byte untouched.
    pub const fn set_low_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0xFF00) | value as u16;
    }

    /// Writes the high byte, leaving the low byte untouched.
    pub const fn set_high_byte(&mut self, value: u8) {
        self.0 = (self.0 & 0x00FF) | ((value as u16) << 8);
    }

    /// Writes the full word.
    pub const fn set_word(&mut self, value: u16) {
        self.0 = value;
    }

    /// Reads the width-selected view, zero-extended when `eight_bit`.
    #[must_use]
    pub const fn value(self, eight_bit: bool) -> u16 {
        if eight_bit {
            self.low_byte() as u16
        } else {
            self.0
        }
    }

    /// Writes the width-selected view; an 8-bit write keeps the high byte.
    pub const fn set_value(&mut self, value: u16, eight_bit: bool) {
        if eight_bit {
            self.set_low_byte(value as u8);
        } else {
            self.0 = value;
        }
    }
}

impl From<u16> for DualRegister {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Architectural register file of the CPU.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    a: DualRegister,
    x: DualRegister,
    y: DualRegister,
    sp: DualRegister,
    d: DualRegister,
    pc: u16,
    dbr: u8,
    pbr: u8,
    status: u8,
    emulation: bool,
    break_flag: bool,
}

impl RegisterFile {
    /// Builds the initial register file a driver requested.
    #[must_use]
    pub const fn with_config(config: &CoreConfig) -> Self {
        Self {
            a: DualRegister::new(0),
            x: DualRegister::new(0),
            y: DualRegister::new(0),
            sp: DualRegister::new(config.initial_sp),
            d: DualRegister::new(config.direct_page),
            pc: config.initial_pc,
            dbr: config.data_bank,
            pbr: config.program_bank,
            status: config.initial_status,
            emulation: config.emulation,
            break_flag: false,
        }
    }

    /// Accumulator (`A`/`C`).
    #[must_use]
    pub const fn a(&self) -> DualRegister {
        self.a
    }

    /// Mutable accumulator.
    pub const fn a_mut(&mut self) -> &mut DualRegister {
        &mut self.a
    }

    /// Index register `X`.
    #[must_use]
    pub const fn x(&self) -> DualRegister {
        self.x
    }

    /// Mutable index register `X`.
    pub const fn x_mut(&mut self) -> &mut DualRegister {
        &mut self.x
    }

    /// Index register `Y`.
    #[must_use]
    pub const fn y(&self) -> DualRegister {
        self.y
    }

    /// Mutable index register `Y`.
    pub const fn y_mut(&mut self) -> &mut DualRegister {
        &mut self.y
    }

    /// Stack pointer.
    #[must_use]
    pub const fn sp(&self) -> DualRegister {
        self.sp
    }

    /// Mutable stack pointer.
    pub const fn sp_mut(&mut self) -> &mut DualRegister {
        &mut self.sp
    }

    /// Direct-page register.
    #[must_use]
    pub const fn d(&self) -> DualRegister {
        self.d
    }

    /// Mutable direct-page register.
    pub const fn d_mut(&mut self) -> &mut DualRegister {
        &mut self.d
    }

    /// Program counter (offset within the program bank).
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Data bank register (`DBR`).
    #[must_use]
    pub const fn data_bank(&self) -> u8 {
        self.dbr
    }

    /// Writes the data bank register.
    pub const fn set_data_bank(&mut self, value: u8) {
        self.dbr = value;
    }

    /// Program bank register (`PBR`/`K`).
    #[must_use]
    pub const fn program_bank(&self) -> u8 {
        self.pbr
    }

    /// Writes the program bank register.
    pub const fn set_program_bank(&mut self, value: u8) {
        self.pbr = value;
    }

    /// 24-bit address of the current instruction.
    #[must_use]
    pub const fn pc_address(&self) -> Address {
        bank_address(self.pbr, self.pc)
    }

    /// Packed status byte.
    #[must_use]
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Writes the packed status byte.
    pub const fn set_status(&mut self, value: u8) {
        self.status = value;
    }

    /// Returns `true` when every bit of `flag` is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: u8) -> bool {
        (self.status & flag) == flag
    }

    /// Sets or clears the bits in `flag`.
    pub const fn set_flag(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.status |= flag;
        } else {
            self.status &= !flag;
        }
    }

    /// Emulation-mode flag (`E`).
    #[must_use]
    pub const fn emulation(&self) -> bool {
        self.emulation
    }

    /// Writes the emulation-mode flag without touching other state.
    pub const fn set_emulation(&mut self, enabled: bool) {
        self.emulation = enabled;
    }

    /// Break flag.
    #[must_use]
    pub const fn break_flag(&self) -> bool {
        self.break_flag
    }

    /// Writes the break flag.
    pub const fn set_break_flag(&mut self, enabled: bool) {
        self.break_flag = enabled;
    }

    /// Accumulator operations are 8-bit in emulation mode or with `M` set.
    #[must_use]
    pub const fn accumulator_is_8bit(&self) -> bool {
        self.emulation || self.flag_is_set(STATUS_M)
    }

    /// Index operations are 8-bit in emulation mode or with `X` set.
    #[must_use]
    pub const fn index_is_8bit(&self) -> bool {
        self.emulation || self.flag_is_set(STATUS_X)
    }

    /// `X` at the current index width.
    #[must_use]
    pub const fn index_x(&self) -> u16 {
        self.x.value(self.index_is_8bit())
    }

    /// `Y` at the current index width.
    #[must_use]
    pub const fn index_y(&self) -> u16 {
        self.y.value(self.index_is_8bit())
    }
}
