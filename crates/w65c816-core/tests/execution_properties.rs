//! Property checks for flag algebra, width selection, stack discipline, and PC advance.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation
)]

use log as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use w65c816_core::execute::stack::{pull_word, push_word};
use w65c816_core::{
    bank_address, resolver, step_one, Address, AddressingMode, Bus, CoreConfig, FaultCode, Memory,
    MemoryImage, RegisterFile, StepOutcome, INSTRUCTION_TABLE, STATUS_M, STATUS_X,
};

fn boot(pc: u16, program: Vec<u8>) -> (RegisterFile, Memory) {
    let mut memory = Memory::new();
    memory
        .load_image(&MemoryImage::new().with_segment(Address::from(pc), program))
        .expect("program fits");
    let regs = RegisterFile::with_config(&CoreConfig {
        initial_pc: pc,
        ..CoreConfig::default()
    });
    (regs, memory)
}

proptest! {
    #[test]
    fn rep_clears_exactly_the_masked_bits(status in any::<u8>(), mask in any::<u8>()) {
        let (mut regs, mut memory) = boot(0x1000, vec![0xC2, mask]);
        regs.set_status(status);

        prop_assert!(step_one(&mut regs, &mut memory).is_continue());
        prop_assert_eq!(regs.status(), status & !mask);
    }

    #[test]
    fn sep_sets_exactly_the_masked_bits(status in any::<u8>(), mask in any::<u8>()) {
        let (mut regs, mut memory) = boot(0x1000, vec![0xE2, mask]);
        regs.set_status(status);

        prop_assert!(step_one(&mut regs, &mut memory).is_continue());
        prop_assert_eq!(regs.status(), status | mask);
    }

    #[test]
    fn word_push_pull_round_trips(
        value in any::<u16>(),
        sp in 0x0002u16..=0xFFFF,
        emulation in any::<bool>(),
    ) {
        let mut memory = Memory::new();
        let mut regs = RegisterFile::default();
        regs.sp_mut().set_word(sp);
        regs.set_emulation(emulation);
        let before = regs.sp();

        push_word(&mut regs, &mut memory, value).expect("bank zero is backed");
        prop_assert_eq!(pull_word(&mut regs, &memory), Ok(value));
        prop_assert_eq!(regs.sp(), before);
    }

    #[test]
    fn table_opcodes_advance_pc_by_declared_size(
        index in 0usize..INSTRUCTION_TABLE.len(),
        operand in any::<[u8; 2]>(),
        status in any::<u8>(),
        pc in 0x0200u16..0xF000,
    ) {
        let (opcode, entry) = INSTRUCTION_TABLE.iter().nth(index).expect("index is in range");
        let (mut regs, mut memory) = boot(pc, vec![opcode, operand[0], operand[1]]);
        regs.set_status(status);
        regs.sp_mut().set_word(0x01FF);

        let outcome = step_one(&mut regs, &mut memory);

        prop_assert_eq!(outcome, StepOutcome::Continue { cycles: entry.cycles });
        prop_assert_eq!(regs.pc(), pc.wrapping_add(u16::from(entry.size)));
    }

    #[test]
    fn unbound_opcodes_never_move_pc(opcode in any::<u8>(), pc in 0x0200u16..0xF000) {
        prop_assume!(opcode != 0xEA && INSTRUCTION_TABLE.lookup(opcode).is_none());
        let (mut regs, mut memory) = boot(pc, vec![opcode, 0x00, 0x00]);

        prop_assert_eq!(
            step_one(&mut regs, &mut memory),
            StepOutcome::Error { cause: FaultCode::UnknownOpcode }
        );
        prop_assert_eq!(regs.pc(), pc);
    }

    #[test]
    fn lda_width_follows_m_flag(
        hi in any::<u8>(),
        lo in any::<u8>(),
        initial in any::<u16>(),
        eight_bit in any::<bool>(),
    ) {
        let (mut regs, mut memory) = boot(0x1000, vec![0xAD, 0x20, 0x00]);
        memory.write_byte(0x2000, hi).expect("in range");
        memory.write_byte(0x2001, lo).expect("in range");
        regs.a_mut().set_word(initial);
        regs.set_flag(STATUS_M, eight_bit);

        prop_assert!(step_one(&mut regs, &mut memory).is_continue());
        let expected = if eight_bit {
            (initial & 0xFF00) | u16::from(hi)
        } else {
            (u16::from(hi) << 8) | u16::from(lo)
        };
        prop_assert_eq!(regs.a().as_word(), expected);
    }

    #[test]
    fn absolute_ignores_index_flags(
        bank in any::<u8>(),
        operand in any::<u16>(),
        status in any::<u8>(),
    ) {
        let [hi, lo] = operand.to_be_bytes();
        let (mut regs, memory) = boot(0x1000, vec![0xAD, hi, lo]);
        regs.set_data_bank(bank);
        regs.set_status(status);
        let resolve = resolver(AddressingMode::Absolute).expect("resolvable");

        let info = resolve(&regs, &memory).expect("operand in range");
        prop_assert_eq!(info.effective_address, bank_address(bank, operand));
    }

    #[test]
    fn indexed_absolute_uses_width_selected_index(
        operand in any::<u16>(),
        x in any::<u16>(),
        y in any::<u16>(),
        eight_bit in any::<bool>(),
    ) {
        let [hi, lo] = operand.to_be_bytes();
        let (mut regs, memory) = boot(0x1000, vec![0xBD, hi, lo]);
        regs.x_mut().set_word(x);
        regs.y_mut().set_word(y);
        regs.set_flag(STATUS_X, eight_bit);
        let mask = if eight_bit { 0x00FF } else { 0xFFFF };

        let resolve_x = resolver(AddressingMode::AbsoluteX).expect("resolvable");
        let resolve_y = resolver(AddressingMode::AbsoluteY).expect("resolvable");
        prop_assert_eq!(
            resolve_x(&regs, &memory).expect("in range").effective_address,
            Address::from(operand) + Address::from(x & mask)
        );
        prop_assert_eq!(
            resolve_y(&regs, &memory).expect("in range").effective_address,
            Address::from(operand) + Address::from(y & mask)
        );
    }

    #[test]
    fn direct_page_wraps_modulo_bank(d in any::<u16>(), offset in any::<u8>()) {
        let (mut regs, memory) = boot(0x1000, vec![0xA5, offset]);
        regs.d_mut().set_word(d);
        let resolve = resolver(AddressingMode::DirectPage).expect("resolvable");

        let info = resolve(&regs, &memory).expect("in range");
        let expected = d.wrapping_add(u16::from(offset));
        prop_assert_eq!(info.effective_address, Address::from(expected));
        prop_assert_eq!(info.address, expected);
    }
}
