#![no_main]

use libfuzzer_sys::fuzz_target;
use w65c816_core::{run, CoreConfig, Memory, MemoryImage, RegisterFile, StepOutcome};

const FUZZ_MEMORY_BYTES: usize = 0x2_0000;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let config = CoreConfig {
        initial_pc: u16::from_be_bytes([data[0], data[1]]),
        initial_sp: u16::from_be_bytes([data[2], data[3]]),
        direct_page: u16::from_be_bytes([data[4], data[5]]),
        initial_status: data[6],
        emulation: data[7] & 1 == 1,
        program_bank: data[7] >> 7,
        data_bank: (data[7] >> 6) & 1,
        step_limit: 64,
        ..CoreConfig::default()
    };

    let mut memory = Memory::with_capacity(FUZZ_MEMORY_BYTES);
    let image = MemoryImage::new().with_segment(u32::from(config.initial_pc), data[8..].to_vec());
    if memory.load_image(&image).is_err() {
        return;
    }

    let mut regs = RegisterFile::with_config(&config);
    let before = regs.clone();
    let outcome = run(&mut regs, &mut memory, &config, None);

    assert!(outcome.steps <= config.step_limit);
    if outcome.steps == 0 && !matches!(outcome.final_step, StepOutcome::Continue { .. }) {
        assert_eq!(regs, before);
    }
});
