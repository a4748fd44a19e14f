//! Loads a two-instruction program, runs it to the halt opcode, and prints the trace.

use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use w65c816_core::{
    run, CoreConfig, Memory, MemoryImage, RegisterFile, TraceEvent, TraceSink, STATUS_M,
};

struct PrintSink;

impl TraceSink for PrintSink {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionStart { bank, pc, opcode } => {
                println!("{bank:02X}:{pc:04X}  fetch {opcode:02X}");
            }
            TraceEvent::InstructionRetired { bank, pc, cycles } => {
                println!("{bank:02X}:{pc:04X}  retired in {cycles} cycle(s)");
            }
            TraceEvent::Halted { bank, pc } => println!("{bank:02X}:{pc:04X}  halt"),
            TraceEvent::FaultRaised { cause, bank, pc } => {
                println!("{bank:02X}:{pc:04X}  fault {:#04x}: {cause}", cause.as_u8());
            }
        }
    }
}

fn main() {
    // LDA $10 ; halt
    let image = MemoryImage::new()
        .with_segment(0x00_1100, vec![0xA5, 0x10, 0xEA])
        .with_segment(0x00_0010, vec![0x12, 0x23, 0x45]);

    let config = CoreConfig {
        initial_pc: 0x1100,
        initial_sp: 0xFFF0,
        initial_status: STATUS_M,
        tracing_enabled: true,
        ..CoreConfig::default()
    };

    let mut memory = Memory::new();
    if let Err(err) = memory.load_image(&image) {
        eprintln!("image does not fit: {err}");
        std::process::exit(1);
    }
    let mut regs = RegisterFile::with_config(&config);

    let mut sink = PrintSink;
    let outcome = run(&mut regs, &mut memory, &config, Some(&mut sink));

    println!(
        "status {} after {} step(s), {} cycle(s)",
        outcome.final_step.status_code(),
        outcome.steps,
        outcome.cycles
    );
    println!(
        "A={:04X} X={:04X} Y={:04X} SP={:04X} PC={:04X} P={:08b}",
        regs.a().as_word(),
        regs.x().as_word(),
        regs.y().as_word(),
        regs.sp().as_word(),
        regs.pc(),
        regs.status()
    );
}
