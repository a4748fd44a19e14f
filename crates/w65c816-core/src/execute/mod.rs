//! Single-step execution engine.
//!
//! One call runs exactly one instruction:
//! 1. Fetch the opcode at `PBR:PC`
//! 2. Stop with `Halted` on the halt opcode
//! 3. Look up the instruction descriptor
//! 4. Look up the resolver for its addressing mode
//! 5. Resolve operands
//! 6. Execute
//! 7. Advance PC by the declared size
//!
//! Any failure reports `Error` with PC and registers as they were before the step.

/// Per-opcode execute functions.
pub mod ops;
/// Bank-zero stack push/pull primitives.
pub mod stack;

use crate::addressing::resolver;
use crate::api::{RunOutcome, StepOutcome, TraceEvent, TraceSink};
use crate::fault::FaultCode;
use crate::memory::Bus;
use crate::state::RegisterFile;
use crate::table::{InstructionTable, HALT_OPCODE, INSTRUCTION_TABLE};
use crate::CoreConfig;

/// Executes one instruction from the built-in table.
pub fn step_one(regs: &mut RegisterFile, bus: &mut dyn Bus) -> StepOutcome {
    step_with_table(&INSTRUCTION_TABLE, regs, bus)
}

/// Executes one instruction using `table` for opcode lookup.
pub fn step_with_table(
    table: &InstructionTable,
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
) -> StepOutcome {
    step_traced(table, regs, bus, None)
}

/// Steps with the built-in table until halt, error, or the configured step limit.
pub fn run(
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    config: &CoreConfig,
    trace: Option<&mut dyn TraceSink>,
) -> RunOutcome {
    run_with_table(&INSTRUCTION_TABLE, regs, bus, config, trace)
}

/// [`run`] against a caller-supplied table.
pub fn run_with_table(
    table: &InstructionTable,
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    config: &CoreConfig,
    trace: Option<&mut dyn TraceSink>,
) -> RunOutcome {
    let mut trace = trace.filter(|_| config.tracing_enabled);
    let mut outcome = RunOutcome {
        steps: 0,
        cycles: 0,
        final_step: StepOutcome::Continue { cycles: 0 },
    };

    log::debug!(
        "run start at {:02x}:{:04x} (step limit {})",
        regs.program_bank(),
        regs.pc(),
        config.step_limit
    );

    while config.step_limit == 0 || outcome.steps < config.step_limit {
        let step = step_traced(table, regs, bus, trace.as_deref_mut());
        outcome.final_step = step;
        match step {
            StepOutcome::Continue { cycles } => {
                outcome.steps = outcome.steps.saturating_add(1);
                outcome.cycles = outcome.cycles.saturating_add(u64::from(cycles));
            }
            StepOutcome::Halted | StepOutcome::Error { .. } => break,
        }
    }

    log::debug!(
        "run stopped after {} step(s), {} cycle(s): {:?}",
        outcome.steps,
        outcome.cycles,
        outcome.final_step
    );
    outcome
}

fn emit(trace: &mut Option<&mut (dyn TraceSink + '_)>, event: TraceEvent) {
    if let Some(sink) = trace {
        sink.on_event(event);
    }
}

fn step_traced(
    table: &InstructionTable,
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    mut trace: Option<&mut (dyn TraceSink + '_)>,
) -> StepOutcome {
    let (bank, pc) = (regs.program_bank(), regs.pc());
    match try_step(table, regs, bus, &mut trace) {
        Ok(outcome) => outcome,
        Err(cause) => {
            log::warn!("step at {bank:02x}:{pc:04x} failed: {cause}");
            emit(&mut trace, TraceEvent::FaultRaised { cause, bank, pc });
            StepOutcome::Error { cause }
        }
    }
}

fn try_step(
    table: &InstructionTable,
    regs: &mut RegisterFile,
    bus: &mut dyn Bus,
    trace: &mut Option<&mut (dyn TraceSink + '_)>,
) -> Result<StepOutcome, FaultCode> {
    let (bank, pc) = (regs.program_bank(), regs.pc());
    let opcode = bus.read_byte(regs.pc_address())?;
    emit(trace, TraceEvent::InstructionStart { bank, pc, opcode });

    if opcode == HALT_OPCODE {
        log::debug!("halt opcode at {bank:02x}:{pc:04x}");
        emit(trace, TraceEvent::Halted { bank, pc });
        return Ok(StepOutcome::Halted);
    }

    let instruction = table.lookup(opcode).ok_or(FaultCode::UnknownOpcode)?;
    let resolve = resolver(instruction.mode).ok_or(FaultCode::UnknownMode)?;
    let info = resolve(regs, bus)?;

    let saved = regs.clone();
    if let Err(err) = (instruction.execute)(regs, bus, &info) {
        *regs = saved;
        return Err(err.into());
    }
    regs.set_pc(pc.wrapping_add(u16::from(instruction.size)));

    log::trace!(
        "{bank:02x}:{pc:04x} {opcode:02x} {} ea={:06x}",
        instruction.mnemonic,
        info.effective_address
    );
    emit(
        trace,
        TraceEvent::InstructionRetired {
            bank,
            pc,
            cycles: instruction.cycles,
        },
    );
    Ok(StepOutcome::Continue {
        cycles: instruction.cycles,
    })
}
