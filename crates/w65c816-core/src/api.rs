//! Public host-facing API contracts for driving the CPU core.

use crate::FaultCode;

/// Stack pointer a default configuration starts with (top of page one).
pub const DEFAULT_STACK_POINTER: u16 = 0x01FF;

/// Status byte reported for [`StepOutcome::Halted`].
pub const STATUS_CODE_HALTED: u8 = 0;
/// Status byte reported for [`StepOutcome::Continue`].
pub const STATUS_CODE_CONTINUE: u8 = 1;
/// Status byte reported for [`StepOutcome::Error`].
pub const STATUS_CODE_ERROR: u8 = 2;

/// Driver-chosen initial state and run-loop policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Initial program counter.
    pub initial_pc: u16,
    /// Initial stack pointer.
    pub initial_sp: u16,
    /// Initial program bank.
    pub program_bank: u8,
    /// Initial data bank.
    pub data_bank: u8,
    /// Initial direct-page register.
    pub direct_page: u16,
    /// Initial packed status byte.
    pub initial_status: u8,
    /// Start in emulation mode.
    pub emulation: bool,
    /// Maximum number of steps one [`run`](crate::run) call executes; `0` is unbounded.
    pub step_limit: u32,
    /// Forward [`TraceEvent`]s to the sink passed to [`run`](crate::run).
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            initial_pc: 0x0000,
            initial_sp: DEFAULT_STACK_POINTER,
            program_bank: 0x00,
            data_bank: 0x00,
            direct_page: 0x0000,
            initial_status: 0x00,
            emulation: false,
            step_limit: 0,
            tracing_enabled: false,
        }
    }
}

/// Status reported by one call to [`step_one`](crate::step_one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// The halt opcode was fetched; nothing changed.
    Halted,
    /// One instruction executed and PC advanced past it.
    Continue {
        /// Cycle cost declared by the executed instruction.
        cycles: u8,
    },
    /// The step failed; PC was not advanced.
    Error {
        /// Reason the step failed.
        cause: FaultCode,
    },
}

impl StepOutcome {
    /// Stable status byte: `0` halted, `1` continue, `2` error.
    #[must_use]
    pub const fn status_code(self) -> u8 {
        match self {
            Self::Halted => STATUS_CODE_HALTED,
            Self::Continue { .. } => STATUS_CODE_CONTINUE,
            Self::Error { .. } => STATUS_CODE_ERROR,
        }
    }

    /// Returns `true` when the caller should keep stepping.
    #[must_use]
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Continue { .. })
    }

    /// Returns the fault carried by an error outcome.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Error { cause } => Some(cause),
            Self::Halted | Self::Continue { .. } => None,
        }
    }
}

/// Aggregated outcome from [`run`](crate::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of steps that reported [`StepOutcome::Continue`].
    pub steps: u32,
    /// Sum of the declared cycle costs of those steps.
    pub cycles: u64,
    /// Last step status observed before returning.
    pub final_step: StepOutcome,
}

/// Trace events emitted at step boundaries when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Opcode fetched at `bank:pc`.
    InstructionStart {
        /// Program bank of the fetch.
        bank: u8,
        /// Program counter of the fetch.
        pc: u16,
        /// Fetched opcode byte.
        opcode: u8,
    },
    /// Instruction at `bank:pc` executed.
    InstructionRetired {
        /// Program bank of the instruction.
        bank: u8,
        /// Program counter of the instruction.
        pc: u16,
        /// Declared cycle cost.
        cycles: u8,
    },
    /// Halt opcode reached at `bank:pc`.
    Halted {
        /// Program bank of the halt opcode.
        bank: u8,
        /// Program counter of the halt opcode.
        pc: u16,
    },
    /// Step failed at `bank:pc`.
    FaultRaised {
        /// Fault reported by the step.
        cause: FaultCode,
        /// Program bank when the fault was observed.
        bank: u8,
        /// Program counter when the fault was observed.
        pc: u16,
    },
}

/// Sink for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CoreConfig, StepOutcome, TraceEvent, TraceSink, DEFAULT_STACK_POINTER,
        STATUS_CODE_CONTINUE, STATUS_CODE_ERROR, STATUS_CODE_HALTED,
    };
    use crate::FaultCode;

    #[test]
    fn default_core_config_starts_native_at_zero() {
        let config = CoreConfig::default();

        assert_eq!(config.initial_pc, 0x0000);
        assert_eq!(config.initial_sp, DEFAULT_STACK_POINTER);
        assert_eq!(config.initial_status, 0);
        assert!(!config.emulation);
        assert_eq!(config.step_limit, 0);
        assert!(!config.tracing_enabled);
    }

    #[test]
    fn status_codes_match_driver_contract() {
        assert_eq!(StepOutcome::Halted.status_code(), STATUS_CODE_HALTED);
        assert_eq!(
            StepOutcome::Continue { cycles: 3 }.status_code(),
            STATUS_CODE_CONTINUE
        );
        assert_eq!(
            StepOutcome::Error {
                cause: FaultCode::UnknownOpcode
            }
            .status_code(),
            STATUS_CODE_ERROR
        );
        assert_eq!((STATUS_CODE_HALTED, STATUS_CODE_CONTINUE, STATUS_CODE_ERROR), (0, 1, 2));
    }

    #[test]
    fn fault_accessor_reports_only_error_variant() {
        assert_eq!(StepOutcome::Halted.fault(), None);
        assert_eq!(StepOutcome::Continue { cycles: 2 }.fault(), None);
        assert_eq!(
            StepOutcome::Error {
                cause: FaultCode::UnknownMode
            }
            .fault(),
            Some(FaultCode::UnknownMode)
        );
        assert!(StepOutcome::Continue { cycles: 2 }.is_continue());
        assert!(!StepOutcome::Halted.is_continue());
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink = Vec::new();
        sink.on_event(TraceEvent::Halted { bank: 0, pc: 1 });
        sink.on_event(TraceEvent::Halted { bank: 0, pc: 2 });
        assert_eq!(
            sink,
            vec![
                TraceEvent::Halted { bank: 0, pc: 1 },
                TraceEvent::Halted { bank: 0, pc: 2 },
            ]
        );
    }
}
