//! Command gateway
//!
//! Every operation that mutates or queries the store is expressed as a
//! [`Command`]: all required state is bound at construction, the effect is
//! applied by a single `execute` call, and failure is signaled through the
//! error taxonomy rather than a sentinel return.
//!
//! Commands wrap non-idempotent inventory mutations, so an instance may run
//! at most once. [`ExecutionGuard`] enforces the transition from
//! *not executed* to *executed*; the second `execute` fails with
//! `ERR_INVALID_COMMAND_STATE`.

mod adjustment;
mod medication;
mod period;

pub use adjustment::{DeleteAdjustment, RecordAdjustment};
pub use medication::{AddMedication, DeleteMedication, UpdateMedicationStatus};
pub use period::{CloseReportingPeriod, OpenReportingPeriod};

use crate::errors::{invalid_command_state, Result};

/// A store-affecting operation with a single entry point
pub trait Command {
    /// Apply this command's effect against the store
    fn execute(&mut self) -> Result<()>;
}

/// Boxed command for heterogeneous sequencing
pub type BoxCommand<'c> = Box<dyn Command + 'c>;

/// Tracks whether a command has already run
///
/// Embedded in every concrete command; `begin` flips the state and fails on
/// the second call.
#[derive(Debug, Default)]
pub struct ExecutionGuard {
    executed: bool,
}

impl ExecutionGuard {
    /// Claim the single execution slot for the named operation
    pub fn begin(&mut self, op: &'static str) -> Result<()> {
        if self.executed {
            return Err(invalid_command_state(op));
        }
        self.executed = true;
        Ok(())
    }

    /// Check if the command has run
    pub fn has_executed(&self) -> bool {
        self.executed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narcotrack_core::TrackerErrorKind;

    /// Command that touches nothing; used to pin the gateway contract
    struct Noop {
        guard: ExecutionGuard,
    }

    impl Command for Noop {
        fn execute(&mut self) -> Result<()> {
            self.guard.begin("noop")
        }
    }

    #[test]
    fn test_fresh_command_executes_once() {
        let mut cmd = Noop {
            guard: ExecutionGuard::default(),
        };
        assert!(cmd.execute().is_ok());
        assert!(cmd.guard.has_executed());
    }

    #[test]
    fn test_second_execute_rejected() {
        let mut cmd = Noop {
            guard: ExecutionGuard::default(),
        };
        cmd.execute().unwrap();

        let err = cmd.execute().unwrap_err();
        assert_eq!(err.kind(), TrackerErrorKind::InvalidCommandState);
        assert_eq!(err.op(), Some("noop"));
    }

    #[test]
    fn test_boxed_commands_sequence_uniformly() {
        let mut queue: Vec<BoxCommand<'_>> = vec![
            Box::new(Noop {
                guard: ExecutionGuard::default(),
            }),
            Box::new(Noop {
                guard: ExecutionGuard::default(),
            }),
        ];

        for cmd in queue.iter_mut() {
            cmd.execute().unwrap();
        }
    }
}
