use serde::{Deserialize, Serialize};

/// Direction of a relative step command sent to the debug session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    GoTo,
    GoBackTo,
}

/// A relative navigation command: move `times` steps in `kind`'s direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCommand {
    pub kind: StepKind,
    pub times: u64,
}

impl StepCommand {
    /// `GoTo` with zero times means "already there". Callers skip sending it.
    pub fn is_noop(&self) -> bool {
        self.times == 0
    }
}

/// Convert an absolute target cursor into a step command relative to the
/// reference cursor (the live stopped position).
///
/// Moving to an earlier point yields `GoBackTo`, anything else `GoTo` with
/// the absolute distance. Pure over integers, no error conditions.
pub fn to_command(target: u64, reference: u64) -> StepCommand {
    if reference > target {
        StepCommand {
            kind: StepKind::GoBackTo,
            times: reference - target,
        }
    } else {
        StepCommand {
            kind: StepKind::GoTo,
            times: target - reference,
        }
    }
}
