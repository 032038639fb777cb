mod cursor;
mod record;

pub use cursor::{to_command, StepCommand, StepKind};
pub use record::{min_depth, Location, Record, RecordArg};
