use std::fmt;

use serde::Serialize;

use crate::processor::validate::Diagnostic;

/// Outcome of a timeline operation, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    /// `run` on a script without commands.
    NothingToRun,
    /// The run reached the end of the script.
    Done,
    /// The run halted on a stop request.
    Stopped,
    /// `step_forward` with nothing left.
    AtEnd,
    /// `step_backward` at the first command.
    AtStart,
    Stepped { current: usize, total: usize },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NothingToRun => f.write_str("No commands to run"),
            Status::Done => f.write_str("Done"),
            Status::Stopped => f.write_str("Stopped"),
            Status::AtEnd => f.write_str("End of script"),
            Status::AtStart => f.write_str("Start of script"),
            Status::Stepped { current, total } => write!(f, "Step {current}/{total}"),
        }
    }
}

/// Everything a host may want to observe while a timeline plays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    Loaded {
        commands: usize,
        rejected: usize,
    },
    /// A run began at `cursor`.
    Started { cursor: usize },
    /// Emitted after every executed command and after stepping or restarting.
    Progress {
        current: usize,
        total: usize,
        /// Source line of the next command to execute, `None` at the end.
        source_line: Option<usize>,
    },
    /// A command had no visual effect.
    Skipped {
        index: usize,
        source_line: usize,
        reason: String,
    },
    Warnings { diagnostics: Vec<Diagnostic> },
    Finished(Status),
}
