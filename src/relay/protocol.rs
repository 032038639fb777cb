use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Record, StepCommand, StepKind};

/// Messages pushed by the debug host. Every snapshot is authoritative and
/// wholesale; the panel never mutates records itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Inbound {
    #[serde(rename_all = "camelCase")]
    Update { records: Vec<Record>, log_index: u64 },
    #[serde(rename_all = "camelCase")]
    ExecLogsUpdated {
        logs: Vec<Record>,
        current_log_index: u64,
        total_length: u64,
    },
    TableUpdated { data: Value },
    ObjectInspected { content: Value },
}

/// Typed UI events from the rendering collaborator, so gesture handling
/// never depends on DOM listener state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Gesture {
    LocationClicked { cursor: u64 },
    StepForward,
    StepBack,
    NextPage,
    PrevPage,
    FilterChanged { text: String },
    #[serde(rename_all = "camelCase")]
    ToggleExpanded { record_index: usize },
    StartRecord,
    StopRecord,
    #[serde(rename_all = "camelCase")]
    Evaluate { expression: String, page_size: usize },
}

/// Commands the panel sends to the debug session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Outbound {
    GoTo { times: u64 },
    GoBackTo { times: u64 },
    #[serde(rename_all = "camelCase")]
    GetExecLogs { offset: u64, page_size: usize },
    SearchExecLogs { keyword: String },
    StartRecord,
    StopRecord,
    #[serde(rename_all = "camelCase")]
    Evaluate { expression: String, page_size: usize },
    ViewLoaded,
}

impl From<StepCommand> for Outbound {
    fn from(cmd: StepCommand) -> Self {
        match cmd.kind {
            StepKind::GoTo => Outbound::GoTo { times: cmd.times },
            StepKind::GoBackTo => Outbound::GoBackTo { times: cmd.times },
        }
    }
}

/// Anything readable off the panel's inbound stream: host pushes or UI
/// gestures, distinguished by their `command` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PanelMessage {
    Host(Inbound),
    Ui(Gesture),
}
