use std::io::{BufRead, Write};
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::error::InspectorError;
use crate::panel::{PanelConfig, PanelController, PanelView};
use crate::relay::protocol::{Gesture, Inbound, Outbound, PanelMessage};

/// Framed JSON transport to the host: `Content-Length: N\r\n\r\n{json}`.
///
/// Reader and writer are injected so tests can drive the relay off
/// in-memory buffers.
pub struct MessageRelay<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> MessageRelay<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read one framed payload. `Ok(None)` means the stream closed cleanly.
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, InspectorError> {
        let mut content_length: Option<usize> = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("Content-Length:") {
                let parsed = value.trim().parse().map_err(|_| {
                    InspectorError::Frame(format!("bad Content-Length value: {:?}", value.trim()))
                })?;
                content_length = Some(parsed);
            }
        }

        let length =
            content_length.ok_or_else(|| InspectorError::Frame("missing Content-Length".into()))?;
        let mut payload = vec![0u8; length];
        self.reader.read_exact(&mut payload)?;
        Ok(Some(payload))
    }

    pub fn read_message(&mut self) -> Result<Option<PanelMessage>, InspectorError> {
        match self.read_frame()? {
            None => Ok(None),
            Some(payload) => Ok(Some(serde_json::from_slice(&payload)?)),
        }
    }

    pub fn send(&mut self, msg: &impl Serialize) -> Result<(), InspectorError> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// What one handled message produced: commands for the host and, when panel
/// state changed, a fresh view for the rendering collaborator.
#[derive(Debug, Default)]
pub struct Reaction {
    pub outbound: Vec<Outbound>,
    pub view: Option<PanelView>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn send(msg: Outbound) -> Self {
        Self {
            outbound: vec![msg],
            view: None,
        }
    }

    fn render(view: PanelView) -> Self {
        Self {
            outbound: Vec::new(),
            view: Some(view),
        }
    }

    fn send_and_render(msg: Option<Outbound>, view: PanelView) -> Self {
        Self {
            outbound: msg.into_iter().collect(),
            view: Some(view),
        }
    }
}

/// Dispatches host pushes and UI gestures onto the panel controller.
/// Transport-free so the whole message contract is testable in memory.
pub struct PanelSession {
    controller: PanelController,
}

impl PanelSession {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            controller: PanelController::new(config),
        }
    }

    pub fn controller(&self) -> &PanelController {
        &self.controller
    }

    pub fn handle(&mut self, msg: PanelMessage, now: Instant) -> Result<Reaction, InspectorError> {
        // A wedged navigation guard is cleared here rather than on a timer
        // thread; the loop is single-threaded and message-driven.
        self.controller.poll_timeout(now);

        match msg {
            PanelMessage::Host(host) => self.handle_host(host),
            PanelMessage::Ui(gesture) => Ok(self.handle_gesture(gesture, now)),
        }
    }

    fn handle_host(&mut self, msg: Inbound) -> Result<Reaction, InspectorError> {
        match msg {
            Inbound::Update { records, log_index } => {
                self.controller.apply_update(records, log_index)?;
                Ok(Reaction::render(self.history_view()))
            }
            Inbound::ExecLogsUpdated {
                logs,
                current_log_index,
                total_length,
            } => {
                self.controller
                    .apply_exec_logs(logs, current_log_index, total_length);
                Ok(Reaction::render(self.history_view()))
            }
            Inbound::TableUpdated { data } => Ok(Reaction::render(PanelView::Table { data })),
            Inbound::ObjectInspected { content } => {
                Ok(Reaction::render(PanelView::Object { content }))
            }
        }
    }

    fn handle_gesture(&mut self, gesture: Gesture, now: Instant) -> Reaction {
        match gesture {
            Gesture::LocationClicked { cursor } => {
                let out = self.controller.go_to_location(cursor, now);
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::StepForward => {
                let out = self.controller.step_forward_once(now);
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::StepBack => {
                let out = self.controller.step_back_once(now);
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::NextPage => {
                let out = self.controller.next_page();
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::PrevPage => {
                let out = self.controller.prev_page();
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::FilterChanged { text } => {
                let out = self.controller.set_filter(text);
                Reaction::send_and_render(out, self.history_view())
            }
            Gesture::ToggleExpanded { record_index } => {
                self.controller.toggle_expanded(record_index);
                Reaction::render(self.history_view())
            }
            Gesture::StartRecord => Reaction::send(Outbound::StartRecord),
            Gesture::StopRecord => Reaction::send(Outbound::StopRecord),
            Gesture::Evaluate {
                expression,
                page_size,
            } => {
                if expression.is_empty() {
                    return Reaction::none();
                }
                Reaction::send(Outbound::Evaluate {
                    expression,
                    page_size,
                })
            }
        }
    }

    fn history_view(&self) -> PanelView {
        let view = self.controller.view();
        debug!(
            frames = view.frames.len(),
            page = view.page,
            max_page = view.max_page,
            "rebuilt history view"
        );
        PanelView::History(view)
    }
}
