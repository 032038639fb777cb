use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::InspectorError;
use crate::history::{group_by_qualifier, matching, window_containing, PageController};
use crate::model::{min_depth, to_command, Record};
use crate::panel::view::{display_name, ControlState, FrameRow, HistoryView, LocationRow};
use crate::relay::protocol::Outbound;

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub page_size: usize,
    /// How long a navigation request may stay unanswered before the panel
    /// re-enables its controls and flags the failure.
    pub nav_timeout: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            nav_timeout: Duration::from_secs(10),
        }
    }
}

/// Who slices the record list into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagingMode {
    /// `update` snapshots carry the full list; the panel windows it locally.
    Client,
    /// `execLogsUpdated` payloads are pre-paginated; page turns go back to
    /// the host as `getExecLogs` requests.
    Server,
}

/// Per-panel state machine behind the rendering boundary.
///
/// Owns every piece of mutable panel state (current page, expansion set,
/// filter text, in-flight guard) so nothing lives at module level. Snapshot
/// application resets all of it; gesture handlers return the outbound
/// command to send, if any.
pub struct PanelController {
    config: PanelConfig,
    records: Vec<Record>,
    log_index: u64,
    /// In client mode, one past the last recorded cursor. In server mode,
    /// the host-reported total log length.
    total_length: u64,
    mode: PagingMode,
    pager: PageController,
    filter_text: String,
    expanded: BTreeSet<usize>,
    in_flight: Option<Instant>,
    nav_failed: bool,
}

impl PanelController {
    pub fn new(mut config: PanelConfig) -> Self {
        // Page arithmetic divides by the page size; zero makes no sense as
        // a page anyway.
        config.page_size = config.page_size.max(1);
        let pager = PageController::new(config.page_size);
        Self {
            config,
            records: Vec::new(),
            log_index: 0,
            total_length: 0,
            mode: PagingMode::Client,
            pager,
            filter_text: String::new(),
            expanded: BTreeSet::new(),
            in_flight: None,
            nav_failed: false,
        }
    }

    /// Install a full snapshot. Transient UI state is rebuilt from scratch
    /// and the page re-anchors to the record containing the live cursor.
    pub fn apply_update(
        &mut self,
        records: Vec<Record>,
        log_index: u64,
    ) -> Result<(), InspectorError> {
        validate_snapshot(&records, log_index)?;
        let total_length = records.last().map(Record::end_cursor).unwrap_or(0);
        debug!(
            records = records.len(),
            log_index, "applying update snapshot"
        );

        self.records = records;
        self.log_index = log_index;
        self.total_length = total_length;
        self.mode = PagingMode::Client;
        self.reset_transient_state();

        let window = window_containing(&self.records, log_index, self.config.page_size);
        self.pager
            .reset(self.records.len(), window.page_number, window.max_page);
        Ok(())
    }

    /// Install a server-paginated page of logs. The page position is derived
    /// from the host-assigned index of the first log in the page.
    pub fn apply_exec_logs(&mut self, logs: Vec<Record>, current_log_index: u64, total_length: u64) {
        debug!(
            logs = logs.len(),
            current_log_index, total_length, "applying exec-log page"
        );
        let offset = logs.first().map(|r| r.index).unwrap_or(0);

        self.records = logs;
        self.log_index = current_log_index;
        self.total_length = total_length;
        self.mode = PagingMode::Server;
        self.reset_transient_state();

        let page_size = self.config.page_size;
        let max_page = (total_length as usize).div_ceil(page_size);
        let cur_page = if max_page == 0 { 0 } else { offset / page_size + 1 };
        self.pager
            .reset(total_length as usize, cur_page, max_page);
    }

    fn reset_transient_state(&mut self) {
        self.filter_text.clear();
        self.in_flight = None;
        self.nav_failed = false;
        self.expanded.clear();
        // The record under the live cursor opens pre-expanded so the
        // stopped location is visible without a click.
        let current = self.current_cursor();
        if let Some(rec) = self.records.iter().find(|r| r.contains_cursor(current)) {
            self.expanded.insert(rec.index);
        }
    }

    /// The reference cursor for navigation arithmetic: a host-flagged
    /// current location wins, otherwise the pushed log index.
    pub fn current_cursor(&self) -> u64 {
        for rec in &self.records {
            for (offset, loc) in rec.locations.iter().enumerate() {
                if loc.current {
                    return rec.location_cursor(offset);
                }
            }
        }
        self.log_index
    }

    /// Translate a click on a historical location into a minimal-step
    /// command. Returns `None` while a request is in flight or when the
    /// click lands on the current location.
    pub fn go_to_location(&mut self, target: u64, now: Instant) -> Option<Outbound> {
        if self.in_flight.is_some() {
            debug!(target, "navigation already in flight, ignoring click");
            return None;
        }
        let cmd = to_command(target, self.current_cursor());
        if cmd.is_noop() {
            return None;
        }
        self.arm_guard(now);
        Some(cmd.into())
    }

    /// Single step back. No-op at log index zero.
    pub fn step_back_once(&mut self, now: Instant) -> Option<Outbound> {
        if self.in_flight.is_some() || self.log_index == 0 {
            return None;
        }
        self.arm_guard(now);
        Some(Outbound::GoBackTo { times: 1 })
    }

    /// Single step forward. No-op at the live frontier.
    pub fn step_forward_once(&mut self, now: Instant) -> Option<Outbound> {
        if self.in_flight.is_some() || self.records.is_empty() {
            return None;
        }
        if self.log_index >= self.total_length {
            return None;
        }
        self.arm_guard(now);
        Some(Outbound::GoTo { times: 1 })
    }

    fn arm_guard(&mut self, now: Instant) {
        self.in_flight = Some(now);
        self.nav_failed = false;
    }

    /// Clear a wedged in-flight guard once the configured deadline passes,
    /// so an unanswered host request cannot disable the panel forever.
    /// Returns true when the guard was cleared.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        match self.in_flight {
            Some(since) if now.duration_since(since) >= self.config.nav_timeout => {
                warn!("navigation request timed out, re-enabling controls");
                self.in_flight = None;
                self.nav_failed = true;
                true
            }
            _ => false,
        }
    }

    pub fn next_page(&mut self) -> Option<Outbound> {
        if !self.pager.next() {
            return None;
        }
        self.page_request()
    }

    pub fn prev_page(&mut self) -> Option<Outbound> {
        if !self.pager.prev() {
            return None;
        }
        self.page_request()
    }

    fn page_request(&self) -> Option<Outbound> {
        match self.mode {
            PagingMode::Client => None,
            PagingMode::Server => Some(Outbound::GetExecLogs {
                offset: ((self.pager.cur_page() - 1) * self.pager.page_size()) as u64,
                page_size: self.pager.page_size(),
            }),
        }
    }

    /// Update the live filter text. In server mode the host does the
    /// filtering, so the keyword is forwarded as a search request.
    pub fn set_filter(&mut self, text: String) -> Option<Outbound> {
        self.filter_text = text;
        match self.mode {
            PagingMode::Client => None,
            PagingMode::Server => Some(Outbound::SearchExecLogs {
                keyword: self.filter_text.clone(),
            }),
        }
    }

    /// Toggle a record row open or closed. Location rows exist only while
    /// their record is expanded.
    pub fn toggle_expanded(&mut self, record_index: usize) {
        if !self.expanded.remove(&record_index) {
            self.expanded.insert(record_index);
        }
    }

    /// Qualifier groups for the class-name dropdown.
    pub fn qualifier_groups(&self) -> Vec<(String, Vec<usize>)> {
        group_by_qualifier(&self.records)
    }

    /// Build the current history view model.
    ///
    /// With an active client-side filter the filtered list is re-windowed
    /// around the current cursor; when the filter removed the cursor's
    /// record, the windower's degenerate fallback shows the first page of
    /// filtered results.
    pub fn view(&self) -> HistoryView {
        match self.mode {
            PagingMode::Client => match matching(&self.records, &self.filter_text) {
                Some(filtered) => {
                    let window = window_containing(
                        &filtered,
                        self.current_cursor(),
                        self.config.page_size,
                    );
                    self.build_view(
                        &filtered[window.range.clone()],
                        window.page_number,
                        window.max_page,
                    )
                }
                None => self.build_view(
                    &self.records[self.pager.current_range()],
                    self.pager.cur_page(),
                    self.pager.max_page(),
                ),
            },
            PagingMode::Server => {
                self.build_view(&self.records, self.pager.cur_page(), self.pager.max_page())
            }
        }
    }

    fn build_view(&self, visible: &[Record], page: usize, max_page: usize) -> HistoryView {
        let base_depth = min_depth(visible).unwrap_or(0);
        let current = self.current_cursor();

        let frames = visible
            .iter()
            .map(|rec| {
                let expanded = self.expanded.contains(&rec.index);
                let locations = if expanded {
                    rec.locations
                        .iter()
                        .enumerate()
                        .map(|(offset, loc)| {
                            let cursor = rec.location_cursor(offset);
                            LocationRow {
                                cursor,
                                name: display_name(&loc.name),
                                current: loc.current || cursor == current,
                            }
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                FrameRow {
                    record_index: rec.index,
                    name: rec.name.clone(),
                    args_text: args_text(rec),
                    indent: rec.frame_depth.saturating_sub(base_depth),
                    expanded,
                    locations,
                }
            })
            .collect();

        let page_buttons = self.pager.button_state();
        let idle = self.in_flight.is_none();
        let has_records = !self.records.is_empty();
        HistoryView {
            frames,
            page,
            max_page,
            controls: ControlState {
                step_back_enabled: has_records && idle && self.log_index > 0,
                step_forward_enabled: has_records && idle && self.log_index < self.total_length,
                prev_page_enabled: has_records && !page_buttons.prev_disabled,
                next_page_enabled: has_records && !page_buttons.next_disabled,
                nav_failed: self.nav_failed,
            },
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn log_index(&self) -> u64 {
        self.log_index
    }
}

fn args_text(rec: &Record) -> String {
    match &rec.args {
        None => String::new(),
        Some(args) => args
            .iter()
            .map(|arg| format!("{}={}", arg.name, arg.value))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn validate_snapshot(records: &[Record], log_index: u64) -> Result<(), InspectorError> {
    for pair in records.windows(2) {
        if pair[0].end_cursor() != pair[1].begin_cursor {
            return Err(InspectorError::Snapshot(format!(
                "records {} and {} are not contiguous ({} != {})",
                pair[0].index,
                pair[1].index,
                pair[0].end_cursor(),
                pair[1].begin_cursor
            )));
        }
    }
    let total = records.last().map(Record::end_cursor).unwrap_or(0);
    if log_index > total {
        return Err(InspectorError::Snapshot(format!(
            "log index {} past the frontier {}",
            log_index, total
        )));
    }
    Ok(())
}
