use std::ops::Range;

use crate::model::Record;

/// A page-aligned window into the full record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWindow {
    /// Index range into the record list this window was computed over.
    pub range: Range<usize>,
    /// 1-indexed page the window corresponds to. Zero only for an empty list.
    pub page_number: usize,
    /// `ceil(len / page_size)`. Zero only for an empty list.
    pub max_page: usize,
}

impl RecordWindow {
    fn empty() -> Self {
        Self {
            range: 0..0,
            page_number: 0,
            max_page: 0,
        }
    }
}

/// Find the page-aligned window containing `target_cursor`.
///
/// Paging is right-aligned: windows always end at a page boundary measured
/// from the end of the list, so the most recent records anchor page
/// numbering and page 1 may be short when the total is not a multiple of
/// `page_size`. A target beyond the last recorded cursor (the live frontier)
/// maps to the last page. If no slice contains the target, the remaining
/// head slice is returned as a degenerate first page.
pub fn window_containing(records: &[Record], target_cursor: u64, page_size: usize) -> RecordWindow {
    if records.is_empty() || page_size == 0 {
        return RecordWindow::empty();
    }

    let total = records.len();
    let max_page = total.div_ceil(page_size);

    // Past the last recorded location: the live frontier lives on the last page.
    let last = &records[total - 1];
    if target_cursor > last.end_cursor() {
        return RecordWindow {
            range: total.saturating_sub(page_size)..total,
            page_number: max_page,
            max_page,
        };
    }

    // Walk backward one page at a time until a slice's cursor span contains
    // the target. The span end is inclusive so the frontier of a slice still
    // counts as inside it.
    let mut page_number = max_page;
    let mut remain = total;
    while remain > 1 {
        let start = remain.saturating_sub(page_size);
        let span_start = records[start].begin_cursor;
        let span_end = records[remain - 1].end_cursor();
        if target_cursor >= span_start && target_cursor <= span_end {
            return RecordWindow {
                range: start..remain,
                page_number,
                max_page,
            };
        }
        page_number = page_number.saturating_sub(1);
        remain = remain.saturating_sub(page_size);
    }

    // Target outside every known range. Show whatever is left of the head.
    RecordWindow {
        range: 0..remain,
        page_number: page_number.max(1),
        max_page,
    }
}
