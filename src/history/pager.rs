use std::ops::Range;

/// Enablement state for the previous/next page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Tracks the current page over a right-aligned paging of the record list.
///
/// Pages are 1-indexed and anchored to the end of the list: the last page
/// always holds exactly `page_size` records (when enough exist) and page 1
/// absorbs the leftover head. A fresh snapshot resets the controller to the
/// page computed by the windower so the view opens on the live cursor.
#[derive(Debug, Clone)]
pub struct PageController {
    cur_page: usize,
    max_page: usize,
    page_size: usize,
    total: usize,
}

impl PageController {
    pub fn new(page_size: usize) -> Self {
        Self {
            cur_page: 0,
            max_page: 0,
            page_size,
            total: 0,
        }
    }

    /// Re-anchor after a snapshot: `page_number`/`max_page` come from the
    /// windower call made against the fresh record list.
    pub fn reset(&mut self, total: usize, page_number: usize, max_page: usize) {
        self.total = total;
        self.max_page = max_page;
        self.cur_page = page_number.min(max_page);
    }

    pub fn cur_page(&self) -> usize {
        self.cur_page
    }

    pub fn max_page(&self) -> usize {
        self.max_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self) -> bool {
        if self.cur_page >= self.max_page {
            return false;
        }
        self.cur_page += 1;
        true
    }

    /// Go back one page. No-op on the first page.
    pub fn prev(&mut self) -> bool {
        if self.cur_page < 2 {
            return false;
        }
        self.cur_page -= 1;
        true
    }

    /// Index range of the current page, right-aligned: the window ends
    /// `(max_page - cur_page) * page_size` records before the end of the
    /// list and extends at most `page_size` records back from there.
    pub fn current_range(&self) -> Range<usize> {
        if self.max_page == 0 {
            return 0..0;
        }
        let trailing = (self.max_page - self.cur_page) * self.page_size;
        let end = self.total.saturating_sub(trailing);
        end.saturating_sub(self.page_size)..end
    }

    pub fn button_state(&self) -> PageButtons {
        PageButtons {
            prev_disabled: self.cur_page <= 1,
            next_disabled: self.cur_page >= self.max_page,
        }
    }
}
