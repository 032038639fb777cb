mod filter;
mod pager;
mod windower;

pub use filter::{group_by_qualifier, matching};
pub use pager::{PageButtons, PageController};
pub use windower::{window_containing, RecordWindow};
