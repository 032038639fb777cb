mod controller;
mod view;

pub use controller::{PanelConfig, PanelController};
pub use view::{display_name, ControlState, FrameRow, HistoryView, LocationRow, PanelView};
