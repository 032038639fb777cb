pub mod error;
pub mod history;
pub mod model;
pub mod panel;
pub mod relay;

pub use error::InspectorError;
