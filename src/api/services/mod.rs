pub mod click_tracking;
pub mod export;
pub mod search;
pub mod status;

pub use click_tracking::{ClickTrackingHandlers, click_tracking_routes};
pub use export::{ExportHandlers, export_routes};
pub use search::{SearchHandlers, search_routes};
pub use status::{StatusHandlers, status_routes};
