mod client;
mod page;
mod types;

pub use client::{AssetQueryClient, ANALYZE_PATH, ASSETS_PATH};
pub use page::{analyze_notification, AssetPage, ANALYZE_SUCCESS_MESSAGE, NOT_DETECTED_MESSAGE};
pub use types::{AssetRecord, QueryState};
