pub mod progress;

pub use progress::{format_bytes, progress_bar, round_percentage, BAR_WIDTH};
