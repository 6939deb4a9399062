pub mod http;
pub mod sequential;

pub use http::{HttpSegmentTransport, UPLOAD_VIDEO_PATH};
pub use sequential::SequentialUploader;
