mod errors;
mod split;
mod traits;
mod types;

pub use errors::{ClientError, Result, ValidationError};
pub use split::{segment_name, SegmentSplitter};
pub use traits::{ProgressCallback, SegmentTransport, SegmentUploader};
pub use types::{
    content_type_for,
    BatchId,
    FileBody,
    Segment,
    UploadBatch,
    UploadFile,
    UploadProgress,
    DEFAULT_SEGMENT_SIZE,
    FALLBACK_CONTENT_TYPE,
};
