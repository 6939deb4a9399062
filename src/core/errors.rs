use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error {0}")]
    Http(#[from] reqwest::Error),

    /// 分片被服务端拒绝 (非 2xx)
    #[error("Upload failed for segment {}", .index + 1)]
    SegmentRejected {
        index: usize,
        status_code: u16,
    },

    /// 分片传输失败 (网络或读取错误)
    #[error("Transfer of segment {} failed: {reason}", .index + 1)]
    SegmentTransfer {
        index: usize,
        reason: String,
    },

    #[error("{}", status_line(.status_code, .message))]
    Server {
        status_code: u16,
        message: String,
    },

    /// analyze 返回 404
    #[error("not-detected")]
    NotDetected,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn server_error(status_code: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status_code,
            message: message.into(),
        }
    }

    pub fn segment_transfer(index: usize, reason: impl ToString) -> Self {
        Self::SegmentTransfer {
            index,
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// 出错的分片序号 (0 起)
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::SegmentRejected { index, .. } | Self::SegmentTransfer { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// 没有原因短语时只显示状态码
fn status_line(status_code: &u16, message: &str) -> String {
    if message.is_empty() {
        status_code.to_string()
    } else {
        format!("{} {}", status_code, message)
    }
}

/// 表单字段级别的校验错误，不会触发任何网络请求
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file")]
    NoFileSelected,

    #[error("Only one file can be uploaded at a time")]
    TooManyFiles,

    #[error("Only video files are allowed")]
    NotVideo,

    #[error("The selected file is empty")]
    EmptyFile,
}

/// Error alias
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
