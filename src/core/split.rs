use super::errors::{ClientError, Result};
use super::types::{Segment, UploadFile, DEFAULT_SEGMENT_SIZE};

/// 按固定大小切分文件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSplitter {
    segment_size: u64,
}

impl Default for SegmentSplitter {
    fn default() -> Self {
        Self { segment_size: DEFAULT_SEGMENT_SIZE }
    }
}

impl SegmentSplitter {
    pub fn new(segment_size: u64) -> Result<Self> {
        if segment_size == 0 {
            return Err(ClientError::invalid_config("segment size must be greater than 0"));
        }

        Ok(Self { segment_size })
    }

    pub fn segment_size(&self) -> u64 {
        self.segment_size
    }

    /// 计算分片信息，空文件返回空列表
    pub fn split(&self, file: &UploadFile) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.segment_count(file.size));
        let mut offset = 0;
        let mut index = 0;

        while offset < file.size {
            let len = std::cmp::min(self.segment_size, file.size - offset);
            segments.push(Segment {
                index,
                offset,
                len,
                name: segment_name(&file.name, index),
                body: file.body.clone(),
            });
            offset += len;
            index += 1;
        }

        segments
    }

    /// ceil(size / segment_size)
    pub fn segment_count(&self, size: u64) -> usize {
        size.div_ceil(self.segment_size) as usize
    }
}

/// `clip.mp4` 的第 0 片 -> `clip_part1.mp4`
pub fn segment_name(file_name: &str, index: usize) -> String {
    let part = index + 1;
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{}_part{}.{}", stem, part, ext)
        }
        _ => format!("{}_part{}", file_name, part),
    }
}
