use std::path::{Path, PathBuf};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use uuid::Uuid;
use super::errors::{ClientError, Result};

/// 默认分片大小 2MB
pub const DEFAULT_SEGMENT_SIZE: u64 = 2 * 1024 * 1024;

/// 未识别扩展名时的类型
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 文件内容来源
#[derive(Debug, Clone)]
pub enum FileBody {
    /// 内存中的完整内容
    Memory(Bytes),
    /// 磁盘文件，按需读取
    Disk(PathBuf),
}

/// 用户选中的待上传文件，选定后不可变
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// 文件名（含扩展名）
    pub name: String,
    /// 总字节数
    pub size: u64,
    /// MIME 类型
    pub content_type: String,
    pub body: FileBody,
}

impl UploadFile {
    /// 从磁盘打开文件，类型由扩展名推断
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(ClientError::InvalidFile(format!("{} is not a regular file", path.display())));
        }

        let name = path.file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidFile("Can't be read filename".to_string()))?
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            content_type: content_type_for(path).to_string(),
            body: FileBody::Disk(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            body: FileBody::Memory(data),
        }
    }

    /// 覆盖推断出的类型
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

/// 文件中一段连续的字节区间
#[derive(Debug, Clone)]
pub struct Segment {
    /// 序号，从 0 开始
    pub index: usize,
    /// 在原文件中的起始偏移
    pub offset: u64,
    /// 字节长度
    pub len: u64,
    /// 展示用文件名，如 `clip_part1.mp4`
    pub name: String,
    pub(crate) body: FileBody,
}

impl Segment {
    pub fn body(&self) -> &FileBody {
        &self.body
    }

    /// 读取该分片的字节内容
    pub async fn payload(&self) -> Result<Bytes> {
        match &self.body {
            FileBody::Memory(data) => {
                let start = self.offset as usize;
                let end = start + self.len as usize;
                Ok(data.slice(start..end))
            }
            FileBody::Disk(path) => {
                let mut file = File::open(path).await?;
                file.seek(std::io::SeekFrom::Start(self.offset)).await?;

                let mut buffer = vec![0u8; self.len as usize];
                file.read_exact(&mut buffer).await?;
                Ok(Bytes::from(buffer))
            }
        }
    }
}

/// 一次提交中所有分片共享的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 分片批次，服务端据此重组顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadBatch {
    pub id: BatchId,
    pub total_segments: usize,
}

impl UploadBatch {
    pub fn new(total_segments: usize) -> Self {
        Self {
            id: BatchId::new(),
            total_segments,
        }
    }
}

/// 上传进度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    /// 已完成的分片数
    pub segments_uploaded: usize,
    /// 分片总数
    pub total_segments: usize,
    /// 已上传字节数
    pub bytes_uploaded: u64,
    /// 总字节数
    pub total_bytes: u64,
    /// 完成百分比 [0, 100]
    pub percentage: f64,
}

impl UploadProgress {
    pub fn new(segments_uploaded: usize, total_segments: usize, bytes_uploaded: u64, total_bytes: u64) -> Self {
        let percentage = if total_segments > 0 {
            100.0 * segments_uploaded as f64 / total_segments as f64
        } else {
            0.0
        };

        Self {
            segments_uploaded,
            total_segments,
            bytes_uploaded,
            total_bytes,
            percentage,
        }
    }
}

/// 根据扩展名推断 MIME 类型
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return FALLBACK_CONTENT_TYPE,
    };

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        "ts" => "video/mp2t",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a/clip.MP4")), "video/mp4");
        assert_eq!(content_type_for(Path::new("clip.mov")), "video/quicktime");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("noext")), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("weird.xyz")), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn progress_percentage() {
        let progress = UploadProgress::new(1, 4, 10, 40);
        assert_eq!(progress.percentage, 25.0);

        let progress = UploadProgress::new(0, 0, 0, 0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn batch_ids_are_unique() {
        let a = UploadBatch::new(3);
        let b = UploadBatch::new(3);
        assert_ne!(a.id, b.id);
        assert!(!a.id.to_string().is_empty());
    }

    #[tokio::test]
    async fn open_reads_metadata_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.webm");
        tokio::fs::write(&path, vec![7u8; 1500]).await.unwrap();

        let file = UploadFile::open(&path).await.unwrap();
        assert_eq!(file.name, "match.webm");
        assert_eq!(file.size, 1500);
        assert_eq!(file.content_type, "video/webm");
        assert!(file.is_video());
    }

    #[tokio::test]
    async fn open_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadFile::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidFile(_)));
    }

    #[test]
    fn content_type_override() {
        let file = UploadFile::from_bytes("clip.bin", FALLBACK_CONTENT_TYPE, vec![1u8, 2, 3])
            .with_content_type("video/mp4");
        assert!(file.is_video());
        assert_eq!(file.size, 3);
    }
}
