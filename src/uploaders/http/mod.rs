use async_trait::async_trait;
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::trace;
use crate::backend::BackendClient;
use crate::core::{
    ClientError,
    FileBody,
    Result,
    Segment,
    SegmentTransport,
    UploadBatch,
    FALLBACK_CONTENT_TYPE,
};

pub const UPLOAD_VIDEO_PATH: &str = "/upload/video";

/// 以 multipart 表单 POST 分片到 `/upload/video`
#[derive(Clone, Debug)]
pub struct HttpSegmentTransport {
    backend: BackendClient,
}

impl HttpSegmentTransport {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// 构造 `file` 字段，磁盘文件按区间流式读取
    async fn file_part(&self, segment: &Segment) -> Result<Part> {
        let body = match segment.body() {
            FileBody::Memory(_) => Body::from(segment.payload().await?),
            FileBody::Disk(path) => {
                let mut file = File::open(path).await?;
                file.seek(std::io::SeekFrom::Start(segment.offset)).await?;
                let stream = ReaderStream::new(file.take(segment.len));
                Body::wrap_stream(stream)
            }
        };

        let part = Part::stream_with_length(body, segment.len)
            .file_name(segment.name.clone())
            .mime_str(FALLBACK_CONTENT_TYPE)?;

        Ok(part)
    }
}

#[async_trait]
impl SegmentTransport for HttpSegmentTransport {
    async fn send_segment(&self, batch: &UploadBatch, segment: &Segment) -> Result<()> {
        let part = self.file_part(segment)
            .await
            .map_err(|err| ClientError::segment_transfer(segment.index, err))?;

        let form = Form::new()
            .part("file", part)
            .text("fileId", batch.id.to_string())
            .text("segmentIndex", segment.index.to_string())
            .text("totalSegments", batch.total_segments.to_string());

        let response = self.backend
            .client()
            .post(self.backend.build_url(UPLOAD_VIDEO_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|err| ClientError::segment_transfer(segment.index, err))?;

        let status = response.status();
        trace!(segment = segment.index, status = status.as_u16(), "Segment response");

        if !status.is_success() {
            return Err(ClientError::SegmentRejected {
                index: segment.index,
                status_code: status.as_u16(),
            });
        }

        Ok(())
    }
}
