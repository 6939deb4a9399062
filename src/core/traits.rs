use std::sync::Arc;
use async_trait::async_trait;
use super::types::{Segment, UploadBatch, UploadProgress};
use super::errors::Result;

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// 单个分片的传输方式
#[async_trait]
pub trait SegmentTransport: Send + Sync {
    /// 发送一个分片，非成功响应返回错误
    async fn send_segment(&self, batch: &UploadBatch, segment: &Segment) -> Result<()>;
}

/// 分片上传策略，表单只依赖此接口
#[async_trait]
pub trait SegmentUploader: Send + Sync {
    /// 上传整个批次，每成功一个分片回调一次进度
    async fn upload(
        &self,
        batch: &UploadBatch,
        segments: &[Segment],
        on_progress: ProgressCallback,
    ) -> Result<()>;

    /// 策略名称，用于日志
    fn name(&self) -> &str;
}
