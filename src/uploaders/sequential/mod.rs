use async_trait::async_trait;
use tracing::{debug, error};
use crate::core::{
    ClientError,
    ProgressCallback,
    Result,
    Segment,
    SegmentTransport,
    SegmentUploader,
    UploadBatch,
    UploadProgress,
};

/// 顺序分片上传器
///
/// 一次只发送一个分片，上一个分片返回后才发下一个，
/// 保证服务端按序接收。第一个失败的分片会中止整个批次，
/// 已发送的分片不会回滚。
pub struct SequentialUploader<T> {
    transport: T,
}

impl<T: SegmentTransport> SequentialUploader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: SegmentTransport> SegmentUploader for SequentialUploader<T> {
    async fn upload(
        &self,
        batch: &UploadBatch,
        segments: &[Segment],
        on_progress: ProgressCallback,
    ) -> Result<()> {
        if segments.len() != batch.total_segments {
            return Err(ClientError::Internal(format!(
                "batch expects {} segments, got {}",
                batch.total_segments,
                segments.len()
            )));
        }

        let total_bytes: u64 = segments.iter().map(|s| s.len).sum();
        let mut uploaded_count = 0;
        let mut bytes_uploaded = 0;

        for segment in segments {
            debug!(
                batch_id = %batch.id,
                segment = segment.index,
                bytes = segment.len,
                "Uploading segment {}/{}",
                segment.index + 1,
                batch.total_segments
            );

            if let Err(err) = self.transport.send_segment(batch, segment).await {
                error!(batch_id = %batch.id, segment = segment.index, "Error uploading segment {}: {}", segment.index + 1, err);
                return Err(err);
            }

            uploaded_count += 1;
            bytes_uploaded += segment.len;
            on_progress(UploadProgress::new(uploaded_count, batch.total_segments, bytes_uploaded, total_bytes));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "sequential"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use crate::core::{SegmentSplitter, UploadFile};

    /// 记录每次调用的模拟传输
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, usize, usize)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_at: Option<usize>,
    }

    impl RecordingTransport {
        fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Default::default()
            }
        }

        fn sent_indices(&self) -> Vec<usize> {
            self.sent.lock().unwrap().iter().map(|(_, i, _)| *i).collect()
        }
    }

    #[async_trait]
    impl SegmentTransport for RecordingTransport {
        async fn send_segment(&self, batch: &UploadBatch, segment: &Segment) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            // 让出执行权，若存在并发发送会在这里暴露出来
            tokio::time::sleep(Duration::from_millis(2)).await;

            self.sent.lock().unwrap().push((batch.id.to_string(), segment.index, batch.total_segments));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_at == Some(segment.index) {
                return Err(ClientError::SegmentRejected { index: segment.index, status_code: 500 });
            }
            Ok(())
        }
    }

    fn segments_of(size: usize, segment_size: u64) -> Vec<Segment> {
        let file = UploadFile::from_bytes("clip.mp4", "video/mp4", vec![1u8; size]);
        SegmentSplitter::new(segment_size).unwrap().split(&file)
    }

    fn collecting_callback() -> (ProgressCallback, Arc<Mutex<Vec<UploadProgress>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Arc::new(move |progress| sink.lock().unwrap().push(progress));
        (callback, seen)
    }

    #[tokio::test]
    async fn uploads_in_order_one_at_a_time() {
        let segments = segments_of(1000, 100);
        let batch = UploadBatch::new(segments.len());
        let uploader = SequentialUploader::new(RecordingTransport::default());
        let (callback, seen) = collecting_callback();

        uploader.upload(&batch, &segments, callback).await.unwrap();

        let transport = uploader.transport();
        assert_eq!(transport.sent_indices(), (0..10).collect::<Vec<_>>());
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);

        let sent = transport.sent.lock().unwrap();
        assert!(sent.iter().all(|(id, _, total)| *id == batch.id.to_string() && *total == 10));
        assert_eq!(seen.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn progress_is_exact_and_monotonic() {
        let segments = segments_of(700, 100);
        let batch = UploadBatch::new(segments.len());
        let uploader = SequentialUploader::new(RecordingTransport::default());
        let (callback, seen) = collecting_callback();

        uploader.upload(&batch, &segments, callback).await.unwrap();

        let seen = seen.lock().unwrap();
        for (k, progress) in seen.iter().enumerate() {
            assert_eq!(progress.segments_uploaded, k + 1);
            assert_eq!(progress.percentage, 100.0 * (k + 1) as f64 / 7.0);
        }
        assert!(seen.windows(2).all(|w| w[0].percentage <= w[1].percentage));

        let last = seen.last().unwrap();
        assert_eq!(last.percentage, 100.0);
        assert_eq!(last.bytes_uploaded, 700);
        assert_eq!(last.total_bytes, 700);
    }

    #[tokio::test]
    async fn first_failure_stops_the_batch() {
        let segments = segments_of(500, 100);
        let batch = UploadBatch::new(segments.len());
        let uploader = SequentialUploader::new(RecordingTransport::failing_at(2));
        let (callback, seen) = collecting_callback();

        let err = uploader.upload(&batch, &segments, callback).await.unwrap_err();

        assert_eq!(err.segment_index(), Some(2));
        assert_eq!(err.to_string(), "Upload failed for segment 3");
        assert_eq!(uploader.transport().sent_indices(), vec![0, 1, 2]);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_succeeds_without_progress() {
        let uploader = SequentialUploader::new(RecordingTransport::default());
        let (callback, seen) = collecting_callback();

        uploader.upload(&UploadBatch::new(0), &[], callback).await.unwrap();

        assert!(uploader.transport().sent_indices().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mismatched_batch_is_rejected_before_sending() {
        let segments = segments_of(300, 100);
        let uploader = SequentialUploader::new(RecordingTransport::default());
        let (callback, _) = collecting_callback();

        let err = uploader.upload(&UploadBatch::new(5), &segments, callback).await.unwrap_err();

        assert!(matches!(err, ClientError::Internal(_)));
        assert!(uploader.transport().sent_indices().is_empty());
    }
}
