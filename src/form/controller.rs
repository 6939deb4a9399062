use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use crate::core::{
    BatchId,
    ClientError,
    ProgressCallback,
    SegmentSplitter,
    SegmentUploader,
    UploadBatch,
    UploadFile,
    UploadProgress,
    ValidationError,
};
use crate::notify::{Notification, Notifier};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Video uploaded successfully!";
pub const UPLOAD_FALLBACK_MESSAGE: &str = "Upload failed";

/// 表单状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// 空闲
    Idle,
    /// 校验中
    Validating,
    /// 上传中
    Uploading,
    /// 上传成功
    Succeeded,
    /// 上传失败
    Failed,
}

/// 可被展示层订阅的表单状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormStatus {
    pub phase: FormPhase,
    pub uploading: bool,
    /// 百分比 [0, 100]
    pub progress: f64,
}

impl Default for FormStatus {
    fn default() -> Self {
        Self {
            phase: FormPhase::Idle,
            uploading: false,
            progress: 0.0,
        }
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 校验未通过，没有发出任何请求
    Invalid(ValidationError),
    Succeeded {
        batch_id: BatchId,
        segments: usize,
    },
    Failed {
        message: String,
        /// 失败的分片序号
        segment: Option<usize>,
    },
}

/// 不论结果如何，离开作用域时清除 uploading 标记
struct UploadingGuard<'a> {
    status_tx: &'a watch::Sender<FormStatus>,
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.status_tx.send_modify(|status| {
            status.uploading = false;
            status.phase = FormPhase::Idle;
        });
    }
}

/// 视频上传表单
///
/// 校验所选文件，切片后交给 [`SegmentUploader`] 上传，并通过
/// [`Notifier`] 把结果告诉用户。状态只在这里修改，外部通过
/// [`UploadFormController::subscribe`] 观察。
pub struct UploadFormController {
    splitter: SegmentSplitter,
    uploader: Arc<dyn SegmentUploader>,
    notifier: Arc<dyn Notifier>,
    status_tx: Arc<watch::Sender<FormStatus>>,
}

impl UploadFormController {
    pub fn new(
        splitter: SegmentSplitter,
        uploader: Arc<dyn SegmentUploader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status_tx, _) = watch::channel(FormStatus::default());

        Self {
            splitter,
            uploader,
            notifier,
            status_tx: Arc::new(status_tx),
        }
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> FormStatus {
        *self.status_tx.borrow()
    }

    /// 必须恰好选中一个非空的视频文件
    pub fn validate(selection: &[UploadFile]) -> Result<&UploadFile, ValidationError> {
        let file = match selection {
            [] => return Err(ValidationError::NoFileSelected),
            [file] => file,
            _ => return Err(ValidationError::TooManyFiles),
        };

        if !file.is_video() {
            return Err(ValidationError::NotVideo);
        }

        if file.size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        Ok(file)
    }

    pub async fn submit(&self, selection: &[UploadFile]) -> SubmitOutcome {
        self.set_phase(FormPhase::Validating);

        let file = match Self::validate(selection) {
            Ok(file) => file,
            Err(err) => {
                warn!("Rejected upload: {}", err);
                self.set_phase(FormPhase::Idle);
                return SubmitOutcome::Invalid(err);
            }
        };

        self.status_tx.send_modify(|status| {
            status.phase = FormPhase::Uploading;
            status.uploading = true;
            status.progress = 0.0;
        });
        let guard = UploadingGuard { status_tx: &self.status_tx };

        let segments = self.splitter.split(file);
        let batch = UploadBatch::new(segments.len());
        info!(
            batch_id = %batch.id,
            file = %file.name,
            bytes = file.size,
            segments = batch.total_segments,
            strategy = self.uploader.name(),
            "Uploading video"
        );

        let status_tx = self.status_tx.clone();
        let on_progress: ProgressCallback = Arc::new(move |progress: UploadProgress| {
            status_tx.send_modify(|status| status.progress = progress.percentage);
        });

        let result = self.uploader.upload(&batch, &segments, on_progress).await;

        // 先清除 uploading 再提示，进度行已经收尾
        drop(guard);

        let outcome = match result {
            Ok(()) => {
                info!(batch_id = %batch.id, "Video uploaded");
                self.set_phase(FormPhase::Succeeded);
                self.notifier.notify(Notification::success(UPLOAD_SUCCESS_MESSAGE));

                SubmitOutcome::Succeeded {
                    batch_id: batch.id,
                    segments: batch.total_segments,
                }
            }
            Err(err) => {
                warn!(batch_id = %batch.id, "Upload error: {}", err);
                self.set_phase(FormPhase::Failed);
                let message = failure_message(&err);
                self.notifier.notify(Notification::error(message.clone()));

                SubmitOutcome::Failed {
                    message,
                    segment: err.segment_index(),
                }
            }
        };

        self.set_phase(FormPhase::Idle);
        outcome
    }

    fn set_phase(&self, phase: FormPhase) {
        self.status_tx.send_modify(|status| status.phase = phase);
    }
}

fn failure_message(err: &ClientError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UPLOAD_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}
