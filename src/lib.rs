pub mod assets;
pub mod backend;
pub mod config;
pub mod core;
pub mod form;
pub mod nav;
pub mod notify;
pub mod uploaders;
pub mod utils;
pub mod view;

// 重新导出核心类型
pub use core::{
    ClientError,
    Result,
    Segment,
    SegmentSplitter,
    SegmentTransport,
    SegmentUploader,
    UploadBatch,
    UploadFile,
    UploadProgress,
    ValidationError,
};

pub use assets::{AssetPage, AssetQueryClient, AssetRecord, QueryState};
pub use backend::BackendClient;
pub use config::Config;
pub use form::{FormPhase, FormStatus, SubmitOutcome, UploadFormController};
pub use notify::{Notification, Notifier};

// 重新导出上传器
pub use uploaders::{HttpSegmentTransport, SequentialUploader};

/// 按配置组装上传表单：HTTP 传输 + 顺序上传
pub fn upload_form(config: &Config, notifier: std::sync::Arc<dyn Notifier>) -> Result<UploadFormController> {
    let transport = HttpSegmentTransport::new(config.backend()?);
    let uploader = std::sync::Arc::new(SequentialUploader::new(transport));
    Ok(UploadFormController::new(config.splitter()?, uploader, notifier))
}

pub fn asset_page(config: &Config, notifier: std::sync::Arc<dyn Notifier>) -> Result<AssetPage> {
    Ok(AssetPage::new(AssetQueryClient::new(config.backend()?), notifier))
}
