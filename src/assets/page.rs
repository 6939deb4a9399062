use std::sync::Arc;
use serde_json::Value;
use tracing::{info, warn};
use crate::core::{ClientError, Result};
use crate::notify::{Notification, Notifier};
use super::client::AssetQueryClient;
use super::types::{AssetRecord, QueryState};

pub const ANALYZE_SUCCESS_MESSAGE: &str = "Analysis completed successfully";
pub const NOT_DETECTED_MESSAGE: &str = "Not detected your brand in provided video";

/// 素材页：列表加载与手动触发的分析
///
/// 分析成功后不会自动刷新列表。
pub struct AssetPage {
    client: AssetQueryClient,
    notifier: Arc<dyn Notifier>,
}

impl AssetPage {
    pub fn new(client: AssetQueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { client, notifier }
    }

    pub async fn load(&self) -> QueryState<Vec<AssetRecord>> {
        let result = self.client.list().await;
        if let Err(err) = &result {
            warn!("Failed to load assets: {}", err);
        }
        result.into()
    }

    pub async fn analyze(&self) -> Notification {
        let result = self.client.analyze().await;
        match &result {
            Ok(_) => info!("Analysis completed"),
            Err(err) => warn!("Analysis failed: {}", err),
        }

        let notification = analyze_notification(&result);
        self.notifier.notify(notification.clone());
        notification
    }
}

pub fn analyze_notification(result: &Result<Value>) -> Notification {
    match result {
        Ok(_) => Notification::success(ANALYZE_SUCCESS_MESSAGE),
        Err(ClientError::NotDetected) => Notification::error(NOT_DETECTED_MESSAGE),
        Err(err) => Notification::error(format!("Error: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendClient;
    use crate::notify::MemoryNotifier;

    #[test]
    fn notification_mapping() {
        assert_eq!(
            analyze_notification(&Ok(Value::Null)),
            Notification::success(ANALYZE_SUCCESS_MESSAGE)
        );
        assert_eq!(
            analyze_notification(&Err(ClientError::NotDetected)),
            Notification::error(NOT_DETECTED_MESSAGE)
        );
        assert_eq!(
            analyze_notification(&Err(ClientError::server_error(500, "Internal Server Error"))),
            Notification::error("Error: 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn analyze_does_not_reload_list() {
        let mut server = mockito::Server::new_async().await;
        let list = server.mock("GET", "/assets").expect(0).create_async().await;
        server.mock("POST", "/assets/analyze")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let notifier = Arc::new(MemoryNotifier::new());
        let client = AssetQueryClient::new(BackendClient::new(&server.url()).unwrap());
        let page = AssetPage::new(client, notifier.clone());

        let notification = page.analyze().await;

        list.assert_async().await;
        assert_eq!(notification.message, ANALYZE_SUCCESS_MESSAGE);
        assert_eq!(notifier.notifications(), vec![notification]);
    }

    #[tokio::test]
    async fn load_maps_errors_inline() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/assets")
            .with_status(500)
            .create_async()
            .await;

        let notifier = Arc::new(MemoryNotifier::new());
        let client = AssetQueryClient::new(BackendClient::new(&server.url()).unwrap());
        let page = AssetPage::new(client, notifier.clone());

        let state = page.load().await;

        assert_eq!(state, QueryState::Error("500 Internal Server Error".to_string()));
        assert!(notifier.notifications().is_empty());
    }
}
