use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use crate::backend::BackendClient;
use crate::core::{ClientError, Result};
use super::types::AssetRecord;

pub const ASSETS_PATH: &str = "/assets";
pub const ANALYZE_PATH: &str = "/assets/analyze";

/// 素材列表与分析接口
#[derive(Clone, Debug)]
pub struct AssetQueryClient {
    backend: BackendClient,
}

impl AssetQueryClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// 获取全部素材，保持服务端返回的顺序
    pub async fn list(&self) -> Result<Vec<AssetRecord>> {
        let response = self.backend
            .client()
            .get(self.backend.build_url(ASSETS_PATH))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::server_error(status.as_u16(), describe_status(status, &body)));
        }

        let assets: Vec<AssetRecord> = response
            .json()
            .await
            .map_err(|err| if err.is_decode() {
                ClientError::Decode(err.to_string())
            } else {
                ClientError::Http(err)
            })?;
        debug!(count = assets.len(), "Fetched assets");

        Ok(assets)
    }

    /// 触发服务端分析，404 表示没有检测到品牌
    pub async fn analyze(&self) -> Result<Value> {
        let response = self.backend
            .client()
            .post(self.backend.build_url(ANALYZE_PATH))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotDetected);
        }
        if !status.is_success() {
            return Err(ClientError::server_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        json_body(response).await
    }
}

/// 空响应体视为 null
async fn json_body(response: Response) -> Result<Value> {
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or_default();
    match (reason, body.trim()) {
        (reason, "") => reason.to_string(),
        ("", body) => body.to_string(),
        (reason, body) => format!("{}: {}", reason, body),
    }
}
