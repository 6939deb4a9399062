//! 后端 HTTP 客户端
//!
//! 分片上传和素材接口都经由 [`BackendClient`]，共用连接池和基础地址。

use std::time::Duration;
use reqwest::Client;
use url::Url;
use crate::core::{ClientError, Result};

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|err| ClientError::invalid_config(format!("backend url '{}': {}", base_url, err)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let backend = BackendClient::new("http://localhost:8080/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(backend.build_url("/assets"), "http://localhost:8080/assets");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = BackendClient::new("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }
}
