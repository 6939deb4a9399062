use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use url::Url;
use crate::backend::BackendClient;
use crate::core::{ClientError, Result, SegmentSplitter, DEFAULT_SEGMENT_SIZE};

/// 默认配置文件，位于当前目录
pub const CONFIG_FILE: &str = "brandscope.toml";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// 后端地址的环境变量，按顺序查找
pub const BACKEND_URL_ENV: [&str; 2] = ["BRANDSCOPE_BACKEND_URL", "BACKEND_URL"];

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 三个接口共用的后端地址
    pub backend_url: String,
    /// 分片大小（字节）
    pub segment_size: u64,
    /// 单个请求超时，未设置则不限制
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            segment_size: DEFAULT_SEGMENT_SIZE,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|err| ClientError::invalid_config(err.to_string()))
    }

    pub fn load_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .map_err(|err| ClientError::invalid_config(format!("Can't read {}: {}", path.display(), err)))?;
        Self::from_toml(&content)
    }

    /// 文件 < 环境变量；显式给出的文件必须存在
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None if Path::new(CONFIG_FILE).is_file() => Self::load_file(Path::new(CONFIG_FILE))?,
            None => Config::default(),
        };

        Ok(config.apply_env_with(|key| std::env::var(key).ok()))
    }

    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = BACKEND_URL_ENV.iter().find_map(|key| lookup(key)) {
            self.backend_url = url;
        }
        self
    }

    /// 命令行参数优先级最高
    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.backend_url)
            .map_err(|err| ClientError::invalid_config(format!("backend_url '{}': {}", self.backend_url, err)))?;
        if self.segment_size == 0 {
            return Err(ClientError::invalid_config("segment_size must be greater than 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn backend(&self) -> Result<BackendClient> {
        BackendClient::with_timeout(&self.backend_url, self.request_timeout())
    }

    pub fn splitter(&self) -> Result<SegmentSplitter> {
        SegmentSplitter::new(self.segment_size)
    }
}
