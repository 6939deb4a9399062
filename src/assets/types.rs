use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服务端管理的素材记录，客户端只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    /// 服务端原样返回的时间戳，按需解析
    pub created_at: String,
    pub updated_at: String,
}

impl AssetRecord {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// 查询在展示层的三种状态
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for QueryState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(err) => QueryState::Error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_and_type_field() {
        let json = r#"{
            "id": "a1",
            "name": "Final match",
            "description": "Logo visible for 42 seconds",
            "type": "video",
            "url": "https://cdn.example.com/a1.mp4",
            "createdAt": "2025-03-01T10:00:00.000Z",
            "updatedAt": "2025-03-01T10:05:00Z"
        }"#;

        let record: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "video");
        assert_eq!(record.created().unwrap().to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert!(record.updated().is_some());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "video");
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn odd_timestamps_still_decode() {
        let json = r#"[
            {"id":"a","name":"A","description":"d","type":"video","url":"u",
             "createdAt":"2025-03-01 10:00","updatedAt":""}
        ]"#;

        let records: Vec<AssetRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].created_at, "2025-03-01 10:00");
        assert!(records[0].created().is_none());
        assert!(records[0].updated().is_none());
    }

    #[test]
    fn query_state_from_result() {
        let ok: QueryState<u8> = Ok::<u8, String>(1).into();
        assert_eq!(ok.data(), Some(&1));

        let err: QueryState<u8> = Err::<u8, String>("boom".to_string()).into();
        assert_eq!(err, QueryState::Error("boom".to_string()));
        assert!(!err.is_loading());
    }
}
