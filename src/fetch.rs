// fetch.rs — HTTP 获取模块
// 所有对外请求都走同一个 reqwest::Client：取原始字节（显示/保存）或取 JSON 文档（元数据查询）

use crate::classify::RawResponse;
use crate::error::ToolError;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 一次获取的结果
#[derive(Debug)]
pub enum FetchResult {
    /// 200 响应的原始字节
    Bytes {
        content: Vec<u8>,
        content_type: String,
    },
    /// 200 响应解析后的 JSON
    Document(serde_json::Value),
    /// 非 200 状态码
    Failure(u16),
}

impl FetchResult {
    /// 取出字节，非 200 转为 ToolError::Status
    pub fn into_bytes(self) -> Result<Vec<u8>, ToolError> {
        match self {
            FetchResult::Bytes { content, .. } => Ok(content),
            FetchResult::Document(value) => Ok(value.to_string().into_bytes()),
            FetchResult::Failure(code) => Err(ToolError::Status(code)),
        }
    }

    /// 取出 JSON 文档，非 200 转为 ToolError::Status
    pub fn into_document(self) -> Result<serde_json::Value, ToolError> {
        match self {
            FetchResult::Document(value) => Ok(value),
            FetchResult::Bytes { content, .. } => {
                serde_json::from_slice(&content).map_err(|e| ToolError::Decode(e.to_string()))
            }
            FetchResult::Failure(code) => Err(ToolError::Status(code)),
        }
    }
}

/// HTTP 获取器
///
/// 内部的 reqwest::Client 带连接池，clone 开销很小，可以在各组件间共享。
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// 创建带超时的获取器
    pub fn new(timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// 发送 GET 请求，返回状态码、内容类型与正文
    ///
    /// 只有网络层失败才返回 Err，非 200 状态码也算成功拿到响应
    pub async fn get(&self, url: &str) -> Result<RawResponse, ToolError> {
        let url = Url::parse(url)
            .map_err(|e| ToolError::InvalidArgument(format!("`{}`: {}", url, e)))?;

        // query 里带着 client_id，日志只记录 host 和 path
        debug!(host = url.host_str().unwrap_or(""), path = url.path(), "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        let body = response.bytes().await?.to_vec();

        debug!(status, content_type = %content_type, len = body.len(), "response");

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// 获取原始字节
    pub async fn fetch_bytes(&self, url: &str) -> Result<FetchResult, ToolError> {
        let raw = self.get(url).await?;
        if raw.status != 200 {
            return Ok(FetchResult::Failure(raw.status));
        }
        Ok(FetchResult::Bytes {
            content: raw.body,
            content_type: raw.content_type,
        })
    }

    /// 获取并解析 JSON 文档
    pub async fn fetch_document(&self, url: &str) -> Result<FetchResult, ToolError> {
        let raw = self.get(url).await?;
        if raw.status != 200 {
            return Ok(FetchResult::Failure(raw.status));
        }
        let value =
            serde_json::from_slice(&raw.body).map_err(|e| ToolError::Decode(e.to_string()))?;
        Ok(FetchResult::Document(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::spawn_upstream;
    use axum::Router;
    use axum::http::{StatusCode, header};
    use axum::routing::get;

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn bytes_keep_content_type() {
        let app = Router::new().route(
            "/img",
            get(|| async { ([(header::CONTENT_TYPE, "image/JPEG")], vec![9u8; 16]) }),
        );
        let base = spawn_upstream(app).await;

        match fetcher().fetch_bytes(&format!("{}/img", base)).await.unwrap() {
            FetchResult::Bytes {
                content,
                content_type,
            } => {
                assert_eq!(content, vec![9u8; 16]);
                assert_eq!(content_type, "image/jpeg");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_200_is_a_failure_value() {
        let app = Router::new().route("/gone", get(|| async { StatusCode::NOT_FOUND }));
        let base = spawn_upstream(app).await;

        let result = fetcher().fetch_bytes(&format!("{}/gone", base)).await.unwrap();
        assert!(matches!(result, FetchResult::Failure(404)));
        assert!(matches!(result.into_bytes(), Err(ToolError::Status(404))));
    }

    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        let app = Router::new().route(
            "/doc",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{oops") }),
        );
        let base = spawn_upstream(app).await;

        let err = fetcher()
            .fetch_document(&format!("{}/doc", base))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        // 先占一个端口再释放，确保没有服务在监听
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher()
            .fetch_bytes(&format!("http://{}/img", addr))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn garbage_url_is_rejected_before_sending() {
        let err = fetcher().get("::not-a-url::").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }
}
