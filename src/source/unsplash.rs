// unsplash.rs — Unsplash API 客户端模块
// 负责随机图片与条件搜索两个接口，只负责拿到图片 URL，不下载图片本身
//
// 注意：Access Key 以 client_id 查询参数传递，日志中不要打印完整 URL。

use super::{PhotoSource, SearchOutcome};
use crate::error::ToolError;
use crate::fetch::Fetcher;
use crate::query::{SearchFilter, build_random_url, build_search_url};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 默认 API 地址
pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// 随机图片接口默认附带的关键词
pub const DEFAULT_RANDOM_TOPIC: &str = "wallpaper";

/// 选用 `urls` 下的哪一个尺寸
///
/// raw 为原始无损图片；regular 是 1080 宽的压缩版本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UrlSize {
    #[default]
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl UrlSize {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlSize::Raw => "raw",
            UrlSize::Full => "full",
            UrlSize::Regular => "regular",
            UrlSize::Small => "small",
            UrlSize::Thumb => "thumb",
        }
    }

    fn pick(self, urls: &PhotoUrls) -> Option<&str> {
        match self {
            UrlSize::Raw => urls.raw.as_deref(),
            UrlSize::Full => urls.full.as_deref(),
            UrlSize::Regular => urls.regular.as_deref(),
            UrlSize::Small => urls.small.as_deref(),
            UrlSize::Thumb => urls.thumb.as_deref(),
        }
    }
}

impl std::str::FromStr for UrlSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(UrlSize::Raw),
            "full" => Ok(UrlSize::Full),
            "regular" => Ok(UrlSize::Regular),
            "small" => Ok(UrlSize::Small),
            "thumb" => Ok(UrlSize::Thumb),
            other => Err(format!("unknown url size `{}`", other)),
        }
    }
}

/// GET /search/photos 返回的 JSON 根对象
#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

/// 单张图片，只取需要的字段
#[derive(Deserialize, Debug)]
struct Photo {
    #[serde(default)]
    id: Option<String>,
    urls: PhotoUrls,
}

/// 各尺寸图片 URL
#[derive(Deserialize, Debug, Default)]
struct PhotoUrls {
    raw: Option<String>,
    full: Option<String>,
    regular: Option<String>,
    small: Option<String>,
    thumb: Option<String>,
}

/// Unsplash 客户端的连接参数
#[derive(Debug, Clone)]
pub struct UnsplashSettings {
    pub base_url: String,
    pub access_key: String,
    pub url_size: UrlSize,
    pub random_topic: String,
}

/// Unsplash API 客户端
pub struct UnsplashClient {
    fetcher: Fetcher,
    settings: UnsplashSettings,
}

impl UnsplashClient {
    pub fn new(fetcher: Fetcher, settings: UnsplashSettings) -> Self {
        Self { fetcher, settings }
    }

    fn url_of(&self, photo: &Photo) -> Result<String, ToolError> {
        self.settings
            .url_size
            .pick(&photo.urls)
            .map(str::to_string)
            .ok_or_else(|| {
                ToolError::Decode(format!(
                    "photo {} has no urls.{}",
                    photo.id.as_deref().unwrap_or("?"),
                    self.settings.url_size.as_str()
                ))
            })
    }
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    async fn random_url(&self) -> Result<String, ToolError> {
        let url = build_random_url(
            &self.settings.base_url,
            &self.settings.access_key,
            &self.settings.random_topic,
        )?;

        let document = self.fetcher.fetch_document(url.as_str()).await?.into_document()?;
        let photo: Photo =
            serde_json::from_value(document).map_err(|e| ToolError::Decode(e.to_string()))?;

        let image_url = self.url_of(&photo)?;
        info!(id = photo.id.as_deref().unwrap_or("?"), "random photo");
        Ok(image_url)
    }

    async fn search_url(&self, filter: &SearchFilter) -> Result<SearchOutcome, ToolError> {
        let url = build_search_url(&self.settings.base_url, &self.settings.access_key, filter)?;

        let document = self.fetcher.fetch_document(url.as_str()).await?.into_document()?;
        let response: SearchResponse =
            serde_json::from_value(document).map_err(|e| ToolError::Decode(e.to_string()))?;

        debug!(count = response.results.len(), "search results");

        if response.results.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }

        let len = response.results.len();
        let photo = response
            .results
            .get(filter.result_index)
            .ok_or(ToolError::Index {
                index: filter.result_index,
                len,
            })?;

        Ok(SearchOutcome::Found(self.url_of(photo)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DEFAULT_TIMEOUT;
    use crate::testutil::spawn_upstream;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    const KEY: &str = "test-key";

    fn client(base_url: String, url_size: UrlSize) -> UnsplashClient {
        UnsplashClient::new(
            Fetcher::new(DEFAULT_TIMEOUT).unwrap(),
            UnsplashSettings {
                base_url,
                access_key: KEY.to_string(),
                url_size,
                random_topic: DEFAULT_RANDOM_TOPIC.to_string(),
            },
        )
    }

    /// 模拟 Unsplash：校验 client_id，按 query 返回不同数量的结果
    async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        if params.get("client_id").map(String::as_str) != Some(KEY) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        let results: Vec<_> = match params.get("query").map(String::as_str) {
            Some("nothing") => vec![],
            _ => (0..3)
                .map(|i| {
                    json!({
                        "id": format!("p{}", i),
                        "urls": {"raw": format!("https://x/{}.jpg", i)}
                    })
                })
                .collect(),
        };
        Json(json!({"total": results.len(), "results": results})).into_response()
    }

    async fn upstream() -> String {
        let app = Router::new()
            .route(
                "/photos/random",
                get(|| async {
                    Json(json!({
                        "id": "abc",
                        "urls": {"raw": "https://x/img.jpg", "regular": "https://x/img-1080.jpg"}
                    }))
                }),
            )
            .route("/search/photos", get(search));
        spawn_upstream(app).await
    }

    fn filter(keyword: &str, result_index: usize) -> SearchFilter {
        SearchFilter {
            keyword: Some(keyword.to_string()),
            result_index,
            ..SearchFilter::default()
        }
    }

    #[tokio::test]
    async fn random_returns_raw_url() {
        let base = upstream().await;
        let url = client(base, UrlSize::Raw).random_url().await.unwrap();
        assert_eq!(url, "https://x/img.jpg");
    }

    #[tokio::test]
    async fn random_size_is_configurable() {
        let base = upstream().await;
        let url = client(base, UrlSize::Regular).random_url().await.unwrap();
        assert_eq!(url, "https://x/img-1080.jpg");
    }

    #[tokio::test]
    async fn random_missing_size_is_a_decode_error() {
        let base = upstream().await;
        let err = client(base, UrlSize::Thumb).random_url().await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn random_non_200_carries_status() {
        let app = Router::new().route(
            "/photos/random",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = spawn_upstream(app).await;
        let err = client(base, UrlSize::Raw).random_url().await.unwrap_err();
        assert!(matches!(err, ToolError::Status(503)));
        assert!(err.localized().contains("503"));
    }

    #[tokio::test]
    async fn search_picks_requested_index() {
        let base = upstream().await;
        let outcome = client(base, UrlSize::Raw)
            .search_url(&filter("nature", 2))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Found("https://x/2.jpg".into()));
    }

    #[tokio::test]
    async fn search_without_results_is_no_matches() {
        let base = upstream().await;
        let outcome = client(base, UrlSize::Raw)
            .search_url(&filter("nothing", 0))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NoMatches);
    }

    #[tokio::test]
    async fn search_index_out_of_range_is_an_index_error() {
        let base = upstream().await;
        let err = client(base, UrlSize::Raw)
            .search_url(&filter("nature", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Index { index: 3, len: 3 }));
        assert_ne!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn wrong_key_surfaces_401() {
        let base = upstream().await;
        let mut c = client(base, UrlSize::Raw);
        c.settings.access_key = "wrong".into();
        let err = c.search_url(&filter("nature", 0)).await.unwrap_err();
        assert!(matches!(err, ToolError::Status(401)));
    }
}
