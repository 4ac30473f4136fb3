// tools.rs — 对外暴露的工具
// 每个工具一个参数结构体（schemars 生成 input schema）和一个 Toolbox 方法，
// MCP 服务与命令行都直接调用这些方法。失败统一渲染为 ToolReply 文本，不让调用方崩溃。

use crate::classify::{Classification, classify};
use crate::config::{AppConfig, SearchDefaults};
use crate::display::{ImageDisplay, SystemViewer};
use crate::error::ToolError;
use crate::fetch::Fetcher;
use crate::persist::{expand_dir, save_bytes};
use crate::query::{Color, Orientation, SearchFilter, SortOrder};
use crate::setter;
use crate::source::unsplash::UnsplashClient;
use crate::source::{PhotoSource, SearchOutcome};
use rust_i18n::t;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

/// show_img 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowImgArgs {
    /// 图片的 URL 地址
    pub image_url: String,
}

/// get_filtered_image_url 参数，缺省字段从配置的搜索默认值补齐
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FilteredImageArgs {
    /// 搜索关键词
    pub query: Option<String>,
    /// 颜色过滤
    pub color: Option<Color>,
    /// 图片方向
    pub orientation: Option<Orientation>,
    /// 页码，从 1 开始
    pub page: Option<u32>,
    /// 每页数量
    pub per_page: Option<u32>,
    /// 排序方式
    pub order_by: Option<SortOrder>,
    /// 返回结果中的第几张（从 0 开始）
    #[serde(alias = "get_index")]
    pub result_index: Option<usize>,
}

/// download_one_image 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DownloadArgs {
    /// 要下载的图片 URL
    pub image_url: String,
    /// 保存目录，默认 ./imgs
    pub save_dir: Option<String>,
    /// 保存文件名，默认 wallpaper.jpg
    pub img_name: Option<String>,
}

/// set_wallpaper 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetWallpaperArgs {
    /// 本地图片路径
    pub image_path: String,
}

/// inspect_url 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct InspectArgs {
    /// 要分析的 URL
    pub url: String,
}

/// 工具调用的文本结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
    /// 失败时的错误类别，见 ToolError::kind
    pub kind: Option<&'static str>,
}

impl ToolReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            kind: None,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            text: err.localized(),
            is_error: true,
            kind: Some(err.kind()),
        }
    }
}

impl From<Result<String, ToolError>> for ToolReply {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(text) => ToolReply::ok(text),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "tool failed");
                ToolReply::error(&err)
            }
        }
    }
}

/// 工具默认值
#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub save_dir: String,
    pub file_name: String,
    pub search: SearchDefaults,
}

/// 工具集合，持有注入的图片源、获取器与显示器
pub struct Toolbox {
    source: Arc<dyn PhotoSource>,
    fetcher: Fetcher,
    display: Arc<dyn ImageDisplay>,
    defaults: ToolDefaults,
}

impl Toolbox {
    pub fn new(
        source: Arc<dyn PhotoSource>,
        fetcher: Fetcher,
        display: Arc<dyn ImageDisplay>,
        defaults: ToolDefaults,
    ) -> Self {
        Self {
            source,
            fetcher,
            display,
            defaults,
        }
    }

    /// 按配置组装真实依赖，缺少 Access Key 时直接失败
    pub fn from_config(config: &AppConfig) -> Result<Self, ToolError> {
        let settings = config.unsplash_settings()?;
        let fetcher = Fetcher::new(config.timeout())?;
        let source = UnsplashClient::new(fetcher.clone(), settings);

        Ok(Self::new(
            Arc::new(source),
            fetcher,
            Arc::new(SystemViewer::default()),
            ToolDefaults {
                save_dir: config.save_dir.clone(),
                file_name: config.file_name.clone(),
                search: config.search_defaults.clone(),
            },
        ))
    }

    /// 下载并显示图片，不看 Content-Type，直接按字节解码
    pub async fn show_img(&self, args: &ShowImgArgs) -> Result<String, ToolError> {
        let raw = self.fetcher.get(&args.image_url).await?;
        if raw.status != 200 {
            return Err(ToolError::Status(raw.status));
        }

        let img = image::load_from_memory(&raw.body).map_err(|e| {
            ToolError::Decode(
                t!("error_not_image", content_type => raw.content_type, reason => e).to_string(),
            )
        })?;
        self.display.show(&img)?;
        Ok(t!("show_success").to_string())
    }

    /// 随机壁纸 URL
    pub async fn get_random_wallpaper(&self) -> Result<String, ToolError> {
        self.source.random_url().await
    }

    /// 条件搜索，返回选中图片的 URL；没有结果时返回提示文本而不是错误
    pub async fn get_filtered_image_url(
        &self,
        args: &FilteredImageArgs,
    ) -> Result<String, ToolError> {
        let filter = self.filter_from(args);
        match self.source.search_url(&filter).await? {
            SearchOutcome::Found(url) => Ok(url),
            SearchOutcome::NoMatches => Ok(t!("no_matches").to_string()),
        }
    }

    /// 下载一张图片到本地
    pub async fn download_one_image(&self, args: &DownloadArgs) -> Result<String, ToolError> {
        let bytes = self.fetcher.fetch_bytes(&args.image_url).await?.into_bytes()?;

        let dir = args
            .save_dir
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(self.defaults.save_dir.as_str());
        let outcome = save_bytes(
            &bytes,
            &expand_dir(dir),
            args.img_name.as_deref(),
            &self.defaults.file_name,
        )
        .await?;

        Ok(t!("download_saved", path => outcome.resolved_path.display()).to_string())
    }

    /// 把本地图片设为系统壁纸
    pub async fn set_wallpaper(&self, args: &SetWallpaperArgs) -> Result<String, ToolError> {
        let path = expand_dir(&args.image_path);
        // 系统调用是阻塞的，放到阻塞线程池里执行
        let applied = tokio::task::spawn_blocking(move || setter::set_from_path(path))
            .await
            .map_err(|e| ToolError::Platform(e.to_string()))??;

        Ok(t!("set_done", path => applied.display()).to_string())
    }

    /// 分析任意 URL 的响应；图片会被显示出来
    pub async fn inspect_url(&self, args: &InspectArgs) -> Result<String, ToolError> {
        let raw = self.fetcher.get(&args.url).await?;
        let report = classify(&raw);
        let mut text = report.describe();

        if let Classification::Image(img) = &report.kind {
            let line = match self.display.show(img) {
                Ok(()) => t!("inspect_image_shown").to_string(),
                Err(e) => e.localized(),
            };
            text.push('\n');
            text.push_str(&line);
        }
        Ok(text)
    }

    fn filter_from(&self, args: &FilteredImageArgs) -> SearchFilter {
        let defaults = &self.defaults.search;
        SearchFilter {
            keyword: args.query.clone().or_else(|| defaults.query.clone()),
            color: args.color.or(defaults.color),
            orientation: args.orientation.or(defaults.orientation),
            page: args.page.unwrap_or(1),
            per_page: args.per_page.unwrap_or(defaults.per_page),
            order_by: args.order_by.unwrap_or(defaults.order_by),
            result_index: args.result_index.unwrap_or(0),
        }
    }
}
