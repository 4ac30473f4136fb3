// query.rs — 搜索请求 URL 构建模块
// 把 SearchFilter 拼成 Unsplash 的完整请求地址，client_id 永远排在第一位

use crate::error::ToolError;
use clap::ValueEnum;
use reqwest::Url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 搜索接口路径
pub const SEARCH_PATH: &str = "search/photos";

/// 随机图片接口路径
pub const RANDOM_PATH: &str = "photos/random";

/// Unsplash 支持的 11 种颜色过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Color {
    BlackAndWhite,
    Black,
    White,
    Yellow,
    Orange,
    Red,
    Purple,
    Magenta,
    Green,
    Teal,
    Blue,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::BlackAndWhite => "black_and_white",
            Color::Black => "black",
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Purple => "purple",
            Color::Magenta => "magenta",
            Color::Green => "green",
            Color::Teal => "teal",
            Color::Blue => "blue",
        }
    }
}

/// 图片方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

/// 排序方式
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortOrder {
    Latest,
    Relevant,
    #[default]
    Popular,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Relevant => "relevant",
            SortOrder::Popular => "popular",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次搜索的全部过滤条件
///
/// `result_index` 指定返回结果中第几张图片，必须小于结果数量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub keyword: Option<String>,
    pub color: Option<Color>,
    pub orientation: Option<Orientation>,
    pub page: u32,
    pub per_page: u32,
    pub order_by: SortOrder,
    pub result_index: usize,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            keyword: None,
            color: None,
            orientation: None,
            page: 1,
            per_page: 30,
            order_by: SortOrder::default(),
            result_index: 0,
        }
    }
}

/// 构建 GET /search/photos 的完整 URL
///
/// 参数顺序固定：client_id, query, color, orientation, page, per_page, order_by。
/// 前三个可选字段缺省时不出现；page 与 per_page 小于 1 时按 1 处理。
pub fn build_search_url(
    base_url: &str,
    client_id: &str,
    filter: &SearchFilter,
) -> Result<Url, ToolError> {
    let mut url = endpoint(base_url, SEARCH_PATH)?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", client_id);

        // 空关键词等同于未提供
        if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            pairs.append_pair("query", keyword);
        }
        if let Some(color) = filter.color {
            pairs.append_pair("color", color.as_str());
        }
        if let Some(orientation) = filter.orientation {
            pairs.append_pair("orientation", orientation.as_str());
        }

        pairs.append_pair("page", &filter.page.max(1).to_string());
        pairs.append_pair("per_page", &filter.per_page.max(1).to_string());
        pairs.append_pair("order_by", filter.order_by.as_str());
    }

    Ok(url)
}

/// 构建 GET /photos/random 的完整 URL
pub fn build_random_url(base_url: &str, client_id: &str, topic: &str) -> Result<Url, ToolError> {
    let mut url = endpoint(base_url, RANDOM_PATH)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", client_id);
        if !topic.trim().is_empty() {
            pairs.append_pair("query", topic);
        }
    }
    Ok(url)
}

/// 把接口路径拼到 base_url 后面
/// base_url 不以 / 结尾时 Url::join 会吞掉最后一段，所以先补齐
fn endpoint(base_url: &str, path: &str) -> Result<Url, ToolError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&base)
        .and_then(|b| b.join(path))
        .map_err(|e| ToolError::Config(format!("invalid base_url `{}`: {}", base_url, e)))
}
