// source/mod.rs — 图片源抽象接口模块
// 定义所有图片源（目前只有 Unsplash）必须实现的通用 Trait
pub mod unsplash;

use crate::error::ToolError;
use crate::query::SearchFilter;
use async_trait::async_trait;

/// 搜索的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 选中图片的 URL
    Found(String),
    /// 结果集为空，这不是错误
    NoMatches,
}

/// 图片源的抽象 Trait
///
/// tools 层只依赖这个接口，测试时可以换成假的实现。
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// 随机取一张图片，返回其 URL
    async fn random_url(&self) -> Result<String, ToolError>;

    /// 按条件搜索，返回第 `filter.result_index` 张图片的 URL
    async fn search_url(&self, filter: &SearchFilter) -> Result<SearchOutcome, ToolError>;
}
