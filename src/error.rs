// error.rs — 统一错误类型
// 每个工具在自己的边界把失败转换为 ToolError，再由 tools 层渲染成文本返回给调用方

use rust_i18n::t;
use thiserror::Error;

/// 工具调用可能出现的全部失败
#[derive(Debug, Error)]
pub enum ToolError {
    /// 网络层错误（DNS、连接、超时）
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 上游返回了非 200 状态码
    #[error("unexpected status code {0}")]
    Status(u16),

    /// JSON 或图片解码失败
    #[error("decode error: {0}")]
    Decode(String),

    /// result_index 超出结果数量，属于调用方输入错误
    #[error("result index {index} out of range ({len} results)")]
    Index { index: usize, len: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 系统壁纸接口调用失败
    #[error("platform error: {0}")]
    Platform(String),

    #[cfg_attr(
        any(windows, target_os = "macos", target_os = "linux"),
        allow(dead_code)
    )]
    #[error("wallpaper setting is not supported on {0}")]
    UnsupportedPlatform(&'static str),

    /// 预览文件无法用系统看图程序打开
    #[error("display error: {0}")]
    Display(String),

    /// 缺少 API Key 等配置问题
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ToolError {
    /// 稳定的错误类别标签，调用方据此分支而不必匹配文本
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Transport(_) => "transport",
            ToolError::Status(_) => "http_status",
            ToolError::Decode(_) => "decode",
            ToolError::Index { .. } => "index",
            ToolError::Io(_) => "io",
            ToolError::Platform(_) => "platform",
            ToolError::UnsupportedPlatform(_) => "unsupported_platform",
            ToolError::Display(_) => "display",
            ToolError::Config(_) => "config",
            ToolError::InvalidArgument(_) => "invalid_argument",
        }
    }

    /// 面向用户的本地化描述
    pub fn localized(&self) -> String {
        match self {
            ToolError::Transport(e) => {
                if e.is_timeout() {
                    t!("error_timeout").to_string()
                } else {
                    t!("error_transport", reason => e).to_string()
                }
            }
            ToolError::Status(code) => t!("error_status", code => code).to_string(),
            ToolError::Decode(reason) => t!("error_decode", reason => reason).to_string(),
            ToolError::Index { index, len } => {
                t!("error_index", index => index, len => len).to_string()
            }
            ToolError::Io(e) => t!("error_io", reason => e).to_string(),
            ToolError::Platform(reason) => t!("error_set_failed", reason => reason).to_string(),
            ToolError::UnsupportedPlatform(os) => t!("error_unsupported", os => os).to_string(),
            ToolError::Display(reason) => t!("error_display", reason => reason).to_string(),
            ToolError::Config(reason) => t!("error_config", reason => reason).to_string(),
            ToolError::InvalidArgument(reason) => {
                t!("error_argument", reason => reason).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_carries_code() {
        let err = ToolError::Status(503);
        assert_eq!(err.kind(), "http_status");
        assert!(err.localized().contains("503"));
    }

    #[test]
    fn index_error_is_its_own_kind() {
        let err = ToolError::Index { index: 5, len: 2 };
        assert_eq!(err.kind(), "index");
        let text = err.localized();
        assert!(text.contains('5'));
        assert!(text.contains('2'));
    }

    #[test]
    fn display_failure_is_not_a_wallpaper_failure() {
        let err = ToolError::Display("no viewer".into());
        assert_eq!(err.kind(), "display");
        assert_ne!(
            err.localized(),
            ToolError::Platform("no viewer".into()).localized()
        );
        assert!(err.localized().contains("no viewer"));
    }
}
