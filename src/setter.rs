// setter.rs — 系统壁纸设置模块

use crate::error::ToolError;
use std::path::{Path, PathBuf};
use tracing::info;

/// 将指定路径的图片设置为系统壁纸，返回实际使用的绝对路径
///
/// # 参数
/// - `path`: 图片路径，相对路径以当前目录为基准
///
/// 文件不存在时返回 Io 错误，不会调用系统接口
pub fn set_from_path(path: impl AsRef<Path>) -> Result<PathBuf, ToolError> {
    let absolute = std::path::absolute(path.as_ref())?;

    // metadata 顺带检查文件是否存在
    let meta = std::fs::metadata(&absolute)?;
    if !meta.is_file() {
        return Err(ToolError::InvalidArgument(format!(
            "{} is not a file",
            absolute.display()
        )));
    }

    info!(path = %absolute.display(), "setting wallpaper");
    apply(&absolute)?;
    Ok(absolute)
}

/// 调用第三方库设置壁纸，库内部会按操作系统选择相应的 API
#[cfg(any(windows, target_os = "macos", target_os = "linux"))]
fn apply(path: &Path) -> Result<(), ToolError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ToolError::InvalidArgument(rust_i18n::t!("error_utf8").to_string()))?;

    wallpaper::set_from_path(path_str).map_err(|e| ToolError::Platform(e.to_string()))
}

#[cfg(not(any(windows, target_os = "macos", target_os = "linux")))]
fn apply(_path: &Path) -> Result<(), ToolError> {
    Err(ToolError::UnsupportedPlatform(std::env::consts::OS))
}
