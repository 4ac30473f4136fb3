// display.rs — 图片显示模块
// 显示是纯副作用，单独抽成 trait，取图与解码逻辑不依赖真实的显示环境

use crate::error::ToolError;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::PathBuf;
use tracing::debug;

/// 预览文件名固定，每次显示覆盖上一张
const PREVIEW_FILE: &str = "preview.png";

/// 图片显示接口
pub trait ImageDisplay: Send + Sync {
    fn show(&self, image: &DynamicImage) -> Result<(), ToolError>;
}

/// 写出 PNG 预览文件并用系统默认看图程序打开
pub struct SystemViewer {
    preview_dir: PathBuf,
}

impl Default for SystemViewer {
    fn default() -> Self {
        Self {
            preview_dir: std::env::temp_dir().join("splashwall"),
        }
    }
}

impl SystemViewer {
    fn write_preview(&self, image: &DynamicImage) -> Result<PathBuf, ToolError> {
        std::fs::create_dir_all(&self.preview_dir)?;
        let path = self.preview_dir.join(PREVIEW_FILE);

        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| match e {
                ImageError::IoError(io) => ToolError::Io(io),
                other => ToolError::Decode(other.to_string()),
            })?;
        Ok(path)
    }
}

impl ImageDisplay for SystemViewer {
    fn show(&self, image: &DynamicImage) -> Result<(), ToolError> {
        let path = self.write_preview(image)?;
        debug!(path = %path.display(), "opening preview");
        open::that(&path).map_err(|e| ToolError::Display(e.to_string()))
    }
}
