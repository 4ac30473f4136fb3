// persist.rs — 文件保存模块
// 把下载到的字节写入 目录/文件名，缺失的父目录会被逐级创建

use crate::error::ToolError;
use rust_i18n::t;
use shellexpand::tilde;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// 未指定文件名时使用的默认值
pub const DEFAULT_FILE_NAME: &str = "wallpaper.jpg";

/// 未指定目录时使用的默认值
pub const DEFAULT_SAVE_DIR: &str = "./imgs";

/// 一次保存的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// 保存后文件的规范化绝对路径
    pub resolved_path: PathBuf,
    pub succeeded: bool,
}

/// 展开目录中的 ~ 和环境变量
pub fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(tilde(dir).into_owned())
}

/// 保存字节到 `dir/file_name`
///
/// - `file_name` 为空或缺省时使用 `default_name`
/// - 文件已存在则覆盖，相同输入重复写入结果一致
/// - 文件名不能包含路径分隔符
pub async fn save_bytes(
    bytes: &[u8],
    dir: &Path,
    file_name: Option<&str>,
    default_name: &str,
) -> Result<DownloadOutcome, ToolError> {
    let name = file_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(default_name);
    check_file_name(name)?;

    fs::create_dir_all(dir).await?;

    let save_path = dir.join(name);
    let mut file = File::create(&save_path).await?;
    file.write_all(bytes).await?;
    // tokio 的 File 内部有缓冲，必须 flush 才能保证数据落盘后再返回
    file.flush().await?;

    let resolved_path = fs::canonicalize(&save_path).await?;
    info!(path = %resolved_path.display(), bytes = bytes.len(), "saved");

    Ok(DownloadOutcome {
        resolved_path,
        succeeded: true,
    })
}

/// 文件名只能是单独的一段
fn check_file_name(name: &str) -> Result<(), ToolError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ToolError::InvalidArgument(
            t!("error_file_name", name => name).to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_missing_parents() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("a").join("b").join("c");
        let bytes = b"not really a jpeg".to_vec();

        let outcome = save_bytes(&bytes, &dir, Some("x.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();

        assert!(outcome.succeeded);
        assert!(outcome.resolved_path.is_absolute());
        assert!(outcome.resolved_path.is_file());
        assert_eq!(std::fs::read(&outcome.resolved_path).unwrap(), bytes);
    }

    #[tokio::test]
    async fn resolved_path_is_canonical() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        let dir = temp.path().join("a").join("..").join("imgs");

        let outcome = save_bytes(b"x", &dir, Some("t.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();

        let expected = temp.path().canonicalize().unwrap().join("imgs").join("t.jpg");
        assert_eq!(outcome.resolved_path, expected);
    }

    #[tokio::test]
    async fn writing_twice_is_idempotent() {
        let temp = tempdir().unwrap();
        let bytes = vec![42u8; 1024];

        let first = save_bytes(&bytes, temp.path(), Some("same.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();
        let second = save_bytes(&bytes, temp.path(), Some("same.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second.resolved_path).unwrap(), bytes);
    }

    #[tokio::test]
    async fn overwrite_truncates_longer_content() {
        let temp = tempdir().unwrap();
        save_bytes(&[1u8; 100], temp.path(), Some("t.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();
        let outcome = save_bytes(&[2u8; 10], temp.path(), Some("t.jpg"), DEFAULT_FILE_NAME)
            .await
            .unwrap();
        assert_eq!(std::fs::read(outcome.resolved_path).unwrap(), vec![2u8; 10]);
    }

    #[tokio::test]
    async fn empty_name_falls_back_to_default() {
        let temp = tempdir().unwrap();
        let outcome = save_bytes(b"x", temp.path(), Some("  "), DEFAULT_FILE_NAME)
            .await
            .unwrap();
        assert_eq!(
            outcome.resolved_path.file_name().unwrap(),
            std::ffi::OsStr::new(DEFAULT_FILE_NAME)
        );

        let outcome = save_bytes(b"x", temp.path(), None, "other.png").await.unwrap();
        assert!(outcome.resolved_path.ends_with("other.png"));
    }

    #[tokio::test]
    async fn name_with_separator_is_rejected() {
        let temp = tempdir().unwrap();
        for bad in ["../escape.jpg", "sub/dir.jpg", ".."] {
            let err = save_bytes(b"x", temp.path(), Some(bad), DEFAULT_FILE_NAME)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "invalid_argument", "{}", bad);
        }
    }

    #[tokio::test]
    async fn unwritable_target_is_an_io_error() {
        let temp = tempdir().unwrap();
        // 用一个普通文件占住目录位置，create_dir_all 必然失败
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = save_bytes(b"x", &blocker.join("inner"), None, DEFAULT_FILE_NAME)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_dir("~/pics");
        assert!(!expanded.starts_with("~"));
        assert_eq!(expand_dir("./imgs"), PathBuf::from("./imgs"));
    }
}
