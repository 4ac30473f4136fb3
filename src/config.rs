// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/splashwall/config.toml 读取配置
// 优先级：环境变量 > 配置文件 > 内置默认值

use crate::error::ToolError;
use crate::fetch::DEFAULT_TIMEOUT;
use crate::persist::{DEFAULT_FILE_NAME, DEFAULT_SAVE_DIR};
use crate::query::{Color, Orientation, SortOrder};
use crate::source::unsplash::{DEFAULT_BASE_URL, DEFAULT_RANDOM_TOPIC, UnsplashSettings, UrlSize};
use rust_i18n::t;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "SPLASHWALL_CONFIG";

/// Access Key 的环境变量，按顺序查找
pub const KEY_ENVS: [&str; 2] = ["UNSPLASH_ACCESS_KEY", "UNSPLASH_API"];

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    unsplash: UnsplashConfig,
    #[serde(default)]
    download: DownloadConfig,
    #[serde(default)]
    search: SearchDefaults,
    #[serde(default)]
    http: HttpConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct UnsplashConfig {
    /// Unsplash Access Key（环境变量 UNSPLASH_ACCESS_KEY / UNSPLASH_API 优先）
    access_key: Option<String>,
    /// API 基础地址，默认 https://api.unsplash.com
    base_url: Option<String>,
    /// 取 urls 下的哪个尺寸 (raw / full / regular / small / thumb)，默认 raw
    #[serde(default)]
    url_size: UrlSize,
    /// 随机图片接口附带的关键词，默认 wallpaper
    random_topic: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct DownloadConfig {
    /// 下载目录 (支持 ~、$HOME 等环境变量，相对路径则相对于当前目录)，默认 ./imgs
    save_dir: Option<String>,
    /// 默认文件名，默认 wallpaper.jpg
    file_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct HttpConfig {
    /// 单次请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 搜索参数的默认值，工具调用未提供的字段从这里补齐
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchDefaults {
    /// 默认搜索关键词，"none" 表示不带关键词
    #[serde(default = "default_query", with = "clearable")]
    #[schemars(with = "Option<String>")]
    pub query: Option<String>,
    /// 默认颜色过滤，不配置则不过滤
    #[serde(default, with = "clearable")]
    #[schemars(with = "Option<Color>")]
    pub color: Option<Color>,
    /// 默认方向，壁纸场景优先横向
    #[serde(default = "default_orientation", with = "clearable")]
    #[schemars(with = "Option<Orientation>")]
    pub orientation: Option<Orientation>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub order_by: SortOrder,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            query: default_query(),
            color: None,
            orientation: default_orientation(),
            per_page: default_per_page(),
            order_by: SortOrder::default(),
        }
    }
}

/// 可清空的搜索默认值：None 写成 "none"，重新加载时不会被内置默认值顶替
mod clearable {
    use serde::de::{DeserializeOwned, IntoDeserializer};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub const CLEARED: &str = "none";

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(CLEARED),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == CLEARED {
            return Ok(None);
        }
        T::deserialize(raw.into_deserializer()).map(Some)
    }
}

fn default_query() -> Option<String> {
    Some("nature".to_string())
}
fn default_orientation() -> Option<Orientation> {
    Some(Orientation::Landscape)
}
fn default_per_page() -> u32 {
    30
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// 应用全局配置项
///
/// 启动时读取一次，之后以只读方式注入各组件
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Unsplash Access Key (优先级：ENV > TOML)
    pub access_key: Option<String>,
    /// 配置文件里写的 key，保存时只回写它，避免把环境变量持久化
    file_access_key: Option<String>,
    pub base_url: String,
    pub url_size: UrlSize,
    pub random_topic: String,
    /// 下载目录（未展开）
    pub save_dir: String,
    /// 默认文件名
    pub file_name: String,
    pub search_defaults: SearchDefaults,
    pub timeout_secs: u64,
    /// 配置文件所在路径
    pub config_path: PathBuf,
}

impl AppConfig {
    /// 从配置文件与环境变量初始化
    pub fn new() -> Self {
        let config_path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();
        Self::resolve(config_path, config_file, |key| env::var(key).ok())
    }

    /// 合并配置文件与环境变量，`lookup` 用于读取环境变量
    fn resolve(
        config_path: PathBuf,
        file: ConfigFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env_key = KEY_ENVS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty());
        let file_access_key = file.unsplash.access_key;

        Self {
            access_key: env_key.or_else(|| file_access_key.clone()),
            file_access_key,
            base_url: file
                .unsplash
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            url_size: file.unsplash.url_size,
            random_topic: file
                .unsplash
                .random_topic
                .unwrap_or_else(|| DEFAULT_RANDOM_TOPIC.to_string()),
            save_dir: file
                .download
                .save_dir
                .unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string()),
            file_name: file
                .download
                .file_name
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            search_defaults: file.search,
            timeout_secs: file.http.timeout_secs.max(1),
            config_path,
        }
    }

    /// 辅助函数：解析 TOML 配置文件，不存在或格式错误时返回 None
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// 取 Access Key，缺失时立即报配置错误
    pub fn require_access_key(&self) -> Result<&str, ToolError> {
        self.access_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ToolError::Config(t!("error_missing_key").to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 生成 Unsplash 客户端参数
    pub fn unsplash_settings(&self) -> Result<UnsplashSettings, ToolError> {
        Ok(UnsplashSettings {
            base_url: self.base_url.clone(),
            access_key: self.require_access_key()?.to_string(),
            url_size: self.url_size,
            random_topic: self.random_topic.clone(),
        })
    }

    /// 修改单个配置项（不保存）
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ToolError> {
        let invalid = || {
            ToolError::InvalidArgument(
                t!("config_error_value", key => key, value => value).to_string(),
            )
        };
        let optional = |v: &str| {
            if v.is_empty() || v == clearable::CLEARED {
                None
            } else {
                Some(v.to_string())
            }
        };

        match key {
            "access_key" => self.file_access_key = optional(value),
            "base_url" => self.base_url = value.to_string(),
            "url_size" => self.url_size = value.parse().map_err(|_| invalid())?,
            "random_topic" => self.random_topic = value.to_string(),
            "save_dir" => self.save_dir = value.to_string(),
            "file_name" => self.file_name = value.to_string(),
            "query" => self.search_defaults.query = optional(value),
            "color" => {
                self.search_defaults.color = match optional(value) {
                    Some(v) => Some(parse_value(&v).ok_or_else(invalid)?),
                    None => None,
                }
            }
            "orientation" => {
                self.search_defaults.orientation = match optional(value) {
                    Some(v) => Some(parse_value(&v).ok_or_else(invalid)?),
                    None => None,
                }
            }
            "per_page" => {
                self.search_defaults.per_page = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(invalid)?
            }
            "order_by" => {
                self.search_defaults.order_by = parse_value(value).ok_or_else(invalid)?
            }
            "timeout_secs" => {
                self.timeout_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(invalid)?
            }
            _ => {
                return Err(ToolError::InvalidArgument(
                    t!("config_error_unknown_key", key => key).to_string(),
                ));
            }
        }
        Ok(())
    }

    fn to_file(&self, mask_key: bool) -> ConfigFile {
        let access_key = if mask_key {
            self.file_access_key.as_ref().map(|_| "********".to_string())
        } else {
            self.file_access_key.clone()
        };

        ConfigFile {
            unsplash: UnsplashConfig {
                access_key,
                base_url: Some(self.base_url.clone()),
                url_size: self.url_size,
                random_topic: Some(self.random_topic.clone()),
            },
            download: DownloadConfig {
                save_dir: Some(self.save_dir.clone()),
                file_name: Some(self.file_name.clone()),
            },
            search: self.search_defaults.clone(),
            http: HttpConfig {
                timeout_secs: self.timeout_secs,
            },
        }
    }

    /// 将配置保存回文件
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(&self.to_file(false))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(&self.config_path, toml_str)
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> String {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    }

    /// 将当前配置转换为 TOML 字符串，access_key 打码
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(&self.to_file(true))
            .unwrap_or_else(|_| "# Error serializing config".to_string())
    }
}

/// 借用 serde 的 snake_case 名称解析枚举值
fn parse_value<T: serde::de::DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// $HOME/.config/splashwall/config.toml
fn default_config_path() -> PathBuf {
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("splashwall").join("config.toml")
}
