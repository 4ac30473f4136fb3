// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义所有子命令和参数

use crate::query::{Color, Orientation, SortOrder};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Unsplash 壁纸工具
///
/// 以 MCP 工具服务的形式向 agent 暴露取图、下载与设置壁纸操作，
/// 每个工具也可以直接在命令行调用。
#[derive(Parser)]
#[command(name = "splashwall")]
#[command(version)]
#[command(author)]
#[command(about = "Unsplash 壁纸工具 — 取图、下载、设置桌面壁纸，可作为 MCP 服务运行")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 以 MCP stdio 服务运行（供 agent 调用）
    ///
    /// 用法示例:
    ///   splashwall serve
    Serve,

    /// 获取一张随机壁纸的 URL
    Random,

    /// 按条件搜索并输出第 N 张图片的 URL
    ///
    /// 用法示例:
    ///   splashwall search -q mountains -c blue
    ///   splashwall search --orientation portrait --order-by latest -i 3
    Search {
        /// 搜索关键词
        #[arg(short, long)]
        query: Option<String>,

        /// 颜色过滤
        #[arg(short, long, value_enum)]
        color: Option<Color>,

        /// 图片方向
        #[arg(short, long, value_enum)]
        orientation: Option<Orientation>,

        /// 页码
        #[arg(short, long)]
        page: Option<u32>,

        /// 每页数量
        #[arg(long)]
        per_page: Option<u32>,

        /// 排序方式
        #[arg(long, value_enum)]
        order_by: Option<SortOrder>,

        /// 取第几张结果（从 0 开始）
        #[arg(short = 'i', long, value_name = "N")]
        result_index: Option<usize>,
    },

    /// 下载并显示图片
    Show {
        /// 图片 URL
        image_url: String,
    },

    /// 分析任意 URL 的响应内容
    Inspect {
        url: String,
    },

    /// 下载一张图片到本地
    ///
    /// 用法示例:
    ///   splashwall download https://images.unsplash.com/photo-xxx -d ~/Pictures -n bg.jpg
    Download {
        /// 图片 URL
        image_url: String,

        /// 保存目录（默认取配置 download.save_dir）
        #[arg(short = 'd', long)]
        save_dir: Option<String>,

        /// 文件名（默认取配置 download.file_name）
        #[arg(short = 'n', long)]
        img_name: Option<String>,
    },

    /// 将本地图片设置为系统壁纸
    Set {
        /// 图片的本地路径
        image_path: String,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   splashwall config show
    ///   splashwall config set url_size regular
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置（access_key 打码）
    Dump,
    /// 设置配置项并保存
    Set {
        /// 键名 (access_key, base_url, url_size, random_topic, save_dir, file_name,
        /// query, color, orientation, per_page, order_by, timeout_secs)
        key: String,
        /// 值，"none" 表示清空可选项
        value: String,
    },
}
