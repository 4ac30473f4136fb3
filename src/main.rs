// main.rs — 程序入口
// 负责初始化日志与多语言、解析命令行参数、分发子命令

mod classify;
mod cli;
mod config;
mod display;
mod error;
mod fetch;
mod persist;
mod query;
mod server;
mod setter;
mod source;
mod tools;

#[cfg(test)]
mod testutil;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales", fallback = "en");

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands, ConfigAction};
use config::AppConfig;
use rust_i18n::t;
use std::process::ExitCode;
use tools::{
    DownloadArgs, FilteredImageArgs, InspectArgs, SetWallpaperArgs, ShowImgArgs, ToolReply,
    Toolbox,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // 日志写到 stderr，stdout 留给 JSON-RPC 和命令输出
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    let cli = Cli::parse();
    let mut config = AppConfig::new();

    let result = match cli.command {
        Commands::Config { action } => {
            handle_config(&mut config, &action)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "splashwall",
                &mut std::io::stdout(),
            );
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Serve => {
            server::run_stdio(build_toolbox(&config)?).await?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Random => build_toolbox(&config)?.get_random_wallpaper().await,
        Commands::Search {
            query,
            color,
            orientation,
            page,
            per_page,
            order_by,
            result_index,
        } => {
            let args = FilteredImageArgs {
                query,
                color,
                orientation,
                page,
                per_page,
                order_by,
                result_index,
            };
            build_toolbox(&config)?.get_filtered_image_url(&args).await
        }
        Commands::Show { image_url } => {
            build_toolbox(&config)?
                .show_img(&ShowImgArgs { image_url })
                .await
        }
        Commands::Inspect { url } => {
            build_toolbox(&config)?
                .inspect_url(&InspectArgs { url })
                .await
        }
        Commands::Download {
            image_url,
            save_dir,
            img_name,
        } => {
            let args = DownloadArgs {
                image_url,
                save_dir,
                img_name,
            };
            build_toolbox(&config)?.download_one_image(&args).await
        }
        Commands::Set { image_path } => {
            build_toolbox(&config)?
                .set_wallpaper(&SetWallpaperArgs { image_path })
                .await
        }
    };

    Ok(print_reply(&result.into()))
}

/// 组装工具集；缺少 Access Key 时在任何网络请求之前失败
fn build_toolbox(config: &AppConfig) -> Result<Toolbox, Box<dyn std::error::Error>> {
    Toolbox::from_config(config).map_err(|e| e.localized().into())
}

/// 打印工具结果，失败时输出到 stderr 并返回非零退出码
fn print_reply(reply: &ToolReply) -> ExitCode {
    if reply.is_error {
        eprintln!("{}", reply.text);
        ExitCode::FAILURE
    } else {
        println!("{}", reply.text);
        ExitCode::SUCCESS
    }
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            println!("{}", t!("config_title"));
            println!("{}", t!("config_path", path => config.config_path.display()));
            let key_state = if config.access_key.is_some() {
                t!("config_key_set")
            } else {
                t!("config_key_missing")
            };
            println!("{}", t!("config_key", state => key_state));
            println!("{}", t!("config_base_url", url => config.base_url));
            println!("{}", t!("config_url_size", size => config.url_size.as_str()));
            println!(
                "{}",
                t!("config_save_target", dir => config.save_dir, name => config.file_name)
            );
            let query = config.search_defaults.query.as_deref().unwrap_or("None");
            println!("{}", t!("config_query", query => query));
            println!(
                "{}",
                t!("config_order_by", order => config.search_defaults.order_by)
            );
        }
        ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema());
        }
        ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        ConfigAction::Set { key, value } => {
            config
                .set_value(key, value)
                .map_err(|e| -> Box<dyn std::error::Error> { e.localized().into() })?;
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
