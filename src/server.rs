// server.rs — MCP stdio 服务
// 工具用 rmcp 的 #[tool] 注册，具体逻辑全部交给 Toolbox。
// stdout 专用于协议，日志全部写到 stderr。

use crate::error::ToolError;
use crate::tools::{
    DownloadArgs, FilteredImageArgs, InspectArgs, SetWallpaperArgs, ShowImgArgs, ToolReply,
    Toolbox,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use std::sync::Arc;
use tracing::info;

/// 把 Toolbox 暴露为 MCP 工具
#[derive(Clone)]
pub struct SplashServer {
    toolbox: Arc<Toolbox>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SplashServer {
    pub fn new(toolbox: Toolbox) -> Self {
        Self {
            toolbox: Arc::new(toolbox),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Download an image from a URL and display it.")]
    async fn show_img(
        &self,
        Parameters(args): Parameters<ShowImgArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.show_img(&args).await))
    }

    #[tool(description = "Get the URL of a random wallpaper photo from Unsplash.")]
    async fn get_random_wallpaper(&self) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.get_random_wallpaper().await))
    }

    #[tool(
        description = "Search Unsplash with filters (query, color, orientation, page, per_page, \
                       order_by) and return the URL of the result at result_index."
    )]
    async fn get_filtered_image_url(
        &self,
        Parameters(args): Parameters<FilteredImageArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.get_filtered_image_url(&args).await))
    }

    #[tool(description = "Download one image from a URL and save it to save_dir/img_name.")]
    async fn download_one_image(
        &self,
        Parameters(args): Parameters<DownloadArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.download_one_image(&args).await))
    }

    #[tool(description = "Set the desktop wallpaper to the image at the given local path.")]
    async fn set_wallpaper(
        &self,
        Parameters(args): Parameters<SetWallpaperArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.set_wallpaper(&args).await))
    }

    #[tool(description = "Fetch a URL and describe the response by its content type.")]
    async fn inspect_url(
        &self,
        Parameters(args): Parameters<InspectArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(to_call_result(self.toolbox.inspect_url(&args).await))
    }
}

#[tool_handler]
impl ServerHandler for SplashServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Fetch Unsplash photo URLs, download images and set the desktop wallpaper."
                    .into(),
            ),
            ..Default::default()
        }
    }
}

/// 工具失败不是协议错误：以 isError 文本结果返回
fn to_call_result(result: Result<String, ToolError>) -> CallToolResult {
    let reply = ToolReply::from(result);
    let content = vec![Content::text(reply.text)];
    if reply.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// 在 stdin/stdout 上运行，直到 stdin 关闭
pub async fn run_stdio(toolbox: Toolbox) -> Result<(), Box<dyn std::error::Error>> {
    info!("splashwall MCP server running");
    let service = SplashServer::new(toolbox).serve(stdio()).await?;
    service.waiting().await?;
    info!("stdin closed, shutting down");
    Ok(())
}
