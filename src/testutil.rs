// testutil.rs — 测试辅助：在本地随机端口启动一个模拟上游

use axum::Router;

/// 启动 axum 服务并返回形如 http://127.0.0.1:PORT 的基础地址
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}
