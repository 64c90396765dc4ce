use axum::Router;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn start_web_server(
    bind_addr: String,
    router: Router,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr = SocketAddr::from_str(&bind_addr)?;
    let app = router.layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(socket_addr).await?;
    info!(bind_address = %socket_addr, "COF query server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("COF query server stopped");
    Ok(())
}
