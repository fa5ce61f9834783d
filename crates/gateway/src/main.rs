#[tokio::main]
async fn main() -> anyhow::Result<()> {
    eduhub_observability::init();

    let config = eduhub_gateway::config::GatewayConfig::from_env()?;
    let app = eduhub_gateway::app::build_app(&config.jwt_secret);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
