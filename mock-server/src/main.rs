use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let keys = std::env::var("MOCK_AKISMET_KEYS").unwrap_or_else(|_| mock_server::DEFAULT_KEY.to_string());
    let accounts = mock_server::Accounts::new(keys.split(',').map(str::trim).filter(|key| !key.is_empty()));

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run_with(listener, accounts).await
}
