use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8888".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    log::info!("serving functions on http://{addr}/.netlify/functions/");
    mock_server::run(listener).await
}
