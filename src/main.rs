use seo_meta_relay::{AppState, api::routes::create_router, config::Config, error::Result, logging};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init(config.log_format);
    tracing::info!(?config, "configuration loaded");

    let server_addr = config.server_addr;
    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Server is running on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
