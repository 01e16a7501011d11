use quiz_backend::{
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    routes, telemetry, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    telemetry::init_tracing(config.log_format);

    let app_state = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
            }
            AppState::with_pool(pool)
        }
        None => {
            warn!("DATABASE_URL is not set; quizzes are kept in memory and lost on restart");
            AppState::in_memory()
        }
    };

    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
