use mcq_backend::{
    config::{get_config, init_config},
    database::{
        kv::{KvStore, MemoryKvStore, PgKvStore},
        pool::{create_pool, run_migrations},
    },
    routes, AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let kv: Arc<dyn KvStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("Using Postgres key-value store");
            Arc::new(PgKvStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; results and quizzes are kept in memory only");
            Arc::new(MemoryKvStore::new())
        }
    };

    let app_state = AppState::new(Arc::new(config.clone()), kv)?;
    let app = routes::create_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
