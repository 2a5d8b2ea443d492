use std::net::SocketAddr;
use std::sync::Arc;

use internship_intake::{
    config::{get_config, init_config, StoreBackend},
    database::pool::{create_pool, run_migrations},
    middleware::auth::AdminCredential,
    routes::{self, RouterSettings},
    store::{ApplicationStore, MemoryApplicationStore, PgApplicationStore},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("internship_intake=info,tower_http=info")),
        )
        .init();
    init_config()?;
    let config = get_config()?;

    let store: Arc<dyn ApplicationStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(config).await?;
            run_migrations(&pool).await?;
            info!("Using Postgres application store");
            Arc::new(PgApplicationStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory application store; data is lost on restart");
            Arc::new(MemoryApplicationStore::new())
        }
    };

    let app = routes::router(
        AppState::new(store),
        RouterSettings {
            admin: AdminCredential::new(config.admin_token.clone()),
            public_rps: config.public_rps,
            admin_rps: config.admin_rps,
        },
    );

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
