use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use langrec_app::rest_api::api_router;
use langrec_app::state::AppState;
use langrec_dal::{seed::seed_if_empty, LanguageStore, MemoryLanguageStore, SqlLanguageStore};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    if args.in_memory {
        let state = build_memory_state(&args).await?;
        run_with_state(args, state).await
    } else {
        let state = build_state(&args).await?;
        run_with_state(args, state).await
    }
}

pub async fn run_with_state<S: LanguageStore>(
    args: ServerConfig,
    state: AppState<S>,
) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S, F>(
    args: ServerConfig,
    state: AppState<S>,
    shutdown_signal: F,
) -> Result<()>
where
    S: LanguageStore,
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn main_router<S: LanguageStore>(state: AppState<S>) -> Router<()> {
    #[allow(unused_mut)]
    let mut router = api_router()
        .with_state(state)
        .route("/health", get(health));

    #[cfg(feature = "openapi")]
    {
        let docs = langrec_app::rest_api::api_docs();
        router = router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs),
        );
    }
    router.layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Opens database, creates schema if needed and seeds empty database
pub async fn build_state(config: &ServerConfig) -> Result<AppState<SqlLanguageStore>> {
    if config.uses_default_database() {
        let data_dir = config.data_dir();
        if !data_dir.is_dir() {
            tokio::fs::create_dir_all(&data_dir).await?;
            info!("Created data directory {}", data_dir.display());
        }
    }

    let database_url = config.database_url();
    let pool = langrec_dal::new_pool(&database_url, config.db_max_connections).await?;
    langrec_dal::init_db(&pool).await?;
    debug!("Database schema ready at {database_url}");

    let store = SqlLanguageStore::new(pool);
    init_store(&store, config).await?;
    Ok(AppState::new(store, config.into()))
}

pub async fn build_memory_state(config: &ServerConfig) -> Result<AppState<MemoryLanguageStore>> {
    info!("Using in-memory store, records will be lost on exit");
    let store = MemoryLanguageStore::new();
    init_store(&store, config).await?;
    Ok(AppState::new(store, config.into()))
}

async fn init_store<S: LanguageStore>(store: &S, config: &ServerConfig) -> Result<()> {
    if config.no_seed {
        debug!("Seeding disabled");
    } else {
        let inserted = seed_if_empty(store).await?;
        debug!("Seed inserted {inserted} languages");
    }
    Ok(())
}
