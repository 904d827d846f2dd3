use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod adapters;
mod app_state;
mod config;
mod domain;
mod router;
mod routes;

pub(crate) use app_state::AppState;

use domain::search::{PgTermRepository, SearchService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("search_service=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;

    let pool = settings
        .database
        .pool_options()
        .connect_lazy_with(settings.database.with_db());
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let search = SearchService::new(
        PgTermRepository::new(pool),
        Box::new(settings.search.matcher()),
        settings.search.service_config(),
    );
    let app = router::create(AppState::new(search), &settings.application);

    let address = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
