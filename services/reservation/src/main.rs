use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, health_check, init_pool};
use reservation::{AppState, mailer::Mailer, routes, schema};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting reservation service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    schema::ensure_schema(&pool).await?;

    // Initialize mail delivery
    let mailer = Mailer::from_env();

    let app_state = AppState::new(pool, mailer);

    if !app_state.auth.admin_exists().await? {
        warn!("No admin account found; only POST /setup/admin is available until one is created");
    }

    info!("Reservation service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Reservation service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
