use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use backend::routes::AppState;
use backend::store;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let db_path = std::env::var("VOTES_DATABASE").unwrap_or_else(|_| "votes.db".into());
    info!("Opening vote database at {}", db_path);

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    store::init(&pool).await?;

    info!("Starting vote submission server");
    let _ = backend::rocket(AppState::new(pool)).launch().await?;

    Ok(())
}
