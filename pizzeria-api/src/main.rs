use axum::{Router, routing::get};
use clap::{Parser, Subcommand};
use pizzeria_restaurant_service::{DbPool, create_pool, run_migrations, seed::seed};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod models;
mod serializer;

use config::Config;
use handlers::{AppState, openapi, pizza_router, restaurant_pizza_router, restaurant_router};

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the HTTP API
    Serve,
    /// Apply migrations and replace all rows with the sample data set
    Seed,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(restaurant_router())
        .merge(pizza_router())
        .merge(restaurant_pizza_router())
        .route("/api-docs/openapi.json", get(openapi))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn serve(config: &Config, pool: DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let app = app(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Pizzeria API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = create_pool(&config.database_url, config.pool_size)?;
    migrate(&pool)?;

    match cli.command {
        Commands::Serve => serve(&config, pool).await,
        Commands::Seed => {
            seed_database(&pool)?;
            info!(database_url = %config.database_url, "database seeded");
            Ok(())
        }
    }
}

fn migrate(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    Ok(())
}

fn seed_database(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = pool.get()?;
    seed(&mut conn)?;
    Ok(())
}
