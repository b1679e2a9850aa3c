use std::sync::Arc;

use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::repositories::search_writer::spawn_search_writer;
use crate::services::google_maps::GoogleMapsClient;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    info!("Starting restaurant finder backend in {} mode", config.environment);

    let manager = PostgresConnectionManager::new_from_stringlike(&config.database_url, NoTls)
        .context("Invalid postgres connection string")?;
    let postgres_connection = Pool::builder()
        .build(manager)
        .await
        .context("Error building the postgres connection pool")?;

    let persist_tx = spawn_search_writer(Arc::new(PostgresConnectionRepo::new(
        postgres_connection.clone(),
    )));
    let google_maps = GoogleMapsClient::new(config.google_maps_api_key.clone());

    let app_state = AppState {
        postgres_connection,
        google_maps,
        persist_tx,
    };

    controller::serve(app_state, &config).await
}
