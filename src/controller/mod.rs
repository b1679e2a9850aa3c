use std::net::SocketAddr;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use bb8_postgres::bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use bb8_postgres::tokio_postgres::NoTls;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tokio::sync::mpsc::UnboundedSender;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::search_writer::PersistEvent;
use crate::services::google_maps::GoogleMapsClient;

pub mod health_check;
pub mod restaurant_controller;
pub mod search_controller;

#[derive(Clone)]
pub struct AppState {
    pub postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    pub google_maps: GoogleMapsClient,
    pub persist_tx: UnboundedSender<PersistEvent>,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(|s| s.parse().unwrap())
        .collect::<Vec<HeaderValue>>();

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::OPTIONS])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
        )
        .fallback(page_not_found_handler);

    let port = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("API server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .nest("/search", search_controller::router(app_state.clone()))
        .nest("/restaurants", restaurant_controller::router(app_state))
        .merge(health_check::router())
}
