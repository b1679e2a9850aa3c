use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

use crate::models::restaurant::Restaurant;
use crate::models::search::SearchRecord;
use crate::repositories::postgres_repo::PostgresConnectionRepo;

#[derive(Debug)]
pub enum PersistEvent {
    SearchCompleted {
        record: SearchRecord,
        restaurants: Vec<Restaurant>,
    },
}

/// Spawns the queue consumer that writes search audit records. Persistence
/// sits behind a channel instead of the request path, so a failed write is
/// logged but can never fail a search that already succeeded.
pub fn spawn_search_writer(repo: Arc<PostgresConnectionRepo>) -> UnboundedSender<PersistEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let PersistEvent::SearchCompleted {
                record,
                restaurants,
            } = event;
            persist_search(&repo, record, restaurants).await;
        }
        info!("Search writer channel closed, stopping");
    });

    tx
}

async fn persist_search(
    repo: &PostgresConnectionRepo,
    record: SearchRecord,
    restaurants: Vec<Restaurant>,
) {
    let search_id = match repo.insert_search(&record).await {
        Ok(id) => id,
        Err(e) => {
            warn!(
                "Failed to persist search record due to: {}, dropping {} result links",
                e,
                restaurants.len()
            );
            return;
        }
    };

    for restaurant in &restaurants {
        if restaurant.place_id.is_empty() {
            warn!("Skipping persistence for '{}', it carries no place_id", restaurant.name);
            continue;
        }
        if let Err(e) = repo.upsert_restaurant(restaurant).await {
            warn!("Failed to upsert restaurant {} due to: {}", restaurant.place_id, e);
            continue;
        }
        let distance_km = restaurant.distance_km.unwrap_or(0.0);
        if let Err(e) = repo
            .link_search_result(search_id, &restaurant.place_id, distance_km)
            .await
        {
            warn!(
                "Failed to link restaurant {} to search {} due to: {}",
                restaurant.place_id, search_id, e
            );
        }
    }
}
