use anyhow::anyhow;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::restaurant::{Coordinates, Restaurant};
use crate::models::search::SearchRecord;

pub const RETRY_LIMIT: usize = 5;

pub struct PostgresConnectionRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresConnectionRepo {
    pub fn new(postgres_connection: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    pub async fn insert_search(&self, record: &SearchRecord) -> anyhow::Result<i64> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "INSERT INTO searches \
            (post_code, radius_km, search_timestamp, result_count, lat, lng) \
            VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";

        let row = conn
            .query_one(
                stmt,
                &[
                    &record.post_code,
                    &record.radius_km,
                    &record.timestamp,
                    &record.result_count,
                    &record.coordinates.lat,
                    &record.coordinates.lng,
                ],
            )
            .await?;

        Ok(row.get::<&str, i64>("id"))
    }

    pub async fn upsert_restaurant(&self, restaurant: &Restaurant) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "INSERT INTO restaurants \
            (place_id, name, address, rating, review_count, price_level, is_open, \
            phone, website, photo_url, lat, lng, distance_km, updated_at) \
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
            ON CONFLICT (place_id) DO UPDATE SET \
            name = EXCLUDED.name, address = EXCLUDED.address, rating = EXCLUDED.rating, \
            review_count = EXCLUDED.review_count, price_level = EXCLUDED.price_level, \
            is_open = EXCLUDED.is_open, phone = EXCLUDED.phone, website = EXCLUDED.website, \
            photo_url = EXCLUDED.photo_url, lat = EXCLUDED.lat, lng = EXCLUDED.lng, \
            distance_km = EXCLUDED.distance_km, updated_at = EXCLUDED.updated_at";

        let review_count = restaurant.review_count.map(i64::from);
        let price_level = restaurant.price_level.map(i16::from);
        let photo_url = restaurant.photos.first();
        let updated_at = OffsetDateTime::now_utc();

        conn.execute(
            stmt,
            &[
                &restaurant.place_id,
                &restaurant.name,
                &restaurant.address,
                &restaurant.rating,
                &review_count,
                &price_level,
                &restaurant.is_open,
                &restaurant.phone,
                &restaurant.website,
                &photo_url,
                &restaurant.coordinates.lat,
                &restaurant.coordinates.lng,
                &restaurant.distance_km,
                &updated_at,
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn link_search_result(
        &self,
        search_id: i64,
        place_id: &str,
        distance_km: f64,
    ) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "INSERT INTO search_results (search_id, place_id, distance_km, created_at) \
            VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING";

        let created_at = OffsetDateTime::now_utc();
        conn.execute(stmt, &[&search_id, &place_id, &distance_km, &created_at])
            .await?;

        Ok(())
    }

    pub async fn retrieve_search_history(&self, limit: i64) -> anyhow::Result<Vec<SearchRecord>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "SELECT id, post_code, radius_km, search_timestamp, result_count, lat, lng \
            FROM searches ORDER BY search_timestamp DESC LIMIT $1";

        let rows = conn.query(stmt, &[&limit]).await?;

        Ok(rows.into_iter().map(parse_row_into_search).collect())
    }

    pub async fn retrieve_restaurant(
        &self,
        place_id: &str,
    ) -> anyhow::Result<Option<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = "SELECT place_id, name, address, rating, review_count, price_level, \
            is_open, phone, website, photo_url, lat, lng, distance_km \
            FROM restaurants WHERE place_id = $1 LIMIT 1";

        let rows = conn.query(stmt, &[&place_id]).await?;

        Ok(rows.into_iter().next().map(parse_row_into_restaurant))
    }
}

fn parse_row_into_search(row: Row) -> SearchRecord {
    SearchRecord {
        id: Some(row.get::<&str, i64>("id")),
        post_code: row.get("post_code"),
        radius_km: row.get::<&str, f64>("radius_km"),
        timestamp: row.get::<&str, OffsetDateTime>("search_timestamp"),
        result_count: row.get::<&str, i64>("result_count"),
        coordinates: Coordinates {
            lat: row.get::<&str, f64>("lat"),
            lng: row.get::<&str, f64>("lng"),
        },
    }
}

// Reviews, photos beyond the first, and opening hours are not part of the
// stored row; records read back from the store carry only the scalar fields.
fn parse_row_into_restaurant(row: Row) -> Restaurant {
    Restaurant {
        place_id: row.get("place_id"),
        name: row.get("name"),
        address: row.get("address"),
        coordinates: Coordinates {
            lat: row.get::<&str, f64>("lat"),
            lng: row.get::<&str, f64>("lng"),
        },
        rating: row.get::<&str, Option<f64>>("rating"),
        review_count: row
            .get::<&str, Option<i64>>("review_count")
            .map(|count| count as u32),
        distance_km: row.get::<&str, Option<f64>>("distance_km"),
        is_open: row.get::<&str, Option<bool>>("is_open"),
        phone: row.get::<&str, Option<String>>("phone"),
        website: row.get::<&str, Option<String>>("website"),
        email: None,
        contact_person: None,
        price_level: row
            .get::<&str, Option<i16>>("price_level")
            .map(|level| level as u8),
        photos: row
            .get::<&str, Option<String>>("photo_url")
            .into_iter()
            .collect(),
        reviews: Vec::new(),
        opening_hours: None,
    }
}
