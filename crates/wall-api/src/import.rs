//! Import of Google Maps reviews into a wall.
//!
//! Imported reviews are approved on arrival and matched on
//! `(wall, author, content)`, so running the import again only refreshes
//! ratings instead of duplicating rows.

use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use wall_db::models::NewTestimonial;
use wall_types::api::{Claims, ImportGoogleRequest, ImportResponse};
use wall_types::models::{MAX_RATING, MIN_RATING};

use crate::convert::sqlite_timestamp;
use crate::error::ApiError;
use crate::walls::owned_wall;
use crate::{AppState, blocking};

pub const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// Client for the Places Details endpoint.
pub struct GooglePlaces {
    client: reqwest::Client,
    api_key: String,
    details_url: String,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    reviews: Vec<GoogleReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleReview {
    pub author_name: String,
    #[serde(default)]
    pub text: String,
    pub rating: i64,
    /// Unix seconds.
    pub time: i64,
}

impl GooglePlaces {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_details_url(api_key, PLACE_DETAILS_URL.to_string())
    }

    pub fn with_details_url(api_key: String, details_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            api_key,
            details_url,
        })
    }

    pub async fn fetch_reviews(&self, place_id: &str) -> anyhow::Result<Vec<GoogleReview>> {
        let resp: PlaceDetailsResponse = self
            .client
            .get(&self.details_url)
            .query(&[
                ("place_id", place_id),
                ("fields", "reviews"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.result.map(|r| r.reviews).unwrap_or_default())
    }
}

/// Owned form of a review ready to be written to a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedReview {
    pub id: String,
    pub author_name: String,
    pub content: String,
    pub rating: i64,
    pub created_at: String,
}

/// Map reviews to rows, dropping ones without an author or text, or with an
/// out-of-range rating.
pub fn prepare_import(reviews: Vec<GoogleReview>) -> Vec<ImportedReview> {
    reviews
        .into_iter()
        .filter_map(|r| {
            if r.author_name.trim().is_empty()
                || r.text.trim().is_empty()
                || !(MIN_RATING..=MAX_RATING).contains(&r.rating)
            {
                warn!("Skipping unusable review by '{}' (rating {})", r.author_name, r.rating);
                return None;
            }
            let created_at = DateTime::from_timestamp(r.time, 0).unwrap_or_default();
            Some(ImportedReview {
                id: Uuid::new_v4().to_string(),
                author_name: r.author_name,
                content: r.text,
                rating: r.rating,
                created_at: sqlite_timestamp(created_at),
            })
        })
        .collect()
}

/// POST /walls/{wall_id}/import/google
pub async fn import_google(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(wall_id): Path<Uuid>,
    body: Result<Json<ImportGoogleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let owner = claims.sub;
    blocking(&state, move |db| owned_wall(db, wall_id, owner))
        .await?
        .ok_or(ApiError::NotFound)?;

    let google = state
        .google
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Review import is not configured".into()))?;

    let place_id = req.place_id.trim();
    if place_id.is_empty() {
        return Err(ApiError::BadRequest("place_id is required".into()));
    }

    let reviews = google.fetch_reviews(place_id).await.map_err(|e| {
        warn!("Google Places request failed for {}: {:#}", place_id, e);
        ApiError::Unprocessable("Could not fetch reviews for this Place ID".into())
    })?;

    let prepared = prepare_import(reviews);
    if prepared.is_empty() {
        return Err(ApiError::Unprocessable("No reviews found or invalid Place ID".into()));
    }

    let wall_key = wall_id.to_string();
    let imported = blocking(&state, move |db| {
        let rows: Vec<NewTestimonial<'_>> = prepared
            .iter()
            .map(|r| NewTestimonial {
                id: &r.id,
                wall_id: &wall_key,
                author_name: &r.author_name,
                author_role: None,
                content: &r.content,
                rating: r.rating,
                is_approved: true,
                created_at: Some(&r.created_at),
            })
            .collect();
        db.upsert_imported(&rows)
    })
    .await?;

    info!("Imported {} Google reviews into wall {}", imported, wall_id);
    Ok(Json(ImportResponse { imported }))
}
