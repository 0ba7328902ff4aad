use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use wall_db::Database;
use wall_db::models::WallRow;
use wall_embed::script::embed_snippet;
use wall_types::api::{Claims, CreateWallRequest, EmbedResponse};
use wall_types::models::{Wall, WallSettings, slugify};

use crate::convert::wall_from_row;
use crate::error::ApiError;
use crate::{AppState, blocking};

const MAX_NAME_LEN: usize = 100;

/// Load a wall on behalf of `owner`. Walls owned by someone else look the
/// same as walls that do not exist.
pub(crate) fn owned_wall(db: &Database, wall_id: Uuid, owner: Uuid) -> anyhow::Result<Option<WallRow>> {
    let wall = db.get_wall(&wall_id.to_string())?;
    Ok(wall.filter(|w| w.owner_id == owner.to_string()))
}

pub async fn list_walls(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = claims.sub.to_string();
    let rows = blocking(&state, move |db| db.list_walls(&owner)).await?;
    let walls: Vec<Wall> = rows.into_iter().map(wall_from_row).collect();
    Ok(Json(walls))
}

pub async fn create_wall(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateWallRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let name = req.name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "Wall name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }

    let slug = slugify(req.slug.as_deref().unwrap_or(&name));
    if slug.is_empty() {
        return Err(ApiError::BadRequest(
            "Slug must contain at least one letter or digit".into(),
        ));
    }

    let wall_id = Uuid::new_v4().to_string();
    let owner = claims.sub.to_string();
    let settings = WallSettings::default().to_stored();
    let slug_for_insert = slug.clone();

    let row = blocking(&state, move |db| {
        if db.slug_exists(&slug_for_insert)? {
            return Ok(None);
        }
        db.create_wall(&wall_id, &owner, &name, &slug_for_insert, &settings).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::Conflict(format!("Slug '{}' is already taken", slug)))?;

    info!("Wall '{}' created by {}", row.slug, claims.username);
    Ok((StatusCode::CREATED, Json(wall_from_row(row))))
}

pub async fn delete_wall(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(wall_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let owner = claims.sub;
    let deleted = blocking(&state, move |db| {
        if owned_wall(db, wall_id, owner)?.is_none() {
            return Ok(false);
        }
        db.delete_wall(&wall_id.to_string())
    })
    .await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Wall {} deleted by {}", wall_id, claims.username);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(wall_id): Path<Uuid>,
    body: Result<Json<WallSettings>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(settings) = body?;
    settings.validate().map_err(ApiError::BadRequest)?;

    let owner = claims.sub;
    let stored = settings.to_stored();
    let row = blocking(&state, move |db| {
        if owned_wall(db, wall_id, owner)?.is_none() {
            return Ok(None);
        }
        db.update_wall_settings(&wall_id.to_string(), &stored)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(wall_from_row(row)))
}

pub async fn embed_code(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(wall_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = claims.sub;
    let row = blocking(&state, move |db| owned_wall(db, wall_id, owner))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(EmbedResponse {
        widget_url: state.origin.widget_url(&row.slug),
        submit_url: state.origin.submit_url(&row.slug),
        snippet: embed_snippet(&state.origin, &row.slug),
        slug: row.slug,
    }))
}
