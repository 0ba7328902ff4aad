use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use wall_db::Database;
use wall_db::models::{NewTestimonial, TestimonialRow};
use wall_types::api::{Claims, SubmitTestimonialRequest};
use wall_types::models::{MAX_RATING, MIN_RATING, Testimonial};

use crate::convert::testimonial_from_row;
use crate::error::ApiError;
use crate::walls::owned_wall;
use crate::{AppState, blocking};

const MAX_AUTHOR_LEN: usize = 100;
const MAX_ROLE_LEN: usize = 100;
const MAX_CONTENT_LEN: usize = 5000;

/// Checked submission: the role is normalised (blank -> absent), the content
/// is kept exactly as typed.
struct Submission {
    author_name: String,
    author_role: Option<String>,
    content: String,
    rating: i64,
}

fn validate(req: SubmitTestimonialRequest) -> Result<Submission, ApiError> {
    let author_name = req.author_name.trim().to_string();
    if author_name.is_empty() || author_name.chars().count() > MAX_AUTHOR_LEN {
        return Err(ApiError::BadRequest(format!(
            "Name must be 1 to {} characters",
            MAX_AUTHOR_LEN
        )));
    }

    let author_role = req
        .author_role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if author_role.as_ref().is_some_and(|r| r.chars().count() > MAX_ROLE_LEN) {
        return Err(ApiError::BadRequest(format!(
            "Role must be at most {} characters",
            MAX_ROLE_LEN
        )));
    }

    if req.content.trim().is_empty() || req.content.chars().count() > MAX_CONTENT_LEN {
        return Err(ApiError::BadRequest(format!(
            "Testimonial must be 1 to {} characters",
            MAX_CONTENT_LEN
        )));
    }

    if !(MIN_RATING..=MAX_RATING).contains(&req.rating) {
        return Err(ApiError::BadRequest(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    Ok(Submission {
        author_name,
        author_role,
        content: req.content,
        rating: req.rating,
    })
}

/// Store a public submission for the wall with `slug`. New testimonials are
/// never approved.
pub(crate) async fn submit_to_slug(
    state: &AppState,
    slug: String,
    req: SubmitTestimonialRequest,
) -> Result<Testimonial, ApiError> {
    let sub = validate(req)?;
    let id = Uuid::new_v4().to_string();

    let row = blocking(state, move |db| {
        let Some(wall) = db.get_wall_by_slug(&slug)? else {
            return Ok(None);
        };
        db.insert_testimonial(&NewTestimonial {
            id: &id,
            wall_id: &wall.id,
            author_name: &sub.author_name,
            author_role: sub.author_role.as_deref(),
            content: &sub.content,
            rating: sub.rating,
            is_approved: false,
            created_at: None,
        })
        .map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    info!("New testimonial {} awaiting moderation", row.id);
    Ok(testimonial_from_row(row))
}

/// POST /public/walls/{slug}/testimonials: anonymous submission.
pub async fn submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<SubmitTestimonialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let testimonial = submit_to_slug(&state, slug, req).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// GET /walls/{wall_id}/testimonials: every testimonial, approved or not.
pub async fn list_for_wall(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(wall_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = claims.sub;
    let rows = blocking(&state, move |db| {
        if owned_wall(db, wall_id, owner)?.is_none() {
            return Ok(None);
        }
        db.list_testimonials(&wall_id.to_string(), false).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let testimonials: Vec<Testimonial> = rows.into_iter().map(testimonial_from_row).collect();
    Ok(Json(testimonials))
}

/// Load a testimonial if `owner` owns the wall it belongs to.
fn owned_testimonial(db: &Database, id: Uuid, owner: Uuid) -> anyhow::Result<Option<TestimonialRow>> {
    let Some(row) = db.get_testimonial(&id.to_string())? else {
        return Ok(None);
    };
    let Some(wall) = db.get_wall(&row.wall_id)? else {
        return Ok(None);
    };
    Ok((wall.owner_id == owner.to_string()).then_some(row))
}

/// POST /testimonials/{id}/approval: flip the approval flag and return the
/// updated record.
pub async fn toggle_approval(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(testimonial_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = claims.sub;
    let row = blocking(&state, move |db| {
        if owned_testimonial(db, testimonial_id, owner)?.is_none() {
            return Ok(None);
        }
        db.toggle_approval(&testimonial_id.to_string())
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    info!(
        "Testimonial {} {} by {}",
        row.id,
        if row.is_approved { "approved" } else { "unapproved" },
        claims.username
    );
    Ok(Json(testimonial_from_row(row)))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(testimonial_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let owner = claims.sub;
    let deleted = blocking(&state, move |db| {
        if owned_testimonial(db, testimonial_id, owner)?.is_none() {
            return Ok(false);
        }
        db.delete_testimonial(&testimonial_id.to_string())
    })
    .await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
