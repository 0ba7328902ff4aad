use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::FormRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use wall_embed::script::host_embed_script;
use wall_types::api::{PublicTestimonial, PublicWall, PublicWallResponse, SubmitTestimonialRequest};
use wall_types::models::{WallSettings, slugify};

use crate::error::ApiError;
use crate::render::{self, WallView};
use crate::testimonials::submit_to_slug;
use crate::{AppState, blocking};

/// Public data of a wall: its display settings and approved testimonials,
/// newest first. `None` if no wall has this slug.
async fn load_public(state: &AppState, slug: String) -> Result<Option<PublicWallResponse>, ApiError> {
    let found = blocking(state, move |db| {
        let Some(wall) = db.get_wall_by_slug(&slug)? else {
            return Ok(None);
        };
        let rows = db.list_testimonials(&wall.id, true)?;
        Ok(Some((wall, rows)))
    })
    .await?;

    Ok(found.map(|(wall, rows)| PublicWallResponse {
        wall: PublicWall {
            settings: WallSettings::from_stored(&wall.settings),
            name: wall.name,
            slug: wall.slug,
        },
        testimonials: rows
            .into_iter()
            .map(crate::convert::testimonial_from_row)
            .map(PublicTestimonial::from)
            .collect(),
    }))
}

/// GET /public/walls/{slug}
pub async fn public_wall(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = load_public(&state, slug).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

/// GET /widget/{slug}: the page loaded inside the embedded iframe.
pub async fn widget_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let data = load_public(&state, slug).await?;
    let status = if data.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };
    let view = data.as_ref().map(|d| WallView {
        wall: &d.wall,
        testimonials: &d.testimonials,
    });

    Ok((
        status,
        [(header::CONTENT_SECURITY_POLICY, "frame-ancestors *")],
        Html(render::widget_page(view.as_ref())),
    )
        .into_response())
}

/// GET /wall/{slug}
pub async fn wall_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let data = load_public(&state, slug.clone()).await?;
    let status = if data.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };
    let view = data.as_ref().map(|d| WallView {
        wall: &d.wall,
        testimonials: &d.testimonials,
    });

    Ok((status, Html(render::wall_page(&slug, view.as_ref()))).into_response())
}

async fn wall_name(state: &AppState, slug: String) -> Result<Option<String>, ApiError> {
    blocking(state, move |db| Ok(db.get_wall_by_slug(&slug)?.map(|w| w.name))).await
}

/// GET /submit/{slug}
pub async fn submit_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    Ok(match wall_name(&state, slug.clone()).await? {
        Some(name) => Html(render::submit_page(&name, &slug, None)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response(),
    })
}

const FORM_INVALID: &str = "Please fill in your name, your testimonial and a rating from 1 to 5.";

/// POST /submit/{slug}: form-encoded variant of the public submission.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: Result<Form<SubmitTestimonialRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let Some(name) = wall_name(&state, slug.clone()).await? else {
        return Ok((StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response());
    };

    let req = match form {
        Ok(Form(req)) => req,
        Err(rejection) => {
            warn!("Unreadable submission form for '{}': {}", slug, rejection.body_text());
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(render::submit_page(&name, &slug, Some(FORM_INVALID))),
            )
                .into_response());
        }
    };

    match submit_to_slug(&state, slug.clone(), req).await {
        Ok(_) => Ok(Html(render::submitted_page(&name)).into_response()),
        Err(ApiError::BadRequest(msg)) => Ok((
            StatusCode::BAD_REQUEST,
            Html(render::submit_page(&name, &slug, Some(&msg))),
        )
            .into_response()),
        // Deleted between the lookup and the insert.
        Err(ApiError::NotFound) => {
            Ok((StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response())
        }
        Err(e) => {
            match &e {
                ApiError::Internal(cause) => error!("Submission for '{}' failed: {:#}", slug, cause),
                other => warn!("Submission for '{}' rejected: {}", slug, other),
            }
            let status = e.status();
            Ok((
                status,
                Html(render::submit_page(
                    &name,
                    &slug,
                    Some("Something went wrong. Please try again."),
                )),
            )
                .into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbedQuery {
    pub wall: String,
}

/// GET /embed.js?wall={slug}: the host-page script as a standalone file.
pub async fn embed_js(
    State(state): State<AppState>,
    Query(query): Query<EmbedQuery>,
) -> Result<Response, ApiError> {
    if query.wall.is_empty() || slugify(&query.wall) != query.wall {
        return Err(ApiError::BadRequest("Invalid wall slug".into()));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        host_embed_script(&state.origin, &query.wall),
    )
        .into_response())
}
