pub mod auth;
pub mod convert;
pub mod error;
pub mod import;
pub mod middleware;
pub mod public;
pub mod render;
pub mod testimonials;
pub mod walls;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use tracing::error;

use wall_db::Database;
use wall_embed::WidgetOrigin;

use crate::error::ApiError;
use crate::import::GooglePlaces;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Origin the widget is served from; used for iframe URLs and the
    /// host-side origin check.
    pub origin: WidgetOrigin,
    /// Review import is disabled when no API key is configured.
    pub google: Option<GooglePlaces>,
}

/// All HTTP routes. Layers that apply to the whole service (CORS, tracing)
/// are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/public/walls/{slug}", get(public::public_wall))
        .route("/public/walls/{slug}/testimonials", post(testimonials::submit))
        .route("/widget/{slug}", get(public::widget_page))
        .route("/wall/{slug}", get(public::wall_page))
        .route("/submit/{slug}", get(public::submit_page).post(public::submit_form))
        .route("/embed.js", get(public::embed_js))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/walls", get(walls::list_walls).post(walls::create_wall))
        .route("/walls/{wall_id}", delete(walls::delete_wall))
        .route("/walls/{wall_id}/settings", put(walls::update_settings))
        .route("/walls/{wall_id}/embed", get(walls::embed_code))
        .route("/walls/{wall_id}/testimonials", get(testimonials::list_for_wall))
        .route("/walls/{wall_id}/import/google", post(import::import_google))
        .route("/testimonials/{testimonial_id}/approval", post(testimonials::toggle_approval))
        .route("/testimonials/{testimonial_id}", delete(testimonials::delete_testimonial))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run blocking database work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("background task failed"))
        })?
        .map_err(ApiError::Internal)
}
