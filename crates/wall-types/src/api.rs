use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Testimonial, WallSettings};

// -- JWT Claims --

/// Session claims carried in the bearer token. Shared by the API middleware
/// and the client so both agree on the format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Walls --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWallRequest {
    pub name: String,
    /// Derived from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub slug: String,
    pub widget_url: String,
    pub submit_url: String,
    pub snippet: String,
}

// -- Testimonials --

/// Body of the public submission form. `rating` is taken as a plain integer
/// so out-of-range values can be reported as a validation error.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitTestimonialRequest {
    pub author_name: String,
    #[serde(default)]
    pub author_role: Option<String>,
    pub content: String,
    pub rating: i64,
}

// -- Public view --

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicWall {
    pub name: String,
    pub slug: String,
    pub settings: WallSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicTestimonial {
    pub id: Uuid,
    pub author_name: String,
    pub author_role: Option<String>,
    pub content: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl From<Testimonial> for PublicTestimonial {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            author_name: t.author_name,
            author_role: t.author_role,
            content: t.content,
            rating: t.rating,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicWallResponse {
    pub wall: PublicWall,
    pub testimonials: Vec<PublicTestimonial>,
}

// -- Review import --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportGoogleRequest {
    pub place_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
