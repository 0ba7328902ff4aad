use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use wall_types::api::{
    CreateWallRequest, EmbedResponse, ErrorBody, ImportGoogleRequest, ImportResponse, LoginRequest,
    LoginResponse, PublicWallResponse, RegisterRequest, RegisterResponse, SubmitTestimonialRequest,
};
use wall_types::models::{Testimonial, Wall, WallSettings};

use crate::error::ClientError;

/// Client for one wall server. Holds the bearer token after
/// [`register`](Self::register) or [`login`](Self::login).
pub struct WallClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl WallClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {}", token)))
    }

    // -- Auth --

    pub async fn register(&mut self, username: &str, password: &str) -> Result<RegisterResponse, ClientError> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: RegisterResponse = json(self.public(Method::POST, "/auth/register").json(&body)).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = json(self.public(Method::POST, "/auth/login").json(&body)).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    // -- Walls --

    pub async fn list_walls(&self) -> Result<Vec<Wall>, ClientError> {
        json(self.authed(Method::GET, "/walls")?).await
    }

    pub async fn create_wall(&self, name: &str, slug: Option<&str>) -> Result<Wall, ClientError> {
        let body = CreateWallRequest {
            name: name.to_string(),
            slug: slug.map(str::to_string),
        };
        json(self.authed(Method::POST, "/walls")?.json(&body)).await
    }

    pub async fn delete_wall(&self, wall_id: Uuid) -> Result<(), ClientError> {
        empty(self.authed(Method::DELETE, &format!("/walls/{}", wall_id))?).await
    }

    pub async fn update_settings(&self, wall_id: Uuid, settings: &WallSettings) -> Result<Wall, ClientError> {
        json(
            self.authed(Method::PUT, &format!("/walls/{}/settings", wall_id))?
                .json(settings),
        )
        .await
    }

    pub async fn embed_code(&self, wall_id: Uuid) -> Result<EmbedResponse, ClientError> {
        json(self.authed(Method::GET, &format!("/walls/{}/embed", wall_id))?).await
    }

    pub async fn import_google(&self, wall_id: Uuid, place_id: &str) -> Result<ImportResponse, ClientError> {
        let body = ImportGoogleRequest {
            place_id: place_id.to_string(),
        };
        json(
            self.authed(Method::POST, &format!("/walls/{}/import/google", wall_id))?
                .json(&body),
        )
        .await
    }

    // -- Moderation --

    pub async fn list_testimonials(&self, wall_id: Uuid) -> Result<Vec<Testimonial>, ClientError> {
        json(self.authed(Method::GET, &format!("/walls/{}/testimonials", wall_id))?).await
    }

    /// Flip approval; returns the record as stored after the change.
    pub async fn toggle_approval(&self, testimonial_id: Uuid) -> Result<Testimonial, ClientError> {
        json(self.authed(Method::POST, &format!("/testimonials/{}/approval", testimonial_id))?).await
    }

    pub async fn delete_testimonial(&self, testimonial_id: Uuid) -> Result<(), ClientError> {
        empty(self.authed(Method::DELETE, &format!("/testimonials/{}", testimonial_id))?).await
    }

    // -- Public --

    pub async fn public_wall(&self, slug: &str) -> Result<PublicWallResponse, ClientError> {
        json(self.public(Method::GET, &format!("/public/walls/{}", slug))).await
    }

    pub async fn submit_testimonial(
        &self,
        slug: &str,
        req: &SubmitTestimonialRequest,
    ) -> Result<Testimonial, ClientError> {
        json(
            self.public(Method::POST, &format!("/public/walls/{}/testimonials", slug))
                .json(req),
        )
        .await
    }
}

async fn send(req: RequestBuilder) -> Result<Response, ClientError> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    debug!("Request failed ({}): {}", status, body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

async fn json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
    Ok(send(req).await?.json().await?)
}

async fn empty(req: RequestBuilder) -> Result<(), ClientError> {
    send(req).await.map(drop)
}

/// The `error` field of a JSON error body, or the body itself.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
