#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use wall_api::import::GooglePlaces;
use wall_api::{AppStateInner, router};
use wall_db::Database;
use wall_embed::WidgetOrigin;

pub const ORIGIN: &str = "https://walls.example.com";

pub struct TestApp {
    app: Router,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_google(google: GooglePlaces) -> Self {
        Self::build(Some(google))
    }

    fn build(google: Option<GooglePlaces>) -> Self {
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
            origin: WidgetOrigin::parse(ORIGIN).unwrap(),
            google,
        });
        Self { app: router(state) }
    }

    pub async fn send(&self, req: Request<Body>) -> Reply {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        Reply {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.call(Method::GET, uri, None, None).await
    }

    pub async fn register(&self, username: &str) -> String {
        let reply = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "username": username, "password": "correct-horse" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.json()["token"].as_str().unwrap().to_string()
    }

    /// Creates a wall and returns its id.
    pub async fn create_wall(&self, token: &str, name: &str, slug: &str) -> String {
        let reply = self
            .call(
                Method::POST,
                "/walls",
                Some(token),
                Some(json!({ "name": name, "slug": slug })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.json()["id"].as_str().unwrap().to_string()
    }

    /// Submits a testimonial anonymously and returns its id.
    pub async fn submit(&self, slug: &str, author: &str, content: &str, rating: i64) -> String {
        let reply = self
            .call(
                Method::POST,
                &format!("/public/walls/{}/testimonials", slug),
                None,
                Some(json!({ "author_name": author, "content": content, "rating": rating })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.json()["id"].as_str().unwrap().to_string()
    }

    pub async fn toggle(&self, token: &str, testimonial_id: &str) -> Reply {
        self.call(
            Method::POST,
            &format!("/testimonials/{}/approval", testimonial_id),
            Some(token),
            None,
        )
        .await
    }

    pub async fn public_testimonials(&self, slug: &str) -> Option<Vec<Value>> {
        let reply = self.get(&format!("/public/walls/{}", slug)).await;
        match reply.status {
            StatusCode::OK => Some(reply.json()["testimonials"].as_array().unwrap().clone()),
            StatusCode::NOT_FOUND => None,
            other => panic!("unexpected status {}: {}", other, reply.body),
        }
    }
}
