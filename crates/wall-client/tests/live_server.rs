use std::sync::Arc;

use wall_api::AppStateInner;
use wall_client::{ClientError, ModerationView, WallClient};
use wall_db::Database;
use wall_embed::WidgetOrigin;
use wall_types::api::SubmitTestimonialRequest;
use wall_types::models::{Theme, WallSettings};

/// Serve the real router on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        origin: WidgetOrigin::parse(&base).unwrap(),
        google: None,
    });
    let app = wall_api::router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn submission(author: &str, content: &str, rating: i64) -> SubmitTestimonialRequest {
    SubmitTestimonialRequest {
        author_name: author.into(),
        author_role: None,
        content: content.into(),
        rating,
    }
}

#[tokio::test]
async fn owner_moderates_through_the_client() {
    let base = spawn_server().await;
    let mut owner = WallClient::new(&base).unwrap();
    owner.register("owner", "correct-horse").await.unwrap();

    let wall = owner.create_wall("Acme", Some("acme")).await.unwrap();
    assert_eq!(wall.slug, "acme");

    let visitor = WallClient::new(&base).unwrap();
    let great = visitor
        .submit_testimonial("acme", &submission("Ann", "Great!", 5))
        .await
        .unwrap();
    visitor
        .submit_testimonial("acme", &submission("Bo", "Meh", 1))
        .await
        .unwrap();
    assert!(!great.is_approved);
    assert!(visitor.public_wall("acme").await.unwrap().testimonials.is_empty());

    let toggled = owner.toggle_approval(great.id).await.unwrap();
    assert!(toggled.is_approved);

    let public = visitor.public_wall("acme").await.unwrap();
    assert_eq!(public.wall.name, "Acme");
    assert_eq!(public.testimonials.len(), 1);
    assert_eq!(public.testimonials[0].content, "Great!");
    assert_eq!(public.testimonials[0].rating, 5);

    let embed = owner.embed_code(wall.id).await.unwrap();
    assert_eq!(embed.widget_url, format!("{}/widget/acme", base));
}

#[tokio::test]
async fn view_follows_server_confirmations() {
    let base = spawn_server().await;
    let mut owner = WallClient::new(&base).unwrap();
    owner.register("owner", "correct-horse").await.unwrap();
    let owner = &owner;

    let mut view = ModerationView::load(owner).await.unwrap();
    assert!(view.walls().is_empty());

    let wall_id = view
        .create_wall(|| owner.create_wall("Acme", None))
        .await
        .unwrap();

    // Conflicting slug: rejected by the server, view unchanged.
    let err = view
        .create_wall(|| owner.create_wall("Acme", None))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(view.walls().len(), 1);

    let visitor = WallClient::new(&base).unwrap();
    let t = visitor
        .submit_testimonial("acme", &submission("Ann", "Great!", 5))
        .await
        .unwrap();
    view = ModerationView::load(owner).await.unwrap();
    assert_eq!(view.pending_count(wall_id), 1);

    view.toggle(t.id, |id| owner.toggle_approval(id)).await.unwrap();
    assert_eq!(view.pending_count(wall_id), 0);

    let dark = WallSettings {
        theme: Theme::Dark,
        ..WallSettings::default()
    };
    view.update_settings(wall_id, dark, |id, settings| async move {
        owner.update_settings(id, &settings).await
    })
    .await
    .unwrap();
    assert_eq!(view.wall(wall_id).unwrap().settings.theme, Theme::Dark);

    let bad = WallSettings {
        accent_color: "blue".into(),
        ..WallSettings::default()
    };
    let err = view
        .update_settings(wall_id, bad, |id, settings| async move {
            owner.update_settings(id, &settings).await
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(view.wall(wall_id).unwrap().settings.theme, Theme::Dark);

    view.delete_wall(wall_id, |id| owner.delete_wall(id)).await.unwrap();
    assert!(view.walls().is_empty());
    assert_eq!(view.testimonials(wall_id).count(), 0);
    let gone = visitor.public_wall("acme").await.unwrap_err();
    assert!(gone.is_not_found());
}

#[tokio::test]
async fn login_errors_surface_server_message() {
    let base = spawn_server().await;
    let mut client = WallClient::new(&base).unwrap();

    match client.login("nobody", "correct-horse").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("expected API error, got {:?}", other.map(|r| r.username)),
    }
    assert!(client.token().is_none());
}
