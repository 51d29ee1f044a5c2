use agency_backend::{
    config::AppConfig,
    content::{BlogPost, ContactStatus, ContactSubmission, PortfolioItem},
    create_app,
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const PASSWORD: &str = "studio-admin-pass";

fn app() -> Router {
    let mut config = AppConfig::defaults();
    config.site_url = "https://studio.test".into();
    config.admin_password_hash = Some(bcrypt::hash(PASSWORD, 4).unwrap());
    create_app(AppState::in_memory(config))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    admin: bool,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if admin {
        req = req.header("authorization", format!("Bearer {}", PASSWORD));
    }
    let req = match body {
        Some(json) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn blog_post_becomes_public_once_published() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/admin/blog",
        true,
        Some(json!({
            "title": "Designing For Speed",
            "excerpt": "Fast sites convert",
            "content": "<p>Hello</p><script>alert(1)</script>",
            "category": "Engineering"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let draft: BlogPost = serde_json::from_slice(&body).unwrap();
    assert_eq!(draft.slug, "designing-for-speed");
    assert!(!draft.content.contains("<script>"));
    assert!(draft.published_at.is_none());

    let (status, _) = call(&app, "GET", "/api/blog/designing-for-speed", false, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/admin/blog/{}", draft.id),
        true,
        Some(json!({
            "title": "Designing For Speed",
            "excerpt": "Fast sites convert",
            "content": "<p>Hello</p>",
            "category": "Engineering",
            "published": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let published: BlogPost = serde_json::from_slice(&body).unwrap();
    assert!(published.published_at.is_some());

    let (status, body) = call(&app, "GET", "/api/blog?category=engineering", false, None).await;
    assert_eq!(status, StatusCode::OK);
    let posts: Vec<BlogPost> = serde_json::from_slice(&body).unwrap();
    assert_eq!(posts.len(), 1);

    let (_, rss) = call(&app, "GET", "/rss.xml", false, None).await;
    let rss = String::from_utf8(rss).unwrap();
    assert!(rss.contains("https://studio.test/blog/designing-for-speed"));

    let (_, sitemap) = call(&app, "GET", "/sitemap.xml", false, None).await;
    let sitemap = String::from_utf8(sitemap).unwrap();
    assert!(sitemap.contains("<loc>https://studio.test/blog/designing-for-speed</loc>"));
}

#[tokio::test]
async fn portfolio_filters_by_featured_and_category() {
    let app = app();

    for (title, category, featured) in [
        ("Fintech Dashboard", "Web", true),
        ("Fitness App", "Mobile", false),
        ("Retail Site", "Web", false),
    ] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/admin/portfolio",
            true,
            Some(json!({
                "title": title,
                "category": category,
                "featured": featured,
                "technologies": { "frontend": ["React"], "backend": [] }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/api/portfolio?category=web", false, None).await;
    let web: Vec<PortfolioItem> = serde_json::from_slice(&body).unwrap();
    assert_eq!(web.len(), 2);

    let (_, body) = call(&app, "GET", "/api/portfolio?featured=true", false, None).await;
    let featured: Vec<PortfolioItem> = serde_json::from_slice(&body).unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].slug, "fintech-dashboard");
    assert!(!featured[0].technologies.contains_key("backend"));

    let (status, body) = call(&app, "GET", "/api/portfolio/fitness-app", false, None).await;
    assert_eq!(status, StatusCode::OK);
    let item: PortfolioItem = serde_json::from_slice(&body).unwrap();
    assert_eq!(item.category, "Mobile");
}

#[tokio::test]
async fn contact_submission_reaches_admin_inbox() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/contact",
        false,
        Some(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "budget": "10k-25k",
            "message": "Let's build an engine."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let response: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(response["delivered"], false);
    let id = response["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "GET", "/api/admin/contacts", false, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "GET", "/api/admin/contacts?q=engine", true, None).await;
    assert_eq!(status, StatusCode::OK);
    let inbox: Vec<ContactSubmission> = serde_json::from_slice(&body).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].status, ContactStatus::New);

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/admin/contacts/{}/status", id),
        true,
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let archived: ContactSubmission = serde_json::from_slice(&body).unwrap();
    assert_eq!(archived.status, ContactStatus::Archived);

    let uri = format!("/api/admin/contacts/{}", id);
    let (status, body) = call(&app, "GET", &uri, true, None).await;
    assert_eq!(status, StatusCode::OK);
    let stored: ContactSubmission = serde_json::from_slice(&body).unwrap();
    assert_eq!(stored.status, ContactStatus::Archived);
    assert_eq!(stored.budget.as_deref(), Some("10k-25k"));
}

#[tokio::test]
async fn team_and_testimonials_are_ordered() {
    let app = app();

    for (name, order) in [("Zed", 0), ("Amy", 2), ("Bob", 1)] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/admin/team",
            true,
            Some(json!({ "name": name, "designation": "Engineer", "orderIndex": order })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/api/team", false, None).await;
    let team: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let names: Vec<&str> = team.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Zed", "Bob", "Amy"]);

    let (status, _) = call(
        &app,
        "POST",
        "/api/admin/testimonials",
        true,
        Some(json!({ "name": "Client", "content": "Superb", "rating": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn services_ignore_category_filter() {
    let app = app();
    let (status, _) = call(
        &app,
        "POST",
        "/api/admin/services",
        true,
        Some(json!({ "title": "Web Development" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, "GET", "/api/services?category=web", false, None).await;
    assert_eq!(status, StatusCode::OK);
    let services: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(services.len(), 1);
}

#[tokio::test]
async fn malformed_requests_get_error_json() {
    let app = app();

    let (status, body) = call(
        &app,
        "PUT",
        "/api/admin/services/not-a-uuid",
        true,
        Some(json!({ "title": "Web" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "Invalid path parameter");

    let mistyped = Some(json!({ "name": 5 }));
    let (status, body) = call(&app, "POST", "/api/contact", false, mistyped).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "Invalid request body");

    let (status, body) = call(&app, "GET", "/api/blog?featured=maybe", false, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "Invalid query string");
}
