//! End-to-end API tests against a real Postgres instance.
//!
//! Set TEST_DATABASE_URL to run these; without it every test exits early so
//! the suite stays green on machines without a database.

use actix_web::{http::StatusCode, test, web, App};
use serde_json::json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use cultura_backend::handlers::{
    events::configure_event_routes, subscriptions::configure_subscription_routes,
    users::configure_user_routes, venues::configure_venue_routes,
};
use cultura_backend::services::security::SecurityService;
use cultura_middleware::AuthMiddlewareFactory;

const TEST_SECRET: &str = "api-test-secret";

macro_rules! require_db {
    () => {
        match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => return,
        }
    };
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(SecurityService::new(TEST_SECRET)))
                .wrap(AuthMiddlewareFactory::new(TEST_SECRET))
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(configure_user_routes)
                .configure(configure_venue_routes)
                .configure(configure_event_routes)
                .configure(configure_subscription_routes),
        )
        .await
    };
}

async fn setup_pool(database_url: &str) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn register_body(username: &str) -> serde_json::Value {
    json!({
        "email": format!("{}@example.com", username),
        "username": username,
        "password": "correct-horse-battery",
        "password_confirm": "correct-horse-battery",
        "first_name": "Test",
        "last_name": "User"
    })
}

/// Registers a fresh user through the API, yielding (user id, access token).
macro_rules! register_and_login {
    ($app:expr) => {{
        let username = unique("user");
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(register_body(&username))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let user_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/users/token")
            .set_json(json!({ "username": username, "password": "correct-horse-battery" }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let tokens: serde_json::Value = test::read_body_json(resp).await;
        (user_id, tokens["access"].as_str().unwrap().to_string())
    }};
}

fn venue_body(slug: &str) -> serde_json::Value {
    json!({
        "name": "Teatro Principal",
        "slug": slug,
        "description": "Historic theater downtown",
        "category": "theater",
        "address": "Calle Hidalgo 42",
        "status": "published"
    })
}

fn event_body(venue_id: Uuid, slug: &str) -> serde_json::Value {
    json!({
        "venue": venue_id,
        "title": "Noche de Danza",
        "slug": slug,
        "description": "An evening of contemporary dance",
        "category": "dance",
        "start_datetime": "2030-05-01T19:00:00Z",
        "end_datetime": "2030-05-01T22:00:00Z",
        "status": "published"
    })
}

macro_rules! create_venue {
    ($app:expr, $token:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/venues")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json($body)
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let venue: serde_json::Value = test::read_body_json(resp).await;
        venue
    }};
}

#[actix_web::test]
async fn registration_rejects_password_mismatch() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let mut body = register_body(&unique("user"));
    body["password_confirm"] = json!("something-else-entirely");
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(detail["password"][0], "Passwords do not match.");
}

#[actix_web::test]
async fn registration_rejects_duplicate_username() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let username = unique("user");
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(register_body(&username))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let mut body = register_body(&username);
    body["email"] = json!(format!("{}@other.example.com", username));
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert!(detail["username"][0].as_str().unwrap().contains("exists"));
}

#[actix_web::test]
async fn registration_response_never_leaks_password_material() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(register_body(&unique("user")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[actix_web::test]
async fn token_endpoint_rejects_bad_credentials() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/users/token")
        .set_json(json!({ "username": unique("ghost"), "password": "whatever-here" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_flow_issues_working_access_token() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let username = unique("user");
    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(register_body(&username))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/users/token")
        .set_json(json!({ "username": username, "password": "correct-horse-battery" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tokens: serde_json::Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/users/token/refresh")
        .set_json(json!({ "refresh": tokens["refresh"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: serde_json::Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header((
            "Authorization",
            format!("Bearer {}", refreshed["access"].as_str().unwrap()),
        ))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn me_requires_authentication() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (user_id, token) = register_and_login!(&app);
    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"].as_str().unwrap(), user_id.to_string());
}

#[actix_web::test]
async fn users_cannot_edit_other_accounts() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (alice_id, _) = register_and_login!(&app);
    let (_, bob_token) = register_and_login!(&app);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/users/{}", alice_id))
        .insert_header(("Authorization", format!("Bearer {}", bob_token)))
        .set_json(json!({ "bio": "hijacked" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn venue_creation_requires_authentication() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/venues")
        .set_json(venue_body(&unique("venue")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn venue_slug_collision_rules() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let slug = unique("venue");
    let venue = create_venue!(&app, &token, venue_body(&slug));
    let venue_id = venue["id"].as_str().unwrap();

    // Same slug again is a field-level validation failure.
    let req = test::TestRequest::post()
        .uri("/api/venues")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(venue_body(&slug))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert!(detail["slug"][0].as_str().unwrap().contains("exists"));

    // Updating a venue while keeping its own slug is allowed.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "slug": slug, "name": "Teatro Principal Renovado" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn draft_venues_are_visible_only_to_their_owner() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, owner_token) = register_and_login!(&app);
    let (_, stranger_token) = register_and_login!(&app);

    let mut body = venue_body(&unique("venue"));
    body["status"] = json!("draft");
    let venue = create_venue!(&app, &owner_token, body);
    let venue_id = venue["id"].as_str().unwrap();

    // Anonymous and stranger: 404. Owner: 200.
    let req = test::TestRequest::get()
        .uri(&format!("/api/venues/{}", venue_id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", stranger_token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", owner_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn only_the_owner_may_modify_a_venue() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, owner_token) = register_and_login!(&app);
    let (_, stranger_token) = register_and_login!(&app);
    let venue = create_venue!(&app, &owner_token, venue_body(&unique("venue")));
    let venue_id = venue["id"].as_str().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", stranger_token)))
        .set_json(json!({ "name": "Taken Over" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", stranger_token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn event_rejects_end_before_start() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let venue = create_venue!(&app, &token, venue_body(&unique("venue")));
    let venue_id: Uuid = venue["id"].as_str().unwrap().parse().unwrap();

    let mut body = event_body(venue_id, &unique("event"));
    body["end_datetime"] = json!("2030-05-01T18:00:00Z");
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(detail["end_datetime"][0], "End time must be after start time.");
}

#[actix_web::test]
async fn positive_price_forces_event_to_be_paid() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let venue = create_venue!(&app, &token, venue_body(&unique("venue")));
    let venue_id: Uuid = venue["id"].as_str().unwrap().parse().unwrap();

    let mut body = event_body(venue_id, &unique("event"));
    body["price"] = json!("150.00");
    body["is_free"] = json!(true);
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(event["is_free"], json!(false));
}

#[actix_web::test]
async fn event_creation_fails_for_unknown_venue() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(event_body(Uuid::new_v4(), &unique("event")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn venue_with_events_cannot_be_deleted() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let venue = create_venue!(&app, &token, venue_body(&unique("venue")));
    let venue_id: Uuid = venue["id"].as_str().unwrap().parse().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(event_body(venue_id, &unique("event")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: serde_json::Value = test::read_body_json(resp).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Removing the event unblocks the venue.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/events/{}", event["id"].as_str().unwrap()))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
    let req = test::TestRequest::delete()
        .uri(&format!("/api/venues/{}", venue_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[actix_web::test]
async fn plan_catalog_lists_active_plans_cheapest_first() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri("/api/subscriptions/plans")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let plans: serde_json::Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = plans
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"free"));
    assert!(ids.contains(&"basic"));
    assert!(ids.contains(&"pro"));
    assert_eq!(ids.first(), Some(&"free"));
}

#[actix_web::test]
async fn subscription_lifecycle_mutates_one_record_in_place() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);

    // No subscription yet.
    let req = test::TestRequest::get()
        .uri("/api/subscriptions/me")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(detail["detail"], "User has no subscription.");

    // First upgrade creates the record.
    let req = test::TestRequest::post()
        .uri("/api/subscriptions/upgrade")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "plan_id": "basic" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(first["plan_id"], "basic");

    // Second upgrade switches plans on the same record.
    let req = test::TestRequest::post()
        .uri("/api/subscriptions/upgrade")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "plan_id": "pro" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(second["plan_id"], "pro");
    assert_eq!(second["id"], first["id"]);
}

#[actix_web::test]
async fn trailing_slash_paths_resolve_like_bare_ones() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri("/api/subscriptions/plans/")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let (_, token) = register_and_login!(&app);
    let venue = create_venue!(&app, &token, venue_body(&unique("venue")));
    let req = test::TestRequest::get()
        .uri(&format!("/api/venues/{}/", venue["id"].as_str().unwrap()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/users/me/")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn listings_show_drafts_only_to_their_owner() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, owner_token) = register_and_login!(&app);
    let (_, stranger_token) = register_and_login!(&app);

    let published_slug = unique("venue");
    let draft_slug = unique("venue");
    let published = create_venue!(&app, &owner_token, venue_body(&published_slug));
    let mut body = venue_body(&draft_slug);
    body["status"] = json!("draft");
    create_venue!(&app, &owner_token, body);

    let venue_id: Uuid = published["id"].as_str().unwrap().parse().unwrap();
    let published_event_slug = unique("event");
    let draft_event_slug = unique("event");
    for (slug, status) in [
        (&published_event_slug, "published"),
        (&draft_event_slug, "draft"),
    ] {
        let mut body = event_body(venue_id, slug);
        body["status"] = json!(status);
        let req = test::TestRequest::post()
            .uri("/api/events")
            .insert_header(("Authorization", format!("Bearer {}", owner_token)))
            .set_json(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    macro_rules! listed_slugs {
        ($uri:expr, $token:expr) => {{
            let mut req = test::TestRequest::get().uri($uri);
            if let Some(token) = $token {
                req = req.insert_header(("Authorization", format!("Bearer {}", token)));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let items: serde_json::Value = test::read_body_json(resp).await;
            items
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v["slug"].as_str().unwrap().to_string())
                .collect::<Vec<_>>()
        }};
    }

    // Anonymous and stranger listings carry only the published items.
    for token in [None, Some(&stranger_token)] {
        let venues = listed_slugs!("/api/venues", token);
        assert!(venues.contains(&published_slug));
        assert!(!venues.contains(&draft_slug));

        let events = listed_slugs!("/api/events", token);
        assert!(events.contains(&published_event_slug));
        assert!(!events.contains(&draft_event_slug));
    }

    // The owner additionally sees their own drafts.
    let venues = listed_slugs!("/api/venues", Some(&owner_token));
    assert!(venues.contains(&published_slug));
    assert!(venues.contains(&draft_slug));

    let events = listed_slugs!("/api/events", Some(&owner_token));
    assert!(events.contains(&published_event_slug));
    assert!(events.contains(&draft_event_slug));
}

#[actix_web::test]
async fn updating_to_a_slug_held_by_another_venue_fails() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);
    let first_slug = unique("venue");
    create_venue!(&app, &token, venue_body(&first_slug));
    let second = create_venue!(&app, &token, venue_body(&unique("venue")));

    let req = test::TestRequest::patch()
        .uri(&format!("/api/venues/{}", second["id"].as_str().unwrap()))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "slug": first_slug }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert!(detail["slug"][0].as_str().unwrap().contains("exists"));
}

#[actix_web::test]
async fn upgrade_validates_plan_id() {
    let url = require_db!();
    let pool = setup_pool(&url).await;
    let app = test_app!(pool);

    let (_, token) = register_and_login!(&app);

    let req = test::TestRequest::post()
        .uri("/api/subscriptions/upgrade")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(detail["detail"], "plan_id is required.");

    let req = test::TestRequest::post()
        .uri("/api/subscriptions/upgrade")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "plan_id": "platinum" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let detail: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(detail["detail"], "Plan not found.");
}
