//! End-to-end API tests
//!
//! Exercises the full router against real SQLite-backed stores (in
//! memory) with a stubbed weather provider.

use std::sync::Arc;

use application::{
    ports::{WeatherLookupError, WeatherLookupPort},
    services::SubscriptionService,
};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use domain::{CityKey, WeatherReading};
use infrastructure::{
    ConnectionPool, DatabaseConfig, SqliteCityRegistry, SqliteSnapshotStore,
    SqliteSubscriptionLedger, config::ApiKeyEntry, create_pool,
};
use presentation_http::{ApiKeyAuthLayer, AppState, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const API_KEY: &str = "sk-test-key";
const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440001";
const OTHER_API_KEY: &str = "sk-other-key";
const OTHER_USER_ID: &str = "550e8400-e29b-41d4-a716-446655440002";

/// Weather stub that only knows a fixed set of city names
struct StubWeather {
    known: Vec<&'static str>,
}

#[async_trait]
impl WeatherLookupPort for StubWeather {
    async fn current(&self, key: &CityKey) -> Result<WeatherReading, WeatherLookupError> {
        if self.known.iter().any(|name| *name == key.name()) {
            Ok(WeatherReading {
                description: "clear sky".to_string(),
                temperature: 21.5,
                ..WeatherReading::default()
            })
        } else {
            Err(WeatherLookupError::Rejected {
                code: 404,
                message: "city not found".to_string(),
            })
        }
    }
}

fn build_app(entries: &[ApiKeyEntry]) -> (Router, Arc<ConnectionPool>) {
    // Single connection so every store sees the same in-memory database
    let pool = Arc::new(
        create_pool(&DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        })
        .expect("pool"),
    );

    let cities = Arc::new(SqliteCityRegistry::new(Arc::clone(&pool)));
    let snapshots = Arc::new(SqliteSnapshotStore::new(Arc::clone(&pool)));
    let ledger = Arc::new(SqliteSubscriptionLedger::new(Arc::clone(&pool)));
    let weather = Arc::new(StubWeather {
        known: vec!["Kyiv", "Lviv", "Odesa"],
    });

    let service = Arc::new(SubscriptionService::new(
        cities,
        snapshots,
        ledger,
        weather,
    ));

    let app = create_router(AppState {
        subscriptions: service,
    })
    .layer(ApiKeyAuthLayer::from_api_keys(entries));

    (app, pool)
}

fn test_app() -> Router {
    let entries = [
        ApiKeyEntry {
            key: API_KEY.to_string(),
            user_id: USER_ID.to_string(),
            email: "user@example.com".to_string(),
        },
        ApiKeyEntry {
            key: OTHER_API_KEY.to_string(),
            user_id: OTHER_USER_ID.to_string(),
            email: "other@example.com".to_string(),
        },
    ];

    build_app(&entries).0
}

fn count_rows(pool: &ConnectionPool, table: &str) -> i64 {
    let conn = pool.get().expect("connection");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .expect("count")
}

fn post_json(uri: &str, key: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", key)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, key: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", key)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_req(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

fn delete_req(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn kyiv_body(frequency: u32) -> Value {
    json!({
        "city": {"name": "Kyiv", "country_code": "UA"},
        "notification_frequency": frequency
    })
}

#[tokio::test]
async fn health_does_not_require_api_key() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn subscriptions_require_api_key() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/subscriptions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_subscription_returns_201() {
    let app = test_app();

    let response = app
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body, json!({"res": "New subscription created successfully"}));
}

#[tokio::test]
async fn duplicate_subscription_is_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(12)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": "You are already subscribed to this city. Please, edit an existing subscription"})
    );
}

#[tokio::test]
async fn two_users_can_subscribe_to_the_same_city() {
    let entries = [
        ApiKeyEntry {
            key: API_KEY.to_string(),
            user_id: USER_ID.to_string(),
            email: "user@example.com".to_string(),
        },
        ApiKeyEntry {
            key: OTHER_API_KEY.to_string(),
            user_id: OTHER_USER_ID.to_string(),
            email: "other@example.com".to_string(),
        },
    ];
    let (app, pool) = build_app(&entries);

    let response = app
        .clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/v1/subscriptions", OTHER_API_KEY, kyiv_body(6)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Both subscriptions share one city row and one snapshot
    assert_eq!(count_rows(&pool, "cities"), 1);
    assert_eq!(count_rows(&pool, "weather_snapshots"), 1);
    assert_eq!(count_rows(&pool, "subscriptions"), 2);
}

#[tokio::test]
async fn disabled_auth_keeps_subscriptions_reachable() {
    // No keys configured: every request runs as the anonymous user,
    // so what it creates it can also see and remove
    let (app, _pool) = build_app(&[]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/subscriptions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(kyiv_body(6).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/subscriptions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let views = body.as_array().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["city"]["name"], "Kyiv");

    let id = views[0]["id"].as_i64().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/subscriptions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_city_propagates_provider_error() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/subscriptions",
            API_KEY,
            json!({
                "city": {"name": "Atlantis", "country_code": "GR"},
                "notification_frequency": 6
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "city not found"}));

    // The failed attempt must not have left anything visible to the user
    let response = app
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_shows_only_own_subscriptions() {
    let app = test_app();

    app.clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/v1/subscriptions",
            OTHER_API_KEY,
            json!({
                "city": {"name": "Lviv", "country_code": "UA"},
                "notification_frequency": 3
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let views = body.as_array().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["city"]["name"], "Kyiv");
    assert_eq!(views[0]["city"]["state"], "");
    assert_eq!(views[0]["city"]["country_code"], "UA");
    assert_eq!(views[0]["notification_frequency"], 6);
    assert!(views[0]["id"].is_i64());
}

#[tokio::test]
async fn edit_subscription_moves_it_to_a_new_city() {
    let app = test_app();

    app.clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/v1/subscriptions/{id}"),
            API_KEY,
            json!({
                "city": {"name": "Odesa", "country_code": "UA"},
                "notification_frequency": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"res": "Subscription edited"}));

    let response = app
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["city"]["name"], "Odesa");
    assert_eq!(body[0]["notification_frequency"], 2);
}

#[tokio::test]
async fn edit_keeps_frequency_when_omitted() {
    let app = test_app();

    app.clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let id = body_json(response).await[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/v1/subscriptions/{id}"),
            API_KEY,
            json!({"city": {"name": "Lviv", "country_code": "UA"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["city"]["name"], "Lviv");
    assert_eq!(body[0]["notification_frequency"], 6);
}

#[tokio::test]
async fn edit_someone_elses_subscription_is_not_found() {
    let app = test_app();

    app.clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let id = body_json(response).await[0]["id"].as_i64().unwrap();

    let response = app
        .oneshot(put_json(
            &format!("/v1/subscriptions/{id}"),
            OTHER_API_KEY,
            json!({
                "city": {"name": "Lviv", "country_code": "UA"},
                "notification_frequency": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": format!("Subscription with id={id} does not exist for this user")})
    );
}

#[tokio::test]
async fn delete_subscription_returns_confirmation() {
    let app = test_app();

    app.clone()
        .oneshot(post_json("/v1/subscriptions", API_KEY, kyiv_body(6)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let id = body_json(response).await[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete_req(&format!("/v1/subscriptions/{id}"), API_KEY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"res": "Subscription deleted"}));

    let response = app
        .oneshot(get_req("/v1/subscriptions", API_KEY))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn delete_unknown_subscription_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(delete_req("/v1/subscriptions/999", API_KEY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"error": "Subscription with id=999 does not exist for this user"})
    );
}

#[tokio::test]
async fn invalid_country_code_is_bad_request() {
    let app = test_app();

    let response = app
        .oneshot(post_json(
            "/v1/subscriptions",
            API_KEY,
            json!({
                "city": {"name": "Kyiv", "country_code": "Ukraine"},
                "notification_frequency": 6
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}
