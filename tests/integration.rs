use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use freight_desk::api::rest::router;
use freight_desk::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

struct User {
    id: Uuid,
    role: &'static str,
}

impl User {
    fn buyer() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: "buyer",
        }
    }

    fn manager() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: "manager",
        }
    }

    fn admin() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: "admin",
        }
    }
}

fn setup() -> axum::Router {
    let state = AppState::seeded().unwrap();
    router(Arc::new(state))
}

fn request(method: &str, uri: &str, user: Option<&User>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header("x-user-id", user.id.to_string())
            .header("x-user-role", user.role);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get_request(uri: &str) -> Request<Body> {
    request("GET", uri, None, None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn route_body() -> Value {
    json!({
        "from_city": "Moscow",
        "to_city": "Saint Petersburg",
        "weight": 500.0,
        "length": 2.0,
        "width": 1.5,
        "height": 1.0
    })
}

async fn add_to_cart(app: &axum::Router, user: &User, service_id: u32) -> Value {
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/cart/services/{service_id}"),
            Some(user),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"], 6);
    assert_eq!(body["requests"], 0);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let app = setup();

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/estimate",
            None,
            Some(json!({
                "service_id": 1,
                "from_city": "Moscow",
                "to_city": "Kazan",
                "length": 1.0,
                "width": 1.0,
                "height": 1.0,
                "weight": 100.0
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("estimates_total"));
}

#[tokio::test]
async fn list_services_supports_search_and_price_filters() {
    let app = setup();

    let res = app.clone().oneshot(get_request("/api/services")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 6);

    let res = app
        .clone()
        .oneshot(get_request("/api/services?search=truck"))
        .await
        .unwrap();
    let names: Vec<String> = body_json(res)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Truck", "Small truck"]);

    let res = app
        .oneshot(get_request("/api/services?min_price=150&max_price=300"))
        .await
        .unwrap();
    let body = body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn estimate_truck_moscow_to_saint_petersburg() {
    let app = setup();
    let res = app
        .oneshot(request(
            "POST",
            "/api/estimate",
            None,
            Some(json!({
                "service_id": 1,
                "from_city": " moscow ",
                "to_city": "Saint Petersburg",
                "length": 2.0,
                "width": 1.5,
                "height": 1.0,
                "weight": 500.0
            })),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["delivery_days"], 3);
    assert_eq!(body["distance_km"], 635.0);
    assert_eq!(body["total_cost"], 10825.0);
}

#[tokio::test]
async fn estimate_over_caps_returns_422_with_metric() {
    let app = setup();
    let res = app
        .oneshot(request(
            "POST",
            "/api/estimate",
            None,
            Some(json!({
                "service_id": 3,
                "from_city": "Moscow",
                "to_city": "Kazan",
                "length": 1.0,
                "width": 1.0,
                "height": 1.0,
                "weight": 2000.0
            })),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["violation"]["metric"], "weight");
    assert!(body["error"].as_str().unwrap().contains("Air freight"));
}

#[tokio::test]
async fn estimate_rejects_non_positive_dimensions() {
    let app = setup();
    let res = app
        .oneshot(request(
            "POST",
            "/api/estimate",
            None,
            Some(json!({
                "service_id": 1,
                "from_city": "Moscow",
                "to_city": "Kazan",
                "length": 0.0,
                "width": 1.0,
                "height": 1.0,
                "weight": 10.0
            })),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn estimate_unknown_service_returns_404() {
    let app = setup();
    let res = app
        .oneshot(request(
            "POST",
            "/api/estimate",
            None,
            Some(json!({
                "service_id": 77,
                "from_city": "Moscow",
                "to_city": "Kazan",
                "length": 1.0,
                "width": 1.0,
                "height": 1.0,
                "weight": 10.0
            })),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_requires_identity() {
    let app = setup();
    let res = app.oneshot(get_request("/api/cart")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adding_same_service_twice_increments_quantity() {
    let app = setup();
    let user = User::buyer();

    let first = add_to_cart(&app, &user, 1).await;
    let second = add_to_cart(&app, &user, 1).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["status"], "draft");
    let lines = second["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 2);

    let res = app
        .oneshot(request("GET", "/api/cart", Some(&user), None))
        .await
        .unwrap();
    let cart = body_json(res).await;
    assert_eq!(cart["request_id"], first["id"]);
    assert_eq!(cart["count"], 2);
}

#[tokio::test]
async fn form_empty_cart_is_rejected() {
    let app = setup();
    let user = User::buyer();
    let draft = add_to_cart(&app, &user, 2).await;
    let id = draft["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(request(
            "DELETE",
            "/api/cart/services/2",
            Some(&user),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/form"),
            Some(&user),
            Some(route_body()),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("no services"));
}

#[tokio::test]
async fn full_lifecycle_flow() {
    let app = setup();
    let owner = User::buyer();
    let moderator = User::manager();

    add_to_cart(&app, &owner, 1).await;
    let draft = add_to_cart(&app, &owner, 4).await;
    let id = draft["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/services/4"),
            Some(&owner),
            Some(json!({ "comment": "second leg" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/form"),
            Some(&owner),
            Some(route_body()),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let formed = body_json(res).await;
    assert_eq!(formed["status"], "formed");
    assert!(!formed["formed_at"].is_null());

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/form"),
            Some(&owner),
            Some(route_body()),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/complete"),
            Some(&owner),
            Some(json!({ "status": "completed" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/complete"),
            Some(&moderator),
            Some(json!({ "status": "completed" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let completed = body_json(res).await;
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["total_days"], 4);
    assert_eq!(completed["total_cost"], 16615.0);
    assert_eq!(completed["moderator_id"], moderator.id.to_string());

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/logistic-requests/{id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail = body_json(res).await;
    let services = detail["services"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[1]["service"]["name"], "Rail");
    assert_eq!(services[1]["comment"], "second leg");

    let res = app
        .oneshot(request("GET", "/api/cart", Some(&owner), None))
        .await
        .unwrap();
    let cart = body_json(res).await;
    assert!(cart["request_id"].is_null());
    assert_eq!(cart["count"], 0);
}

#[tokio::test]
async fn complete_rejects_unknown_outcome() {
    let app = setup();
    let owner = User::buyer();
    let draft = add_to_cart(&app, &owner, 1).await;
    let id = draft["id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(request(
            "PUT",
            &format!("/api/logistic-requests/{id}/complete"),
            Some(&User::manager()),
            Some(json!({ "status": "shipped" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_requests_never_listed() {
    let app = setup();
    let owner = User::buyer();
    let draft = add_to_cart(&app, &owner, 1).await;
    let id = draft["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/logistic-requests/{id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    for uri in [
        "/api/logistic-requests",
        "/api/logistic-requests?status=draft",
        "/api/logistic-requests?status=deleted",
    ] {
        let res = app
            .clone()
            .oneshot(request("GET", uri, Some(&User::admin()), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 0, "{uri}");
    }

    let res = app
        .oneshot(request(
            "GET",
            &format!("/api/logistic-requests/{id}"),
            Some(&owner),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_rejects_unknown_status() {
    let app = setup();
    let res = app
        .oneshot(request(
            "GET",
            "/api/logistic-requests?status=Formed",
            Some(&User::manager()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_changes_require_admin() {
    let app = setup();
    let spec = json!({
        "name": "Courier van",
        "price": 60.0,
        "delivery_days": 1,
        "max_weight": 800.0,
        "max_volume": 6.0
    });

    let res = app
        .clone()
        .oneshot(request("POST", "/api/services", Some(&User::manager()), Some(spec.clone())))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request("POST", "/api/services", Some(&User::admin()), Some(spec)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    assert_eq!(created["id"], 7);

    let res = app
        .oneshot(get_request("/api/services/7"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn referenced_service_cannot_be_deleted() {
    let app = setup();
    let owner = User::buyer();
    let admin = User::admin();
    add_to_cart(&app, &owner, 5).await;

    let res = app
        .clone()
        .oneshot(request("DELETE", "/api/services/5", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(request("DELETE", "/api/services/6", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.oneshot(get_request("/api/services/6")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_inclusive_creation_dates() {
    let app = setup();
    let owner = User::buyer();
    add_to_cart(&app, &owner, 1).await;

    let today = chrono::Utc::now().date_naive();
    let tomorrow = today + chrono::Duration::days(1);

    let cases = [
        (format!("/api/logistic-requests?date_from={today}&date_to={today}"), 1),
        (format!("/api/logistic-requests?date_from={tomorrow}"), 0),
        (format!("/api/logistic-requests?date_to={tomorrow}"), 1),
    ];
    for (uri, expected) in cases {
        let res = app
            .clone()
            .oneshot(request("GET", &uri, Some(&owner), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await.as_array().unwrap().len(), expected, "{uri}");
    }
}
