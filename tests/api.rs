use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use movequote_web::config::AppConfig;
use movequote_web::{app, AppState};

fn test_app() -> Router {
    let config = AppConfig::from_lookup(|_| None).expect("default config");
    app(AppState::new(config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn sample_items() -> Value {
    json!([
        {
            "id": "1", "name": "Living Room Items", "quantity": 1,
            "unit_price": "150", "include_vat": true, "vat_rate": 21
        },
        {
            "id": "2", "name": "Bedroom Items", "quantity": 2,
            "unit_price": 120, "include_vat": true, "vat_rate": 21
        }
    ])
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn totals_endpoint_computes_breakdown() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/totals",
        Some(json!({ "items": sample_items() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal"]["amount"], "390.00");
    assert_eq!(body["total_vat"]["amount"], "81.90");
    assert_eq!(body["discount_amount"]["amount"], "0.00");
    assert_eq!(body["grand_total"]["amount"], "471.90");
    assert_eq!(body["grand_total"]["currency"], "EUR");
    assert_eq!(body["lines"][1]["total"]["amount"], "290.40");
}

#[tokio::test]
async fn totals_endpoint_applies_fixed_discount() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/totals",
        Some(json!({
            "items": sample_items(),
            "discount": { "type": "fixed", "value": 50, "reason": "Returning customer" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grand_total"]["amount"], "421.90");
}

#[tokio::test]
async fn totals_endpoint_rejects_zero_quantity() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/totals",
        Some(json!({
            "items": [{ "id": "1", "name": "Broken", "quantity": 0, "unit_price": 10 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "items[0].quantity");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/totals",
        Some(json!({
            "items": [{
                "id": "1", "name": "Odd VAT", "quantity": 1, "unit_price": 10, "vat_rate": 19
            }]
        })),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(body["error_type"], "invalid_body");
}

#[tokio::test]
async fn item_total_endpoint() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/item-total",
        Some(json!({
            "item": {
                "id": "5", "name": "Transport", "quantity": 1,
                "unit_price": "275", "include_vat": false
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "5");
    assert_eq!(body["total"]["amount"], "275.00");
}

#[tokio::test]
async fn package_and_hourly_endpoints() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/package",
        Some(json!({ "package_id": "full-service", "total_volume": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"]["amount"], "1075.00");
    assert_eq!(body["volume_adjustment"]["amount"], "225.00");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/hourly",
        Some(json!({
            "hourly_rate": 75,
            "estimated_hours": 8,
            "number_of_movers": 3,
            "truck_size": "medium",
            "distance_km": 67
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labor"]["amount"], "1800.00");
    assert_eq!(body["distance"]["amount"], "100.50");
    assert_eq!(body["truck"]["amount"], "175.00");
    assert_eq!(body["total"]["amount"], "2075.50");
}

#[tokio::test]
async fn unknown_package_is_a_validation_error() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/package",
        Some(json!({ "package_id": "premium", "total_volume": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "package_id");
}

#[tokio::test]
async fn catalog_endpoints() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api/pricing/packages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["packages"].as_array().map(|p| p.len()), Some(3));
    assert_eq!(body["packages"][1]["id"], "full-service");

    let (status, body) = send(&app, Method::GET, "/api/pricing/rates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance_rate"]["amount"], "1.50");
    assert_eq!(body["vat_rates"], json!([0, 9, 21]));
}

#[tokio::test]
async fn selection_endpoint_seeds_line_items() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/pricing/selection",
        Some(json!({
            "selection": {
                "mode": "hourly", "hourly_rate": 75, "estimated_hours": 8, "number_of_movers": 3
            },
            "summary": { "total_volume": 45, "total_distance_km": 67 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "hourly");
    assert_eq!(body["total"]["amount"], "2075.50");
    assert_eq!(body["line_items"].as_array().map(|i| i.len()), Some(3));
    assert_eq!(body["line_items"][0]["origin"], "selection");
}

#[tokio::test]
async fn quote_draft_lifecycle() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/quotes",
        Some(json!({
            "customer": { "name": "Jan de Vries", "email": "jan.devries@email.nl" },
            "summary": { "total_volume": 45, "total_distance_km": 67 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["quote"]["id"].as_str().expect("quote id").to_string();
    assert!(body["quote"]["quote_number"].as_str().unwrap_or_default().starts_with("QT-"));
    assert_eq!(body["quote"]["status"]["state"], "draft");

    let actions_uri = format!("/api/quotes/{}/actions", id);

    let (status, body) = send(
        &app,
        Method::POST,
        &actions_uri,
        Some(json!({
            "type": "select_pricing",
            "selection": { "mode": "package", "package_id": "full-service" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["subtotal"]["amount"], "1075.00");

    let (status, body) = send(
        &app,
        Method::POST,
        &actions_uri,
        Some(json!({ "type": "set_discount", "discount": { "type": "percentage", "value": 10 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 1075 + 225.75 VAT = 1300.75; 10% = 130.075 -> 130.08
    assert_eq!(body["totals"]["discount_amount"]["amount"], "130.08");
    assert_eq!(body["totals"]["grand_total"]["amount"], "1170.67");

    let (status, body) = send(
        &app,
        Method::POST,
        &actions_uri,
        Some(json!({ "type": "finalize", "mode": "send" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["status"]["state"], "sent");

    let (status, body) = send(
        &app,
        Method::POST,
        &actions_uri,
        Some(json!({ "type": "clear_discount" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "quote_state_conflict");

    let revise = Some(json!({ "type": "revise" }));
    let (status, body) = send(&app, Method::POST, &actions_uri, revise).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["revision"], 2);
    assert_eq!(body["quote"]["status"]["state"], "draft");

    let (status, body) = send(&app, Method::GET, &format!("/api/quotes/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["grand_total"]["amount"], "1170.67");
}

#[tokio::test]
async fn missing_quote_is_not_found() {
    let app = test_app();
    let uri = format!("/api/quotes/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn rejected_create_leaves_no_draft_behind() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/quotes",
        Some(json!({ "summary": { "total_volume": -5, "total_distance_km": 10 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "summary.total_volume");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drafts"]["drafts"], 0);
}
