//! End-to-end HTTP tests against the full router and an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use orderdesk_server::db::create_memory_pool;
use orderdesk_server::{build_router, AppState};

async fn app() -> Router {
    let pool = create_memory_pool().await.expect("in-memory pool");
    build_router(AppState::new(pool))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn user_a() -> Value {
    json!({
        "first_name": "A",
        "last_name": "B",
        "age": 20,
        "email": "a@b.com",
        "role": "client",
        "phone": "123"
    })
}

fn order_for(customer_id: i64, executor_id: i64) -> Value {
    json!({
        "name": "Paint",
        "description": "Paint the fence",
        "start_date": "01.02.2023",
        "end_date": "05.02.2023",
        "address": "Main st. 1",
        "price": 500,
        "customer_id": customer_id,
        "executor_id": executor_id
    })
}

// === Users ===

#[tokio::test]
async fn create_user_then_get_returns_same_record() {
    let app = app().await;

    let (status, created) = send_json(&app, Method::POST, "/users", Some(user_a())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    for key in ["first_name", "last_name", "age", "email", "role", "phone"] {
        assert_eq!(created[key], user_a()[key], "field {key}");
    }

    let (status, fetched) = send_json(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn user_without_age_stores_null() {
    let app = app().await;
    let mut body = user_a();
    body.as_object_mut().unwrap().remove("age");

    let (status, created) = send_json(&app, Method::POST, "/users", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["age"], Value::Null);
}

#[tokio::test]
async fn user_store_failures_are_500() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/users", Some(json!({"first_name": "A"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let mut young = user_a();
    young["age"] = json!(12);
    let (status, _) = send(&app, Method::POST, "/users", Some(young)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn partial_user_update_keeps_other_fields() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;

    let (status, updated) =
        send_json(&app, Method::PUT, "/users/1", Some(json!({"last_name": "C"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "C");

    let (_, fetched) = send_json(&app, Method::GET, "/users/1", None).await;
    assert_eq!(fetched["last_name"], "C");
    assert_eq!(fetched["first_name"], "A");
    assert_eq!(fetched["age"], 20);
    assert_eq!(fetched["phone"], "123");
}

#[tokio::test]
async fn list_users_returns_all_records() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/users", Some(user_a())).await;

    let (status, users) = send_json(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[1]["id"], 2);
}

#[tokio::test]
async fn deleting_user_removes_their_offers() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(2, 2))).await;
    send(&app, Method::POST, "/offers", Some(json!({"order_id": 1, "executor_id": 1}))).await;
    send(&app, Method::POST, "/offers", Some(json!({"order_id": 1, "executor_id": 2}))).await;

    let (status, message) = send_json(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "User with id 1 has been deleted");

    let (status, _) = send(&app, Method::GET, "/offers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, offers) = send_json(&app, Method::GET, "/offers", None).await;
    let offers = offers.as_array().unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0]["offer_id"], 2);

    // The row itself is gone, not just hidden by the join.
    let (status, _) = send(&app, Method::PUT, "/offers/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Orders ===

#[tokio::test]
async fn order_names_come_from_joined_users() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;

    let (status, created) = send_json(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["customer_id"], 1);
    assert_eq!(created["start_date"], "01.02.2023");

    let uri = format!("/orders/{}", created["id"]);
    let (status, order) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["customer_full_name"], "A B");
    assert_eq!(order["executor_full_name"], "A B");
    assert_eq!(order["order_description"], "Paint the fence");
    assert_eq!(order["date_frame"], "01.02.2023 - 05.02.2023");
    assert_eq!(order["price"], 500);

    let (_, orders) = send_json(&app, Method::GET, "/orders", None).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0], order);
}

#[tokio::test]
async fn order_with_dangling_customer_is_404() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(42, 1))).await;

    let (status, body) = send_json(&app, Method::GET, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "There is no order with id 1");

    let (_, orders) = send_json(&app, Method::GET, "/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_update_returns_plain_record() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;

    let (status, updated) =
        send_json(&app, Method::PUT, "/orders/1", Some(json!({"price": 900}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 900);
    assert_eq!(updated["name"], "Paint");
    assert!(updated.get("customer_full_name").is_none());
}

#[tokio::test]
async fn empty_order_update_has_no_body() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;

    let (status, body) = send(&app, Method::PUT, "/orders/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::PUT, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, Method::PUT, "/orders/9", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_update_with_unrelated_keys_returns_record() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;

    let (status, body) = send_json(&app, Method::PUT, "/orders/1", Some(json!({"foo": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Paint");
    assert_eq!(body["price"], 500);
    assert!(body.get("foo").is_none());
}

#[tokio::test]
async fn deleting_order_leaves_offers() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;
    send(&app, Method::POST, "/offers", Some(json!({"order_id": 1, "executor_id": 1}))).await;

    let (status, message) = send_json(&app, Method::DELETE, "/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Order with id 1 has been deleted");

    // Offer row survives: update still finds it, the joined read does not.
    let (status, _) = send(&app, Method::PUT, "/offers/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/offers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Offers ===

#[tokio::test]
async fn offer_detail_and_list_shapes() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/offers",
        Some(json!({"order_id": 1, "executor_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, json!({"id": 1, "order_id": 1, "executor_id": 1}));

    let (_, detail) = send_json(&app, Method::GET, "/offers/1", None).await;
    assert_eq!(
        detail,
        json!({
            "id": 1,
            "order_id": 1,
            "order_title": "Paint",
            "date_frame": "01.02.2023 - 05.02.2023",
            "executor_full_name": "A B",
            "age": 20,
            "contact_information": "a@b.com, 123"
        })
    );

    let (_, list) = send_json(&app, Method::GET, "/offers", None).await;
    assert_eq!(
        list,
        json!([{
            "offer_id": 1,
            "order_id": 1,
            "order_description": "Paint the fence",
            "time_frame": "01.02.2023 - 05.02.2023",
            "executor_name": "A B"
        }])
    );
}

#[tokio::test]
async fn offer_update_answers_with_plain_text() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;
    let mut other = user_a();
    other["first_name"] = json!("C");
    other["last_name"] = json!("D");
    send(&app, Method::POST, "/users", Some(other)).await;
    send(&app, Method::POST, "/orders", Some(order_for(1, 1))).await;
    send(&app, Method::POST, "/offers", Some(json!({"order_id": 1, "executor_id": 1}))).await;

    let (status, body) = send(&app, Method::PUT, "/offers/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Offer with id 1 has been updated");

    let (status, body) = send(&app, Method::PUT, "/offers/1", Some(json!({"executor_id": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Offer with id 1 has been updated");

    let (_, detail) = send_json(&app, Method::GET, "/offers/1", None).await;
    assert_eq!(detail["executor_full_name"], "C D");
    let (_, list) = send_json(&app, Method::GET, "/offers", None).await;
    assert_eq!(list[0]["executor_name"], "C D");
}

#[tokio::test]
async fn delete_offer_confirms_and_is_gone() {
    let app = app().await;
    send(&app, Method::POST, "/offers", Some(json!({"order_id": 1, "executor_id": 1}))).await;

    let (status, message) = send_json(&app, Method::DELETE, "/offers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Offer with id 1 has been deleted");

    let (status, _) = send(&app, Method::DELETE, "/offers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Errors ===

#[tokio::test]
async fn missing_ids_are_404_with_id_in_message() {
    let app = app().await;

    for (uri, kind) in [("/users/999", "user"), ("/orders/999", "order"), ("/offers/999", "offer")] {
        let (status, body) = send_json(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("999"), "{message}");
        assert!(message.contains(kind), "{message}");

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
    }
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let app = app().await;

    let (status, body) = send_json(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn malformed_patch_is_bad_request() {
    let app = app().await;
    send(&app, Method::POST, "/users", Some(user_a())).await;

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/users/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;

    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
