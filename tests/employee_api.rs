//! Endpoint-contract tests, driven through the router without a socket.

use brook::rest::{Request, Response, employee};
use http::Method;
use serde_json::{Value, json};

async fn get(uri: &str) -> Response {
    employee::routes().route(Request::new(Method::GET, uri)).await
}

fn body_text(res: &Response) -> &str {
    std::str::from_utf8(res.body()).expect("body is utf-8")
}

fn body_json(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("body is json")
}

#[tokio::test]
async fn path_and_query_params_echo() {
    let res = get("/employee/sachin?age=5").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "sachin/5");
}

#[tokio::test]
async fn missing_age_echoes_null() {
    let res = get("/employee/sachin").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "sachin/null");
}

#[tokio::test]
async fn non_numeric_age_is_rejected() {
    let res = get("/employee/sachin?age=old").await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn personalised_hello_with_numeric_age() {
    let res = get("/employee/sachin/5").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "Hello sachin is your age really 5?");
}

#[tokio::test]
async fn personalised_hello_ignores_non_numeric_age() {
    let res = get("/employee/sachin/0x5").await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn get_employee_returns_json() {
    let res = get("/employee/employee").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(body_json(&res), json!({"name": "sachin", "age": 30}));
}

#[tokio::test]
async fn post_employee_echoes_the_body() {
    let req = Request::new(Method::POST, "/employee/employee")
        .with_body(r#"{"name":"alice","age":25}"#);
    let res = employee::routes().route(req).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!({"name": "alice", "age": 25}));
}

#[tokio::test]
async fn post_employee_rejects_malformed_json() {
    let req = Request::new(Method::POST, "/employee/employee").with_body("not json");
    let res = employee::routes().route(req).await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn hello_sets_header_cookie_and_expiry() {
    let res = get("/employee/hello").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "Hello, World!");
    assert_eq!(res.header("x-cheese"), Some("Camembert"));
    assert_eq!(res.header("set-cookie"), Some("Flavour=chocolate"));
    let expires = res.header("expires").expect("expires header present");
    assert!(expires.ends_with("GMT"), "IMF-fixdate, got `{expires}`");
}

#[tokio::test]
async fn hello_status_is_conflict_with_json_body() {
    let res = get("/employee/hello-status").await;
    assert_eq!(res.status_code(), 409);
    assert_eq!(body_json(&res), json!({"name": "sac", "age": 30}));
}

#[tokio::test]
async fn hello_annotation_is_created_with_header() {
    let res = get("/employee/hello-annotation").await;
    assert_eq!(res.status_code(), 201);
    assert_eq!(res.header("x-cheese"), Some("Camembert"));
    assert_eq!(body_text(&res), "Hello, World!");
}

#[tokio::test]
async fn hello_async_resolves_through_a_solo() {
    let res = get("/employee/hello-async").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_json(&res), json!({"name": "sac", "age": 30}));
}

#[tokio::test]
async fn hello_streaming_collects_the_stream() {
    let res = get("/employee/hello-streaming").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(
        body_json(&res),
        json!([{"name": "sac1", "age": 30}, {"name": "sac2", "age": 31}]),
    );
}

#[tokio::test]
async fn salty_cheese_is_found() {
    let res = get("/employee/cheeses/salty").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "Salty cheese");
}

#[tokio::test]
async fn unknown_cheese_is_not_found_with_message() {
    let res = get("/employee/cheeses/brie").await;
    assert_eq!(res.status_code(), 404);
    assert_eq!(body_text(&res), "Unknown cheese: brie");
}

#[tokio::test]
async fn blank_cheese_query_is_rejected() {
    let res = get("/employee/cheeses?cheese=").await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(body_text(&res), "cheese must not be blank");

    let res = get("/employee/cheeses").await;
    assert_eq!(res.status_code(), 400);
}

#[tokio::test]
async fn salty_cheese_query_is_found() {
    let res = get("/employee/cheeses?cheese=salty").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(body_text(&res), "Salty cheese");
}

#[tokio::test]
async fn unmatched_route_is_not_found() {
    let res = get("/payroll").await;
    assert_eq!(res.status_code(), 404);
}
