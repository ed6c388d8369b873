//! The demo employee endpoints.
//!
//! Each handler demonstrates one adapter feature in isolation: path and
//! query parameters, JSON (de)serialisation, response-builder properties,
//! the error taxonomy, and — for the async and streaming variants —
//! consuming a [`Solo`] / [`Stream`] pipeline from a handler.

use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rest::error::ApiError;
use crate::rest::request::Request;
use crate::rest::response::Response;
use crate::rest::router::Router;
use crate::rest::status::Status;
use crate::{Solo, Stream};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub name: String,
    pub age: u32,
}

impl Employee {
    pub fn new(name: &str, age: u32) -> Self {
        Self { name: name.to_owned(), age }
    }
}

/// Registers every employee route. Static segments are registered alongside
/// the parameterised ones; the radix tree gives statics priority.
pub fn routes() -> Router {
    Router::new()
        .get("/employee/employee", get_employee)
        .post("/employee/employee", add_employee)
        .get("/employee/hello", hello)
        .get("/employee/hello-status", hello_status)
        .get("/employee/hello-annotation", hello_annotation)
        .get("/employee/hello-async", hello_async)
        .get("/employee/hello-streaming", hello_streaming)
        .get("/employee/cheeses", search_cheese)
        .get("/employee/cheeses/{cheese}", find_cheese)
        .get("/employee/{name}", all_params)
        .get("/employee/{name}/{age}", personalised_hello)
}

// GET /employee/{name}?age=<int> — plain-text echo of both parameters
pub async fn all_params(req: Request) -> Result<Response, ApiError> {
    let name = req.param("name").unwrap_or("unknown").to_owned();
    let age = match req.query("age") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::Validation(format!("age must be an integer, got `{raw}`")))?
            .to_string(),
        None => "null".to_owned(),
    };
    Ok(Response::text(format!("{name}/{age}")))
}

// GET /employee/{name}/{age} — the age segment must be purely numeric; any
// other value behaves as if the route did not exist
pub async fn personalised_hello(req: Request) -> Result<Response, ApiError> {
    let name = req.param("name").unwrap_or("unknown").to_owned();
    let age = req.param("age").unwrap_or_default().to_owned();
    if age.is_empty() || !age.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::NotFound(format!("no resource at /employee/{name}/{age}")));
    }
    Ok(Response::text(format!("Hello {name} is your age really {age}?")))
}

// GET /employee/employee — JSON serialisation of a typed value
pub async fn get_employee(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::json_value(&Employee::new("sachin", 30)))
}

// POST /employee/employee — JSON body in, same JSON back, logged
pub async fn add_employee(req: Request) -> Result<Response, ApiError> {
    let employee: Employee = serde_json::from_slice(req.body())?;
    info!(name = %employee.name, age = employee.age, "added employee");
    Ok(Response::json_value(&employee))
}

// GET /employee/hello — response properties: header, cookie, expiry
pub async fn hello(_req: Request) -> Result<Response, ApiError> {
    let two_days_out = Utc::now() + Days::new(2);
    Ok(Response::builder()
        .header("x-cheese", "Camembert")
        .expires(two_days_out)
        .cookie("Flavour", "chocolate")
        .text("Hello, World!"))
}

// GET /employee/hello-status — JSON body with a non-200 status
pub async fn hello_status(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::builder()
        .status(Status::Conflict)
        .json_value(&Employee::new("sac", 30)))
}

// GET /employee/hello-annotation — fixed status and header, nothing else
pub async fn hello_annotation(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::builder()
        .status(Status::Created)
        .header("x-cheese", "Camembert")
        .text("Hello, World!"))
}

// GET /employee/hello-async — the response value comes out of a lazy Solo
// pipeline; the handler suspends until the item resolves instead of
// blocking a worker
pub async fn hello_async(_req: Request) -> Result<Response, ApiError> {
    let employee = Solo::from_supplier(|| Employee::new("sac", 30)).await?;
    Ok(Response::json_value(&employee))
}

// GET /employee/hello-streaming — a bounded Stream collected into one JSON
// array
pub async fn hello_streaming(_req: Request) -> Result<Response, ApiError> {
    let employees = Stream::from_items([Employee::new("sac1", 30), Employee::new("sac2", 31)])
        .collect_to_vec()
        .await?;
    Ok(Response::json_value(&employees))
}

// GET /employee/cheeses/{cheese} — the NotFound branch of the taxonomy
pub async fn find_cheese(req: Request) -> Result<Response, ApiError> {
    info!("calling cheese service");
    let cheese = req.param("cheese").unwrap_or_default();
    if cheese != "salty" {
        return Err(ApiError::NotFound(format!("Unknown cheese: {cheese}")));
    }
    Ok(Response::text("Salty cheese"))
}

// GET /employee/cheeses?cheese=<s> — the Validation branch: a missing or
// blank query parameter is the caller's fault
pub async fn search_cheese(req: Request) -> Result<Response, ApiError> {
    let cheese = req.query("cheese").unwrap_or_default();
    if cheese.trim().is_empty() {
        return Err(ApiError::Validation("cheese must not be blank".to_owned()));
    }
    if cheese != "salty" {
        return Err(ApiError::NotFound(format!("Unknown cheese: {cheese}")));
    }
    Ok(Response::text("Salty cheese"))
}
