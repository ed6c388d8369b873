//! The demo employee API served over HTTP.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example employee_api
//!
//! Try:
//!   curl http://localhost:3000/employee/sachin?age=5
//!   curl http://localhost:3000/employee/employee
//!   curl -X POST http://localhost:3000/employee/employee \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice","age":25}'
//!   curl -i http://localhost:3000/employee/hello
//!   curl http://localhost:3000/employee/cheeses/salty
//!   curl http://localhost:3000/employee/hello-streaming

use brook::rest::{Server, employee};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    Server::bind("0.0.0.0:3000")
        .serve(employee::routes())
        .await
        .expect("server error");
}
