use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HelloResponse {
    message: &'static str,
}

/// GET /hello -> liveness marker.
pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Server is running the latest code!",
    })
}
