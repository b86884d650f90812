use actix_web::{route, HttpResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

#[route("/", method = "GET")]
/// Service banner
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Todo App Backend with actix-web",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "todos": "/api/todos",
            "health": "/health"
        }
    }))
}

#[route("/health", method = "GET")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}
