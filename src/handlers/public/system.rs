use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::entity::ENTITIES;
use crate::database::DatabaseManager;

/// GET / - Service name, version, and the routes it answers
pub async fn root() -> Json<Value> {
    let entities: Vec<&str> = ENTITIES.iter().map(|e| e.name).collect();

    Json(json!({
        "success": true,
        "data": {
            "name": "Vendor Desk API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Vendor management back office: routing, CTS and team reports",
            "entities": entities,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/signup, /login (public - account and token acquisition)",
                "records": "/:entity[/:id] (GET, POST, PATCH, DELETE)",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
