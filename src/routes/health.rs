use axum::{ Json, http::StatusCode };
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: u16,
    pub version: String,
}

pub async fn health() -> Json<HealthData> {
    Json(HealthData {
        status: StatusCode::OK.as_u16(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
