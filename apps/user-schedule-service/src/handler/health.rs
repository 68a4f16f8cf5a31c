//! # ヘルスチェックハンドラ

use axum::Json;
use service_common::HealthResponse;

/// User Schedule Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
