//! # ヘルスチェックハンドラ
//!
//! - `/health` — Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` — Readiness Check（User Schedule Service の `/health` を確認）
//!
//! トークンエンドポイントは確認しない。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use service_common::{
    CheckStatus,
    ConfigError,
    HealthResponse,
    ReadinessResponse,
    ReadinessStatus,
};

/// 依存サービス確認のタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Articles Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub http_client:              reqwest::Client,
    /// User Schedule Service の `/health` URL
    pub user_schedule_health_url: String,
}

impl ReadinessState {
    /// スケジュール取得 URL と同じオリジンの `/health` を確認先にする
    pub fn from_schedule_url(
        http_client: reqwest::Client,
        get_schedule_url: &str,
    ) -> Result<Self, ConfigError> {
        let url = reqwest::Url::parse(get_schedule_url)
            .and_then(|url| url.join("/health"))
            .map_err(|e| ConfigError::Invalid {
                var:    "USER_SCHEDULE_GET_SCHEDULE_URL".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            user_schedule_health_url: url.to_string(),
        })
    }
}

/// Articles Service の Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let user_schedule =
        check_user_schedule(&state.http_client, &state.user_schedule_health_url).await;

    let checks = HashMap::from([("user_schedule_service".to_string(), user_schedule)]);
    let response = ReadinessResponse::from_checks(checks);

    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

/// User Schedule Service の `/health` を呼ぶ（タイムアウト: 5 秒）
async fn check_user_schedule(client: &reqwest::Client, url: &str) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, client.get(url).send()).await {
        Ok(Ok(response)) if response.status().is_success() => CheckStatus::Ok,
        Ok(Ok(response)) => {
            tracing::warn!(
                status = response.status().as_u16(),
                "readiness check: user schedule service returned non-success"
            );
            CheckStatus::Error
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: user schedule service request failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: user schedule service check timed out");
            CheckStatus::Error
        }
    }
}
