//! # Articles Service エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! 下流サービスの詳細（レスポンスボディ、トークンエンドポイントのエラー内容）は
//! ログにのみ出力し、呼び出し元には RFC 9457 形式の要約だけを返す。

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use service_common::ErrorResponse;
use thiserror::Error;

use crate::client::UserScheduleError;

/// Basic 認証失敗時の `WWW-Authenticate` ヘッダー値
pub const BASIC_CHALLENGE: &str = r#"Basic realm="Realm""#;

/// Articles Service のハンドラエラー
#[derive(Debug, Error)]
pub enum ArticlesError {
    #[error(transparent)]
    UserSchedule(#[from] UserScheduleError),

    #[error("リクエストボディを解釈できません: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for ArticlesError {
    fn into_response(self) -> Response {
        match self {
            ArticlesError::UserSchedule(err) => user_schedule_error_response(&err),
            ArticlesError::InvalidBody(rejection) => invalid_body_response(&rejection),
        }
    }
}

/// ステータスは抽出器の判定（400 / 415 / 422）に従う
fn invalid_body_response(rejection: &JsonRejection) -> Response {
    let status = rejection.status();
    tracing::debug!(status = status.as_u16(), reason = %rejection.body_text(), "不正なリクエストボディ");

    (
        status,
        Json(ErrorResponse::new(
            "invalid-request-body",
            "Invalid Request Body",
            status.as_u16(),
            rejection.body_text(),
        )),
    )
        .into_response()
}

fn user_schedule_error_response(err: &UserScheduleError) -> Response {
    tracing::error!(
        error.category = "external_service",
        error.kind = "user_schedule",
        "User Schedule Service の呼び出しに失敗しました: {}",
        err
    );

    let (status, body) = match err {
        UserScheduleError::Upstream { status, .. } => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::bad_gateway(format!(
                "User Schedule Service がエラーを返しました（ステータス {status}）"
            )),
        ),
        UserScheduleError::Token(_) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new(
                "token-acquisition-failed",
                "Token Acquisition Failed",
                502,
                "アクセストークンを取得できませんでした",
            ),
        ),
        UserScheduleError::Unavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::service_unavailable("User Schedule Service に接続できません"),
        ),
        UserScheduleError::Network(_) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::bad_gateway("User Schedule Service との通信に失敗しました"),
        ),
    };

    (status, Json(body)).into_response()
}

/// 未認証レスポンス（Basic 認証のチャレンジ付き）
pub fn basic_unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
        Json(ErrorResponse::unauthorized("認証が必要です")),
    )
        .into_response()
}
