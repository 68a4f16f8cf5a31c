//! # User Schedule Service エラーハンドリング
//!
//! Bearer トークン認可のエラーは RFC 6750 の `WWW-Authenticate` ヘッダーを付け、
//! ボディは RFC 9457 形式で返す。

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use service_common::ErrorResponse;
use thiserror::Error;

use crate::security::JwtError;

/// `error_uri` に載せる RFC 6750 の参照先
const BEARER_ERROR_URI: &str = "https://tools.ietf.org/html/rfc6750#section-3.1";

/// Bearer トークン認可のエラー
#[derive(Debug, Error)]
pub enum BearerError {
    #[error("Bearer トークンがありません")]
    MissingToken,

    #[error(transparent)]
    InvalidToken(#[from] JwtError),

    #[error("権限が不足しています: {0}")]
    InsufficientScope(String),
}

impl BearerError {
    /// `WWW-Authenticate` ヘッダーの値
    pub fn challenge(&self) -> String {
        match self {
            Self::MissingToken => "Bearer".to_string(),
            Self::InvalidToken(err) => format!(
                r#"Bearer error="invalid_token", error_description="{}", error_uri="{BEARER_ERROR_URI}""#,
                err.description()
            ),
            Self::InsufficientScope(_) => format!(
                r#"Bearer error="insufficient_scope", error_description="The request requires higher privileges than provided by the access token.", error_uri="{BEARER_ERROR_URI}""#
            ),
        }
    }
}

impl IntoResponse for BearerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized("アクセストークンが必要です"),
            ),
            Self::InvalidToken(err) => {
                if matches!(err, JwtError::JwksUnavailable(_)) {
                    tracing::error!(
                        error.category = "external_service",
                        error.kind = "jwks",
                        "トークンを検証できません: {}",
                        err
                    );
                } else {
                    tracing::debug!(error = %err, "無効なアクセストークン");
                }
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::unauthorized("アクセストークンが無効です"),
                )
            }
            Self::InsufficientScope(authority) => {
                tracing::debug!(required = %authority, "権限が不足しています");
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::forbidden("この操作を行う権限がありません"),
                )
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.challenge()) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

/// User Schedule Service のハンドラエラー
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("必須パラメータがありません: {0}")]
    MissingParameter(&'static str),

    #[error("クエリパラメータが不正です: {0}")]
    InvalidQuery(String),
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        match self {
            ScheduleError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(format!(
                    "必須パラメータ '{name}' がありません"
                ))),
            )
                .into_response(),
            ScheduleError::InvalidQuery(reason) => {
                tracing::debug!(reason = %reason, "クエリパラメータを解釈できません");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request("クエリパラメータが不正です")),
                )
                    .into_response()
            }
        }
    }
}
