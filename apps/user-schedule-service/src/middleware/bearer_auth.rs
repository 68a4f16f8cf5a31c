//! # Bearer トークン認可ミドルウェア
//!
//! リクエストのメソッドとパスからアクセス条件を解決し、
//! 必要に応じて `Authorization: Bearer` のトークンを検証する。
//!
//! 検証済みの [`Claims`] はリクエストの extensions に格納する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let verifier = Arc::new(JwksTokenVerifier::new(http_client, jwk_set_uri, issuer));
//! let state = BearerAuthState::new("user-schedule", verifier);
//!
//! Router::new()
//!     .route("/user-schedule/schedule", get(get_user_schedule))
//!     .layer(from_fn_with_state(state, authorize))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use service_common::access_rule::AccessRules;

use crate::{
    error::BearerError,
    security::{Claims, ScheduleAccess, TokenVerifier, access_rules},
};

/// Bearer 認可ミドルウェアの状態
#[derive(Clone)]
pub struct BearerAuthState {
    pub rules:    Arc<AccessRules<ScheduleAccess>>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl BearerAuthState {
    pub fn new(resource_server_id: &str, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            rules: Arc::new(access_rules(resource_server_id)),
            verifier,
        }
    }
}

/// Bearer トークン認可ミドルウェア
///
/// - トークンなし → 401 `WWW-Authenticate: Bearer`
/// - 検証失敗 → 401 `error="invalid_token"`
/// - 権限不足 → 403 `error="insufficient_scope"`
pub async fn authorize(
    State(state): State<BearerAuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let access = state
        .rules
        .resolve(request.method(), request.uri().path())
        .clone();

    if access == ScheduleAccess::PermitAll {
        return next.run(request).await;
    }

    let claims = match authenticate(&state, request.headers()).await {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    if let ScheduleAccess::Authority(authority) = access
        && !claims.has_authority(&authority)
    {
        tracing::info!(
            principal = %claims.principal(),
            path = %request.uri().path(),
            "必要な権限を持たないトークンです"
        );
        return BearerError::InsufficientScope(authority).into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// await をまたいで `&Request<Body>` を保持しない（`Body` は `Sync` でない）
async fn authenticate(
    state: &BearerAuthState,
    headers: &HeaderMap,
) -> Result<Claims, BearerError> {
    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(BearerError::MissingToken)?;

    Ok(state.verifier.verify(bearer.token()).await?)
}
