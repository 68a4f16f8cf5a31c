//! # User Schedule Service アプリケーション構築

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use service_common::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{get_user_schedule, health_check, update_schedule},
    middleware::{BearerAuthState, authorize},
};

/// ルーターを構築する
///
/// 認可はルート全体に掛けるため、ルートに一致しないパスも
/// トークンがなければ 404 より先に 401 になる。
pub fn build_app(auth_state: BearerAuthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/user-schedule/schedule", get(get_user_schedule))
        .route("/user-schedule/schedule/{id}", put(update_schedule))
        .layer(from_fn_with_state(auth_state, authorize))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
