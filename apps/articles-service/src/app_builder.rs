//! # Articles Service アプリケーション構築
//!
//! State の組み立てとルーター構築を担当する。
//! `main.rs` は設定読み込み・クライアント初期化・サーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
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
    client::UserScheduleClient,
    handler::{
        ArticleState,
        ReadinessState,
        get_user_availability,
        health_check,
        post_article,
        readiness_check,
    },
    middleware::{SecurityState, authorize, request_id::carry_request_id},
};

/// ルーターを構築する
///
/// アクセス制御はルート単位ではなく全体に 1 つのミドルウェアとして掛け、
/// アクセスルールチェーンでパスごとの条件を解決する。
/// ルートに一致しないパスも認証対象になる（未認証なら 404 より先に 401）。
pub fn build_app(
    user_schedule_client: Arc<dyn UserScheduleClient>,
    readiness_state: Arc<ReadinessState>,
    security_state: SecurityState,
) -> Router {
    let article_state = Arc::new(ArticleState {
        user_schedule_client,
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state)
        .route("/articles", post(post_article))
        .route(
            "/articles/user-availability/{name}",
            get(get_user_availability),
        )
        .with_state(article_state)
        .layer(from_fn_with_state(security_state, authorize))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 5. carry_request_id: ハンドラの実行範囲で User Schedule Service 呼び出しに引き継ぐ
        .layer(from_fn(carry_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
