//! # User Schedule Service サーバー
//!
//! ユーザーのスケジュール取得・更新を受け付ける OAuth2 リソースサーバー。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────────┐
//! │ Articles Service │────▶│ User Schedule Service │
//! └──────────────────┘     │      port: 8081       │
//!                          └───────────────────────┘
//!                                     │ JWK Set（初回検証時・kid 不明時）
//!                                     ▼
//!                          ┌───────────────────────┐
//!                          │   Issuer (Cognito)    │
//!                          └───────────────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `USER_SCHEDULE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `USER_SCHEDULE_PORT` | **Yes** | ポート番号 |
//! | `RESOURCE_SERVER_ID` | **Yes** | リソースサーバー ID（スコープのプレフィックス） |
//! | `JWT_ISSUER_URI` | **Yes** | 期待する `iss` |
//! | `JWT_JWK_SET_URI` | No | JWK Set URL（デフォルト: `<issuer>/.well-known/jwks.json`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p user-schedule-service
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context as _;
use service_common::observability::TracingConfig;
use tokio::net::TcpListener;
use user_schedule_service::{
    app_builder::build_app,
    config::UserScheduleConfig,
    middleware::BearerAuthState,
    security::{JwksTokenVerifier, TokenVerifier},
};

/// JWK Set 取得のタイムアウト
const JWKS_TIMEOUT: Duration = Duration::from_secs(5);

/// User Schedule Service のエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("user-schedule-service");
    service_common::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "user-schedule-service").entered();

    let config = UserScheduleConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        issuer = %config.issuer_uri,
        jwk_set_uri = %config.jwk_set_uri,
        resource_server_id = %config.resource_server_id,
        "User Schedule Service を起動します: {}:{}",
        config.host,
        config.port
    );

    let http_client = reqwest::Client::builder()
        .timeout(JWKS_TIMEOUT)
        .build()
        .context("HTTP クライアントの初期化に失敗しました")?;

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwksTokenVerifier::new(
        http_client,
        config.jwk_set_uri.clone(),
        config.issuer_uri.clone(),
    ));

    let app = build_app(BearerAuthState::new(&config.resource_server_id, verifier));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("User Schedule Service が起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
