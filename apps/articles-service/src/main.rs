//! # Articles Service サーバー
//!
//! 記事の投稿とユーザーの空き状況確認を受け付ける API サーバー。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌───────────────────────┐
//! │   Client     │────▶│ Articles Service │────▶│ User Schedule Service │
//! └──────────────┘     │   port: 8080     │     │      port: 8081       │
//!                      └──────────────────┘     └───────────────────────┘
//!                               │ client credentials
//!                               ▼
//!                      ┌──────────────────┐
//!                      │ Token Endpoint   │
//!                      │   (Cognito)      │
//!                      └──────────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ARTICLES_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ARTICLES_PORT` | **Yes** | ポート番号 |
//! | `COGNITO_TOKEN_URI` | **Yes** | トークンエンドポイント |
//! | `COGNITO_CLIENT_ID` | **Yes** | クライアント ID |
//! | `COGNITO_CLIENT_SECRET` | **Yes** | クライアントシークレット |
//! | `COGNITO_SCOPES` | No | 要求するスコープ（空白またはカンマ区切り） |
//! | `USER_SCHEDULE_GET_SCHEDULE_URL` | **Yes** | スケジュール取得 URL |
//! | `USER_SCHEDULE_UPDATE_SCHEDULE_URL` | **Yes** | スケジュール更新 URL（`{id}` を含む） |
//! | `ARTICLES_BASIC_AUTH_USER` | No | Basic 認証ユーザー（デフォルト: `user`） |
//! | `ARTICLES_BASIC_AUTH_PASSWORD` | No | Basic 認証パスワード（未設定時は生成してログ出力） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p articles-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use articles_service::{
    app_builder::build_app,
    client::{
        AccessTokenProvider,
        AuthorizedClient,
        ClientCredentialsTokenProvider,
        REQUEST_TIMEOUT,
        UserScheduleClientImpl,
        build_http_client,
    },
    config::ArticlesConfig,
    handler::ReadinessState,
    middleware::{BasicCredentials, SecurityState},
};
use service_common::observability::TracingConfig;
use tokio::net::TcpListener;

/// Articles Service のエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. クライアントとルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("articles-service");
    service_common::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "articles-service").entered();

    let config = ArticlesConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Articles Service を起動します: {}:{}",
        config.host,
        config.port
    );

    let http_client = build_http_client(REQUEST_TIMEOUT)
        .context("HTTP クライアントの初期化に失敗しました")?;

    let token_provider: Arc<dyn AccessTokenProvider> = Arc::new(
        ClientCredentialsTokenProvider::new(config.registration.clone(), http_client.clone()),
    );
    let user_schedule_client = Arc::new(UserScheduleClientImpl::new(
        &config.get_schedule_url,
        &config.update_schedule_url,
        AuthorizedClient::new(http_client.clone(), token_provider),
    ));
    let readiness_state = Arc::new(ReadinessState::from_schedule_url(
        http_client,
        &config.get_schedule_url,
    )?);
    let credentials = BasicCredentials::from_config(
        &config.basic_auth_user,
        config.basic_auth_password.as_deref(),
    );

    let app = build_app(
        user_schedule_client,
        readiness_state,
        SecurityState::new(credentials),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Articles Service が起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
