//! # アクセストークンプロバイダ
//!
//! client credentials グラントでトークンを取得し、有効期限内はキャッシュを返す。
//!
//! トークン取得は `tokio::sync::Mutex` で直列化する。期限切れ直後に並行リクエストが
//! 来ても、トークンエンドポイントへの問い合わせは 1 回で済む。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::header::ACCEPT;
use service_common::{Clock, SystemClock};
use tokio::sync::Mutex;

use super::{
    error::OAuth2Error,
    registration::ClientRegistration,
    token::{AccessToken, TokenErrorResponse, TokenResponse},
};

/// 有効期限をこの時間だけ前倒しして扱う
pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 60;

/// アクセストークンの供給元
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// 有効なアクセストークンを返す（必要なら取得する）
    async fn access_token(&self) -> Result<AccessToken, OAuth2Error>;

    /// リソースサーバーに拒否されたトークンをキャッシュから破棄する
    ///
    /// キャッシュ中のトークンが `rejected` と異なる場合（既に更新済み）は何もしない。
    async fn invalidate(&self, rejected: &str);
}

/// client credentials グラントのトークンプロバイダ
pub struct ClientCredentialsTokenProvider {
    registration: ClientRegistration,
    http:         reqwest::Client,
    cache:        Mutex<Option<AccessToken>>,
    clock:        Arc<dyn Clock>,
    clock_skew:   Duration,
}

impl ClientCredentialsTokenProvider {
    pub fn new(registration: ClientRegistration, http: reqwest::Client) -> Self {
        Self {
            registration,
            http,
            cache: Mutex::new(None),
            clock: Arc::new(SystemClock),
            clock_skew: Duration::seconds(DEFAULT_CLOCK_SKEW_SECS),
        }
    }

    /// 時刻の取得元を差し替える
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// トークンエンドポイントに問い合わせる
    async fn request_token(&self) -> Result<AccessToken, OAuth2Error> {
        let registration = &self.registration;

        let mut form = vec![("grant_type", "client_credentials".to_string())];
        if !registration.scopes.is_empty() {
            form.push(("scope", registration.scopes.join(" ")));
        }

        // client_secret_basic: RFC 6749 §2.3.1 に従い URL エンコードしてから Basic 認証に載せる
        let response = self
            .http
            .post(&registration.token_uri)
            .basic_auth(
                urlencoding::encode(&registration.client_id),
                Some(urlencoding::encode(&registration.client_secret)),
            )
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        let issued_at = self.clock.now();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(error_body) => error_body.into(),
                Err(_) => OAuth2Error::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let body = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuth2Error::InvalidResponse(e.to_string()))?;

        body.into_access_token(issued_at, &registration.scopes)
    }
}

#[async_trait]
impl AccessTokenProvider for ClientCredentialsTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, OAuth2Error> {
        let mut cache = self.cache.lock().await;

        let now = self.clock.now();
        if let Some(token) = cache.as_ref()
            && !token.is_expired_at(now, self.clock_skew)
        {
            return Ok(token.clone());
        }

        let token = match self.request_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "token_acquisition",
                    registration_id = %self.registration.registration_id,
                    "アクセストークンの取得に失敗しました: {}",
                    e
                );
                return Err(e);
            }
        };

        tracing::debug!(
            registration_id = %self.registration.registration_id,
            expires_at = %token.expires_at,
            "アクセストークンを取得しました"
        );

        *cache = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self, rejected: &str) {
        let mut cache = self.cache.lock().await;
        if cache.as_ref().is_some_and(|token| token.value == rejected) {
            tracing::info!(
                registration_id = %self.registration.registration_id,
                "拒否されたアクセストークンをキャッシュから破棄しました"
            );
            *cache = None;
        }
    }
}
