//! # JWT 検証
//!
//! JWK Set から署名鍵を取得し、アクセストークンを検証する。
//!
//! ## 鍵の取得
//!
//! - 最初の検証時に JWK Set を取得する（起動時には取得しない）
//! - `kid` がキャッシュにない場合は JWK Set を 1 回だけ再取得する
//! - 再取得はクールダウン中（デフォルト 30 秒）は行わない
//! - `kid` のないトークンは、鍵が 1 つだけの場合に限りその鍵で検証する
//!
//! ## 検証項目
//!
//! - アルゴリズムはヘッダーから取得し、鍵の種類と一致しなければ拒否
//! - `exp` / `nbf`（60 秒の猶予）
//! - `iss` が設定値と一致すること
//! - `aud` は検証しない

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    DecodingKey,
    Validation,
    decode,
    decode_header,
    errors::ErrorKind,
    jwk::{JwkSet, PublicKeyUse},
};
use tokio::sync::{Mutex, RwLock};

use super::claims::Claims;

/// `exp` / `nbf` の猶予（秒）
const LEEWAY_SECS: u64 = 60;

/// JWK Set 再取得のクールダウン
const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

/// JWT 検証エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    #[error("トークンの形式が不正です: {0}")]
    Malformed(String),

    #[error("署名鍵が見つかりません")]
    UnknownKey,

    #[error("トークンの有効期限が切れています")]
    Expired,

    #[error("トークンが無効です: {0}")]
    Invalid(String),

    #[error("JWK Set を取得できません: {0}")]
    JwksUnavailable(String),
}

impl JwtError {
    /// `WWW-Authenticate` の `error_description` に使う説明
    pub fn description(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "Malformed token",
            Self::UnknownKey => "Unknown signing key",
            Self::Expired => "Jwt expired",
            Self::Invalid(_) => "Invalid token",
            Self::JwksUnavailable(_) => "Couldn't retrieve remote JWK set",
        }
    }
}

/// アクセストークン検証のトレイト
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, JwtError>;
}

struct CachedKey {
    kid: Option<String>,
    key: DecodingKey,
}

/// JWK Set で検証する [`TokenVerifier`]
pub struct JwksTokenVerifier {
    http:             reqwest::Client,
    jwk_set_uri:      String,
    issuer:           String,
    keys:             RwLock<Vec<CachedKey>>,
    last_refresh:     Mutex<Option<Instant>>,
    refresh_cooldown: Duration,
}

impl JwksTokenVerifier {
    pub fn new(
        http: reqwest::Client,
        jwk_set_uri: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            http,
            jwk_set_uri: jwk_set_uri.into(),
            issuer: issuer.into(),
            keys: RwLock::new(Vec::new()),
            last_refresh: Mutex::new(None),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
        }
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, JwtError> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.cached_key(kid).await.ok_or_else(|| {
            tracing::debug!(kid = kid.unwrap_or("-"), "署名鍵が見つかりません");
            JwtError::UnknownKey
        })
    }

    async fn cached_key(&self, kid: Option<&str>) -> Option<DecodingKey> {
        let keys = self.keys.read().await;
        match kid {
            Some(kid) => keys
                .iter()
                .find(|cached| cached.kid.as_deref() == Some(kid))
                .map(|cached| cached.key.clone()),
            None => match keys.as_slice() {
                [only] => Some(only.key.clone()),
                _ => None,
            },
        }
    }

    /// JWK Set を取得してキャッシュを置き換える
    ///
    /// クールダウン中は何もしない。同時に呼ばれた場合は 1 回だけ取得する。
    async fn refresh_keys(&self) -> Result<(), JwtError> {
        let mut last_refresh = self.last_refresh.lock().await;
        if let Some(at) = *last_refresh
            && at.elapsed() < self.refresh_cooldown
        {
            return Ok(());
        }

        tracing::info!(jwk_set_uri = %self.jwk_set_uri, "JWK Set を取得します");

        let jwk_set = self.fetch_jwk_set().await?;
        let keys = to_cached_keys(jwk_set);

        tracing::info!(num_keys = keys.len(), "JWK Set をキャッシュしました");

        *self.keys.write().await = keys;
        *last_refresh = Some(Instant::now());

        Ok(())
    }

    async fn fetch_jwk_set(&self) -> Result<JwkSet, JwtError> {
        let response = self
            .http
            .get(&self.jwk_set_uri)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::error!(error = %e, "JWK Set の取得に失敗しました");
                JwtError::JwksUnavailable(e.to_string())
            })?;

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::error!(error = %e, "JWK Set のパースに失敗しました");
            JwtError::JwksUnavailable(e.to_string())
        })
    }

    fn validation(&self, header_alg: jsonwebtoken::Algorithm) -> Validation {
        let mut validation = Validation::new(header_alg);
        validation.leeway = LEEWAY_SECS;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// 署名に使えない鍵（`use: enc`、未対応の鍵種別）は除外する
fn to_cached_keys(jwk_set: JwkSet) -> Vec<CachedKey> {
    jwk_set
        .keys
        .iter()
        .filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)))
        .filter_map(|jwk| match DecodingKey::from_jwk(jwk) {
            Ok(key) => Some(CachedKey {
                kid: jwk.common.key_id.clone(),
                key,
            }),
            Err(e) => {
                tracing::warn!(
                    kid = jwk.common.key_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "JWK を署名鍵に変換できないため無視します"
                );
                None
            }
        })
        .collect()
}

fn to_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            JwtError::Malformed(e.to_string())
        }
        _ => JwtError::Invalid(e.to_string()),
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "トークンヘッダーをデコードできません");
            JwtError::Malformed(e.to_string())
        })?;

        let key = self.decoding_key(header.kid.as_deref()).await?;

        let token_data =
            decode::<Claims>(token, &key, &self.validation(header.alg)).map_err(|e| {
                tracing::debug!(error = %e, "トークンの検証に失敗しました");
                to_jwt_error(&e)
            })?;

        Ok(token_data.claims)
    }
}
