//! Bearer トークン付きで送信する HTTP クライアント
//!
//! 受信リクエストの Request ID は [`with_inbound_request_id`] のスコープ内で
//! 下流への `X-Request-Id` として引き継がれる。

use std::{future::Future, sync::Arc};

use reqwest::{StatusCode, header::HeaderValue};
use service_common::observability::REQUEST_ID_HEADER;

use super::{error::AuthorizedRequestError, provider::AccessTokenProvider};

tokio::task_local! {
    static INBOUND_REQUEST_ID: HeaderValue;
}

/// `request_id` を下流呼び出しに引き継ぐスコープで `future` を実行する
pub async fn with_inbound_request_id<F: Future>(request_id: HeaderValue, future: F) -> F::Output {
    INBOUND_REQUEST_ID.scope(request_id, future).await
}

/// スコープ外（起動時の疎通確認など）では `None`
fn inbound_request_id() -> Option<HeaderValue> {
    INBOUND_REQUEST_ID.try_with(HeaderValue::clone).ok()
}

/// アクセストークンを自動付与する HTTP クライアント
///
/// リソースサーバーが 401 / 403 を返した場合はキャッシュ中のトークンを破棄する。
/// 次回の呼び出しで新しいトークンが取得される（当該リクエストは再送しない）。
#[derive(Clone)]
pub struct AuthorizedClient {
    http:   reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { http, tokens }
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url)
    }

    pub fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.put(url)
    }

    /// `Authorization: Bearer` と（スコープ内なら）`X-Request-Id` を付与して送信する
    pub async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AuthorizedRequestError> {
        let token = self.tokens.access_token().await?;

        let mut builder = builder.bearer_auth(&token.value);
        if let Some(request_id) = inbound_request_id() {
            builder = builder.header(REQUEST_ID_HEADER, request_id);
        }
        let response = builder.send().await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::warn!(
                status = response.status().as_u16(),
                url = %response.url(),
                "リソースサーバーがアクセストークンを拒否しました"
            );
            self.tokens.invalidate(&token.value).await;
        }

        Ok(response)
    }
}
