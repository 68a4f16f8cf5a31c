//! # Canonical Log Line ミドルウェア
//!
//! HTTP リクエスト完了時に、そのリクエストの重要情報を1行に集約した
//! サマリログ（Canonical Log Line）を出力する tower Layer。
//!
//! ## TraceLayer との責務分離
//!
//! - TraceLayer: スパン作成（method, uri, request_id）
//! - CanonicalLogLineLayer: リクエスト完了サマリ（method, path, status, latency）
//!
//! TraceLayer のスパン内に配置することで、`request_id` が JSON ログに自動的に含まれる。
//!
//! 5xx は `warn`、それ以外は `info` で出力する。401 / 403 は `auth.denied = true` を付ける。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// ヘルスチェックパスかどうか（`/health`, `/health/ready`）
fn is_health_check_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/health/")
}

/// Canonical Log Line を出力する Layer
///
/// ```text
/// TraceLayer → CanonicalLogLineLayer → [認可ミドルウェア] → handler
/// ```
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap: poll_ready 済みの inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if is_health_check_path(req.uri().path()) {
            return Box::pin(async move { inner.call(req).await });
        }

        let summary = RequestSummary::start(&req);

        Box::pin(async move {
            let result = inner.call(req).await;
            summary.emit(&result);
            result
        })
    }
}

/// 1 リクエスト分のサマリ
struct RequestSummary {
    method: String,
    path:   String,
    start:  Instant,
}

impl RequestSummary {
    fn start<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().to_string(),
            path:   req.uri().path().to_owned(),
            start:  Instant::now(),
        }
    }

    /// 5xx は warn、処理エラーは error、それ以外は info
    fn emit<B, E: std::fmt::Display>(&self, result: &Result<Response<B>, E>) {
        let latency_ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (method, path) = (&self.method, &self.path);

        match result {
            Ok(response) => {
                let status = response.status();
                let denied = matches!(status.as_u16(), 401 | 403);
                if status.is_server_error() {
                    tracing::warn!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.status_code = status.as_u16(),
                        http.latency_ms = latency_ms,
                        auth.denied = denied,
                        "リクエスト完了"
                    );
                } else {
                    tracing::info!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.status_code = status.as_u16(),
                        http.latency_ms = latency_ms,
                        auth.denied = denied,
                        "リクエスト完了"
                    );
                }
            }
            Err(err) => {
                tracing::error!(
                    log.r#type = "canonical",
                    http.method = %method,
                    http.path = %path,
                    http.latency_ms = latency_ms,
                    error.message = %err,
                    "リクエスト処理エラー"
                );
            }
        }
    }
}
