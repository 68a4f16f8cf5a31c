//! # 下流呼び出しへの Request ID 引き継ぎ
//!
//! `SetRequestIdLayer` が確定した [`RequestId`] をハンドラの実行範囲に渡す。
//! ヘッダーの付与は [`AuthorizedClient`](crate::client::AuthorizedClient) が行う。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;

use crate::client::oauth2::authorized_client::with_inbound_request_id;

/// Request ID があればそのスコープ内で後続を実行する
pub async fn carry_request_id(request: Request<Body>, next: Next) -> Response {
    let Some(request_id) = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.header_value().clone())
    else {
        return next.run(request).await;
    };

    with_inbound_request_id(request_id, next.run(request)).await
}
