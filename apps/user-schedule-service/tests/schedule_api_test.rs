//! User Schedule Service のエンドツーエンドテスト
//!
//! `build_app` で組み立てた実際のルーターに、HS256 で署名したトークンを送る。
//! JWK Set は httpmock で代替する。
//!
//! ## テストケース
//!
//! - read スコープで GET、update スコープで PUT が成功する
//! - スコープ不足は 403 `insufficient_scope`
//! - トークンなしは 401 `Bearer`、期限切れ・issuer 不一致・未知の kid は 401 `invalid_token`
//! - `/health` はトークンなしで 200
//! - 未定義のメソッド・パスもトークンがなければ 401
//! - `scp` 配列のスコープも認可に使える
//! - `userName` の欠落は 400、複数指定はカンマで連結する

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use httpmock::prelude::*;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use user_schedule_service::{
    app_builder::build_app,
    middleware::BearerAuthState,
    security::{JwksTokenVerifier, TokenVerifier},
};

const ISSUER: &str = "https://cognito-idp.eu-central-1.amazonaws.com/eu-central-1_example";
const RESOURCE_SERVER_ID: &str = "user-schedule";
const KID: &str = "key-1";
const SECRET: &[u8] = b"user-schedule-hs256-test-signing-key-01234567";
/// `SECRET` の base64url
const SECRET_K: &str = "dXNlci1zY2hlZHVsZS1oczI1Ni10ZXN0LXNpZ25pbmcta2V5LTAxMjM0NTY3";

async fn mock_jwks(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/.well-known/jwks.json");
            then.status(200).json_body(json!({
                "keys": [{"kty": "oct", "kid": KID, "alg": "HS256", "k": SECRET_K}]
            }));
        })
        .await
}

fn create_app(server: &MockServer) -> Router {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwksTokenVerifier::new(
        reqwest::Client::new(),
        server.url("/.well-known/jwks.json"),
        ISSUER,
    ));

    build_app(BearerAuthState::new(RESOURCE_SERVER_ID, verifier))
}

fn sign(kid: &str, claims: &serde_json::Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn token_with_scope(scope: &str) -> String {
    sign(
        KID,
        &json!({
            "sub": "4qf1c3bbgg0ob3hm1ksd3lgjb",
            "client_id": "4qf1c3bbgg0ob3hm1ksd3lgjb",
            "iss": ISSUER,
            "exp": get_current_timestamp() + 3600,
            "token_use": "access",
            "scope": scope,
        }),
    )
}

fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn www_authenticate(response: &Response) -> &str {
    response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_readスコープでスケジュールを取得できる() {
    // Given
    let server = MockServer::start_async().await;
    let jwks_mock = mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("user-schedule/schedule.read");

    // When
    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            Some(&token),
        ))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "Alice is available!");
    jwks_mock.assert_async().await;
}

#[tokio::test]
async fn test_updateスコープでスケジュールを更新できる() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("user-schedule/schedule.update");

    let response = sut
        .oneshot(request(Method::PUT, "/user-schedule/schedule/42", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "42 has been updated!");
}

#[tokio::test]
async fn test_readスコープだけでは更新できない() {
    // Given
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("user-schedule/schedule.read");

    // When
    let response = sut
        .oneshot(request(Method::PUT, "/user-schedule/schedule/42", Some(&token)))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(www_authenticate(&response).starts_with(r#"Bearer error="insufficient_scope""#));
}

#[tokio::test]
async fn test_別のリソースサーバーのスコープは認めない() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("other-server/schedule.read");

    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_トークンなしは401を返しjwk_setを取得しない() {
    // Given
    let server = MockServer::start_async().await;
    let jwks_mock = mock_jwks(&server).await;
    let sut = create_app(&server);

    // When
    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            None,
        ))
        .await
        .unwrap();

    // Then
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(www_authenticate(&response), "Bearer");
    jwks_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_期限切れトークンは401のinvalid_tokenを返す() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = sign(
        KID,
        &json!({
            "sub": "client",
            "iss": ISSUER,
            "exp": get_current_timestamp() - 3600,
            "scope": "user-schedule/schedule.read",
        }),
    );

    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        www_authenticate(&response),
        r#"Bearer error="invalid_token", error_description="Jwt expired", error_uri="https://tools.ietf.org/html/rfc6750#section-3.1""#
    );
}

#[tokio::test]
async fn test_issuerが異なるトークンは401を返す() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = sign(
        KID,
        &json!({
            "sub": "client",
            "iss": "https://another-issuer.example.com",
            "exp": get_current_timestamp() + 3600,
            "scope": "user-schedule/schedule.read",
        }),
    );

    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(www_authenticate(&response).starts_with(r#"Bearer error="invalid_token""#));
}

#[tokio::test]
async fn test_未知のkidは401を返す() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = sign(
        "unknown-key",
        &json!({
            "sub": "client",
            "iss": ISSUER,
            "exp": get_current_timestamp() + 3600,
            "scope": "user-schedule/schedule.read",
        }),
    );

    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(www_authenticate(&response).contains(r#"error_description="Unknown signing key""#));
}

#[tokio::test]
async fn test_healthはトークンなしで200を返す() {
    let server = MockServer::start_async().await;
    let sut = create_app(&server);

    let response = sut
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_未定義のメソッドもトークンなしなら401を返す() {
    let server = MockServer::start_async().await;
    let sut = create_app(&server);

    let response = sut
        .oneshot(request(Method::POST, "/user-schedule/schedule", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_scp配列のスコープで認可できる() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = sign(
        KID,
        &json!({
            "sub": "client",
            "iss": ISSUER,
            "exp": get_current_timestamp() + 3600,
            "scp": ["user-schedule/schedule.update"],
        }),
    );

    let response = sut
        .oneshot(request(Method::PUT, "/user-schedule/schedule/7", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "7 has been updated!");
}

#[tokio::test]
async fn test_user_nameがなければ400を返す() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("user-schedule/schedule.read");

    let response = sut
        .oneshot(request(Method::GET, "/user-schedule/schedule", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_nameが複数あればカンマで連結する() {
    let server = MockServer::start_async().await;
    mock_jwks(&server).await;
    let sut = create_app(&server);
    let token = token_with_scope("user-schedule/schedule.read");

    let response = sut
        .oneshot(request(
            Method::GET,
            "/user-schedule/schedule?userName=Alice&userName=Bob",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Alice,Bob is available!");
}
