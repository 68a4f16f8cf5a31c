//! # アクセス制御ミドルウェア
//!
//! リクエストのメソッドとパスからアクセス条件を解決し、必要に応じて
//! HTTP Basic 認証を要求する。
//!
//! | ルール | 条件 |
//! |--------|------|
//! | `/health/**` | 認証不要 |
//! | `/articles/**` | 認証不要 |
//! | それ以外 | Basic 認証 |
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let security_state = SecurityState::new(BasicCredentials::new("user", "password"));
//!
//! Router::new()
//!     .route("/articles", post(post_article))
//!     .layer(from_fn_with_state(security_state, authorize))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Basic};
use service_common::access_rule::AccessRules;
use subtle::ConstantTimeEq;

use crate::error::basic_unauthorized_response;

/// 生成パスワードの長さ
const GENERATED_PASSWORD_LEN: usize = 32;

/// Articles Service のアクセス条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticlesAccess {
    /// 認証不要
    PermitAll,
    /// Basic 認証が必要
    Authenticated,
}

/// Articles Service のアクセスルール
pub fn access_rules() -> AccessRules<ArticlesAccess> {
    AccessRules::new(ArticlesAccess::Authenticated)
        .any_method("/health/**", ArticlesAccess::PermitAll)
        .any_method("/articles/**", ArticlesAccess::PermitAll)
}

/// Basic 認証の資格情報
#[derive(Clone)]
pub struct BasicCredentials {
    user:     String,
    password: String,
}

impl BasicCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user:     user.into(),
            password: password.into(),
        }
    }

    /// パスワードが未設定なら生成する
    ///
    /// 生成した場合は起動ログに一度だけ出力する。
    pub fn from_config(user: &str, password: Option<&str>) -> Self {
        match password {
            Some(password) => Self::new(user, password),
            None => {
                let password = generate_password();
                tracing::warn!(
                    user = %user,
                    "Basic 認証のパスワードが未設定のため生成しました: {}",
                    password
                );
                Self::new(user, password)
            }
        }
    }

    /// 定数時間で資格情報を照合する
    fn verify(&self, user: &str, password: &str) -> bool {
        let user_ok = self.user.as_bytes().ct_eq(user.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & password_ok).into()
    }
}

/// ランダムなパスワードを生成する（英数字）
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// アクセス制御ミドルウェアの状態
#[derive(Clone)]
pub struct SecurityState {
    pub rules:       Arc<AccessRules<ArticlesAccess>>,
    pub credentials: BasicCredentials,
}

impl SecurityState {
    pub fn new(credentials: BasicCredentials) -> Self {
        Self {
            rules: Arc::new(access_rules()),
            credentials,
        }
    }
}

/// アクセス制御ミドルウェア
///
/// 認証が必要なパスで資格情報がない、または一致しない場合は
/// `WWW-Authenticate: Basic realm="Realm"` 付きの 401 を返す。
pub async fn authorize(
    State(state): State<SecurityState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method: &Method = request.method();
    let access = *state.rules.resolve(method, request.uri().path());

    if access == ArticlesAccess::PermitAll {
        return next.run(request).await;
    }

    let authenticated = request
        .headers()
        .typed_get::<Authorization<Basic>>()
        .is_some_and(|Authorization(basic)| {
            state.credentials.verify(basic.username(), basic.password())
        });

    if !authenticated {
        tracing::debug!(path = %request.uri().path(), "Basic 認証に失敗しました");
        return basic_unauthorized_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{StatusCode, header},
        middleware::from_fn_with_state,
        routing::{get, post},
    };
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    async fn dummy_handler() -> StatusCode {
        StatusCode::OK
    }

    fn create_test_app() -> Router {
        let state = SecurityState::new(BasicCredentials::new("user", "pa55word"));

        Router::new()
            .route("/articles", post(dummy_handler))
            .route("/articles/user-availability/{name}", get(dummy_handler))
            .route("/health", get(dummy_handler))
            .route("/admin", get(dummy_handler))
            .layer(from_fn_with_state(state, authorize))
    }

    fn basic(user: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
    }

    #[rstest]
    #[case(Method::POST, "/articles")]
    #[case(Method::GET, "/articles/user-availability/alice")]
    #[case(Method::GET, "/health")]
    #[tokio::test]
    async fn test_認証不要パスは資格情報なしで通過する(
        #[case] method: Method,
        #[case] path: &str,
    ) {
        let sut = create_test_app();

        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_資格情報なしは401とbasicチャレンジを返す() {
        // Given
        let sut = create_test_app();

        let request = Request::builder()
            .uri("/admin")
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            r#"Basic realm="Realm""#
        );
    }

    #[tokio::test]
    async fn test_正しい資格情報なら通過する() {
        let sut = create_test_app();

        let request = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, basic("user", "pa55word"))
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("user", "wrong")]
    #[case("admin", "pa55word")]
    #[case("", "")]
    #[tokio::test]
    async fn test_誤った資格情報は401を返す(#[case] user: &str, #[case] password: &str) {
        let sut = create_test_app();

        let request = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, basic(user, password))
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearerトークンはbasic認証として扱わない() {
        let sut = create_test_app();

        let request = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_パスワード未設定なら英数字のパスワードを生成する() {
        let credentials = BasicCredentials::from_config("user", None);

        assert_eq!(credentials.password.len(), GENERATED_PASSWORD_LEN);
        assert!(credentials.password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_パスワード設定済みならその値を使う() {
        let credentials = BasicCredentials::from_config("user", Some("configured"));

        assert!(credentials.verify("user", "configured"));
    }
}
