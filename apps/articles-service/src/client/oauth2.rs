//! # OAuth2 クライアント（client credentials グラント）
//!
//! トークンエンドポイントからアクセストークンを取得してキャッシュし、
//! 外部サービスへのリクエストに `Authorization: Bearer` として付与する。
//!
//! ## 構成
//!
//! ```text
//! UserScheduleClientImpl
//!        │ send()
//!        ▼
//! AuthorizedClient ──── access_token() / invalidate() ───▶ AccessTokenProvider
//!        │                                                       │
//!        ▼                                                       ▼
//! User Schedule Service                        トークンエンドポイント（Cognito 等）
//! ```
//!
//! - `registration`: クライアント登録情報
//! - `token`: アクセストークンとトークンエンドポイントのレスポンス型
//! - `provider`: トークンの取得とキャッシュ
//! - `authorized_client`: Bearer トークン付きで送信する HTTP クライアント
//! - `error`: エラー型

pub mod authorized_client;
pub mod error;
pub mod provider;
pub mod registration;
pub mod token;

pub use authorized_client::AuthorizedClient;
pub use error::{AuthorizedRequestError, OAuth2Error};
pub use provider::{AccessTokenProvider, ClientCredentialsTokenProvider};
pub use registration::ClientRegistration;
pub use token::{AccessToken, TokenErrorResponse, TokenResponse};
