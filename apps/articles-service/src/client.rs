//! # 外部サービスクライアント
//!
//! OAuth2 トークンエンドポイント、User Schedule Service との通信を担当する。

use std::time::Duration;

pub mod oauth2;
pub mod user_schedule;

pub use oauth2::{
    AccessToken,
    AccessTokenProvider,
    AuthorizedClient,
    AuthorizedRequestError,
    ClientCredentialsTokenProvider,
    ClientRegistration,
    OAuth2Error,
};
pub use user_schedule::{UserScheduleClient, UserScheduleClientImpl, UserScheduleError};

/// 接続タイムアウト
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// トークンエンドポイント・User Schedule Service の応答タイムアウト
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// トークン取得と下流呼び出しで共有する HTTP クライアントを作る
///
/// 応答タイムアウトはトークン取得中のキャッシュロック保持時間の上限にもなる。
pub fn build_http_client(request_timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .build()
}
