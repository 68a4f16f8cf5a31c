//! # User Schedule Service クライアント
//!
//! Articles Service から User Schedule Service への通信を担当する。
//! すべてのリクエストは [`AuthorizedClient`] を通して Bearer トークン付きで送信される。
//!
//! ## エンドポイント
//!
//! - `GET <get-schedule-url>?userName={name}` - ユーザーのスケジュールを取得
//! - `PUT <update-schedule-url>`（`{id}` を置換） - スケジュールを更新
//!
//! どちらもレスポンスボディはプレーンテキストで、そのまま呼び出し元に返す。

use async_trait::async_trait;
use thiserror::Error;

use super::oauth2::{AuthorizedClient, AuthorizedRequestError, OAuth2Error};

/// User Schedule Service クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum UserScheduleError {
    /// 非 2xx レスポンス
    #[error("User Schedule Service がステータス {status} を返しました: {body}")]
    Upstream { status: u16, body: String },

    /// アクセストークンを取得できなかった
    #[error("アクセストークンを取得できませんでした: {0}")]
    Token(#[from] OAuth2Error),

    /// 接続失敗・タイムアウト
    #[error("User Schedule Service に接続できません: {0}")]
    Unavailable(String),

    /// その他のネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),
}

impl From<reqwest::Error> for UserScheduleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            UserScheduleError::Unavailable(err.to_string())
        } else {
            UserScheduleError::Network(err.to_string())
        }
    }
}

impl From<AuthorizedRequestError> for UserScheduleError {
    fn from(err: AuthorizedRequestError) -> Self {
        match err {
            AuthorizedRequestError::Token(e) => e.into(),
            AuthorizedRequestError::Transport(e) => e.into(),
        }
    }
}

/// User Schedule Service クライアントトレイト
///
/// テスト時にはスタブに差し替えられる。
#[async_trait]
pub trait UserScheduleClient: Send + Sync {
    /// ユーザーのスケジュール（空き状況）を取得する
    ///
    /// # 引数
    ///
    /// - `user_name`: `userName` クエリパラメータとして送る
    async fn get_user_schedule(&self, user_name: &str) -> Result<String, UserScheduleError>;

    /// スケジュールを更新する
    ///
    /// # 引数
    ///
    /// - `schedule_id`: URL テンプレートの `{id}` に埋め込む
    async fn update_user_schedule(&self, schedule_id: &str) -> Result<String, UserScheduleError>;
}

/// User Schedule Service クライアント実装
#[derive(Clone)]
pub struct UserScheduleClientImpl {
    get_schedule_url:    String,
    update_schedule_url: String,
    client:              AuthorizedClient,
}

impl UserScheduleClientImpl {
    /// # 引数
    ///
    /// - `get_schedule_url`: 例 `http://localhost:8081/user-schedule/schedule`
    /// - `update_schedule_url`: 例 `http://localhost:8081/user-schedule/schedule/{id}`
    pub fn new(
        get_schedule_url: impl Into<String>,
        update_schedule_url: impl Into<String>,
        client: AuthorizedClient,
    ) -> Self {
        Self {
            get_schedule_url: get_schedule_url.into(),
            update_schedule_url: update_schedule_url.into(),
            client,
        }
    }

    fn update_url(&self, schedule_id: &str) -> String {
        self.update_schedule_url
            .replace("{id}", &urlencoding::encode(schedule_id))
    }
}

#[async_trait]
impl UserScheduleClient for UserScheduleClientImpl {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_user_schedule(&self, user_name: &str) -> Result<String, UserScheduleError> {
        let request = self
            .client
            .get(&self.get_schedule_url)
            .query(&[("userName", user_name)]);

        let response = self.client.send(request).await?;
        handle_response(response).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn update_user_schedule(&self, schedule_id: &str) -> Result<String, UserScheduleError> {
        let request = self.client.put(&self.update_url(schedule_id));

        let response = self.client.send(request).await?;
        handle_response(response).await
    }
}

/// レスポンスの共通ハンドリング
///
/// 2xx ならボディをテキストとして返し、それ以外は [`UserScheduleError::Upstream`] にする。
async fn handle_response(response: reqwest::Response) -> Result<String, UserScheduleError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.text().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UserScheduleError::Upstream {
        status: status.as_u16(),
        body,
    })
}
