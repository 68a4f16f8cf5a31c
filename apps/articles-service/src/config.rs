//! # Articles Service 設定
//!
//! 環境変数から Articles Service の設定を読み込む。

use service_common::{
    ConfigError,
    config::{EnvReader, split_list},
};

use crate::client::oauth2::ClientRegistration;

/// Cognito 登録の識別子
pub const COGNITO_REGISTRATION_ID: &str = "cognito";

/// Basic 認証ユーザー名のデフォルト値
pub const DEFAULT_BASIC_AUTH_USER: &str = "user";

/// Articles Service の設定
#[derive(Debug, Clone)]
pub struct ArticlesConfig {
    /// バインドアドレス
    pub host:                String,
    /// ポート番号
    pub port:                u16,
    /// OAuth2 クライアント登録（client credentials）
    pub registration:        ClientRegistration,
    /// User Schedule Service のスケジュール取得 URL
    pub get_schedule_url:    String,
    /// User Schedule Service のスケジュール更新 URL（`{id}` を含むテンプレート）
    pub update_schedule_url: String,
    /// Basic 認証のユーザー名
    pub basic_auth_user:     String,
    /// Basic 認証のパスワード。未設定の場合は起動時に生成する。
    pub basic_auth_password: Option<String>,
}

impl ArticlesConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(&EnvReader::from_process())
    }

    /// 任意の参照先から設定を読み込む
    pub fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let update_schedule_url = env.required("USER_SCHEDULE_UPDATE_SCHEDULE_URL")?;
        if !update_schedule_url.contains("{id}") {
            return Err(ConfigError::Invalid {
                var:    "USER_SCHEDULE_UPDATE_SCHEDULE_URL".to_string(),
                reason: "`{id}` プレースホルダが含まれていません".to_string(),
            });
        }

        let registration = ClientRegistration {
            registration_id: COGNITO_REGISTRATION_ID.to_string(),
            token_uri:       env.required("COGNITO_TOKEN_URI")?,
            client_id:       env.required("COGNITO_CLIENT_ID")?,
            client_secret:   env.required("COGNITO_CLIENT_SECRET")?,
            scopes:          env
                .optional("COGNITO_SCOPES")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        };

        Ok(Self {
            host: env.or_default("ARTICLES_HOST", "0.0.0.0"),
            port: env.parse("ARTICLES_PORT")?,
            registration,
            get_schedule_url: env.required("USER_SCHEDULE_GET_SCHEDULE_URL")?,
            update_schedule_url,
            basic_auth_user: env.or_default("ARTICLES_BASIC_AUTH_USER", DEFAULT_BASIC_AUTH_USER),
            basic_auth_password: env.optional("ARTICLES_BASIC_AUTH_PASSWORD"),
        })
    }
}
