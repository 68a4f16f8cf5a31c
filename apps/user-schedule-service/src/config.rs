//! # User Schedule Service 設定
//!
//! 環境変数から User Schedule Service の設定を読み込む。

use service_common::{ConfigError, config::EnvReader};

/// JWK Set のディスカバリパス（`JWT_JWK_SET_URI` 未設定時）
const JWKS_WELL_KNOWN_PATH: &str = "/.well-known/jwks.json";

/// User Schedule Service の設定
#[derive(Debug, Clone)]
pub struct UserScheduleConfig {
    /// バインドアドレス
    pub host:               String,
    /// ポート番号
    pub port:               u16,
    /// リソースサーバー ID（スコープのプレフィックス）
    pub resource_server_id: String,
    /// 期待する `iss` クレーム
    pub issuer_uri:         String,
    /// 署名鍵を取得する JWK Set の URL
    pub jwk_set_uri:        String,
}

impl UserScheduleConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(&EnvReader::from_process())
    }

    /// 任意の参照先から設定を読み込む
    pub fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let issuer_uri = env.required("JWT_ISSUER_URI")?;
        let jwk_set_uri = env.optional("JWT_JWK_SET_URI").unwrap_or_else(|| {
            format!(
                "{}{JWKS_WELL_KNOWN_PATH}",
                issuer_uri.trim_end_matches('/')
            )
        });

        Ok(Self {
            host: env.or_default("USER_SCHEDULE_HOST", "0.0.0.0"),
            port: env.parse("USER_SCHEDULE_PORT")?,
            resource_server_id: env.required("RESOURCE_SERVER_ID")?,
            issuer_uri,
            jwk_set_uri,
        })
    }
}
