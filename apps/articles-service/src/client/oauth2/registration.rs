//! OAuth2 クライアント登録

use std::fmt;

/// client credentials グラントのクライアント登録
///
/// クライアント認証は `client_secret_basic`（HTTP Basic）で行う。
#[derive(Clone)]
pub struct ClientRegistration {
    /// 登録の識別子（ログ出力用）
    pub registration_id: String,
    /// トークンエンドポイント URL
    pub token_uri:       String,
    pub client_id:       String,
    pub client_secret:   String,
    /// 要求するスコープ。空の場合は `scope` パラメータを送らない。
    pub scopes:          Vec<String>,
}

// client_secret をログに出さない
impl fmt::Debug for ClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistration")
            .field("registration_id", &self.registration_id)
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}
