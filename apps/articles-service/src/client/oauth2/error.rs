//! OAuth2 クライアントのエラー型

use thiserror::Error;

/// アクセストークン取得エラー
#[derive(Debug, Clone, Error)]
pub enum OAuth2Error {
    /// トークンエンドポイントが RFC 6749 §5.2 形式のエラーを返した
    #[error("トークンエンドポイントがエラーを返しました: {error} ({})", .description.as_deref().unwrap_or("-"))]
    TokenEndpoint {
        error:       String,
        description: Option<String>,
    },

    /// エラーボディを解釈できない非 2xx レスポンス
    #[error("トークンエンドポイントが予期しないステータスを返しました {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 成功レスポンスの形式が不正
    #[error("トークンレスポンスが不正です: {0}")]
    InvalidResponse(String),

    /// Bearer 以外のトークン種別
    #[error("サポートしていないトークン種別です: {0}")]
    UnsupportedTokenType(String),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),
}

impl From<reqwest::Error> for OAuth2Error {
    fn from(err: reqwest::Error) -> Self {
        OAuth2Error::Network(err.to_string())
    }
}

/// Bearer トークン付きリクエストのエラー
#[derive(Debug, Error)]
pub enum AuthorizedRequestError {
    /// アクセストークンを取得できなかった
    #[error(transparent)]
    Token(#[from] OAuth2Error),

    /// リクエストの送信に失敗した
    #[error("リクエストの送信に失敗しました: {0}")]
    Transport(#[from] reqwest::Error),
}
