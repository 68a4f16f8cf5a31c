//! アクセストークンとトークンエンドポイントのレスポンス型

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::error::OAuth2Error;

/// `expires_in` が省略された場合の有効期間（秒）
const DEFAULT_EXPIRES_IN_SECS: i64 = 1;

/// キャッシュされるアクセストークン
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value:      String,
    pub token_type: String,
    pub issued_at:  DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// 付与されたスコープ
    pub scopes:     Vec<String>,
}

impl AccessToken {
    /// `now` 時点で期限切れとみなすか
    ///
    /// 有効期限の `clock_skew` 前から期限切れとして扱う。
    pub fn is_expired_at(&self, now: DateTime<Utc>, clock_skew: Duration) -> bool {
        now + clock_skew >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// トークンエンドポイントの成功レスポンス（RFC 6749 §5.1）
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type:   String,
    #[serde(default)]
    pub expires_in:   Option<i64>,
    /// スペース区切り。省略時は要求したスコープが付与されたとみなす。
    #[serde(default)]
    pub scope:        Option<String>,
}

impl TokenResponse {
    /// `issued_at` を発行時刻として [`AccessToken`] に変換する
    pub fn into_access_token(
        self,
        issued_at: DateTime<Utc>,
        requested_scopes: &[String],
    ) -> Result<AccessToken, OAuth2Error> {
        if !self.token_type.eq_ignore_ascii_case("bearer") {
            return Err(OAuth2Error::UnsupportedTokenType(self.token_type));
        }

        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = (expires_in >= 0)
            .then(|| Duration::try_seconds(expires_in))
            .flatten()
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                OAuth2Error::InvalidResponse(format!("expires_in が範囲外です: {expires_in}"))
            })?;
        let scopes = match self.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => requested_scopes.to_vec(),
        };

        Ok(AccessToken {
            value: self.access_token,
            token_type: "Bearer".to_string(),
            issued_at,
            expires_at,
            scopes,
        })
    }
}

/// トークンエンドポイントのエラーレスポンス（RFC 6749 §5.2）
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error:             String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl From<TokenErrorResponse> for OAuth2Error {
    fn from(body: TokenErrorResponse) -> Self {
        OAuth2Error::TokenEndpoint {
            error:       body.error,
            description: body.error_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn parse(json: &str) -> TokenResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_expires_inから有効期限を計算する() {
        let response = parse(r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#);

        let token = response.into_access_token(issued_at(), &[]).unwrap();

        assert_eq!(token.expires_at, issued_at() + Duration::seconds(3600));
        assert_eq!(token.value, "abc");
    }

    #[test]
    fn test_expires_inが省略されると1秒後に失効する() {
        let response = parse(r#"{"access_token":"abc","token_type":"bearer"}"#);

        let token = response.into_access_token(issued_at(), &[]).unwrap();

        assert_eq!(token.expires_at, issued_at() + Duration::seconds(1));
        assert_eq!(token.token_type, "Bearer");
    }

    #[test]
    fn test_scope省略時は要求スコープを引き継ぐ() {
        let response = parse(r#"{"access_token":"abc","token_type":"Bearer","expires_in":60}"#);
        let requested = vec!["user-schedule/schedule.read".to_string()];

        let token = response.into_access_token(issued_at(), &requested).unwrap();

        assert_eq!(token.scopes, requested);
    }

    #[test]
    fn test_scopeはスペース区切りで分解される() {
        let response = parse(
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":60,"scope":"a/read a/update"}"#,
        );

        let token = response.into_access_token(issued_at(), &[]).unwrap();

        assert_eq!(token.scopes, vec!["a/read".to_string(), "a/update".to_string()]);
    }

    #[test]
    fn test_bearer以外のtoken_typeは拒否する() {
        let response = parse(r#"{"access_token":"abc","token_type":"mac","expires_in":60}"#);

        let result = response.into_access_token(issued_at(), &[]);

        assert!(matches!(result, Err(OAuth2Error::UnsupportedTokenType(t)) if t == "mac"));
    }

    #[rstest]
    #[case(i64::MAX)]
    #[case(i64::MIN)]
    #[case(-1)]
    #[case(9_000_000_000_000)]
    fn test_範囲外のexpires_inはinvalid_responseを返す(#[case] expires_in: i64) {
        let response = parse(&format!(
            r#"{{"access_token":"abc","token_type":"Bearer","expires_in":{expires_in}}}"#
        ));

        let result = response.into_access_token(issued_at(), &[]);

        assert!(matches!(result, Err(OAuth2Error::InvalidResponse(_))));
    }

    #[test]
    fn test_expires_inが0なら発行時刻に失効する() {
        let response = parse(r#"{"access_token":"abc","token_type":"Bearer","expires_in":0}"#);

        let token = response.into_access_token(issued_at(), &[]).unwrap();

        assert_eq!(token.expires_at, issued_at());
    }

    #[rstest]
    #[case(0, false)]
    #[case(3539, false)]
    #[case(3540, true)]
    #[case(3600, true)]
    fn test_clock_skewを考慮して期限切れを判定する(
        #[case] elapsed_secs: i64,
        #[case] expected: bool,
    ) {
        let token = parse(r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#)
            .into_access_token(issued_at(), &[])
            .unwrap();
        let now = issued_at() + Duration::seconds(elapsed_secs);

        assert_eq!(token.is_expired_at(now, Duration::seconds(60)), expected);
    }

    #[test]
    fn test_debug出力にトークン値が含まれない() {
        let token = parse(r#"{"access_token":"very-secret","token_type":"Bearer"}"#)
            .into_access_token(issued_at(), &[])
            .unwrap();

        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
