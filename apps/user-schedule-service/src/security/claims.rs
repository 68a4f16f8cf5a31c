//! JWT クレーム
//!
//! スコープは `scope`（空白区切り文字列、RFC 8693）を優先し、
//! なければ `scp`（文字列または配列）から取り出す。

use serde::Deserialize;

/// 権限文字列のプレフィックス
pub const AUTHORITY_PREFIX: &str = "SCOPE_";

/// `scp` クレーム（IdP によって文字列または配列）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScopeClaim {
    Delimited(String),
    List(Vec<String>),
}

/// 検証済みアクセストークンのクレーム
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    pub sub:       Option<String>,
    pub iss:       String,
    pub exp:       u64,
    pub client_id: Option<String>,
    pub scope:     Option<String>,
    pub scp:       Option<ScopeClaim>,
}

impl Claims {
    /// トークンが持つスコープ
    pub fn scopes(&self) -> Vec<&str> {
        if let Some(scope) = &self.scope {
            return scope.split_whitespace().collect();
        }

        match &self.scp {
            Some(ScopeClaim::Delimited(scp)) => scp.split_whitespace().collect(),
            Some(ScopeClaim::List(scp)) => scp.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// スコープごとの権限（`SCOPE_<scope>`）
    pub fn authorities(&self) -> Vec<String> {
        self.scopes()
            .into_iter()
            .map(|scope| format!("{AUTHORITY_PREFIX}{scope}"))
            .collect()
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities().iter().any(|granted| granted == authority)
    }

    /// ログ用の主体（`sub`、なければ `client_id`）
    pub fn principal(&self) -> &str {
        self.sub
            .as_deref()
            .or(self.client_id.as_deref())
            .unwrap_or("-")
    }
}
