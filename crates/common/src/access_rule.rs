//! # アクセスルールチェーン
//!
//! HTTP メソッドとパスの組み合わせから、リクエストに要求するアクセス条件を解決する。
//!
//! ルールは登録順に評価され、最初にマッチしたものが採用される。
//! どのルールにもマッチしない場合は `any_request` に指定した条件になる。
//!
//! アクセス条件の型 `A` は各サービスが定義する（Basic 認証 / スコープ要求など）。
//! このモジュールは HTTP フレームワークに依存しない。
//!
//! ## 使用例
//!
//! ```
//! use http::Method;
//! use service_common::access_rule::AccessRules;
//!
//! #[derive(Debug, PartialEq)]
//! enum Access {
//!     PermitAll,
//!     Authenticated,
//! }
//!
//! let rules = AccessRules::new(Access::Authenticated).any_method("/articles/**", Access::PermitAll);
//!
//! assert_eq!(rules.resolve(&Method::POST, "/articles"), &Access::PermitAll);
//! assert_eq!(rules.resolve(&Method::GET, "/admin"), &Access::Authenticated);
//! ```

use http::Method;

/// パスパターン
///
/// - `/x/**`: `/x` 自身とその配下すべて
/// - それ以外: 完全一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(expected) => path == expected,
            Self::Prefix(prefix) => {
                // "/articles/**" は "/articlesX" にはマッチしない
                path.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            }
        }
    }
}

/// 1件のアクセスルール
#[derive(Debug, Clone)]
pub struct AccessRule<A> {
    /// `None` は全メソッド
    method:  Option<Method>,
    pattern: PathPattern,
    access:  A,
}

impl<A> AccessRule<A> {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

/// 順序付きアクセスルールの集合
#[derive(Debug, Clone)]
pub struct AccessRules<A> {
    rules:       Vec<AccessRule<A>>,
    any_request: A,
}

impl<A> AccessRules<A> {
    /// どのルールにもマッチしないリクエストに適用する条件を指定して作成する
    pub fn new(any_request: A) -> Self {
        Self {
            rules: Vec::new(),
            any_request,
        }
    }

    /// 特定メソッドのルールを追加する
    #[must_use]
    pub fn route(mut self, method: Method, pattern: &str, access: A) -> Self {
        self.rules.push(AccessRule {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            access,
        });
        self
    }

    /// 全メソッド共通のルールを追加する
    #[must_use]
    pub fn any_method(mut self, pattern: &str, access: A) -> Self {
        self.rules.push(AccessRule {
            method: None,
            pattern: PathPattern::parse(pattern),
            access,
        });
        self
    }

    /// リクエストに要求するアクセス条件を解決する
    pub fn resolve(&self, method: &Method, path: &str) -> &A {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map_or(&self.any_request, |rule| &rule.access)
    }
}
