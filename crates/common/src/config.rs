//! # 環境変数ベースの設定読み込み
//!
//! 各サービスの `from_env()` が共通で使う読み込みヘルパーとエラー型。
//!
//! 環境変数の参照先を [`EnvReader::from_fn`] で差し替えられるため、
//! テストではプロセス環境変数を書き換えずに設定のパースを検証できる。

use std::{collections::HashMap, str::FromStr};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定（または空文字）
    #[error("{0} が設定されていません（.env を確認してください）")]
    Missing(String),

    /// 値の形式が不正
    #[error("{var} の値が不正です: {reason}")]
    Invalid { var: String, reason: String },
}

/// 環境変数の読み取り口
pub struct EnvReader<'a> {
    lookup: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> EnvReader<'a> {
    /// プロセスの環境変数を参照する
    pub fn from_process() -> Self {
        Self::from_fn(|key| std::env::var(key).ok())
    }

    /// 任意の関数を参照先にする
    pub fn from_fn(lookup: impl Fn(&str) -> Option<String> + 'a) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// `HashMap` を参照先にする（テスト用）
    pub fn from_map(map: &'a HashMap<&'a str, &'a str>) -> Self {
        Self::from_fn(move |key| map.get(key).map(|v| (*v).to_string()))
    }

    /// 値を取得する。空白のみの値は未設定として扱う。
    pub fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 必須の値を取得する
    pub fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// 値を取得し、未設定ならデフォルト値を返す
    pub fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// 必須の値を取得して `T` にパースする
    pub fn parse<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.required(key)?;
        raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var:    key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// カンマまたは空白区切りのリストを分解する
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_requiredは設定済みの値を返す() {
        let map = HashMap::from([("PORT", "8080")]);
        let env = EnvReader::from_map(&map);

        assert_eq!(env.required("PORT"), Ok("8080".to_string()));
    }

    #[test]
    fn test_requiredは未設定でmissingを返す() {
        let map = HashMap::new();
        let env = EnvReader::from_map(&map);

        assert_eq!(
            env.required("PORT"),
            Err(ConfigError::Missing("PORT".to_string()))
        );
    }

    #[test]
    fn test_空白のみの値は未設定として扱う() {
        let map = HashMap::from([("PORT", "   ")]);
        let env = EnvReader::from_map(&map);

        assert_eq!(env.optional("PORT"), None);
    }

    #[test]
    fn test_or_defaultは未設定でデフォルト値を返す() {
        let map = HashMap::new();
        let env = EnvReader::from_map(&map);

        assert_eq!(env.or_default("HOST", "0.0.0.0"), "0.0.0.0");
    }

    #[test]
    fn test_parseは不正な値でinvalidを返す() {
        let map = HashMap::from([("PORT", "not-a-port")]);
        let env = EnvReader::from_map(&map);

        let result = env.parse::<u16>("PORT");

        assert!(matches!(result, Err(ConfigError::Invalid { var, .. }) if var == "PORT"));
    }

    #[test]
    fn test_split_listはカンマと空白の両方で分割する() {
        assert_eq!(
            split_list("schedule.read, schedule.update  extra"),
            vec!["schedule.read", "schedule.update", "extra"]
        );
        assert!(split_list("").is_empty());
    }
}
