//! # User Schedule Service ライブラリ
//!
//! ユーザーのスケジュール取得・更新 API を提供する OAuth2 リソースサーバー。
//! JWT のスコープでメソッドごとにアクセスを制御する。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: HTTP エラーレスポンスへの変換（RFC 6750 / RFC 9457）
//! - `handler`: HTTP ハンドラ
//! - `middleware`: Bearer トークン認可ミドルウェア
//! - `security`: スコープ、クレーム、JWT 検証、アクセスルール

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod security;
