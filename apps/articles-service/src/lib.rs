//! # Articles Service ライブラリ
//!
//! 記事の投稿とユーザーの空き状況確認を受け付けるサービスのコアモジュール。
//! 実際のスケジュール操作は User Schedule Service に委譲する。
//!
//! ## モジュール構成
//!
//! - `app_builder`: State の組み立てとルーター構築
//! - `client`: 外部サービスクライアント（OAuth2 トークン取得、User Schedule Service）
//! - `config`: 環境変数からの設定読み込み
//! - `error`: HTTP エラーレスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（アクセス制御、Request ID 伝播）

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
