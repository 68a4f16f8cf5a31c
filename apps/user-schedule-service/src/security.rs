//! # セキュリティ
//!
//! - `scope`: スコープの列挙と権限文字列の組み立て
//! - `claims`: JWT クレームとスコープの抽出
//! - `jwks`: JWK Set による JWT 検証
//! - `rules`: メソッド + パスごとのアクセスルール

pub mod claims;
pub mod jwks;
pub mod rules;
pub mod scope;

pub use claims::{Claims, ScopeClaim};
pub use jwks::{JwksTokenVerifier, JwtError, TokenVerifier};
pub use rules::{ScheduleAccess, access_rules};
pub use scope::SecurityScope;
