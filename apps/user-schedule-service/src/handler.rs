//! # HTTP ハンドラ
//!
//! - `schedule`: スケジュールの取得・更新
//! - `health`: Liveness Check

pub mod health;
pub mod schedule;

pub use health::health_check;
pub use schedule::{ScheduleQuery, get_user_schedule, update_schedule};
