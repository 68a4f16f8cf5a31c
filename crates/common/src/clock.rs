//! # Clock（時刻プロバイダ）
//!
//! `Utc::now()` の直接呼び出しを置き換え、
//! トークン有効期限の判定などで固定時刻を注入可能にするための抽象化。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返すテスト用実装
///
/// [`advance`](FixedClock::advance) で時刻を進められるため、
/// 有効期限切れのシナリオを再現できる。
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 時刻を指定した分だけ進める
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
