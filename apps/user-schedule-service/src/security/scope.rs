//! スコープ

use std::fmt;

/// User Schedule Service が定義するスコープ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityScope {
    ScheduleRead,
    ScheduleUpdate,
}

impl SecurityScope {
    /// スコープ ID
    pub const fn id(self) -> &'static str {
        match self {
            Self::ScheduleRead => "schedule.read",
            Self::ScheduleUpdate => "schedule.update",
        }
    }

    /// トークンに要求する権限文字列（`SCOPE_<resourceServerId>/<scope>`）
    pub fn authority(self, resource_server_id: &str) -> String {
        format!("SCOPE_{resource_server_id}/{}", self.id())
    }
}

impl fmt::Display for SecurityScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
