// ==========================================
// Slayer 任务追踪系统 - 领域类型定义
// ==========================================
// 职责: 击杀上限哨兵值、地点限制等基础类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 击杀上限哨兵值
// ==========================================
// 红线: "无上限" 始终用 -1 表示,绝不能用 0
pub const UNLIMITED_KILL_CAP: i64 = -1;

/// 数据库中表示荒野限制的字面量
pub const WILDERNESS_MARKER: &str = "Wilderness";

/// 计算剩余可击杀数
///
/// # 规则
/// - kill_cap == -1 → -1 (无上限)
/// - 否则 → kill_cap - kill_count (允许为负)
pub fn remaining_kills(kill_cap: i64, kill_count: i64) -> i64 {
    if kill_cap == UNLIMITED_KILL_CAP {
        UNLIMITED_KILL_CAP
    } else {
        kill_cap - kill_count
    }
}

// ==========================================
// 地点限制 (Location Restriction)
// ==========================================
// 用 Option<LocationRestriction> 表示 "有/无限制",
// 不使用魔法字符串 "None"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationRestriction {
    Wilderness,     // 任意荒野地点
    Named(String),  // 指定地点(仅地点型导师生效)
}

impl LocationRestriction {
    /// 从数据库字符串解析
    pub fn from_db_str(s: &str) -> Self {
        if s == WILDERNESS_MARKER {
            LocationRestriction::Wilderness
        } else {
            LocationRestriction::Named(s.to_string())
        }
    }

    /// 转换为数据库字符串
    pub fn to_db_str(&self) -> &str {
        match self {
            LocationRestriction::Wilderness => WILDERNESS_MARKER,
            LocationRestriction::Named(name) => name.as_str(),
        }
    }

    /// 空白字符串视为无限制
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::from_db_str)
    }
}

impl fmt::Display for LocationRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_kills_unlimited_ignores_count() {
        assert_eq!(remaining_kills(UNLIMITED_KILL_CAP, 0), -1);
        assert_eq!(remaining_kills(UNLIMITED_KILL_CAP, 99_999), -1);
    }

    #[test]
    fn test_remaining_kills_can_go_negative() {
        assert_eq!(remaining_kills(100, 95), 5);
        assert_eq!(remaining_kills(100, 130), -30);
    }

    #[test]
    fn test_location_restriction_parsing() {
        assert_eq!(
            LocationRestriction::from_db_str("Wilderness"),
            LocationRestriction::Wilderness
        );
        assert_eq!(
            LocationRestriction::from_db_str("Karuulm Slayer Dungeon"),
            LocationRestriction::Named("Karuulm Slayer Dungeon".to_string())
        );
        assert_eq!(LocationRestriction::parse_optional(None), None);
        assert_eq!(LocationRestriction::parse_optional(Some("  ")), None);
        // 名为 "None" 的真实地点不会被当作无限制
        assert_eq!(
            LocationRestriction::parse_optional(Some("None")),
            Some(LocationRestriction::Named("None".to_string()))
        );
    }
}
