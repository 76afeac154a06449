// ==========================================
// Slayer 任务追踪系统 - 怪物领域模型
// ==========================================
// 对齐: monsters / kills / locations / monster_locations 表
// ==========================================

use crate::domain::types::{remaining_kills, UNLIMITED_KILL_CAP};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Location - 地点
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub is_wilderness: bool,
}

impl Location {
    pub fn new(name: impl Into<String>, is_wilderness: bool) -> Self {
        Self {
            name: name.into(),
            is_wilderness,
        }
    }
}

// ==========================================
// Monster - 怪物
// ==========================================
// 红线: kill_count 只增不减,引擎只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: i64,
    pub name: String,
    pub kill_cap: i64,   // -1 表示无上限
    pub kill_count: i64, // 累计击杀数
    pub locations: Vec<Location>,
    pub added_at: Option<DateTime<Utc>>,
}

impl Monster {
    /// 剩余可击杀数 (-1 表示无上限,可能为负)
    pub fn remaining(&self) -> i64 {
        remaining_kills(self.kill_cap, self.kill_count)
    }

    pub fn is_unlimited(&self) -> bool {
        self.kill_cap == UNLIMITED_KILL_CAP
    }

    pub fn has_wilderness_location(&self) -> bool {
        self.locations.iter().any(|l| l.is_wilderness)
    }

    pub fn has_location_named(&self, name: &str) -> bool {
        self.locations.iter().any(|l| l.name == name)
    }
}

// ==========================================
// MonsterSummary - 怪物列表视图
// ==========================================
// 用途: 怪物管理列表(含所属任务)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterSummary {
    pub id: i64,
    pub name: String,
    pub kill_cap: i64,
    pub kill_count: i64,
    pub remaining: i64,
    pub tasks: Vec<TaskRef>,
    pub locations: Vec<Location>,
}

/// 任务引用 (id + 名称)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: i64,
    pub name: String,
}
