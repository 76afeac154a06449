// ==========================================
// Slayer 任务追踪系统 - 任务与分配规则
// ==========================================
// 对齐: tasks / master_tasks 表
// ==========================================

use crate::domain::types::LocationRestriction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Task - 全局任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub slayer_requirement: i32, // 最低 Slayer 等级
}

// ==========================================
// AssignmentRule - 导师任务分配规则
// ==========================================
// 同一 (导师, 任务) 可有多条规则,仅 location_restriction 不同,
// 这些规则构成一个 "变体组"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub id: i64,
    pub master_id: i64,
    pub task: Task,

    // ===== 抽取参数 =====
    pub weight: f64,     // 名义权重 (>= 0)
    pub min_amount: i32, // 任务数量下限
    pub max_amount: i32, // 任务数量上限

    // ===== 准入门槛 =====
    pub quest_unlocks: Vec<String>,     // 需全部完成的任务(顺序无关)
    pub slayer_unlock: Option<String>,  // 需要的 Slayer 解锁
    pub location_restriction: Option<LocationRestriction>,
}

impl AssignmentRule {
    /// 平均任务数量 (实数,不取整)
    pub fn avg_task_size(&self) -> f64 {
        (self.min_amount as f64 + self.max_amount as f64) / 2.0
    }
}

/// 新建分配规则的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignmentRule {
    pub master_id: i64,
    pub task_id: i64,
    pub weight: f64,
    pub min_amount: i32,
    pub max_amount: i32,
    #[serde(default)]
    pub quest_unlocks: Vec<String>,
    #[serde(default)]
    pub slayer_unlock: Option<String>,
    #[serde(default)]
    pub location_restriction: Option<LocationRestriction>,
}

// ==========================================
// BlockedTask - 玩家屏蔽的任务
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedTask {
    pub master_id: i64,
    pub task_id: i64,
    pub blocked_at: Option<DateTime<Utc>>,
}

// ==========================================
// UnlockCatalog - 解锁项目录
// ==========================================
// 用途: 前端勾选已完成任务/已购解锁
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockCatalog {
    pub quests: Vec<String>,
    pub slayer_unlocks: Vec<String>,
}
