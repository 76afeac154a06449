// ==========================================
// Slayer 任务追踪系统 - Slayer 导师
// ==========================================
// 对齐: slayer_masters 表
// ==========================================

use serde::{Deserialize, Serialize};

/// Slayer 导师 (任务派发者)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlayerMaster {
    pub id: i64,
    pub name: String,

    // ===== 领取门槛 =====
    pub combat_requirement: i32,
    pub slayer_requirement: i32,

    // ===== 奖励 =====
    pub points_per_task: i32,
    pub points_per_tenth_task: i32, // 每第 10 个任务的奖励

    /// 地点型导师: 按地点拆分规则,启用权重再分配
    pub is_location_based: bool,
}
