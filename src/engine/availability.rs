// ==========================================
// Slayer 任务追踪系统 - 可完成性评估
// ==========================================
// 职责: 根据剩余击杀额度与地点限制,判定怪物能否完成任务
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::{AssignmentRule, LocationRestriction, Monster, SlayerMaster};
use serde::{Deserialize, Serialize};

// ==========================================
// MonsterAvailability - 单个怪物的可击杀判定
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterAvailability {
    pub id: i64,
    pub name: String,
    pub kill_cap: i64,
    pub kill_count: i64,
    pub remaining: i64,
    pub can_kill: bool,
    pub can_kill_by_count: bool,
    pub can_kill_by_location: bool,
}

// ==========================================
// AvailabilityEvaluator - 纯函数工具类
// ==========================================
pub struct AvailabilityEvaluator;

impl AvailabilityEvaluator {
    /// 按击杀额度判定
    ///
    /// # 规则
    /// - kill_cap == -1 → true
    /// - 否则 remaining >= 平均任务数量
    ///
    /// 剩余额度低于 *平均* 任务数量即视为无法稳定完成(不是最大值)
    pub fn can_kill_by_count(monster: &Monster, avg_task_size: f64) -> bool {
        monster.is_unlimited() || monster.remaining() as f64 >= avg_task_size
    }

    /// 按地点限制判定
    ///
    /// # 规则
    /// 1. 荒野限制 → 怪物至少有一个荒野地点
    /// 2. 地点型导师 + 指定地点 → 怪物有同名地点(精确匹配)
    /// 3. 其他(无限制,或非地点型导师的指定地点) → true
    pub fn can_kill_by_location(
        monster: &Monster,
        restriction: Option<&LocationRestriction>,
        master: &SlayerMaster,
    ) -> bool {
        match restriction {
            Some(LocationRestriction::Wilderness) => monster.has_wilderness_location(),
            Some(LocationRestriction::Named(name)) if master.is_location_based => {
                monster.has_location_named(name)
            }
            _ => true,
        }
    }

    /// 评估规则下所有怪物的可击杀状态
    pub fn evaluate(
        rule: &AssignmentRule,
        task_monsters: &[Monster],
        master: &SlayerMaster,
    ) -> Vec<MonsterAvailability> {
        let avg_task_size = rule.avg_task_size();
        let restriction = rule.location_restriction.as_ref();

        task_monsters
            .iter()
            .map(|monster| {
                let by_count = Self::can_kill_by_count(monster, avg_task_size);
                let by_location = Self::can_kill_by_location(monster, restriction, master);
                MonsterAvailability {
                    id: monster.id,
                    name: monster.name.clone(),
                    kill_cap: monster.kill_cap,
                    kill_count: monster.kill_count,
                    remaining: monster.remaining(),
                    can_kill: by_count && by_location,
                    can_kill_by_count: by_count,
                    can_kill_by_location: by_location,
                }
            })
            .collect()
    }

    /// 任务是否可完成: 至少一个怪物 can_kill
    ///
    /// 无关联怪物的任务永远不可完成
    pub fn task_can_do(monsters: &[MonsterAvailability]) -> bool {
        monsters.iter().any(|m| m.can_kill)
    }
}
