// ==========================================
// Slayer 任务追踪系统 - 准入判定
// ==========================================
// 职责: 判定分配规则当前能否派发给玩家
// 说明: 与击杀额度、屏蔽状态无关
// ==========================================

use crate::domain::{AssignmentRule, PlayerProfile, SlayerMaster};

pub struct EligibilityResolver;

impl EligibilityResolver {
    /// 规则是否可派发给玩家
    ///
    /// # 规则 (四项全部满足)
    /// 1. 战斗等级 >= 导师战斗要求
    /// 2. Slayer 等级 >= 任务 Slayer 要求
    /// 3. quest_unlocks ⊆ 已完成任务 (空集恒成立)
    /// 4. slayer_unlock 未设置,或已解锁
    pub fn is_assignable(
        rule: &AssignmentRule,
        master: &SlayerMaster,
        player: &PlayerProfile,
    ) -> bool {
        Self::unmet_requirements(rule, master, player).is_empty()
    }

    /// 列出未满足的条件,用于日志与界面提示
    pub fn unmet_requirements(
        rule: &AssignmentRule,
        master: &SlayerMaster,
        player: &PlayerProfile,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        if player.combat_level < master.combat_requirement {
            reasons.push(format!(
                "COMBAT: {} < {}",
                player.combat_level, master.combat_requirement
            ));
        }

        if player.slayer_level < rule.task.slayer_requirement {
            reasons.push(format!(
                "SLAYER: {} < {}",
                player.slayer_level, rule.task.slayer_requirement
            ));
        }

        for quest in rule.quest_unlocks.iter().filter(|q| !player.has_completed(q)) {
            reasons.push(format!("QUEST: {}", quest));
        }

        if let Some(unlock) = rule.slayer_unlock.as_deref() {
            if !player.has_unlock(unlock) {
                reasons.push(format!("UNLOCK: {}", unlock));
            }
        }

        reasons
    }
}
