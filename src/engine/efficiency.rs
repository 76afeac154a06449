// ==========================================
// Slayer 任务追踪系统 - 导师效率评分
// ==========================================
// 职责: 汇总规则评估结果,计算 "每次使用导师的净点数"
// 红线: 退化情况 (total_weight == 0) 走显式分支,永不除零
// ==========================================

use crate::domain::SlayerMaster;
use crate::engine::evaluator::RuleEvaluation;
use serde::{Deserialize, Serialize};

/// 跳过一个无法完成的任务的固定点数成本
pub const DEFAULT_SKIP_COST_POINTS: f64 = 30.0;

/// 奖励周期: 每 10 个任务发一次额外奖励
const BONUS_CYCLE: f64 = 10.0;

// ==========================================
// EfficiencyPolicy - 评分策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPolicy {
    pub skip_cost_points: f64,
}

impl Default for EfficiencyPolicy {
    fn default() -> Self {
        Self {
            skip_cost_points: DEFAULT_SKIP_COST_POINTS,
        }
    }
}

// ==========================================
// EfficiencySummary - 导师效率汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySummary {
    pub total_tasks: usize,
    pub doable_tasks: usize,
    pub blocked_tasks: usize,
    pub skip_rate: f64, // 百分比 0-100
    pub avg_points: f64,
    pub skip_cost: f64,
    pub net_points: f64,
}

impl EfficiencySummary {
    /// 导师不存在时返回的全零汇总
    pub fn zeroed() -> Self {
        Self::default()
    }
}

pub struct EfficiencyCalculator {
    policy: EfficiencyPolicy,
}

impl EfficiencyCalculator {
    pub fn new(policy: EfficiencyPolicy) -> Self {
        Self { policy }
    }

    /// 平均每任务点数: (9 * 普通 + 第十个奖励) / 10
    pub fn average_points(master: &SlayerMaster) -> f64 {
        ((BONUS_CYCLE - 1.0) * master.points_per_task as f64
            + master.points_per_tenth_task as f64)
            / BONUS_CYCLE
    }

    /// 计算导师效率
    ///
    /// # 规则
    /// - 只统计 is_assignable 的规则 (每个地点变体单独计数)
    /// - 权重使用 effective_weight
    /// - total_weight == 0:
    ///   - skip_rate = 有未屏蔽的可派发规则 ? 100 : 0
    ///   - skip_cost = 有未屏蔽的可派发规则且无可完成任务 ? 成本 : 0
    /// - 否则:
    ///   - skip_rate = (1 - doable_weight / total_weight) * 100
    ///   - skip_cost = skip_rate / 100 * 成本
    pub fn score(&self, master: &SlayerMaster, evaluations: &[RuleEvaluation]) -> EfficiencySummary {
        let assignable: Vec<&RuleEvaluation> =
            evaluations.iter().filter(|e| e.is_assignable).collect();

        let doable_tasks = assignable
            .iter()
            .filter(|e| e.can_do && !e.is_blocked)
            .count();
        let blocked_tasks = assignable.iter().filter(|e| e.is_blocked).count();
        let avg_points = Self::average_points(master);

        let total_weight: f64 = assignable
            .iter()
            .filter(|e| !e.is_blocked)
            .map(|e| e.effective_weight)
            .sum();

        let skip_cost_points = self.policy.skip_cost_points;

        let (skip_rate, skip_cost) = if total_weight <= 0.0 {
            let has_unblocked_assignable = assignable.len() > blocked_tasks;
            let skip_rate = if has_unblocked_assignable { 100.0 } else { 0.0 };
            let skip_cost = if has_unblocked_assignable && doable_tasks == 0 {
                skip_cost_points
            } else {
                0.0
            };
            (skip_rate, skip_cost)
        } else {
            let doable_weight: f64 = assignable
                .iter()
                .filter(|e| !e.is_blocked && e.can_do)
                .map(|e| e.effective_weight)
                .sum();
            let skip_fraction = 1.0 - doable_weight / total_weight;
            (skip_fraction * 100.0, skip_fraction * skip_cost_points)
        };

        EfficiencySummary {
            total_tasks: assignable.len(),
            doable_tasks,
            blocked_tasks,
            skip_rate,
            avg_points,
            skip_cost,
            net_points: avg_points - skip_cost,
        }
    }
}

impl Default for EfficiencyCalculator {
    fn default() -> Self {
        Self::new(EfficiencyPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignmentRule, Task};

    const TOLERANCE: f64 = 1e-9;

    fn duradel() -> SlayerMaster {
        SlayerMaster {
            id: 6,
            name: "Duradel".to_string(),
            combat_requirement: 100,
            slayer_requirement: 50,
            points_per_task: 15,
            points_per_tenth_task: 75,
            is_location_based: false,
        }
    }

    fn evaluation(task_id: i64, weight: f64, can_do: bool, is_blocked: bool, is_assignable: bool) -> RuleEvaluation {
        RuleEvaluation {
            rule: AssignmentRule {
                id: task_id,
                master_id: 6,
                task: Task {
                    id: task_id,
                    name: format!("task-{}", task_id),
                    slayer_requirement: 1,
                },
                weight,
                min_amount: 130,
                max_amount: 200,
                quest_unlocks: vec![],
                slayer_unlock: None,
                location_restriction: None,
            },
            monsters: vec![],
            can_do,
            is_blocked,
            is_assignable,
            effective_weight: weight,
        }
    }

    #[test]
    fn test_average_points_blends_tenth_task_bonus() {
        assert!((EfficiencyCalculator::average_points(&duradel()) - 21.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_single_undoable_task_costs_full_skip() {
        let calc = EfficiencyCalculator::default();
        let summary = calc.score(&duradel(), &[evaluation(1, 10.0, false, false, true)]);

        assert_eq!(summary.total_tasks, 1);
        assert_eq!(summary.doable_tasks, 0);
        assert!((summary.skip_rate - 100.0).abs() < TOLERANCE);
        assert!((summary.skip_cost - 30.0).abs() < TOLERANCE);
        assert!((summary.net_points - (21.0 - 30.0)).abs() < TOLERANCE);
    }

    #[test]
    fn test_weighted_skip_rate() {
        let calc = EfficiencyCalculator::default();
        let summary = calc.score(
            &duradel(),
            &[
                evaluation(1, 6.0, true, false, true),
                evaluation(2, 2.0, false, false, true),
                // 不可派发规则不参与统计
                evaluation(3, 100.0, false, false, false),
            ],
        );

        assert_eq!(summary.total_tasks, 2);
        assert_eq!(summary.doable_tasks, 1);
        assert!((summary.skip_rate - 25.0).abs() < TOLERANCE);
        assert!((summary.skip_cost - 7.5).abs() < TOLERANCE);
        assert!((summary.net_points - 13.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_blocking_removes_weight_from_both_sides() {
        let calc = EfficiencyCalculator::default();
        let mut rules = vec![
            evaluation(1, 5.0, true, false, true),
            evaluation(2, 5.0, false, false, true),
        ];
        let before = calc.score(&duradel(), &rules);
        assert!((before.skip_rate - 50.0).abs() < TOLERANCE);

        rules[1].is_blocked = true;
        let blocked = calc.score(&duradel(), &rules);
        assert_eq!(blocked.blocked_tasks, 1);
        assert!(blocked.skip_rate.abs() < TOLERANCE);
        assert!((blocked.net_points - 21.0).abs() < TOLERANCE);

        rules[1].is_blocked = false;
        assert_eq!(calc.score(&duradel(), &rules), before);
    }

    #[test]
    fn test_all_blocked_is_degenerate_without_penalty() {
        let calc = EfficiencyCalculator::default();
        let summary = calc.score(&duradel(), &[evaluation(1, 5.0, true, true, true)]);
        assert_eq!(summary.blocked_tasks, 1);
        assert_eq!(summary.skip_rate, 0.0);
        assert_eq!(summary.skip_cost, 0.0);
        assert!((summary.net_points - 21.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_weight_unblocked_rules_are_degenerate() {
        let calc = EfficiencyCalculator::default();

        let undoable = calc.score(&duradel(), &[evaluation(1, 0.0, false, false, true)]);
        assert_eq!(undoable.skip_rate, 100.0);
        assert_eq!(undoable.skip_cost, 30.0);

        // 有可完成任务时退化分支不扣跳过成本
        let doable = calc.score(&duradel(), &[evaluation(1, 0.0, true, false, true)]);
        assert_eq!(doable.skip_rate, 100.0);
        assert_eq!(doable.skip_cost, 0.0);
        assert!((doable.net_points - 21.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_no_rules_at_all() {
        let summary = EfficiencyCalculator::default().score(&duradel(), &[]);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.skip_rate, 0.0);
        assert!((summary.net_points - 21.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_skip_cost_is_overridable() {
        let calc = EfficiencyCalculator::new(EfficiencyPolicy { skip_cost_points: 40.0 });
        let summary = calc.score(
            &duradel(),
            &[
                evaluation(1, 1.0, true, false, true),
                evaluation(2, 1.0, false, false, true),
            ],
        );
        assert!((summary.skip_cost - 20.0).abs() < TOLERANCE);
    }
}
