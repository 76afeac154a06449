// ==========================================
// Slayer 任务追踪系统 - 权重再分配
// ==========================================
// 职责: 地点型导师按地点拆分的规则,将任务名义权重
//       平均分摊到当前可派发的地点变体上
// 红线: 纯转换,返回新列表,不修改输入
// ==========================================

use crate::domain::SlayerMaster;
use crate::engine::evaluator::RuleEvaluation;
use std::collections::HashMap;
use tracing::warn;

/// 变体组统计
#[derive(Debug, Clone, Copy)]
struct VariantGroup {
    base_weight: f64,
    assignable: usize,
}

pub struct WeightRedistributor;

impl WeightRedistributor {
    /// 计算有效权重
    ///
    /// # 规则
    /// - 非地点型导师: effective_weight = 名义权重
    /// - 地点型导师: 按任务 id 分组
    ///   - 可派发变体数 n > 0: 可派发变体得 base_weight / n,其余得 0
    ///   - n == 0: 全组为 0
    ///
    /// # 不变量
    /// 对于至少有一个可派发变体的任务,组内有效权重之和等于名义权重
    pub fn redistribute(master: &SlayerMaster, evaluations: &[RuleEvaluation]) -> Vec<RuleEvaluation> {
        if !master.is_location_based {
            return evaluations
                .iter()
                .map(|e| RuleEvaluation {
                    effective_weight: e.rule.weight,
                    ..e.clone()
                })
                .collect();
        }

        let groups = Self::collect_groups(evaluations);

        evaluations
            .iter()
            .map(|e| {
                let effective_weight = match groups.get(&e.rule.task.id) {
                    Some(group) if e.is_assignable && group.assignable > 0 => {
                        group.base_weight / group.assignable as f64
                    }
                    _ => 0.0,
                };
                RuleEvaluation {
                    effective_weight,
                    ..e.clone()
                }
            })
            .collect()
    }

    /// 按任务 id 汇总变体组
    ///
    /// base_weight 取组内第一条规则的名义权重
    fn collect_groups(evaluations: &[RuleEvaluation]) -> HashMap<i64, VariantGroup> {
        let mut groups: HashMap<i64, VariantGroup> = HashMap::new();

        for e in evaluations {
            let group = groups.entry(e.rule.task.id).or_insert(VariantGroup {
                base_weight: e.rule.weight,
                assignable: 0,
            });

            if (group.base_weight - e.rule.weight).abs() > f64::EPSILON {
                warn!(
                    task_id = e.rule.task.id,
                    task = %e.rule.task.name,
                    expected = group.base_weight,
                    actual = e.rule.weight,
                    "地点变体名义权重不一致,沿用首条规则权重"
                );
            }

            if e.is_assignable {
                group.assignable += 1;
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignmentRule, LocationRestriction, Task};

    const TOLERANCE: f64 = 1e-9;

    fn master(is_location_based: bool) -> SlayerMaster {
        SlayerMaster {
            id: 9,
            name: "Konar quo Maten".to_string(),
            combat_requirement: 75,
            slayer_requirement: 1,
            points_per_task: 18,
            points_per_tenth_task: 90,
            is_location_based,
        }
    }

    fn variant(rule_id: i64, task_id: i64, weight: f64, location: &str, assignable: bool) -> RuleEvaluation {
        RuleEvaluation {
            rule: AssignmentRule {
                id: rule_id,
                master_id: 9,
                task: Task {
                    id: task_id,
                    name: format!("task-{}", task_id),
                    slayer_requirement: 1,
                },
                weight,
                min_amount: 120,
                max_amount: 170,
                quest_unlocks: vec![],
                slayer_unlock: None,
                location_restriction: Some(LocationRestriction::Named(location.to_string())),
            },
            monsters: vec![],
            can_do: true,
            is_blocked: false,
            is_assignable: assignable,
            effective_weight: weight,
        }
    }

    #[test]
    fn test_non_location_master_keeps_nominal_weight() {
        let input = vec![
            variant(1, 1, 9.0, "Taverley Dungeon", true),
            variant(2, 1, 9.0, "Kourend Catacombs", false),
        ];
        let output = WeightRedistributor::redistribute(&master(false), &input);
        assert_eq!(output[0].effective_weight, 9.0);
        assert_eq!(output[1].effective_weight, 9.0);
    }

    #[test]
    fn test_splits_across_assignable_variants() {
        // 3 个地点变体,玩家满足其中 2 个
        let input = vec![
            variant(1, 1, 9.0, "Taverley Dungeon", true),
            variant(2, 1, 9.0, "Kourend Catacombs", true),
            variant(3, 1, 9.0, "Lithkren Vault", false),
        ];
        let output = WeightRedistributor::redistribute(&master(true), &input);

        assert!((output[0].effective_weight - 4.5).abs() < TOLERANCE);
        assert!((output[1].effective_weight - 4.5).abs() < TOLERANCE);
        assert_eq!(output[2].effective_weight, 0.0);

        let sum: f64 = output.iter().map(|e| e.effective_weight).sum();
        assert!((sum - 9.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_group_without_assignable_variant_is_zeroed() {
        let input = vec![
            variant(1, 1, 7.0, "Taverley Dungeon", false),
            variant(2, 1, 7.0, "Kourend Catacombs", false),
            variant(3, 2, 5.0, "Karuulm Slayer Dungeon", true),
        ];
        let output = WeightRedistributor::redistribute(&master(true), &input);
        assert_eq!(output[0].effective_weight, 0.0);
        assert_eq!(output[1].effective_weight, 0.0);
        assert_eq!(output[2].effective_weight, 5.0);
    }

    #[test]
    fn test_groups_by_task_id_not_name() {
        let mut a = variant(1, 1, 6.0, "Taverley Dungeon", true);
        let mut b = variant(2, 2, 6.0, "Kourend Catacombs", true);
        a.rule.task.name = "Dragons".to_string();
        b.rule.task.name = "Dragons".to_string();

        let output = WeightRedistributor::redistribute(&master(true), &[a, b]);
        assert_eq!(output[0].effective_weight, 6.0);
        assert_eq!(output[1].effective_weight, 6.0);
    }

    #[test]
    fn test_sum_invariant_for_odd_split() {
        let input: Vec<_> = (0..7)
            .map(|i| variant(i, 1, 10.0, &format!("loc-{}", i), true))
            .collect();
        let output = WeightRedistributor::redistribute(&master(true), &input);
        let sum: f64 = output.iter().map(|e| e.effective_weight).sum();
        assert!((sum - 10.0).abs() < TOLERANCE);
        // 输入保持不变
        assert_eq!(input[0].effective_weight, 10.0);
    }
}
