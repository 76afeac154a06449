// ==========================================
// Slayer 任务追踪系统 - 导师评估器
// ==========================================
// 职责: 在一份只读快照上串联 准入判定 → 可完成性评估
//       → 权重再分配 → 效率评分
// 红线: 纯计算,无 I/O,无跨调用状态
// ==========================================

use crate::domain::{AssignmentRule, Monster, PlayerProfile, SlayerMaster};
use crate::engine::availability::{AvailabilityEvaluator, MonsterAvailability};
use crate::engine::efficiency::{EfficiencyCalculator, EfficiencyPolicy, EfficiencySummary};
use crate::engine::eligibility::EligibilityResolver;
use crate::engine::weight::WeightRedistributor;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// MasterSnapshot - 单个导师的评估输入
// ==========================================
#[derive(Debug, Clone)]
pub struct MasterSnapshot {
    pub master: SlayerMaster,
    pub rules: Vec<AssignmentRule>,
    /// task_id → 关联怪物
    pub task_monsters: HashMap<i64, Vec<Monster>>,
    /// 当前导师下被屏蔽的 task_id
    pub blocked_task_ids: HashSet<i64>,
    pub player: PlayerProfile,
}

// ==========================================
// RuleEvaluation - 单条规则的评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    pub rule: AssignmentRule,
    pub monsters: Vec<MonsterAvailability>,
    pub can_do: bool,
    pub is_blocked: bool,
    pub is_assignable: bool,
    pub effective_weight: f64,
}

// ==========================================
// TaskView - 对外输出的任务视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: i64,
    pub name: String,
    pub effective_weight: f64,
    pub min_amount: i32,
    pub max_amount: i32,
    pub slayer_requirement: i32,
    pub quest_unlocks: Vec<String>,
    pub slayer_unlock: Option<String>,
    pub location_restriction: Option<String>,
    pub monsters: Vec<MonsterAvailability>,
    pub can_do: bool,
    pub is_blocked: bool,
    pub is_assignable: bool,
}

impl From<RuleEvaluation> for TaskView {
    fn from(e: RuleEvaluation) -> Self {
        Self {
            id: e.rule.task.id,
            name: e.rule.task.name,
            effective_weight: e.effective_weight,
            min_amount: e.rule.min_amount,
            max_amount: e.rule.max_amount,
            slayer_requirement: e.rule.task.slayer_requirement,
            quest_unlocks: e.rule.quest_unlocks,
            slayer_unlock: e.rule.slayer_unlock,
            location_restriction: e
                .rule
                .location_restriction
                .map(|r| r.to_db_str().to_string()),
            monsters: e.monsters,
            can_do: e.can_do,
            is_blocked: e.is_blocked,
            is_assignable: e.is_assignable,
        }
    }
}

// ==========================================
// MasterEvaluation - 评估输出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterEvaluation {
    pub tasks: Vec<TaskView>,
    pub summary: EfficiencySummary,
}

pub struct MasterEvaluator {
    calculator: EfficiencyCalculator,
}

impl MasterEvaluator {
    pub fn new(policy: EfficiencyPolicy) -> Self {
        Self {
            calculator: EfficiencyCalculator::new(policy),
        }
    }

    /// 逐条评估规则 (未做权重再分配, effective_weight = 名义权重)
    pub fn evaluate_rules(snapshot: &MasterSnapshot) -> Vec<RuleEvaluation> {
        snapshot
            .rules
            .iter()
            .map(|rule| {
                let monsters = snapshot
                    .task_monsters
                    .get(&rule.task.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let availability = AvailabilityEvaluator::evaluate(rule, monsters, &snapshot.master);
                let can_do = AvailabilityEvaluator::task_can_do(&availability);

                let is_assignable =
                    EligibilityResolver::is_assignable(rule, &snapshot.master, &snapshot.player);
                if !is_assignable {
                    let unmet = EligibilityResolver::unmet_requirements(
                        rule,
                        &snapshot.master,
                        &snapshot.player,
                    );
                    debug!(task = %rule.task.name, ?unmet, "规则不可派发");
                }

                RuleEvaluation {
                    rule: rule.clone(),
                    monsters: availability,
                    can_do,
                    is_blocked: snapshot.blocked_task_ids.contains(&rule.task.id),
                    is_assignable,
                    effective_weight: rule.weight,
                }
            })
            .collect()
    }

    /// 评估导师: 任务视图 + 效率汇总
    #[instrument(skip(self, snapshot), fields(master_id = snapshot.master.id))]
    pub fn evaluate(&self, snapshot: &MasterSnapshot) -> MasterEvaluation {
        let raw = Self::evaluate_rules(snapshot);
        let weighted = WeightRedistributor::redistribute(&snapshot.master, &raw);
        let summary = self.calculator.score(&snapshot.master, &weighted);

        debug!(
            master = %snapshot.master.name,
            total = summary.total_tasks,
            doable = summary.doable_tasks,
            blocked = summary.blocked_tasks,
            net_points = summary.net_points,
            "导师评估完成"
        );

        MasterEvaluation {
            tasks: weighted.into_iter().map(TaskView::from).collect(),
            summary,
        }
    }

    /// 快照缺失 (导师不存在) 时返回全零汇总
    pub fn evaluate_optional(&self, snapshot: Option<&MasterSnapshot>) -> MasterEvaluation {
        match snapshot {
            Some(s) => self.evaluate(s),
            None => MasterEvaluation::default(),
        }
    }
}

impl Default for MasterEvaluator {
    fn default() -> Self {
        Self::new(EfficiencyPolicy::default())
    }
}
