// ==========================================
// Slayer 任务追踪系统 - 导师评估服务
// ==========================================
// 职责: 从仓储加载只读快照,交给 MasterEvaluator 计算
// 红线: 引擎不拼 SQL; 加载完成后的计算不做任何 I/O
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::{PlayerProfile, SlayerMaster};
use crate::engine::efficiency::EfficiencySummary;
use crate::engine::evaluator::{MasterEvaluation, MasterEvaluator, MasterSnapshot};
use crate::engine::repositories::SlayerRepositories;
use crate::repository::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct MasterEvaluationService<C>
where
    C: EngineConfigReader,
{
    repos: SlayerRepositories,
    config: Arc<C>,
}

impl<C> MasterEvaluationService<C>
where
    C: EngineConfigReader,
{
    pub fn new(repos: SlayerRepositories, config: Arc<C>) -> Self {
        Self { repos, config }
    }

    /// 读取当前玩家档案 (缺失字段按配置默认值填充)
    pub fn load_player(&self) -> RepositoryResult<PlayerProfile> {
        let defaults = self
            .config
            .profile_defaults()
            .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
        self.repos.player_repo.get_profile(defaults)
    }

    /// 加载导师快照
    ///
    /// # 返回
    /// - Ok(None): 导师不存在
    pub fn load_snapshot(
        &self,
        master_id: i64,
        player: &PlayerProfile,
    ) -> RepositoryResult<Option<MasterSnapshot>> {
        let master = match self.repos.master_repo.find_by_id(master_id)? {
            Some(m) => m,
            None => return Ok(None),
        };
        self.load_snapshot_for(master, player).map(Some)
    }

    fn load_snapshot_for(
        &self,
        master: SlayerMaster,
        player: &PlayerProfile,
    ) -> RepositoryResult<MasterSnapshot> {
        let rules = self.repos.task_repo.find_rules_by_master(master.id)?;

        let mut task_monsters = HashMap::new();
        for rule in &rules {
            if !task_monsters.contains_key(&rule.task.id) {
                let monsters = self.repos.monster_repo.find_by_task(rule.task.id)?;
                task_monsters.insert(rule.task.id, monsters);
            }
        }

        let blocked_task_ids = self.repos.blocked_repo.find_blocked_task_ids(master.id)?;

        Ok(MasterSnapshot {
            master,
            rules,
            task_monsters,
            blocked_task_ids,
            player: player.clone(),
        })
    }

    fn evaluator(&self) -> RepositoryResult<MasterEvaluator> {
        let policy = self
            .config
            .efficiency_policy()
            .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
        Ok(MasterEvaluator::new(policy))
    }

    /// 评估单个导师 (导师不存在 → 空任务列表 + 全零汇总)
    #[instrument(skip(self))]
    pub fn evaluate_master(&self, master_id: i64) -> RepositoryResult<MasterEvaluation> {
        let player = self.load_player()?;
        let snapshot = self.load_snapshot(master_id, &player)?;
        if snapshot.is_none() {
            info!(master_id, "导师不存在,返回全零汇总");
        }
        Ok(self.evaluator()?.evaluate_optional(snapshot.as_ref()))
    }

    /// 评估全部导师 (按战斗要求排序)
    #[instrument(skip(self))]
    pub fn evaluate_all(&self) -> RepositoryResult<Vec<(SlayerMaster, EfficiencySummary)>> {
        let player = self.load_player()?;
        let evaluator = self.evaluator()?;

        let mut results = Vec::new();
        for master in self.repos.master_repo.list_all()? {
            let snapshot = self.load_snapshot_for(master.clone(), &player)?;
            let evaluation = evaluator.evaluate(&snapshot);
            results.push((master, evaluation.summary));
        }

        info!(count = results.len(), "全部导师评估完成");
        Ok(results)
    }
}
