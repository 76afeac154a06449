// ==========================================
// Slayer 任务追踪系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合导师评估所需的所有 Repository
// ==========================================

use std::sync::Arc;

use crate::repository::{
    BlockedTaskRepository, MonsterRepository, PlayerProfileRepository, SlayerMasterRepository,
    TaskRepository,
};

/// 导师评估仓储集合
///
/// 聚合评估所需的所有 Repository，简化依赖注入。
///
/// # 包含的仓储
/// - `master_repo`: 导师
/// - `task_repo`: 任务与分配规则
/// - `monster_repo`: 怪物与击杀计数
/// - `blocked_repo`: 屏蔽任务
/// - `player_repo`: 玩家档案
#[derive(Clone)]
pub struct SlayerRepositories {
    pub master_repo: Arc<SlayerMasterRepository>,
    pub task_repo: Arc<TaskRepository>,
    pub monster_repo: Arc<MonsterRepository>,
    pub blocked_repo: Arc<BlockedTaskRepository>,
    pub player_repo: Arc<PlayerProfileRepository>,
}

impl SlayerRepositories {
    pub fn new(
        master_repo: Arc<SlayerMasterRepository>,
        task_repo: Arc<TaskRepository>,
        monster_repo: Arc<MonsterRepository>,
        blocked_repo: Arc<BlockedTaskRepository>,
        player_repo: Arc<PlayerProfileRepository>,
    ) -> Self {
        Self {
            master_repo,
            task_repo,
            monster_repo,
            blocked_repo,
            player_repo,
        }
    }
}

// 注: SlayerRepositories 作为简单的聚合结构体，其正确性由
// MasterEvaluationService 的集成测试来验证。
