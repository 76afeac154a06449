// ==========================================
// Slayer 任务追踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{MasterApi, MonsterApi, PlayerApi, TaskApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{MasterEvaluationService, SlayerRepositories};
use crate::repository::{
    BlockedTaskRepository, MonsterRepository, PlayerProfileRepository, SlayerMasterRepository,
    TaskRepository,
};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SLAYER_TRACKER_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub master_api: Arc<MasterApi>,
    pub monster_api: Arc<MonsterApi>,
    pub task_api: Arc<TaskApi>,
    pub player_api: Arc<PlayerApi>,

    /// 配置管理器 (skip_cost_points 等可调参数)
    pub config_manager: Arc<ConfigManager>,

    /// 导师仓储（参考数据录入）
    pub master_repo: Arc<SlayerMasterRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并初始化 schema
    /// 2. 初始化所有Repository
    /// 3. 创建评估服务和所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库 schema 初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let master_repo = Arc::new(SlayerMasterRepository::from_connection(conn.clone()));
        let task_repo = Arc::new(TaskRepository::from_connection(conn.clone()));
        let monster_repo = Arc::new(MonsterRepository::from_connection(conn.clone()));
        let blocked_repo = Arc::new(BlockedTaskRepository::from_connection(conn.clone()));
        let player_repo = Arc::new(PlayerProfileRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化引擎服务
        // ==========================================
        let repos = SlayerRepositories::new(
            master_repo.clone(),
            task_repo.clone(),
            monster_repo.clone(),
            blocked_repo.clone(),
            player_repo.clone(),
        );
        let evaluation = Arc::new(MasterEvaluationService::new(repos, config_manager.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let master_api = Arc::new(MasterApi::new(
            evaluation,
            master_repo.clone(),
            task_repo.clone(),
            blocked_repo,
        ));
        let monster_api = Arc::new(MonsterApi::new(monster_repo));
        let task_api = Arc::new(TaskApi::new(task_repo));
        let player_api = Arc::new(PlayerApi::new(player_repo, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            master_api,
            monster_api,
            task_api,
            player_api,
            config_manager,
            master_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 `SLAYER_TRACKER_DB_PATH` > 用户数据目录 > `./slayer_tracker.db`
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./slayer_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染正式数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("slayer-tracker-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("slayer-tracker");

        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join("slayer_tracker.db"),
            Err(e) => tracing::warn!("无法创建数据目录 {:?}: {}, 使用当前目录", dir, e),
        }
    }

    path.to_string_lossy().to_string()
}
