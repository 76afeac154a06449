// ==========================================
// Slayer 任务追踪系统 - 核心库
// ==========================================
// 系统定位: 导师任务可行性与积分效率评估
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 可行性 / 权重 / 效率
pub mod engine;

// 配置层 - 可调参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AssignmentRule, BlockedTask, Location, LocationRestriction, Monster, PlayerProfile,
    SlayerMaster, Task,
};

// 引擎
pub use engine::{
    AvailabilityEvaluator, EfficiencyCalculator, EfficiencySummary, EligibilityResolver,
    MasterEvaluationService, MasterEvaluator, WeightRedistributor,
};

// API
pub use api::{MasterApi, MonsterApi, PlayerApi, TaskApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Slayer 任务追踪系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
