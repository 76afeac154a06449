// ==========================================
// Slayer 任务追踪系统 - 引擎层
// ==========================================
// 职责: 任务可行性与导师效率评估,不拼 SQL
// 依赖顺序: availability / eligibility → weight → efficiency → evaluator
// ==========================================

pub mod availability;
pub mod efficiency;
pub mod eligibility;
pub mod evaluator;
pub mod orchestrator;
pub mod repositories;
pub mod weight;

// 重导出核心引擎
pub use availability::{AvailabilityEvaluator, MonsterAvailability};
pub use efficiency::{
    EfficiencyCalculator, EfficiencyPolicy, EfficiencySummary, DEFAULT_SKIP_COST_POINTS,
};
pub use eligibility::EligibilityResolver;
pub use evaluator::{MasterEvaluation, MasterEvaluator, MasterSnapshot, RuleEvaluation, TaskView};
pub use orchestrator::MasterEvaluationService;
pub use repositories::SlayerRepositories;
pub use weight::WeightRedistributor;
