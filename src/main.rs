// ==========================================
// Slayer 任务追踪系统 - 主入口
// ==========================================
// 打开默认数据库，输出每位导师的效率汇总
// ==========================================

use anyhow::{anyhow, Context, Result};

use slayer_tracker::app::{get_default_db_path, AppState};
use slayer_tracker::logging;

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", slayer_tracker::APP_NAME);
    tracing::info!("系统版本: {}", slayer_tracker::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let masters = state
        .master_api
        .list_masters_with_efficiency()
        .context("导师效率计算失败")?;

    if masters.is_empty() {
        println!("数据库中没有导师数据");
        return Ok(());
    }

    println!(
        "{:<16} {:>6} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "导师", "任务数", "可做", "跳过率", "平均积分", "跳过成本", "净积分"
    );
    for entry in masters {
        let s = &entry.efficiency;
        println!(
            "{:<16} {:>6} {:>6} {:>7.1}% {:>8.2} {:>8.2} {:>8.2}",
            entry.master.name,
            s.total_tasks,
            s.doable_tasks,
            s.skip_rate,
            s.avg_points,
            s.skip_cost,
            s.net_points
        );
    }

    Ok(())
}
