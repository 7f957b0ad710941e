// ==========================================
// 救灾物资调度系统 - 主入口
// ==========================================
// 用途: 对当前数据库快照执行一次分配运行并输出摘要
// ==========================================

use relief_dispatch::app::{get_default_db_path, AppState};
use relief_dispatch::logging;

fn main() {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", relief_dispatch::APP_NAME);
    tracing::info!("系统版本: {}", relief_dispatch::VERSION);
    tracing::info!("==================================================");

    // 数据库路径: 第一个命令行参数，缺省为系统数据目录
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("无法创建数据目录 {}: {}", parent.display(), e);
            std::process::exit(1);
        }
    }

    // 创建AppState
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    // 执行一次分配运行
    match app_state.assignment_api.process_assignments() {
        Ok(assignments) => {
            let matched = assignments.iter().filter(|a| a.is_matched()).count();
            tracing::info!(
                "分配完成: 共 {} 个区域, 成功 {}, 未分配 {}",
                assignments.len(),
                matched,
                assignments.len() - matched
            );
            for assignment in &assignments {
                match (&assignment.truck_id, &assignment.message) {
                    (Some(truck_id), _) => {
                        tracing::info!("区域 {} ← 车辆 {}", assignment.area_id, truck_id)
                    }
                    (None, Some(message)) => {
                        tracing::warn!("区域 {} 未分配: {}", assignment.area_id, message)
                    }
                    (None, None) => {}
                }
            }
        }
        Err(e) => {
            tracing::error!("分配运行失败: {}", e);
            std::process::exit(1);
        }
    }
}
