// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

use relief_dispatch::db::ensure_schema;
use relief_dispatch::domain::{Area, ResourceMap, TravelTimeMap, Truck};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 构造物资清单
pub fn resources(pairs: &[(&str, i64)]) -> ResourceMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// 构造行车时间表
pub fn travel(pairs: &[(&str, i64)]) -> TravelTimeMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// 构造测试区域
pub fn make_area(
    area_id: &str,
    urgency_level: i32,
    required: &[(&str, i64)],
    time_constraint_hours: i64,
) -> Area {
    Area::new(
        area_id,
        urgency_level,
        resources(required),
        time_constraint_hours,
    )
}

/// 构造测试车辆
pub fn make_truck(truck_id: &str, available: &[(&str, i64)], routes: &[(&str, i64)]) -> Truck {
    Truck::new(truck_id, resources(available), travel(routes))
}
