// ==========================================
// 救灾物资调度系统 - 请求校验
// ==========================================
// 职责: 校验区域/车辆写入请求的字段约束
// 约束来源:
// - urgency_level ∈ [1,5]
// - required_resources 至少一项且数量 > 0
// - time_constraint_hours > 0
// - available_resources 数量 ≥ 0
// - travel_time_to_area 行车时间 > 0
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{Area, Truck};

/// 校验区域写入请求
pub fn validate_area(area: &Area) -> ApiResult<()> {
    if area.area_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("area_id 不能为空".to_string()));
    }

    if !(1..=5).contains(&area.urgency_level) {
        return Err(ApiError::InvalidInput(
            "urgency_level 必须在 1 到 5 之间".to_string(),
        ));
    }

    if area.required_resources.is_empty() {
        return Err(ApiError::InvalidInput(
            "required_resources 至少需要一项".to_string(),
        ));
    }

    for (name, qty) in &area.required_resources {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("物资名称不能为空".to_string()));
        }
        if *qty <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "物资 {} 的需求数量必须大于 0",
                name
            )));
        }
    }

    if area.time_constraint_hours <= 0 {
        return Err(ApiError::InvalidInput(
            "time_constraint_hours 必须大于 0".to_string(),
        ));
    }

    Ok(())
}

/// 校验车辆写入请求
pub fn validate_truck(truck: &Truck) -> ApiResult<()> {
    if truck.truck_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("truck_id 不能为空".to_string()));
    }

    if truck.available_resources.is_empty() {
        return Err(ApiError::InvalidInput(
            "available_resources 至少需要一项".to_string(),
        ));
    }

    for (name, qty) in &truck.available_resources {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("物资名称不能为空".to_string()));
        }
        if *qty < 0 {
            return Err(ApiError::InvalidInput(format!(
                "物资 {} 的库存数量不能为负",
                name
            )));
        }
    }

    if truck.travel_time_to_area.is_empty() {
        return Err(ApiError::InvalidInput(
            "travel_time_to_area 至少需要一项".to_string(),
        ));
    }

    for (area_id, hours) in &truck.travel_time_to_area {
        if area_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("行车时间的区域标识不能为空".to_string()));
        }
        if *hours <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "到区域 {} 的行车时间必须大于 0",
                area_id
            )));
        }
    }

    Ok(())
}

/// 校验路径参数与请求体的主键一致性（更新接口）
pub fn validate_id_match(path_id: &str, body_id: &str, field: &str) -> ApiResult<()> {
    if path_id.trim().is_empty() || body_id.trim().is_empty() || path_id != body_id {
        return Err(ApiError::InvalidInput(format!(
            "{} 不能为空且必须与路径参数一致",
            field
        )));
    }
    Ok(())
}
